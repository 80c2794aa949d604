//! OICP EMP server, CLI
//!
//! Headless OICP v2.3 EMP Server API suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/oicp-emp/config.toml)
//! oicp-emp-server
//!
//! # Custom config path
//! oicp-emp-server --config /etc/oicp-emp/config.toml
//!
//! # Override the listen address
//! oicp-emp-server --host 127.0.0.1 --port 8080
//!
//! # Validate config without starting
//! oicp-emp-server --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use oicp_emp::config::{AppConfig, CONFIG_ENV};
use oicp_emp::server::{init_tracing, ServerHandle, ServerOptions};

/// OICP v2.3 EMP Server API.
#[derive(Parser, Debug)]
#[command(
    name = "oicp-emp-server",
    version,
    about = "OICP v2.3 EMP Server API",
    long_about = "HTTP server answering the OICP v2.3 operations the Hubject platform \
                  sends to an e-mobility provider.\n\n\
                  Default config: ~/.config/oicp-emp/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(oicp_emp::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let level = cli.log_level.clone().unwrap_or_else(|| "info".to_string());
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(level))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────────
    if let Some(host) = cli.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.listen_address());
        println!("   Service     : {}", config.api.service_name);
        println!("   Metrics     : {}", config.api.expose_metrics);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
