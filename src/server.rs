//! Reusable EMP server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! configuration validation, metrics recorder, the OICP HTTP listener and
//! graceful shutdown.
//!
//! Business handlers are registered on [`EmpServerApi`] through
//! [`ServerOptions::setup`] before the listener accepts connections.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::{ApiLogger, ApiSettings, EmpServerApi};
use crate::config::AppConfig;
use crate::interfaces::http::{create_api_router, ApiState};
use crate::support::errors::ServerError;
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type ApiSetup = Box<dyn FnOnce(&EmpServerApi) + Send>;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the EMP server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Register handlers and listeners on the API (default: none).
    pub setup: Option<ApiSetup>,
    /// Log every request and response through [`ApiLogger`] (default: true).
    pub attach_logger: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            setup: None,
            attach_logger: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running EMP server.
///
/// # Examples
///
/// ```rust,no_run
/// use oicp_emp::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The API all routes dispatch to.
    pub api: Arc<EmpServerApi>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the listener is bound to.
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the EMP server with the given options.
    ///
    /// This will:
    /// 1. Validate the configuration
    /// 2. Install the Prometheus metrics recorder (if enabled)
    /// 3. Build the API and run the setup callback
    /// 4. Bind the HTTP listener and start serving
    pub async fn start(opts: ServerOptions) -> Result<Self, ServerError> {
        let config = opts.config;
        config.validate()?;

        info!("Starting OICP EMP server...");

        // ── Prometheus metrics recorder ────────────────────────
        let prometheus_handle = if config.api.expose_metrics {
            Some(prometheus_handle()?)
        } else {
            None
        };

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(Duration::from_secs(
            config.server.shutdown_timeout_secs,
        ));

        // ── API ────────────────────────────────────────────────
        let api = Arc::new(EmpServerApi::new(ApiSettings::from_config(
            &config,
            shutdown.signal(),
        )));
        if opts.attach_logger {
            ApiLogger::attach(&api);
        }
        if let Some(setup) = opts.setup {
            setup(&api);
        }
        if api.handler_count() == 0 {
            warn!("No business handlers registered; every OICP request will be answered with a SystemError");
        }

        // ── HTTP server ────────────────────────────────────────
        let router = create_api_router(
            ApiState::new(Arc::clone(&api), prometheus_handle),
            config.server.max_body_bytes,
        );

        let addr = config.listen_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
        info!("OICP EMP server listening on http://{}", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 HTTP server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("HTTP server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            api,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered,
    /// bounded by `server.shutdown_timeout_secs`.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let api_task = self.api_task;
        let finished = self
            .shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => error!("HTTP server task panicked: {}", e),
                }
            })
            .await;

        if !finished {
            warn!("Open connections were dropped at shutdown");
        }
        info!("👋 OICP EMP server shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down OICP EMP server...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process; a
/// restart within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, ServerError> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
