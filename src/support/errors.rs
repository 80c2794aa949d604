use thiserror::Error;

use crate::domain::Operation;

/// Failure to turn raw input (URL segment, JSON body) into a typed value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid {kind} '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("The ProviderID '{body}' within the request body does not match the URL provider id '{url}'")]
    ProviderMismatch { url: String, body: String },

    #[error("{0}")]
    Custom(String),
}

/// Failure reported by a business-logic handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("{operation} handler panicked: {message}")]
    Panicked {
        operation: Operation,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install Prometheus recorder: {0}")]
    Metrics(String),
}
