mod control_plane_error;
mod parser;

use std::path::PathBuf;
use thiserror::Error;

pub use control_plane_error::ControlPlaneError;
pub use parser::{parse_response_error, parse_transport_error, ErrorContext};

#[derive(Error, Debug)]
pub enum KuduUpdateError {
    #[error("{0}")]
    Usage(String),

    #[error("File not found - {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{step} lookup failed: {source}")]
    Lookup {
        step: &'static str,
        #[source]
        source: ControlPlaneError,
    },

    #[error("Configuration command '{command}' failed: {source}")]
    ConfigurationCommand {
        command: String,
        #[source]
        source: ControlPlaneError,
    },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KuduUpdateError {
    pub fn lookup(step: &'static str, source: ControlPlaneError) -> Self {
        KuduUpdateError::Lookup { step, source }
    }

    pub fn command(command: impl Into<String>, source: ControlPlaneError) -> Self {
        KuduUpdateError::ConfigurationCommand {
            command: command.into(),
            source,
        }
    }

    /// The control-plane error behind a lookup or command failure, if any.
    pub fn control_plane(&self) -> Option<&ControlPlaneError> {
        match self {
            KuduUpdateError::Lookup { source, .. } => Some(source),
            KuduUpdateError::ConfigurationCommand { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A PUT to the deployment endpoint that did not come back with 200.
#[derive(Error, Debug, Clone)]
#[error("Upload failed{}: {reason}", status_suffix(.status))]
pub struct UploadError {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub reason: String,
}

impl UploadError {
    pub fn unexpected_status(status: u16, body: Option<String>) -> Self {
        Self {
            status: Some(status),
            body: body.filter(|b| !b.trim().is_empty()),
            reason: "expected status 200".to_string(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            reason: reason.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status code {s})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, KuduUpdateError>;
