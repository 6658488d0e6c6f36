//! Error types for the context menu subsystem.
//!
//! None of these ever reach the end user. Callers inside the crate collapse
//! them into "omit this part of the menu" or "log and do nothing".

use std::path::PathBuf;

/// Result type alias for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors that can occur while building or acting on a context menu.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Configuration could not be parsed.
    #[error("Invalid menu configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("Failed to read menu configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential lookup capability is not available.
    #[error("Credential lookup is unavailable")]
    LookupUnavailable,

    /// The credential lookup rejected.
    #[error("Credential lookup failed: {0}")]
    LookupFailed(String),

    /// An extension menu node no longer exists.
    #[error("Extension '{extension_id}' no longer has menu node '{node_id}'")]
    StaleNode {
        extension_id: String,
        node_id: String,
    },

    /// An extension node declared a kind outside the supported set.
    #[error("Unknown extension menu node kind '{0}'")]
    UnknownNodeKind(String),
}

impl MenuError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a stale extension node error.
    pub fn stale_node(extension_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self::StaleNode {
            extension_id: extension_id.into(),
            node_id: node_id.into(),
        }
    }

    /// Whether this error is a stale reference that dispatch treats as a miss.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleNode { .. })
    }
}
