use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the catalog, the activation store and the reconciler.
///
/// Only filesystem failures are fatal to a reconciliation run. Invalid or
/// unknown identifiers are normally filtered out before they reach the
/// reconciler; the variants exist so that callers bypassing that filtering
/// still get a precise error instead of a half-written activation directory.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A read or write against the activation or themes directory failed
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identifier cannot name a theme file
    #[error("Invalid theme identifier '{id}': {reason}")]
    InvalidThemeId { id: String, reason: String },

    /// The identifier is well formed but has no asset in the catalog
    #[error("Theme '{0}' is not present in the catalog")]
    UnknownTheme(String),

    /// A manifest, settings file or asset could not be (de)serialized
    #[error("Failed to serialize '{}': {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The activation directory is, contains or lies inside the themes
    /// directory, so writing markers would overwrite or delete assets
    #[error(
        "Activation directory '{}' overlaps themes directory '{}'",
        activation.display(),
        themes.display()
    )]
    OverlappingDirectories { activation: PathBuf, themes: PathBuf },

    /// No handler is registered under the command name
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EngineError::Serialization {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from the filesystem rather than from bad input
    pub fn is_io(&self) -> bool {
        matches!(self, EngineError::Io { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
