use crate::config::setup::SetupError;
use engine::EngineError;
use engine::host::Notifier;
use std::fmt::Display;

/// Application-wide errors for the terminal front-end.
///
/// Engine failures raised inside a command are already surfaced by the
/// extension through its notifier; the variants here cover everything that
/// happens around it: loading configuration, preparing directories and
/// writing command output.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors were shown to the user while the session kept going
    #[error("{0} error(s) reported during the session")]
    Reported(usize),
}

impl AppError {
    /// Message shown to the user, with a hint where one helps
    pub fn user_message(&self) -> String {
        match self {
            AppError::Engine(e) if e.is_io() => {
                format!(
                    "{e}\n\nCheck that the themes and activation directories are readable and writable."
                )
            }
            AppError::Engine(e) => e.to_string(),
            AppError::Config(msg) => {
                format!("{msg}\n\nPlease check your config.toml and BASE16__* environment variables.")
            }
            AppError::Setup(e) => e.to_string(),
            AppError::Io(e) => format!("I/O failure: {e}"),
            AppError::Reported(count) => format!("{count} error(s) were reported"),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Where an error happened, for the log line
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.component, self.operation)
    }
}

/// Logs errors with their context and forwards the user-facing message to
/// a notifier.
pub struct ErrorReporter {
    notifier: Box<dyn Notifier>,
}

impl ErrorReporter {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn report(&mut self, error: &AppError, context: ErrorContext) {
        log::error!("[{context}] {error}");
        self.notifier.show_error(&error.user_message());
    }
}
