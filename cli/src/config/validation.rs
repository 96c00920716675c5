use std::path::PathBuf;

/// Log levels accepted in `[logging] level`
pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("editor_name must not be empty")]
    EmptyEditorName,
    #[error("restart_command must not be blank")]
    BlankRestartCommand,
    #[error("Invalid logging level: {configured}")]
    LogLevel { configured: String },
    #[error("themes_dir and activation_dir are the same directory: {}", path.display())]
    SharedDirectory { path: PathBuf },
    #[error(
        "activation_dir {} and themes_dir {} are nested",
        activation.display(),
        themes.display()
    )]
    NestedDirectories { activation: PathBuf, themes: PathBuf },
    #[error("settings_file {} lies inside activation_dir", path.display())]
    SettingsInActivationDir { path: PathBuf },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::EmptyEditorName => {
                "Editor name is empty!\n\nPlease set editor_name in config.toml or remove it to use the default.".to_string()
            }
            ConfigValidationError::BlankRestartCommand => {
                "Restart command is blank!\n\nPlease set restart_command in config.toml to a shell command, or remove it.".to_string()
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: {configured}\n\
                    Valid values: {}\n\n\
                    Please update [logging] level in config.toml.",
                    LOG_LEVELS.join(", ")
                )
            }
            ConfigValidationError::SharedDirectory { path } => {
                format!(
                    "Themes and activation directories overlap!\n\n\
                    Both point at: {}\n\n\
                    Activation removes files from activation_dir, so it must be a separate directory.",
                    path.display()
                )
            }
            ConfigValidationError::NestedDirectories { activation, themes } => {
                format!(
                    "Themes and activation directories are nested!\n\n\
                    activation_dir: {}\n\
                    themes_dir: {}\n\n\
                    Neither directory may contain the other.",
                    activation.display(),
                    themes.display()
                )
            }
            ConfigValidationError::SettingsInActivationDir { path } => {
                format!(
                    "Settings file is inside the activation directory!\n\n\
                    Settings file: {}\n\n\
                    Activation removes unknown files from activation_dir; move settings_file elsewhere.",
                    path.display()
                )
            }
        }
    }
}
