use super::validation::{ConfigValidationError, LOG_LEVELS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

const DEFAULT_EDITOR_NAME: &str = "your editor";
const DEFAULT_THEMES_DIR: &str = "themes";
const DEFAULT_ACTIVATION_DIR: &str = "activated";
const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Main application configuration.
///
/// Relative paths are resolved against the base directory, which is the
/// platform config directory unless the caller says otherwise.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    themes_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    activation_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    editor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restart_command: Option<String>,
    #[serde(default)]
    logging: LoggingConfig,

    #[serde(skip)]
    base_dir: PathBuf,
}

impl AppConfig {
    /// Configuration with every default spelled out, as written to a fresh
    /// `config.toml`
    pub fn defaults_for(base_dir: &Path) -> Self {
        Self {
            themes_dir: Some(base_dir.join(DEFAULT_THEMES_DIR)),
            activation_dir: Some(base_dir.join(DEFAULT_ACTIVATION_DIR)),
            settings_file: Some(base_dir.join(DEFAULT_SETTINGS_FILE)),
            editor_name: Some(DEFAULT_EDITOR_NAME.to_string()),
            restart_command: None,
            logging: LoggingConfig {
                level: Some("info".to_string()),
                file: None,
            },
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the theme catalog
    pub fn themes_dir(&self) -> PathBuf {
        self.resolve(self.themes_dir.as_deref(), DEFAULT_THEMES_DIR)
    }

    /// Directory holding the activation markers and manifest
    pub fn activation_dir(&self) -> PathBuf {
        self.resolve(self.activation_dir.as_deref(), DEFAULT_ACTIVATION_DIR)
    }

    /// JSON settings file holding the activated themes list
    pub fn settings_file(&self) -> PathBuf {
        self.resolve(self.settings_file.as_deref(), DEFAULT_SETTINGS_FILE)
    }

    pub fn editor_name(&self) -> &str {
        self.editor_name.as_deref().unwrap_or(DEFAULT_EDITOR_NAME)
    }

    pub fn restart_command(&self) -> Option<&str> {
        self.restart_command.as_deref()
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn resolve(&self, configured: Option<&Path>, default: &str) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.base_dir.join(path),
            None => self.base_dir.join(default),
        }
    }

    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if self.editor_name().trim().is_empty() {
            errors.push(ConfigValidationError::EmptyEditorName);
        }

        if self.restart_command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            errors.push(ConfigValidationError::BlankRestartCommand);
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        // Compare the directories as the filesystem sees them, so `x/../themes`
        // or a symlink cannot pass for a separate directory
        let themes_dir = resolve_path(&self.themes_dir());
        let activation_dir = resolve_path(&self.activation_dir());
        if themes_dir == activation_dir {
            errors.push(ConfigValidationError::SharedDirectory {
                path: activation_dir.clone(),
            });
        } else if activation_dir.starts_with(&themes_dir) || themes_dir.starts_with(&activation_dir)
        {
            errors.push(ConfigValidationError::NestedDirectories {
                activation: activation_dir.clone(),
                themes: themes_dir,
            });
        }

        let settings_file = resolve_path(&self.settings_file());
        if settings_file.parent() == Some(activation_dir.as_path()) {
            errors.push(ConfigValidationError::SettingsInActivationDir {
                path: settings_file,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Absolute form of `path`: symlinks resolved for the part that exists,
/// `.` and `..` folded lexically for the part that does not yet
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let components: Vec<Component<'_>> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let existing: PathBuf = components[..split].iter().collect();
        let Ok(mut resolved) = fs::canonicalize(&existing) else {
            continue;
        };
        for component in &components[split..] {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir => {}
                other => resolved.push(other),
            }
        }
        return resolved;
    }
    absolute
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
