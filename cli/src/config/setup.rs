use super::app::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_DIR_NAME: &str = "base16-activator";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const CONFIG_HEADER: &str = "# base16-activator configuration\n\
# Every key can be overridden from the environment, e.g. BASE16__EDITOR_NAME=Helix\n\
# or BASE16__LOGGING__LEVEL=debug. Set restart_command to let the tool restart\n\
# your editor after the activated themes change. Relative paths resolve against\n\
# the directory holding this file.\n\n";

#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum SetupError {
    #[error("Failed to determine config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to create directory {path}: {source}")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write file {path}: {source}")]
    WriteFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize default configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Get the standard configuration directory for the current platform
pub fn get_config_dir() -> Result<PathBuf, SetupError> {
    dirs::config_dir()
        .map(|mut path| {
            path.push(APP_DIR_NAME);
            path
        })
        .ok_or_else(|| {
            SetupError::ConfigDirError("Unable to determine config directory".to_string())
        })
}

/// Find a config file: `./config.toml` first, then the one in `config_dir`
pub fn find_config_file(config_dir: &Path) -> Option<PathBuf> {
    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.is_file() {
        return Some(current_dir_config);
    }

    let standard_config = config_dir.join(CONFIG_FILE_NAME);
    standard_config.is_file().then_some(standard_config)
}

/// Create the config directory with its themes directory and a default
/// `config.toml`. Existing files are left alone.
pub fn initialize_config_dir(config_dir: &Path) -> Result<PathBuf, SetupError> {
    let defaults = AppConfig::defaults_for(config_dir);
    create_dir_if_not_exists(config_dir)?;
    create_dir_if_not_exists(&defaults.themes_dir())?;

    let config_file = config_dir.join(CONFIG_FILE_NAME);
    if !config_file.exists() {
        let content = format!("{CONFIG_HEADER}{}", toml::to_string_pretty(&defaults)?);
        fs::write(&config_file, content).map_err(|source| SetupError::WriteFileError {
            path: config_file.clone(),
            source,
        })?;
        log::info!("Created default config file: {}", config_file.display());
    }

    log::info!("Config directory initialized: {}", config_dir.display());
    Ok(config_file)
}

fn create_dir_if_not_exists(path: &Path) -> Result<(), SetupError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| SetupError::CreateDirError {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
