use crate::error::{AppError, AppResult};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

pub mod app;
pub mod setup;
pub mod validation;

pub use app::{AppConfig, LoggingConfig};
pub use validation::ConfigValidationError;

/// Prefix of environment overrides, e.g. `BASE16__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "BASE16";

/// Load the configuration for this run.
///
/// `explicit` must exist when given. Otherwise `./config.toml` and then the
/// platform config directory are searched; when neither has a file, a
/// default one is created in the config directory. Relative paths in the
/// file resolve against the directory holding it.
pub fn load_config(explicit: Option<&Path>) -> AppResult<AppConfig> {
    dotenv::dotenv().ok();
    let config_dir = setup::get_config_dir()?;

    let file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => setup::find_config_file(&config_dir).or_else(|| {
            match setup::initialize_config_dir(&config_dir) {
                Ok(path) => Some(path),
                Err(e) => {
                    // Defaults still work without a file
                    log::warn!("Could not create default configuration: {e}");
                    None
                }
            }
        }),
    };

    let base_dir = base_dir_for(file.as_deref(), &config_dir);
    load_from(file.as_deref(), &base_dir)
}

/// Directory relative paths resolve against: the one holding `file`, or
/// `config_dir` when there is no file
pub fn base_dir_for(file: Option<&Path>, config_dir: &Path) -> PathBuf {
    let Some(file) = file else {
        return config_dir.to_path_buf();
    };
    let parent = file.parent().unwrap_or(Path::new(""));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf())
}

/// Layer `file` (when given) under the environment and validate the result.
/// Relative paths resolve against `base_dir`.
pub fn load_from(file: Option<&Path>, base_dir: &Path) -> AppResult<AppConfig> {
    let mut builder = Config::builder();
    if let Some(file) = file {
        log::debug!("Loading configuration from {}", file.display());
        builder = builder.add_source(File::from(file).required(true));
    }

    // Environment entries override file values
    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| AppError::Config(format!("Configuration loading failed: {e}")))?;

    let app_config = config
        .try_deserialize::<AppConfig>()
        .map_err(|e| AppError::Config(format!("Failed to deserialize config: {e}")))?
        .with_base_dir(base_dir);

    app_config.validate().map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        AppError::Config(messages.join("\n\n"))
    })?;

    Ok(app_config)
}
