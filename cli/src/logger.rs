use crate::config::LoggingConfig;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "base16-activator.log";

/// Map a configured level name to a filter; unknown names fall back to info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Raise `level` by one step per `-v`
pub fn apply_verbosity(level: LevelFilter, verbose: u8) -> LevelFilter {
    match verbose {
        0 => level,
        1 => level.max(LevelFilter::Debug),
        _ => LevelFilter::Trace,
    }
}

/// Log file path: the configured one, or the default inside `config_dir`
pub fn log_file_path(logging: &LoggingConfig, config_dir: &Path) -> PathBuf {
    logging
        .file()
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir.join(DEFAULT_LOG_FILE))
}

/// Install the global logger. Records go to the log file; when it cannot be
/// opened they go to stderr instead.
pub fn setup_logger(
    logging: &LoggingConfig,
    config_dir: &Path,
    verbose: u8,
) -> Result<(), log::SetLoggerError> {
    let log_level = apply_verbosity(parse_level(logging.level()), verbose);
    let log_path = log_file_path(logging, config_dir);

    let opened = log_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&log_path));

    match opened {
        Ok(file) => {
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(log_level)
                .chain(file)
                .apply()?;
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file '{}': {e}",
                log_path.display()
            );
            eprintln!("Logging to stderr instead.");

            let colors = ColoredLevelConfig::new()
                .trace(Color::BrightBlack)
                .debug(Color::BrightBlue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            fern::Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        colors.color(record.level()),
                        record.target(),
                        message
                    ))
                })
                .level(log_level)
                .chain(std::io::stderr())
                .apply()?;
        }
    }

    log::info!(
        "Logger initialized with level: {} ({})",
        log_level,
        log_path.display()
    );
    Ok(())
}
