use anyhow::Context;
use base16_activator::cli::Cli;
use base16_activator::{App, config, logger, terminal};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("Failed to load configuration")?;

    // The default log file stays in the platform config dir even when the
    // config file lives elsewhere
    let log_dir =
        config::setup::get_config_dir().unwrap_or_else(|_| config.base_dir().to_path_buf());
    logger::setup_logger(config.logging(), &log_dir, cli.verbose)
        .context("Failed to initialize logger")?;

    let app = App::new(config, terminal::stdio_console());
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout)?;
    Ok(())
}
