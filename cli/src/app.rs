use crate::cli::Commands;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ErrorContext, ErrorReporter};
use crate::terminal::{SharedConsole, ShellHost, TerminalNotifier, TerminalSelection};
use engine::Extension;
use engine::activation::ActivationStore;
use engine::catalog::ThemeCatalog;
use engine::config_store::JsonConfigStore;
use engine::host::HostEvent;
use engine::reconciler::Reconciler;
use engine::types::ThemeId;
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::sync::mpsc;

/// One run of the front-end: a loaded configuration and the console the
/// collaborators talk through.
pub struct App<R, W> {
    config: AppConfig,
    console: SharedConsole<R, W>,
}

impl<R: BufRead + 'static, W: Write + 'static> App<R, W> {
    pub fn new(config: AppConfig, console: SharedConsole<R, W>) -> Self {
        Self { config, console }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Wire the extension to the configured directories, the settings file
    /// and the terminal collaborators
    pub fn build_extension(&self) -> Extension {
        let reconciler = Reconciler::new(
            ActivationStore::new(self.config.activation_dir()),
            ThemeCatalog::new(self.config.themes_dir()),
        );
        let editor_name = self.config.editor_name();

        Extension::new(
            Box::new(JsonConfigStore::new(self.config.settings_file())),
            reconciler,
            Box::new(TerminalSelection::new(self.console.clone())),
            Box::new(TerminalNotifier::new(self.console.clone())),
            Box::new(ShellHost::new(
                self.config.restart_command().map(str::to_string),
                editor_name,
                self.console.clone(),
            )),
        )
        .with_editor_name(editor_name)
    }

    /// Run one subcommand. Listings go to `out`, everything interactive to
    /// the console. Fails when any error was shown along the way.
    pub fn run(&self, command: Commands, out: &mut dyn Write) -> AppResult<()> {
        log::info!("Running '{}'", command.label());

        let result = match command {
            Commands::List { active, inactive } => self.list(active, inactive, out),
            other => {
                self.run_session(other.command_name());
                Ok(())
            }
        };

        if let Err(e) = result {
            let mut reporter =
                ErrorReporter::new(Box::new(TerminalNotifier::new(self.console.clone())));
            reporter.report(&e, ErrorContext::new("App", command.label()));
        }

        match self.console.borrow().errors_shown() {
            0 => Ok(()),
            count => Err(AppError::Reported(count)),
        }
    }

    /// Start the extension, which syncs the configured list, then dispatch
    /// `command` and drain the configuration change it causes
    fn run_session(&self, command: Option<&'static str>) {
        let (sender, events) = mpsc::channel();
        let mut extension = self.build_extension();
        extension.activate(sender);

        if let Some(name) = command {
            extension.handle_event(HostEvent::Command(name.to_string()));
        }
        extension.run_until_idle(&events);
    }

    /// Print catalog themes. Unlike the pickers, a catalog that cannot be
    /// read is an error here rather than an empty list.
    fn list(&self, active_only: bool, inactive_only: bool, out: &mut dyn Write) -> AppResult<()> {
        let extension = self.build_extension();
        let existing = extension.catalog().scan()?;
        let active = extension.configured_themes();

        let themes: Vec<ThemeId> = if active_only {
            let known: HashSet<&ThemeId> = existing.iter().collect();
            active.iter().filter(|id| known.contains(id)).cloned().collect()
        } else if inactive_only {
            existing.into_iter().filter(|id| !active.contains(id)).collect()
        } else {
            existing
        };

        for id in themes {
            let mark = if active.contains(&id) { '*' } else { ' ' };
            writeln!(out, "{mark} {id:<32} {}", id.display_label())?;
        }
        Ok(())
    }
}
