use crate::catalog::ThemeCatalog;
use crate::config_store::{ACTIVATED_THEMES_KEY, ConfigStore};
use crate::error::{EngineError, EngineResult};
use crate::host::{HostControl, HostEvent, Notifier, PickOptions, SelectionUi};
use crate::reconciler::Reconciler;
use crate::types::{ActivatedThemeList, ReconciliationResult, ThemeId};
use crate::validation::{ThemeIdValidator, Validator};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

pub const ACTIVATE_THEME: &str = "base16.generator.activateTheme";
pub const DEACTIVATE_THEME: &str = "base16.generator.deactivateTheme";
pub const ACTIVATE_ALL_THEMES: &str = "base16.generator.activateAllThemes";
pub const DEACTIVATE_ALL_THEMES: &str = "base16.generator.deactivateAllThemes";

/// Entry point of a registered command
pub type CommandHandler = fn(&mut Extension) -> EngineResult<()>;

const DEFAULT_EDITOR_NAME: &str = "your editor";

/// Session context: the configuration store, the reconciler and the host
/// collaborators, plus the table of registered commands.
///
/// One instance lives for the whole session. Events are handled one at a
/// time, each to completion.
pub struct Extension {
    config: Box<dyn ConfigStore>,
    reconciler: Reconciler,
    selection: Box<dyn SelectionUi>,
    notifier: Box<dyn Notifier>,
    host: Box<dyn HostControl>,
    commands: HashMap<&'static str, CommandHandler>,
    editor_name: String,
    id_validator: ThemeIdValidator,
}

impl Extension {
    pub fn new(
        config: Box<dyn ConfigStore>,
        reconciler: Reconciler,
        selection: Box<dyn SelectionUi>,
        notifier: Box<dyn Notifier>,
        host: Box<dyn HostControl>,
    ) -> Self {
        Self {
            config,
            reconciler,
            selection,
            notifier,
            host,
            commands: HashMap::new(),
            editor_name: DEFAULT_EDITOR_NAME.to_string(),
            id_validator: ThemeIdValidator,
        }
    }

    /// Name used in the restart prompt, e.g. "VSCode"
    pub fn with_editor_name(mut self, editor_name: impl Into<String>) -> Self {
        self.editor_name = editor_name.into();
        self
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        self.reconciler.catalog()
    }

    /// Register the commands, subscribe to configuration changes and bring
    /// the activation directory in line with the configured list.
    ///
    /// The initial sync covers lists edited while the extension was not
    /// running. Its failure is reported, not returned.
    pub fn activate(&mut self, events: Sender<HostEvent>) -> Option<ReconciliationResult> {
        self.register_command(ACTIVATE_THEME, Self::activate_theme);
        self.register_command(DEACTIVATE_THEME, Self::deactivate_theme);
        self.register_command(ACTIVATE_ALL_THEMES, Self::activate_all_themes);
        self.register_command(DEACTIVATE_ALL_THEMES, Self::deactivate_all_themes);
        self.config.subscribe(events);

        log::info!("Extension activated with {} commands", self.commands.len());

        match self.apply_changes() {
            Ok(result) => Some(result),
            Err(e) => {
                self.report_error("sync activated themes", &e);
                None
            }
        }
    }

    /// Add or replace a command in the dispatch table
    pub fn register_command(&mut self, name: &'static str, handler: CommandHandler) {
        if self.commands.insert(name, handler).is_some() {
            log::debug!("Replaced handler for command '{name}'");
        }
    }

    /// Registered command names, sorted
    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn execute_command(&mut self, name: &str) -> EngineResult<()> {
        let handler = *self
            .commands
            .get(name)
            .ok_or_else(|| EngineError::UnknownCommand(name.to_string()))?;
        log::debug!("Executing command '{name}'");
        handler(self)
    }

    /// Handle one host event. Returns false once the host asked to shut down.
    ///
    /// Errors are surfaced through the notifier; they never stop the loop.
    pub fn handle_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Command(name) => {
                if let Err(e) = self.execute_command(&name) {
                    self.report_error(&name, &e);
                }
                true
            }
            HostEvent::ConfigurationChanged(key) => {
                if let Err(e) = self.on_configuration_changed(&key) {
                    self.report_error("apply configuration change", &e);
                }
                true
            }
            HostEvent::Shutdown => false,
        }
    }

    /// Block on `events` until a shutdown event arrives or every sender is gone
    pub fn run(&mut self, events: &Receiver<HostEvent>) {
        while let Ok(event) = events.recv() {
            if !self.handle_event(event) {
                break;
            }
        }
        log::debug!("Extension event loop finished");
    }

    /// Handle every event already queued, including the ones queued while
    /// handling. Returns false if a shutdown event was seen.
    pub fn run_until_idle(&mut self, events: &Receiver<HostEvent>) -> bool {
        loop {
            match events.try_recv() {
                Ok(event) => {
                    if !self.handle_event(event) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return true,
            }
        }
    }

    /// The list as stored in configuration, duplicates dropped
    pub fn configured_themes(&self) -> ActivatedThemeList {
        ActivatedThemeList::from_strings(self.config.get_list(ACTIVATED_THEMES_KEY))
    }

    fn on_configuration_changed(&mut self, key: &str) -> EngineResult<()> {
        if key != ACTIVATED_THEMES_KEY {
            return Ok(());
        }
        self.apply_changes().map(|_| ())
    }

    /// Reconcile the configured list with the activation directory and
    /// offer a restart when the effective set changed.
    pub fn apply_changes(&mut self) -> EngineResult<ReconciliationResult> {
        let themes = self.effective_themes();
        let result = self.reconciler.reconcile(&themes)?;

        if result.equal {
            return Ok(result);
        }

        let message = format!(
            "Base16 theme has changed ({}). Please restart {}.",
            result.summary(),
            self.editor_name
        );
        if self.notifier.prompt_restart(&message) {
            log::info!("Restart requested by user");
            if let Err(e) = self.host.restart() {
                log::error!("Restart failed: {e}");
                self.notifier
                    .show_error(&format!("Failed to restart {}: {e}", self.editor_name));
            }
        }
        Ok(result)
    }

    /// Configured list without identifiers that cannot be activated
    fn effective_themes(&self) -> ActivatedThemeList {
        let mut themes = self.configured_themes();
        let catalog = self.reconciler.catalog();
        themes.retain(|id| {
            if let Err(e) = self.id_validator.validate(id.as_str()) {
                log::warn!("Ignoring configured theme '{id}': {}", e.reason());
                return false;
            }
            if !catalog.contains(id) {
                log::warn!("Ignoring configured theme '{id}': not found in catalog");
                return false;
            }
            true
        });
        themes
    }

    fn store_themes(&mut self, themes: &ActivatedThemeList) -> EngineResult<()> {
        self.config
            .set_list(ACTIVATED_THEMES_KEY, &themes.to_strings())
    }

    fn activate_theme(&mut self) -> EngineResult<()> {
        let mut themes = self.configured_themes();
        let candidates = self.catalog().list_themes(&themes.to_set());
        if candidates.is_empty() {
            log::info!("No inactive themes left to activate");
        }
        let items = self.catalog().pick_items(&candidates, &HashSet::new());

        let Some(selected) = self.selection.pick_many(&items, &PickOptions::default()) else {
            log::debug!("Theme activation cancelled");
            return Ok(());
        };

        for item in selected {
            themes.push(item.id);
        }
        self.store_themes(&themes)
    }

    fn deactivate_theme(&mut self) -> EngineResult<()> {
        let mut themes = self.configured_themes();
        let candidates = self.catalog().list_active(&themes);
        let items = self.catalog().pick_items(&candidates, &HashSet::new());

        let Some(selected) = self.selection.pick_many(&items, &PickOptions::default()) else {
            log::debug!("Theme deactivation cancelled");
            return Ok(());
        };

        let remove: HashSet<ThemeId> = selected.into_iter().map(|item| item.id).collect();
        themes.retain(|id| !remove.contains(id));
        self.store_themes(&themes)
    }

    /// Keeps the current order for active themes and appends the rest
    fn activate_all_themes(&mut self) -> EngineResult<()> {
        let mut themes = self.configured_themes();
        for id in self.catalog().read_existing_themes() {
            themes.push(id);
        }
        self.store_themes(&themes)
    }

    fn deactivate_all_themes(&mut self) -> EngineResult<()> {
        self.store_themes(&ActivatedThemeList::new())
    }

    fn report_error(&mut self, operation: &str, error: &EngineError) {
        log::error!("[Extension:{operation}] {error}");
        self.notifier
            .show_error(&format!("Base16: {operation} failed: {error}"));
    }
}
