//! Collaborator surfaces provided by the host editor.
//!
//! The engine never talks to a terminal, a window or a process table
//! directly. Everything user facing goes through these traits so that the
//! terminal front-end and the test doubles plug in the same way.

use crate::types::PickItem;

/// Events delivered by the host to the extension's event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A registered command was invoked by a user gesture
    Command(String),
    /// A configuration value changed; carries the affected key
    ConfigurationChanged(String),
    /// The host is shutting down; the event loop returns
    Shutdown,
}

/// Options shown alongside a multi-select picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOptions {
    pub placeholder: String,
    pub can_pick_many: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            placeholder: "Search a theme".to_string(),
            can_pick_many: true,
        }
    }
}

/// Multi-select list presented to the user
pub trait SelectionUi {
    /// Show `items` and return the chosen subset, or `None` if the user
    /// cancelled. An empty `Some` means the user confirmed an empty choice.
    fn pick_many(&mut self, items: &[PickItem], options: &PickOptions) -> Option<Vec<PickItem>>;
}

/// User-visible notifications
pub trait Notifier {
    /// Show `message` with a "Restart" action. Returns true when the user
    /// chose to restart.
    fn prompt_restart(&mut self, message: &str) -> bool;

    /// Surface a fatal error to the user
    fn show_error(&mut self, message: &str);
}

/// Host-level process control
pub trait HostControl {
    /// Restart the host so that newly activated themes are picked up
    fn restart(&mut self) -> Result<(), String>;
}
