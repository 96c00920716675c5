//! # Base16 Engine
//!
//! Core library behind the base16 activator. It lists the bundled theme
//! catalog, keeps the editor's activated theme list in a configuration
//! store, and reconciles that list with the activation directory on disk.
//!
//! ## Modules
//!
//! - [`activation`] - On-disk activation markers and order manifest
//! - [`catalog`] - Discovery of bundled theme assets
//! - [`config_store`] - List-valued settings with change notification
//! - [`error`] - Engine error types
//! - [`extension`] - Command dispatch and the host event loop
//! - [`host`] - Collaborator traits implemented by the front-end
//! - [`reconciler`] - Diffing and persisting the activated list
//! - [`types`] - Theme identifiers, lists and reconciliation results
//! - [`validation`] - Input validation

pub mod activation;
pub mod catalog;
pub mod config_store;
pub mod error;
pub mod extension;
pub mod host;
pub mod reconciler;
pub mod types;
pub mod validation;

pub use error::{EngineError, EngineResult};
pub use extension::Extension;
pub use types::{ActivatedThemeList, PickItem, ReconciliationResult, ThemeId};
