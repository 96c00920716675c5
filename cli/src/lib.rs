//! Terminal front-end for the base16 engine.
//!
//! Loads configuration, installs the logger and drives the engine's
//! extension with line-oriented collaborators.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod terminal;

pub use app::App;
pub use error::{AppError, AppResult};
