//! Shared helpers for command implementations.

pub mod config_loader;

pub use config_loader::{load_config, ConfigLoadArgs};
