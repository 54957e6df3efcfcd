//! Configuration management
//!
//! This module handles loading and managing configuration settings
//! for the server and the classify tool.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    AdminSettings, LoggingSettings, MessageSettings, ServerSettings, Settings, StorageSettings,
};
