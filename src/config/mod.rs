//! Configuration module for SpreadSaver
//!
//! This module provides configuration management including:
//! - Settings directory resolution
//! - User settings persistence
//! - Conversion of settings into per-call engine options

pub mod paths;
pub mod settings;

pub use paths::SpreadPaths;
pub use settings::Settings;
