//! Configuration module.
//!
//! Provides [`Settings`] (the `[General]` / `[Advanced]` sections of
//! `config.toml`), [`AppPaths`] for locating the file next to the executable,
//! and create-if-missing persistence via [`Settings::load_or_create`].

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AdminMode, AdvancedSettings, ConfigError, GeneralSettings, LoadedSettings, Settings,
};
