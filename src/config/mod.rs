//! Configuration module for qb.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CompilerSettings, FunctionSettings, Settings, SettingsError, HOLE_MARKER,
};
