//! TOML-based configuration for qb.
//!
//! Supports a config file (qb.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "postgres"
//! persist_unknown_functions = false
//! definitions = "${QB_HOME}/definitions.json"
//!
//! [functions.YEAR]
//! name = "DATE_PART"
//! args = ["year", "?"]
//! ```
//!
//! TOML has no null, so `"?"` marks the column hole in function arguments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::{CompileOptions, QueryCompiler};
use crate::functions::FunctionArg;
use crate::sql::{Dialect, Literal};

/// Marks the column hole in a TOML argument list.
pub const HOLE_MARKER: &str = "?";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Compiler options.
    pub compiler: CompilerSettings,

    /// Functions registered on every compiler, keyed by id.
    pub functions: BTreeMap<String, FunctionSettings>,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// postgres, duckdb, mysql or tsql.
    pub dialect: Option<String>,

    /// Keep pass-through adapters for unknown functions.
    pub persist_unknown_functions: bool,

    /// Default definitions file (supports ${ENV_VAR} expansion).
    pub definitions: Option<String>,
}

/// A `[functions.ID]` entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FunctionSettings {
    /// Name written into SQL. Defaults to the id.
    pub name: Option<String>,

    /// Prefilled arguments; `"?"` marks where the column goes.
    pub args: Vec<toml::Value>,
}

impl FunctionSettings {
    /// The argument template as function arguments.
    pub fn function_args(&self) -> Result<Vec<FunctionArg>, SettingsError> {
        self.args.iter().map(function_arg).collect()
    }
}

fn function_arg(value: &toml::Value) -> Result<FunctionArg, SettingsError> {
    Ok(match value {
        toml::Value::String(s) if s == HOLE_MARKER => FunctionArg::Hole,
        toml::Value::String(s) => FunctionArg::Value(Literal::String(s.clone())),
        toml::Value::Integer(n) => FunctionArg::Value(Literal::Int(*n)),
        toml::Value::Float(f) => FunctionArg::Value(Literal::Float(*f)),
        toml::Value::Boolean(b) => FunctionArg::Value(Literal::Bool(*b)),
        other => {
            return Err(SettingsError::InvalidConfig(format!(
                "unsupported function argument: {}",
                other
            )))
        }
    })
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `QB_CONFIG`
    /// 2. `./qb.toml`
    /// 3. `~/.config/qb/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("QB_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("qb.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("qb").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// The configured dialect, or the default.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        match &self.compiler.dialect {
            Some(name) => name
                .parse::<Dialect>()
                .map_err(|e| SettingsError::InvalidConfig(e.to_string())),
            None => Ok(Dialect::default()),
        }
    }

    /// Compiler options from the `[compiler]` section.
    pub fn compile_options(&self) -> Result<CompileOptions, SettingsError> {
        Ok(CompileOptions::default()
            .with_dialect(self.dialect()?)
            .with_persist_unknown_functions(self.compiler.persist_unknown_functions))
    }

    /// Path of the default definitions file, with environment variables expanded.
    pub fn definitions_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.compiler
            .definitions
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }

    /// Register every configured function on `compiler`.
    pub fn register_functions(&self, compiler: &QueryCompiler) -> Result<(), SettingsError> {
        for (id, function) in &self.functions {
            compiler.register_function(id, function.name.as_deref(), function.function_args()?);
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
