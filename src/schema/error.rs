//! Schema definition errors.

use thiserror::Error;

use crate::spec::QuerySpecError;

/// Errors raised while normalizing table definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("definitions must be a JSON object keyed by table name")]
    NotAnObject,

    #[error("table '{table}': {message}")]
    Malformed { table: String, message: String },

    #[error("table '{table}' joins undefined table '{target}'")]
    DanglingJoin { table: String, target: String },

    #[error("table '{table}' joins '{target}' via undefined table '{via}'")]
    DanglingVia {
        table: String,
        target: String,
        via: String,
    },

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{table}' has an invalid default filter: {reason}")]
    InvalidFilter {
        table: String,
        #[source]
        reason: QuerySpecError,
    },
}

/// Result type for definition loading.
pub type DefinitionResult<T> = Result<T, DefinitionError>;
