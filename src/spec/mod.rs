//! Query specifications.
//!
//! A query spec says which tables to join, what to select, how to filter,
//! group, order, and limit. Clients send it as JSON in a forgiving shape;
//! [`QuerySpec::from_value`] normalizes that into the canonical types in
//! [`request`], which is all the compiler ever looks at.

mod normalize;
mod raw;
pub mod request;

pub use normalize::parse_where;
pub use request::{
    Comparison, FunctionCall, JoinRequest, Operator, OrderRequest, QuerySpec, RequestId,
    SelectRequest, WhereClause,
};

/// A query spec that cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuerySpecError {
    #[error("query spec must be a JSON object")]
    NotAnObject,

    #[error("malformed query spec: {0}")]
    Malformed(String),

    #[error("query spec has no FROM table")]
    MissingFrom,

    #[error("query spec selects nothing")]
    MissingSelect,

    #[error("select entry needs a name or a value")]
    EmptySelect,

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("where clause on '{0}' has no match")]
    MissingMatch(String),

    #[error("where clause needs a field or an or-list")]
    EmptyClause,
}
