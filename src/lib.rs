//! # qb
//!
//! A declarative query builder that compiles JSON query specs to
//! multi-dialect SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Table definitions (JSON, any shape)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Definitions  +  public Catalog                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!      query spec (JSON) ──┤ [spec]
//!                          ▼ [compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │  joins (via expansion, aliases) → SELECT → WHERE →       │
//! │  GROUP BY → ORDER BY → LIMIT        (+ [functions])      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │     SQL text: compact, formatted, parameterized          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compiler;
pub mod config;
pub mod functions;
pub mod schema;
pub mod spec;
pub mod sql;

pub use compiler::{CompileError, CompileOptions, CompileResult, CompiledQuery, QueryCompiler};
pub use functions::{FunctionAdapter, FunctionArg, FunctionRegistry};
pub use schema::{Catalog, DefinitionError, Definitions};
pub use spec::{QuerySpec, QuerySpecError};
pub use sql::Dialect;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{CompileError, CompileOptions, CompiledQuery, QueryCompiler};
    pub use crate::functions::FunctionArg;
    pub use crate::spec::{
        Comparison, FunctionCall, JoinRequest, Operator, OrderRequest, QuerySpec, SelectRequest,
        WhereClause,
    };
    pub use crate::sql::{Dialect, Literal};
}
