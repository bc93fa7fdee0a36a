//! SQL generation.
//!
//! A small SELECT builder that renders multi-dialect SQL. The compiler
//! builds values from this module and asks for text; nothing here knows
//! about table definitions or query specs.
//!
//! - [`query`] - the SELECT builder
//! - [`expr`] - expression AST
//! - [`token`] - token stream and its compact/pretty/parameterized renderers
//! - [`dialect`] - per-dialect spelling

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

pub use dialect::{Dialect, UnknownDialect};
pub use expr::{col, func, lit, param, table_col, BinaryOp, Expr, Literal};
pub use query::{
    Join, OrderItem, ParameterizedQuery, Query, SelectItem, SortDir, TableRef,
};
pub use token::{Token, TokenStream};
