//! Query compilation.
//!
//! ```text
//! QuerySpec → joins → SELECT → WHERE → GROUP BY → ORDER BY → LIMIT → SQL
//! ```
//!
//! # Example
//!
//! ```
//! use qb::QueryCompiler;
//! use serde_json::json;
//!
//! let compiler = QueryCompiler::new(&json!({
//!     "users": { "columns": ["id", "name"] },
//! }))?;
//!
//! let compiled = compiler.query(&json!({ "select": "id", "from": "users", "limit": 1000 }))?;
//! assert_eq!(compiled.text, r#"SELECT "users"."id" FROM "users" LIMIT 1000"#);
//! # Ok::<(), qb::CompileError>(())
//! ```

mod clauses;
mod joins;
mod predicate;
mod projection;

use serde::Serialize;
use serde_json::Value;

use crate::functions::{FunctionAdapter, FunctionArg, FunctionRegistry};
use crate::schema::{Catalog, DefinitionError, Definitions};
use crate::spec::{QuerySpec, QuerySpecError};
use crate::sql::{Dialect, ParameterizedQuery, Query};

use projection::ColumnResolver;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Invalid definitions: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Invalid query spec: {0}")]
    QuerySpec(#[from] QuerySpecError),

    #[error("Table not defined: {0}")]
    UnknownTable(String),

    #[error("No join defined from {from} to {to}")]
    NoJoin { from: String, to: String },

    #[error("Cannot join {from} to {to}: no key given and no primary key to fall back on")]
    MissingJoinKey { from: String, to: String },

    #[error("Column {column} is not defined on table {table}")]
    ColumnNotDefined { table: String, column: String },

    #[error("Cyclic via join: {}", path.join(" -> "))]
    CyclicJoin { path: Vec<String> },
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// SQL dialect to generate.
    pub dialect: Dialect,
    /// Keep pass-through adapters for unknown functions in the registry.
    pub persist_unknown_functions: bool,
}

impl CompileOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_persist_unknown_functions(mut self, persist: bool) -> Self {
        self.persist_unknown_functions = persist;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// A compiled SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// Single-line SQL with every value inlined.
    pub text: String,
    /// The same statement broken at clause keywords.
    pub formatted: String,
    /// SQL with WHERE values as bind placeholders, plus the values.
    pub parameterized: ParameterizedQuery,
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles query specs against a fixed set of table definitions.
///
/// The definitions and catalog never change after construction. The
/// function registry can grow through [`register_function`](Self::register_function),
/// which takes `&self`, so one compiler can be shared between threads.
#[derive(Debug)]
pub struct QueryCompiler {
    definitions: Definitions,
    catalog: Catalog,
    functions: FunctionRegistry,
    options: CompileOptions,
}

impl QueryCompiler {
    /// Build a compiler from JSON definitions with default options.
    pub fn new(definitions: &Value) -> CompileResult<Self> {
        Self::with_options(definitions, CompileOptions::default())
    }

    pub fn with_options(definitions: &Value, options: CompileOptions) -> CompileResult<Self> {
        Ok(Self::from_definitions(
            Definitions::from_value(definitions)?,
            options,
        ))
    }

    pub fn from_definitions(definitions: Definitions, options: CompileOptions) -> Self {
        let catalog = Catalog::build(&definitions);
        let functions = FunctionRegistry::new().persist_unknown(options.persist_unknown_functions);
        Self {
            definitions,
            catalog,
            functions,
            options,
        }
    }

    /// The client-facing schema.
    pub fn schema(&self) -> &Catalog {
        &self.catalog
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    /// Register a function adapter.
    ///
    /// `emitted_name` is the name written into SQL when it differs from
    /// `id`. `args` may contain one [`FunctionArg::Hole`] marking where the
    /// column goes; without one the column is appended.
    pub fn register_function(
        &self,
        id: &str,
        emitted_name: Option<&str>,
        args: Vec<FunctionArg>,
    ) -> FunctionAdapter {
        self.functions.register(id, emitted_name, args)
    }

    /// Compile a JSON query spec.
    pub fn query(&self, spec: &Value) -> CompileResult<CompiledQuery> {
        let spec = QuerySpec::from_value(spec)?;
        self.query_spec(&spec)
    }

    /// Compile an already-normalized query spec.
    pub fn query_spec(&self, spec: &QuerySpec) -> CompileResult<CompiledQuery> {
        let query = self.build(spec)?;
        let dialect = self.options.dialect;
        Ok(CompiledQuery {
            text: query.to_sql(dialect),
            formatted: query.to_pretty_sql(dialect),
            parameterized: query.to_parameterized_sql(dialect),
        })
    }

    /// Build the query AST for a spec.
    pub fn build(&self, spec: &QuerySpec) -> CompileResult<Query> {
        if spec.joins.is_empty() {
            return Err(QuerySpecError::MissingFrom.into());
        }
        if spec.selects.is_empty() {
            return Err(QuerySpecError::MissingSelect.into());
        }

        let plan = joins::resolve(&self.definitions, &spec.joins)?;
        log::debug!("resolved {} joins", plan.joins.len());

        let mut query = Query::new();
        for join in &plan.joins {
            query = match &join.on {
                None => query.from(join.table_ref()),
                Some(on) => query.inner_join(join.table_ref(), on.clone()),
            };
        }

        let columns = ColumnResolver::new(&plan, &self.functions);
        for select in &spec.selects {
            query = query.add_select(columns.select(select)?);
        }
        log::debug!("built {} select items", spec.selects.len());

        let query = predicate::apply_wheres(query, &columns, &spec.wheres)?;
        let query = clauses::apply_group_bys(query, &columns, &spec.group_bys)?;
        let query = clauses::apply_order_bys(query, &columns, &spec.order_bys)?;
        let query = clauses::apply_limit(query, spec.limit, spec.offset);
        log::debug!("compiled query over {}", plan.joins[0].table.name);

        Ok(query)
    }
}
