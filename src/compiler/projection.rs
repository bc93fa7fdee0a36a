//! Column resolution and SELECT items.

use crate::functions::FunctionRegistry;
use crate::spec::SelectRequest;
use crate::sql::{table_col, Expr, SelectItem};

use super::joins::JoinPlan;
use super::{CompileError, CompileResult};

/// How literal values are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralMode {
    /// Written into the SQL text.
    Inline,
    /// Bound as a parameter.
    Bound,
}

/// Resolves select-like references against one query's joins.
pub(crate) struct ColumnResolver<'p, 'd> {
    plan: &'p JoinPlan<'d>,
    functions: &'p FunctionRegistry,
}

impl<'p, 'd> ColumnResolver<'p, 'd> {
    pub fn new(plan: &'p JoinPlan<'d>, functions: &'p FunctionRegistry) -> Self {
        Self { plan, functions }
    }

    pub fn plan(&self) -> &'p JoinPlan<'d> {
        self.plan
    }

    /// A SELECT list item, aliased.
    pub fn select(&self, select: &SelectRequest) -> CompileResult<SelectItem> {
        let (expr, display) = self.column(select, 0, LiteralMode::Inline)?;

        let alias = match (&select.alias, select.functions.is_empty()) {
            (Some(alias), _) => Some(alias.clone()),
            (None, true) => display,
            (None, false) => {
                let base = display
                    .or_else(|| select.name.clone())
                    .unwrap_or_else(|| "col".to_string());
                let suffixes: String = select
                    .functions
                    .iter()
                    .map(|f| format!("_{}", f.name.to_lowercase()))
                    .collect();
                Some(base + &suffixes)
            }
        };

        Ok(match alias {
            Some(alias) => SelectItem::aliased(expr, alias),
            None => SelectItem::new(expr),
        })
    }

    /// An expression without alias, for WHERE, GROUP BY, and ORDER BY.
    pub fn bare(
        &self,
        select: &SelectRequest,
        default_join: usize,
        literals: LiteralMode,
    ) -> CompileResult<Expr> {
        self.column(select, default_join, literals)
            .map(|(expr, _)| expr)
    }

    /// The expression with its function chain applied, plus the column's
    /// display alias when it has one.
    fn column(
        &self,
        select: &SelectRequest,
        default_join: usize,
        literals: LiteralMode,
    ) -> CompileResult<(Expr, Option<String>)> {
        let join = &self.plan.joins[self.plan.lookup(select.join_id.as_ref(), default_join)];

        let (expr, display) = match (&select.name, &select.value) {
            (Some(name), value) => match (join.table.column(name), value) {
                (Some(column), _) => (table_col(&join.alias, name), column.alias.clone()),
                (None, Some(value)) => (literal(value.clone(), literals), None),
                (None, None) => {
                    return Err(CompileError::ColumnNotDefined {
                        table: join.table.name.clone(),
                        column: name.clone(),
                    })
                }
            },
            (None, Some(value)) => (literal(value.clone(), literals), None),
            (None, None) => {
                return Err(CompileError::QuerySpec(
                    crate::spec::QuerySpecError::EmptySelect,
                ))
            }
        };

        // Outermost first, so the last entry wraps the column directly
        let expr = select.functions.iter().rev().fold(expr, |inner, call| {
            self.functions.resolve(&call.name).apply_call(&call.args, inner)
        });

        Ok((expr, display))
    }
}

fn literal(value: crate::sql::Literal, mode: LiteralMode) -> Expr {
    match mode {
        LiteralMode::Inline => Expr::Literal(value),
        LiteralMode::Bound => Expr::Param(value),
    }
}
