//! WHERE clause construction.
//!
//! Each comparison renders parenthesized. A clause's comparison and its
//! `or` members fold left with OR; the clauses of a list are AND'd by
//! [`Query::filter`](crate::sql::Query::filter).

use crate::spec::{Comparison, Operator, WhereClause};
use crate::sql::{BinaryOp, Expr, Query};

use super::projection::{ColumnResolver, LiteralMode};
use super::CompileResult;

/// Add the spec's clauses, then every joined table's default filters.
pub(crate) fn apply_wheres(
    mut query: Query,
    columns: &ColumnResolver<'_, '_>,
    wheres: &[WhereClause],
) -> CompileResult<Query> {
    for clause in wheres {
        query = query.filter(clause_expr(columns, clause, 0)?);
    }

    for (at, join) in columns.plan().joins.iter().enumerate() {
        for clause in &join.table.default_filters {
            log::debug!("default filter on {} as {}", join.table.name, join.alias);
            query = query.filter(clause_expr(columns, clause, at)?);
        }
    }

    Ok(query)
}

/// One clause; unqualified columns bind to the join at `default_join`.
pub(crate) fn clause_expr(
    columns: &ColumnResolver<'_, '_>,
    clause: &WhereClause,
    default_join: usize,
) -> CompileResult<Expr> {
    let mut terms = Vec::with_capacity(clause.or.len() + 1);
    if let Some(comparison) = &clause.comparison {
        terms.push(comparison_expr(columns, comparison, default_join)?);
    }
    for member in &clause.or {
        terms.push(clause_expr(columns, member, default_join)?);
    }

    let mut terms = terms.into_iter();
    let first = terms
        .next()
        .ok_or(crate::spec::QuerySpecError::EmptyClause)?;
    Ok(terms.fold(first, |acc, term| acc.or(term).paren()))
}

fn comparison_expr(
    columns: &ColumnResolver<'_, '_>,
    comparison: &Comparison,
    default_join: usize,
) -> CompileResult<Expr> {
    let field = columns.bare(&comparison.field, default_join, LiteralMode::Inline)?;

    let expr = match binary_operator(comparison.operator) {
        None if comparison.operator == Operator::IsNotNull => field.is_not_null(),
        None => field.is_null(),
        Some(op) => {
            let matches = comparison.matches.as_ref().ok_or_else(|| {
                crate::spec::QuerySpecError::MissingMatch(comparison.field.describe())
            })?;
            field.binary(op, columns.bare(matches, default_join, LiteralMode::Bound)?)
        }
    };

    Ok(expr.paren())
}

fn binary_operator(op: Operator) -> Option<BinaryOp> {
    match op {
        Operator::Equals => Some(BinaryOp::Eq),
        Operator::NotEquals => Some(BinaryOp::Ne),
        Operator::Gt => Some(BinaryOp::Gt),
        Operator::Gte => Some(BinaryOp::Gte),
        Operator::Lt => Some(BinaryOp::Lt),
        Operator::Lte => Some(BinaryOp::Lte),
        Operator::Like => Some(BinaryOp::Like),
        Operator::NotLike => Some(BinaryOp::NotLike),
        Operator::ILike => Some(BinaryOp::ILike),
        Operator::NotILike => Some(BinaryOp::NotILike),
        Operator::IsNull | Operator::IsNotNull => None,
    }
}
