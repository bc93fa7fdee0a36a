//! GROUP BY, ORDER BY, LIMIT and OFFSET.

use crate::spec::{OrderRequest, SelectRequest};
use crate::sql::{OrderItem, Query};

use super::projection::{ColumnResolver, LiteralMode};
use super::CompileResult;

pub(crate) fn apply_group_bys(
    query: Query,
    columns: &ColumnResolver<'_, '_>,
    group_bys: &[SelectRequest],
) -> CompileResult<Query> {
    if group_bys.is_empty() {
        return Ok(query);
    }
    let exprs = group_bys
        .iter()
        .map(|g| columns.bare(g, 0, LiteralMode::Inline))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(query.group_by(exprs))
}

pub(crate) fn apply_order_bys(
    query: Query,
    columns: &ColumnResolver<'_, '_>,
    order_bys: &[OrderRequest],
) -> CompileResult<Query> {
    if order_bys.is_empty() {
        return Ok(query);
    }
    let exprs = order_bys
        .iter()
        .map(|o| {
            columns
                .bare(&o.column, 0, LiteralMode::Inline)
                .map(|expr| OrderItem::new(expr, o.direction))
        })
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(query.order_by(exprs))
}

pub(crate) fn apply_limit(mut query: Query, limit: Option<u64>, offset: Option<u64>) -> Query {
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    if let Some(offset) = offset {
        query = query.offset(offset);
    }
    query
}
