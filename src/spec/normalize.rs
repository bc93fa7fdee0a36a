//! Raw JSON spec -> canonical [`QuerySpec`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::functions::FunctionArg;
use crate::sql::{Literal, SortDir};

use super::raw::{
    plural_or_singular, truthy, RawFunction, RawJoin, RawQuerySpec, RawSelect, RawWhere,
};
use super::request::{
    parse_direction, Comparison, FunctionCall, JoinRequest, Operator, OrderRequest, QuerySpec,
    RequestId, SelectRequest, WhereClause,
};
use super::QuerySpecError;

/// Optionally signed integer at the start of a string.
static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid")
});

impl QuerySpec {
    /// Normalize a JSON query spec.
    ///
    /// Accepts singular or plural keys (`select`/`selects`, `join`/`joins`,
    /// `where`/`wheres`, `groupBy`/`groupBys`, `orderBy`/`orderBys`), a
    /// single entry or a list for each, and `from` as a table name or a join
    /// record. Select entries flagged `groupBy`/`orderBy` are copied into the
    /// respective lists after any explicit entries.
    pub fn from_value(value: &Value) -> Result<Self, QuerySpecError> {
        if !value.is_object() {
            return Err(QuerySpecError::NotAnObject);
        }
        let raw = RawQuerySpec::deserialize(value)
            .map_err(|e| QuerySpecError::Malformed(e.to_string()))?;
        normalize(raw)
    }
}

fn normalize(raw: RawQuerySpec) -> Result<QuerySpec, QuerySpecError> {
    let mut joins: Vec<JoinRequest> = plural_or_singular(raw.joins, raw.join)
        .into_iter()
        .map(join_request)
        .collect();
    if let Some(from) = raw.from {
        joins.insert(0, join_request(from));
    }

    let raw_selects = plural_or_singular(raw.selects, raw.select);
    let mut group_bys = plural_or_singular(raw.group_bys, raw.group_by)
        .into_iter()
        .map(|s| select_request(s).map(|(select, _)| select))
        .collect::<Result<Vec<_>, _>>()?;
    let mut order_bys = plural_or_singular(raw.order_bys, raw.order_by)
        .into_iter()
        .map(|s| {
            select_request(s).map(|(column, flags)| OrderRequest {
                column,
                direction: flags.direction.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut selects = Vec::with_capacity(raw_selects.len());
    for raw_select in raw_selects {
        let (select, flags) = select_request(raw_select)?;
        if flags.group_by {
            group_bys.push(select.clone());
        }
        if let Some(direction) = flags.direction {
            order_bys.push(OrderRequest {
                column: select.clone(),
                direction,
            });
        }
        selects.push(select);
    }

    let wheres = plural_or_singular(raw.wheres, raw.r#where)
        .into_iter()
        .map(where_clause)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuerySpec {
        joins,
        selects,
        wheres,
        group_bys,
        order_bys,
        limit: raw.limit.or(raw.limit_to).as_ref().and_then(parse_count),
        offset: raw.offset.or(raw.offset_by).as_ref().and_then(parse_count),
    })
}

/// Parse a WHERE specification (one clause or a list) into clauses.
///
/// Used for query specs and for table-level default filters.
pub fn parse_where(value: &Value) -> Result<Vec<WhereClause>, QuerySpecError> {
    let raw = super::raw::OneOrMany::<RawWhere>::deserialize(value)
        .map_err(|e| QuerySpecError::Malformed(e.to_string()))?;
    raw.into_vec().into_iter().map(where_clause).collect()
}

fn join_request(raw: RawJoin) -> JoinRequest {
    match raw {
        RawJoin::Name(table) => JoinRequest::new(table),
        RawJoin::Record(record) => JoinRequest {
            table: record.name,
            alias: record.alias,
            id: record.id.map(|id| RequestId(id.into_string())),
            join_id: record.join_id.map(|id| RequestId(id.into_string())),
        },
    }
}

/// Group/order flags carried on a select entry.
#[derive(Default)]
struct SelectFlags {
    group_by: bool,
    direction: Option<SortDir>,
}

fn select_request(raw: RawSelect) -> Result<(SelectRequest, SelectFlags), QuerySpecError> {
    let record = match raw {
        RawSelect::Name(name) => return Ok((SelectRequest::column(name), SelectFlags::default())),
        RawSelect::Record(record) => *record,
    };

    let functions = plural_or_singular(record.functions, record.function)
        .into_iter()
        .map(function_call)
        .collect();

    let direction = match &record.order_by {
        Some(Value::String(s)) if !s.is_empty() => Some(parse_direction(s)),
        Some(flag) if truthy(flag) => Some(SortDir::Asc),
        _ => None,
    };
    let flags = SelectFlags {
        group_by: record.group_by.as_ref().is_some_and(truthy),
        direction,
    };

    let select = SelectRequest {
        name: record.name,
        value: record.value.as_ref().filter(|v| !v.is_null()).map(Literal::from),
        functions,
        join_id: record.join_id.map(|id| RequestId(id.into_string())),
        alias: record.alias,
    };
    if select.name.is_none() && select.value.is_none() {
        return Err(QuerySpecError::EmptySelect);
    }
    Ok((select, flags))
}

fn function_call(raw: RawFunction) -> FunctionCall {
    match raw {
        RawFunction::Name(name) => FunctionCall::new(&name),
        RawFunction::Call { name, args } => FunctionCall::new(&name).with_args(
            args.map(|a| a.into_vec())
                .unwrap_or_default()
                .iter()
                .map(FunctionArg::from)
                .collect(),
        ),
    }
}

fn where_clause(raw: RawWhere) -> Result<WhereClause, QuerySpecError> {
    let operator = match raw.op.or(raw.operator) {
        Some(name) => name.parse::<Operator>()?,
        None => Operator::default(),
    };

    let comparison = match raw.field {
        Some(field) => {
            let (field, _) = select_request(field)?;
            let matches = if operator.is_unary() {
                None
            } else {
                let raw_match = raw
                    .r#match
                    .ok_or_else(|| QuerySpecError::MissingMatch(field.describe()))?;
                Some(select_request(raw_match)?.0)
            };
            Some(Comparison {
                field,
                operator,
                matches,
            })
        }
        None => None,
    };

    let or = raw
        .or
        .map(|clauses| clauses.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|w| where_clause(*w))
        .collect::<Result<Vec<_>, _>>()?;

    if comparison.is_none() && or.is_empty() {
        return Err(QuerySpecError::EmptyClause);
    }
    Ok(WhereClause { comparison, or })
}

/// LIMIT/OFFSET values: numbers truncate toward zero, strings read their
/// leading integer. Negative or unparseable values are ignored.
fn parse_count(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    return None;
                }
                f.trunc() as i64
            }
        },
        Value::String(s) => LEADING_INT.captures(s)?.get(1)?.as_str().parse().ok()?,
        _ => return None,
    };
    u64::try_from(n).ok()
}
