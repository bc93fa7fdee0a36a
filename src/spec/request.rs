//! Canonical query spec types.
//!
//! These are what the compiler consumes. They are built from JSON by
//! [`QuerySpec::from_value`] or constructed directly from Rust.

use std::fmt;
use std::str::FromStr;

use crate::functions::FunctionArg;
use crate::sql::{Literal, SortDir};

use super::QuerySpecError;

/// Identifier a join request exposes so later requests can attach to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized query specification.
///
/// `joins[0]` is always the FROM table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub joins: Vec<JoinRequest>,
    pub selects: Vec<SelectRequest>,
    pub wheres: Vec<WhereClause>,
    pub group_bys: Vec<SelectRequest>,
    pub order_bys: Vec<OrderRequest>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QuerySpec {
    /// The FROM request, if any join was given.
    pub fn from_request(&self) -> Option<&JoinRequest> {
        self.joins.first()
    }
}

/// One table to bring into the query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub table: String,
    pub alias: Option<String>,
    pub id: Option<RequestId>,
    /// The request this join attaches to. `None` attaches to FROM.
    pub join_id: Option<RequestId>,
}

impl JoinRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            id: None,
            join_id: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(RequestId::new(id));
        self
    }

    pub fn with_join_id(mut self, join_id: impl Into<String>) -> Self {
        self.join_id = Some(RequestId::new(join_id));
        self
    }
}

/// A column or literal reference, used for SELECT items and for both sides
/// of WHERE comparisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectRequest {
    pub name: Option<String>,
    pub value: Option<Literal>,
    /// Outermost first.
    pub functions: Vec<FunctionCall>,
    pub join_id: Option<RequestId>,
    pub alias: Option<String>,
}

impl SelectRequest {
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn value(value: impl Into<Literal>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_function(mut self, call: FunctionCall) -> Self {
        self.functions.push(call);
        self
    }

    pub fn with_join_id(mut self, join_id: impl Into<String>) -> Self {
        self.join_id = Some(RequestId::new(join_id));
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Short human description for error messages.
    pub fn describe(&self) -> String {
        match (&self.name, &self.value) {
            (Some(name), _) => name.clone(),
            (None, Some(value)) => format!("{:?}", value),
            (None, None) => "<empty>".to_string(),
        }
    }
}

/// One function application in a select's chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Upper-cased function id.
    pub name: String,
    /// Call-level argument template. Empty means "just the column".
    pub args: Vec<FunctionArg>,
}

impl FunctionCall {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<FunctionArg>) -> Self {
        self.args = args;
        self
    }
}

/// ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub column: SelectRequest,
    pub direction: SortDir,
}

impl OrderRequest {
    pub fn asc(column: SelectRequest) -> Self {
        Self {
            column,
            direction: SortDir::Asc,
        }
    }

    pub fn desc(column: SelectRequest) -> Self {
        Self {
            column,
            direction: SortDir::Desc,
        }
    }
}

/// Parses a direction string; only `desc` (any case) is descending.
pub(crate) fn parse_direction(s: &str) -> SortDir {
    if s.trim().eq_ignore_ascii_case("desc") {
        SortDir::Desc
    } else {
        SortDir::Asc
    }
}

/// A WHERE clause: an optional comparison OR'd with nested clauses.
///
/// Sibling clauses in a list are AND'd together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub comparison: Option<Comparison>,
    pub or: Vec<WhereClause>,
}

impl WhereClause {
    pub fn compare(comparison: Comparison) -> Self {
        Self {
            comparison: Some(comparison),
            or: Vec::new(),
        }
    }

    pub fn any(clauses: Vec<WhereClause>) -> Self {
        Self {
            comparison: None,
            or: clauses,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: SelectRequest,
    pub operator: Operator,
    /// Always `Some` for binary operators.
    pub matches: Option<SelectRequest>,
}

impl Comparison {
    pub fn new(field: SelectRequest, operator: Operator, matches: SelectRequest) -> Self {
        Self {
            field,
            operator,
            matches: Some(matches),
        }
    }

    pub fn unary(field: SelectRequest, operator: Operator) -> Self {
        Self {
            field,
            operator,
            matches: None,
        }
    }
}

/// Comparison operators accepted in WHERE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    ILike,
    NotILike,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Operators that take no `match` side.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl FromStr for Operator {
    type Err = QuerySpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equal" | "equals" | "eq" => Ok(Operator::Equals),
            "notequal" | "notequals" | "ne" => Ok(Operator::NotEquals),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "like" => Ok(Operator::Like),
            "notlike" => Ok(Operator::NotLike),
            "ilike" => Ok(Operator::ILike),
            "notilike" => Ok(Operator::NotILike),
            "isnull" => Ok(Operator::IsNull),
            "isnotnull" => Ok(Operator::IsNotNull),
            _ => Err(QuerySpecError::UnknownOperator(s.to_string())),
        }
    }
}
