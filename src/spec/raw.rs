//! Raw, shape-polymorphic query spec as it arrives in JSON.
//!
//! Every flexible shape (singular or plural key, string or record, one or
//! many) is an untagged enum here. [`super::normalize`] turns these into the
//! canonical request types with one exhaustive match per shape.

use serde::Deserialize;
use serde_json::Value;

/// A value given either alone or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Picks the plural key when present, else the singular one.
pub(crate) fn plural_or_singular<T>(
    plural: Option<OneOrMany<T>>,
    singular: Option<OneOrMany<T>>,
) -> Vec<T> {
    plural
        .or(singular)
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
}

/// Request ids may be numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawQuerySpec {
    pub from: Option<RawJoin>,
    pub joins: Option<OneOrMany<RawJoin>>,
    pub join: Option<OneOrMany<RawJoin>>,
    pub selects: Option<OneOrMany<RawSelect>>,
    pub select: Option<OneOrMany<RawSelect>>,
    pub wheres: Option<OneOrMany<RawWhere>>,
    pub r#where: Option<OneOrMany<RawWhere>>,
    pub group_bys: Option<OneOrMany<RawSelect>>,
    pub group_by: Option<OneOrMany<RawSelect>>,
    pub order_bys: Option<OneOrMany<RawSelect>>,
    pub order_by: Option<OneOrMany<RawSelect>>,
    pub limit: Option<Value>,
    pub limit_to: Option<Value>,
    pub offset: Option<Value>,
    pub offset_by: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawJoin {
    Name(String),
    Record(RawJoinRecord),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawJoinRecord {
    pub name: String,
    #[serde(default, rename = "as")]
    pub alias: Option<String>,
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, rename = "joinId")]
    pub join_id: Option<RawId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawSelect {
    Name(String),
    Record(Box<RawSelectRecord>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawSelectRecord {
    pub name: Option<String>,
    pub value: Option<Value>,
    pub functions: Option<OneOrMany<RawFunction>>,
    pub function: Option<OneOrMany<RawFunction>>,
    pub join_id: Option<RawId>,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    pub group_by: Option<Value>,
    pub order_by: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawFunction {
    Name(String),
    Call {
        name: String,
        #[serde(default)]
        args: Option<OneOrMany<Value>>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawWhere {
    pub field: Option<RawSelect>,
    pub r#match: Option<RawSelect>,
    pub op: Option<String>,
    pub operator: Option<String>,
    pub or: Option<OneOrMany<Box<RawWhere>>>,
}

/// Whether a `groupBy`/`orderBy` select flag is set. Null, false, zero and
/// the empty string are unset; anything else is set.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
