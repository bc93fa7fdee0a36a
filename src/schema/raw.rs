//! Raw table definitions as they arrive in JSON.
//!
//! Columns and joins come as lists or as name-keyed maps, list entries as
//! bare names or records, map values as null, an alias string, or a record.
//! Each shape is an untagged enum; [`super::normalize`] matches them out.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A JSON object read as an ordered list of entries.
#[derive(Debug, Clone)]
pub(crate) struct OrderedMap<T>(pub Vec<(String, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTable {
    pub name: Option<String>,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    pub primary_key: Option<String>,
    pub hidden: Option<bool>,
    pub columns: Option<RawColumns>,
    #[serde(alias = "join")]
    pub joins: Option<RawJoins>,
    /// Parsed separately with the query spec's WHERE rules.
    #[serde(rename = "where", alias = "wheres")]
    pub filters: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawColumns {
    List(Vec<RawColumnEntry>),
    Map(OrderedMap<Option<RawColumnValue>>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawColumnEntry {
    Name(String),
    Record(RawColumn),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawColumnValue {
    Alias(String),
    Record(RawColumn),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawColumn {
    /// Required in list form; the map key names the column otherwise.
    pub name: Option<String>,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    pub hidden: Option<bool>,
    pub primary_key: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawJoins {
    List(Vec<RawJoin>),
    Map(OrderedMap<Option<RawJoin>>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawJoin {
    /// Required in list form; the map key names the target otherwise.
    pub name: Option<String>,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    pub source_key: Option<String>,
    pub target_key: Option<String>,
    pub via: Option<String>,
    pub hidden: Option<bool>,
}
