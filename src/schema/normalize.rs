//! Raw JSON definitions -> [`Definitions`].
//!
//! Two passes: the first settles every table's columns and primary key,
//! the second checks joins against the full set of table names, so tables
//! may reference each other in any order.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::spec::parse_where;

use super::definition::{ColumnDefinition, Definitions, JoinDefinition, TableDefinition};
use super::error::{DefinitionError, DefinitionResult};
use super::raw::{
    OrderedMap, RawColumn, RawColumnEntry, RawColumnValue, RawColumns, RawJoin, RawJoins,
    RawTable,
};

impl Definitions {
    /// Normalize a JSON object of table name -> raw definition.
    pub fn from_value(value: &Value) -> DefinitionResult<Self> {
        let Value::Object(tables) = value else {
            return Err(DefinitionError::NotAnObject);
        };

        let mut staged = Vec::with_capacity(tables.len());
        for (name, raw) in tables {
            let raw = if raw.is_null() {
                RawTable::default()
            } else {
                RawTable::deserialize(raw).map_err(|e| DefinitionError::Malformed {
                    table: name.clone(),
                    message: e.to_string(),
                })?
            };
            staged.push(table(name, raw)?);
        }

        let names: HashSet<String> = tables.keys().cloned().collect();
        let mut defs = Definitions::default();
        for (mut table, raw_joins) in staged {
            table.joins = joins(&table.name, raw_joins, &names)?;
            log::debug!(
                "defined table {} ({} columns, {} joins, primary key {:?})",
                table.name,
                table.columns.len(),
                table.joins.len(),
                table.primary_key
            );
            defs.insert(table);
        }
        Ok(defs)
    }
}

/// First pass: everything but joins.
fn table(name: &str, raw: RawTable) -> DefinitionResult<(TableDefinition, Option<RawJoins>)> {
    let (columns, flagged_key) = columns(name, raw.columns)?;

    // Explicit setting, then a flagged column, then a column named "id"
    let primary_key = raw.primary_key.or(flagged_key).or_else(|| {
        columns
            .iter()
            .any(|c| c.name == "id")
            .then(|| "id".to_string())
    });

    let default_filters = match &raw.filters {
        Some(filters) => parse_where(filters).map_err(|reason| DefinitionError::InvalidFilter {
            table: name.to_string(),
            reason,
        })?,
        None => Vec::new(),
    };

    let table = TableDefinition {
        name: name.to_string(),
        alias: raw.alias,
        primary_key,
        columns,
        joins: Vec::new(),
        hidden: raw.hidden.unwrap_or(false),
        default_filters,
    };
    Ok((table, raw.joins))
}

/// Returns the columns and the name of the last column flagged as primary.
fn columns(
    table: &str,
    raw: Option<RawColumns>,
) -> DefinitionResult<(Vec<ColumnDefinition>, Option<String>)> {
    let entries: Vec<(String, RawColumn)> = match raw {
        None => Vec::new(),
        Some(RawColumns::List(list)) => list
            .into_iter()
            .map(|entry| match entry {
                RawColumnEntry::Name(name) => Ok((name, RawColumn::default())),
                RawColumnEntry::Record(record) => match record.name.clone() {
                    Some(name) => Ok((name, record)),
                    None => Err(DefinitionError::Malformed {
                        table: table.to_string(),
                        message: "column record without a name".to_string(),
                    }),
                },
            })
            .collect::<DefinitionResult<_>>()?,
        Some(RawColumns::Map(OrderedMap(map))) => map
            .into_iter()
            .map(|(name, value)| {
                let record = match value {
                    None => RawColumn::default(),
                    Some(RawColumnValue::Alias(alias)) => RawColumn {
                        alias: Some(alias).filter(|a| !a.is_empty()),
                        ..RawColumn::default()
                    },
                    Some(RawColumnValue::Record(record)) => record,
                };
                (name, record)
            })
            .collect(),
    };

    let mut columns: Vec<ColumnDefinition> = Vec::with_capacity(entries.len());
    let mut flagged_key = None;
    for (name, record) in entries {
        if columns.iter().any(|c| c.name == name) {
            return Err(DefinitionError::DuplicateColumn {
                table: table.to_string(),
                column: name,
            });
        }
        if record.primary_key.unwrap_or(false) {
            flagged_key = Some(name.clone());
        }
        columns.push(ColumnDefinition {
            name,
            alias: record.alias,
            hidden: record.hidden.unwrap_or(false),
        });
    }
    Ok((columns, flagged_key))
}

/// Second pass: joins, checked against every defined table.
fn joins(
    table: &str,
    raw: Option<RawJoins>,
    names: &HashSet<String>,
) -> DefinitionResult<Vec<JoinDefinition>> {
    let entries: Vec<(String, RawJoin)> = match raw {
        None => Vec::new(),
        Some(RawJoins::List(list)) => list
            .into_iter()
            .map(|join| match join.name.clone() {
                Some(target) => Ok((target, join)),
                None => Err(DefinitionError::Malformed {
                    table: table.to_string(),
                    message: "join record without a name".to_string(),
                }),
            })
            .collect::<DefinitionResult<_>>()?,
        Some(RawJoins::Map(OrderedMap(map))) => map
            .into_iter()
            .map(|(target, join)| (target, join.unwrap_or_default()))
            .collect(),
    };

    let mut joins: Vec<JoinDefinition> = Vec::with_capacity(entries.len());
    for (target, raw) in entries {
        if !names.contains(&target) {
            return Err(DefinitionError::DanglingJoin {
                table: table.to_string(),
                target,
            });
        }
        if let Some(via) = raw.via.as_ref().filter(|via| !names.contains(*via)) {
            return Err(DefinitionError::DanglingVia {
                table: table.to_string(),
                target,
                via: via.clone(),
            });
        }

        let join = JoinDefinition {
            target,
            alias: raw.alias,
            source_key: raw.source_key,
            target_key: raw.target_key,
            via: raw.via,
            hidden: raw.hidden.unwrap_or(false),
        };
        // One definition per target; a repeated target replaces the earlier one
        match joins.iter_mut().find(|j| j.target == join.target) {
            Some(existing) => *existing = join,
            None => joins.push(join),
        }
    }
    Ok(joins)
}
