//! Canonical table definitions.

use std::collections::HashMap;

use crate::spec::WhereClause;

/// A table the compiler can select from and join to.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    /// Physical table name.
    pub name: String,
    /// Display alias; also the default SQL alias in queries.
    pub alias: Option<String>,
    pub primary_key: Option<String>,
    /// In definition order.
    pub columns: Vec<ColumnDefinition>,
    /// In definition order, at most one per target table.
    pub joins: Vec<JoinDefinition>,
    pub hidden: bool,
    /// Conditions added to the WHERE clause wherever this table is joined.
    pub default_filters: Vec<WhereClause>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            primary_key: None,
            columns: Vec::new(),
            joins: Vec::new(),
            hidden: false,
            default_filters: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The join definition toward `target`, if one exists.
    pub fn join(&self, target: &str) -> Option<&JoinDefinition> {
        self.joins.iter().find(|j| j.target == target)
    }

    /// Alias if set, else the physical name.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub alias: Option<String>,
    pub hidden: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            hidden: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// How a table joins to one target table.
///
/// Missing keys fall back to the primary key of their side when the join
/// is used in a query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinDefinition {
    pub target: String,
    pub alias: Option<String>,
    pub source_key: Option<String>,
    pub target_key: Option<String>,
    /// Junction table the join passes through.
    pub via: Option<String>,
    pub hidden: bool,
}

impl JoinDefinition {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            alias: None,
            source_key: None,
            target_key: None,
            via: None,
            hidden: false,
        }
    }
}

/// All normalized table definitions, in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    tables: Vec<TableDefinition>,
    index: HashMap<String, usize>,
}

impl Definitions {
    /// Build from already-normalized tables. Later duplicates replace
    /// earlier ones in place.
    pub fn from_tables(tables: impl IntoIterator<Item = TableDefinition>) -> Self {
        let mut defs = Self::default();
        for table in tables {
            defs.insert(table);
        }
        defs
    }

    pub(crate) fn insert(&mut self, table: TableDefinition) {
        match self.index.get(&table.name) {
            Some(&at) => self.tables[at] = table,
            None => {
                self.index.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.index.get(name).map(|&at| &self.tables[at])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDefinition> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
