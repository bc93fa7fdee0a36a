//! The public view of the schema.
//!
//! Hidden tables, hidden columns, hidden joins, and joins onto hidden
//! tables are left out. Serializes to the JSON clients use to build
//! query forms.

use serde::Serialize;

use super::definition::{Definitions, TableDefinition};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: Vec<CatalogTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogTable {
    pub name: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub columns: Vec<CatalogColumn>,
    pub joins: Vec<CatalogJoin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogJoin {
    pub name: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

impl Catalog {
    pub fn build(defs: &Definitions) -> Self {
        let tables = defs
            .iter()
            .filter(|t| !t.hidden)
            .map(|t| catalog_table(t, defs))
            .collect();
        Self { tables }
    }

    pub fn tables(&self) -> &[CatalogTable] {
        &self.tables
    }

    pub fn get(&self, name: &str) -> Option<&CatalogTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn catalog_table(table: &TableDefinition, defs: &Definitions) -> CatalogTable {
    let columns = table
        .columns
        .iter()
        .filter(|c| !c.hidden)
        .map(|c| CatalogColumn {
            name: c.name.clone(),
            alias: c.alias.clone(),
        })
        .collect();

    let joins = table
        .joins
        .iter()
        .filter(|j| !j.hidden)
        .filter_map(|j| {
            let target = defs.get(&j.target).filter(|t| !t.hidden)?;
            Some(CatalogJoin {
                name: j.target.clone(),
                alias: j.alias.clone(),
                source_key: j.source_key.clone().or_else(|| table.primary_key.clone()),
                target_key: j.target_key.clone().or_else(|| target.primary_key.clone()),
                via: j.via.clone(),
            })
        })
        .collect();

    CatalogTable {
        name: table.name.clone(),
        alias: table.alias.clone(),
        columns,
        joins,
    }
}
