//! Table definitions and the public catalog.
//!
//! Callers describe their tables in JSON with a lot of freedom: columns as
//! a list or a map, joins as a list or a map, aliases as strings or records.
//! [`Definitions::from_value`] normalizes all of that once, up front, and
//! [`Catalog::build`] projects the result to what clients may see.
//!
//! ```text
//! {
//!   "users": { "as": "Users", "columns": { "id": "User ID", "name": null },
//!              "joins": { "posts": { "target_key": "user_id" } } },
//!   "posts": { "columns": ["id", "user_id"],
//!              "joins": { "tags": { "via": "posts_tags" } } },
//!   ...
//! }
//! ```

mod catalog;
mod definition;
mod error;
mod normalize;
mod raw;

pub use catalog::{Catalog, CatalogColumn, CatalogJoin, CatalogTable};
pub use definition::{ColumnDefinition, Definitions, JoinDefinition, TableDefinition};
pub use error::{DefinitionError, DefinitionResult};
