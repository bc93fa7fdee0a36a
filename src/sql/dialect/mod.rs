//! SQL dialects.
//!
//! Each dialect is a [`Profile`]: a constant description of how it quotes
//! identifiers and strings, writes booleans and placeholders, pages
//! results, and which function names it spells differently.
//!
//! | Dialect  | Identifiers | Placeholders | Paging                        |
//! |----------|-------------|--------------|-------------------------------|
//! | Postgres | `"x"`       | `$1`         | `LIMIT n OFFSET m`            |
//! | DuckDB   | `"x"`       | `$1`         | `LIMIT n OFFSET m`            |
//! | MySQL    | `` `x` ``   | `?`          | `LIMIT n OFFSET m`            |
//! | T-SQL    | `[x]`       | `@p1`        | `OFFSET m ROWS FETCH NEXT ..` |

mod duckdb;
mod mysql;
mod postgres;
mod tsql;

use std::fmt;
use std::str::FromStr;

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Postgres,
    DuckDb,
    MySql,
    TSql,
}

/// How string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringStyle {
    /// `'it''s'`
    Standard,
    /// Standard, plus backslashes doubled.
    Backslash,
    /// Standard, with an `N` prefix when the text is not ASCII.
    National,
}

/// Bind placeholder spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// `$1`, `$2`, ...
    Dollar,
    /// `?` for every value.
    Question,
    /// `@p1`, `@p2`, ...
    AtP,
}

/// How LIMIT and OFFSET are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Paging {
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, which needs an ORDER BY.
    OffsetFetch,
}

#[derive(Debug)]
pub(crate) struct Profile {
    pub name: &'static str,
    /// Opening and closing identifier quote. The closing one is doubled
    /// inside names.
    pub quotes: (char, char),
    pub strings: StringStyle,
    /// Spellings of true and false.
    pub booleans: (&'static str, &'static str),
    pub ilike: bool,
    pub placeholder: Placeholder,
    pub paging: Paging,
    /// Upper-case function names this dialect spells differently.
    pub renames: &'static [(&'static str, &'static str)],
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Postgres,
        Dialect::DuckDb,
        Dialect::MySql,
        Dialect::TSql,
    ];

    pub(crate) fn profile(self) -> &'static Profile {
        match self {
            Dialect::Postgres => &postgres::PROFILE,
            Dialect::DuckDb => &duckdb::PROFILE,
            Dialect::MySql => &mysql::PROFILE,
            Dialect::TSql => &tsql::PROFILE,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn quote_identifier(self, ident: &str) -> String {
        let (open, close) = self.profile().quotes;
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(open);
        for c in ident.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
        out
    }

    pub fn quote_string(self, s: &str) -> String {
        let style = self.profile().strings;
        let mut escaped = s.replace('\'', "''");
        if style == StringStyle::Backslash {
            escaped = escaped.replace('\\', "\\\\");
        }
        match style {
            StringStyle::National if !s.is_ascii() => format!("N'{}'", escaped),
            _ => format!("'{}'", escaped),
        }
    }

    pub fn bool_literal(self, b: bool) -> &'static str {
        let (yes, no) = self.profile().booleans;
        if b {
            yes
        } else {
            no
        }
    }

    /// Whether ILIKE exists natively. Elsewhere it is rewritten to
    /// `LOWER(a) LIKE LOWER(b)`.
    pub fn supports_ilike(self) -> bool {
        self.profile().ilike
    }

    /// Placeholder for the `index`th bound value, counting from 1.
    pub fn placeholder(self, index: usize) -> String {
        match self.profile().placeholder {
            Placeholder::Dollar => format!("${}", index),
            Placeholder::Question => "?".to_string(),
            Placeholder::AtP => format!("@p{}", index),
        }
    }

    /// The function name as written in this dialect, upper-cased.
    pub fn function_name(self, name: &str) -> String {
        let upper = name.to_uppercase();
        self.profile()
            .renames
            .iter()
            .find(|(from, _)| *from == upper)
            .map(|(_, to)| to.to_string())
            .unwrap_or(upper)
    }

    pub(crate) fn paging(self) -> Paging {
        self.profile().paging
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown SQL dialect: {0} (expected postgres, duckdb, mysql or tsql)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            "mysql" => Ok(Dialect::MySql),
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::TSql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
