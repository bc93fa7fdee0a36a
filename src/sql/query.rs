//! SELECT statement builder.

use serde::Serialize;

use super::dialect::{Dialect, Paging};
use super::expr::{Expr, Literal};
use super::token::{Token, TokenStream};

/// One item of the SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }

    fn write(&self, ts: &mut TokenStream, dialect: Dialect) {
        self.expr.write(ts, dialect);
        if let Some(alias) = &self.alias {
            ts.space().word("AS").space().ident(alias);
        }
    }
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        SelectItem::new(expr)
    }
}

/// A table and the name the rest of the query uses for it.
///
/// The alias is written only when it differs from the table name.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    fn write(&self, ts: &mut TokenStream) {
        ts.ident(&self.table);
        if let Some(alias) = self.alias.as_ref().filter(|a| **a != self.table) {
            ts.space().word("AS").space().ident(alias);
        }
    }
}

/// `INNER JOIN table ON condition`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY item. Ascending is written without a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderItem {
    pub fn new(expr: Expr, dir: SortDir) -> Self {
        Self { expr, dir }
    }
}

/// SQL text with bind placeholders and the values they stand for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterizedQuery {
    pub text: String,
    pub values: Vec<Literal>,
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "a Query does nothing until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_select(mut self, item: impl Into<SelectItem>) -> Self {
        self.select.push(item.into());
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    pub fn inner_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join { table, on });
        self
    }

    /// AND a condition onto the WHERE clause.
    ///
    /// Conditions fold left: `((a) AND (b))`, then `(((a) AND (b)) AND (c))`.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition).paren(),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.group_by.extend(exprs);
        self
    }

    pub fn order_by(mut self, items: impl IntoIterator<Item = OrderItem>) -> Self {
        self.order_by.extend(items);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The statement as tokens. Every clause starts at a [`Token::Break`].
    pub fn tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.word("SELECT").space();
        ts.list(&self.select, ",", |ts, item| item.write(ts, dialect));

        if let Some(from) = &self.from {
            ts.brk(0).word("FROM").space();
            from.write(&mut ts);
        }

        for join in &self.joins {
            ts.brk(0).word("INNER JOIN").space();
            join.table.write(&mut ts);
            ts.brk(1).word("ON").space();
            join.on.write(&mut ts, dialect);
        }

        if let Some(filter) = &self.filter {
            ts.brk(0).word("WHERE").space();
            filter.write(&mut ts, dialect);
        }

        if !self.group_by.is_empty() {
            ts.brk(0).word("GROUP BY").space();
            ts.list(&self.group_by, ",", |ts, expr| expr.write(ts, dialect));
        }

        let paged = self.limit.is_some() || self.offset.is_some();
        if !self.order_by.is_empty() {
            ts.brk(0).word("ORDER BY").space();
            ts.list(&self.order_by, ",", |ts, item| {
                item.expr.write(ts, dialect);
                if item.dir == SortDir::Desc {
                    ts.space().word("DESC");
                }
            });
        } else if paged && dialect.paging() == Paging::OffsetFetch {
            // OFFSET/FETCH is only legal after ORDER BY; row order stays unspecified
            ts.brk(0).word("ORDER BY (SELECT NULL)");
        }

        if paged {
            ts.brk(0);
            self.write_paging(&mut ts, dialect);
        }

        ts
    }

    fn write_paging(&self, ts: &mut TokenStream, dialect: Dialect) {
        let count = |n: u64| Token::Literal(Literal::Int(i64::try_from(n).unwrap_or(i64::MAX)));

        match dialect.paging() {
            Paging::LimitOffset => {
                if let Some(limit) = self.limit {
                    ts.word("LIMIT").space().push(count(limit));
                }
                if let Some(offset) = self.offset {
                    if self.limit.is_some() {
                        ts.space();
                    }
                    ts.word("OFFSET").space().push(count(offset));
                }
            }
            Paging::OffsetFetch => {
                ts.word("OFFSET")
                    .space()
                    .push(count(self.offset.unwrap_or(0)))
                    .space()
                    .word("ROWS");
                if let Some(limit) = self.limit {
                    ts.space()
                        .word("FETCH NEXT")
                        .space()
                        .push(count(limit))
                        .space()
                        .word("ROWS ONLY");
                }
            }
        }
    }

    /// Single-line SQL with every value inlined.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.tokens(dialect).to_text(dialect)
    }

    /// SQL with one clause per line.
    pub fn to_pretty_sql(&self, dialect: Dialect) -> String {
        self.tokens(dialect).to_pretty_text(dialect)
    }

    /// Single-line SQL with bound values replaced by placeholders.
    pub fn to_parameterized_sql(&self, dialect: Dialect) -> ParameterizedQuery {
        let (text, values) = self.tokens(dialect).to_parameterized_text(dialect);
        ParameterizedQuery { text, values }
    }
}

impl std::fmt::Display for Query {
    /// Postgres text. Use [`Query::to_sql`] for other dialects.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql(Dialect::default()))
    }
}
