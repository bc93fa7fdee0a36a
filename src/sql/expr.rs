//! Expression AST.

use super::dialect::Dialect;
use super::token::{Token, TokenStream};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `table.column`, or a bare `column`.
    Column {
        table: Option<String>,
        column: String,
    },
    /// Value written into the SQL text.
    Literal(Literal),
    /// Bound value: inlined in plain output, a placeholder in
    /// parameterized output.
    Param(Literal),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// `expr IS [NOT] NULL`
    NullCheck { expr: Box<Expr>, negated: bool },
    Paren(Box<Expr>),
}

/// A scalar value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl From<&serde_json::Value> for Literal {
    /// Scalars map one-to-one. Arrays and objects have no SQL literal form
    /// and are carried as their JSON text.
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::Int(i),
                None => Literal::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Literal::String(s.clone()),
            other => Literal::String(other.to_string()),
        }
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n.into())
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::ILike => "ILIKE",
            BinaryOp::NotILike => "NOT ILIKE",
        }
    }

    /// The case-sensitive operator an ILIKE falls back to.
    fn without_case(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::ILike => Some(BinaryOp::Like),
            BinaryOp::NotILike => Some(BinaryOp::NotLike),
            _ => None,
        }
    }
}

/// `column`
pub fn col(column: &str) -> Expr {
    Expr::Column {
        table: None,
        column: column.to_string(),
    }
}

/// `table.column`
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.to_string()),
        column: column.to_string(),
    }
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        name: name.to_string(),
        args,
    }
}

pub fn lit(value: impl Into<Literal>) -> Expr {
    Expr::Literal(value.into())
}

pub fn param(value: impl Into<Literal>) -> Expr {
    Expr::Param(value.into())
}

impl Expr {
    pub fn binary(self, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub fn equals(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Or, right)
    }

    pub fn is_null(self) -> Expr {
        Expr::NullCheck {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Expr {
        Expr::NullCheck {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }

    /// Append this expression to `ts`.
    ///
    /// The dialect is consulted only where the shape of the output changes:
    /// ILIKE becomes `LOWER(a) LIKE LOWER(b)` where it is missing.
    pub fn write(&self, ts: &mut TokenStream, dialect: Dialect) {
        match self {
            Expr::Column { table, column } => {
                if let Some(table) = table {
                    ts.ident(table).word(".");
                }
                ts.ident(column);
            }
            Expr::Literal(value) => {
                ts.push(Token::Literal(value.clone()));
            }
            Expr::Param(value) => {
                ts.push(Token::Param(value.clone()));
            }
            Expr::Binary { left, op, right } => {
                if let Some(fallback) = op.without_case().filter(|_| !dialect.supports_ilike()) {
                    let lower = |e: &Expr| func("LOWER", vec![e.clone()]);
                    return lower(left.as_ref())
                        .binary(fallback, lower(right.as_ref()))
                        .write(ts, dialect);
                }
                left.write(ts, dialect);
                // AND starts an indented line in pretty output
                match op {
                    BinaryOp::And => ts.brk(1),
                    _ => ts.space(),
                };
                ts.word(op.symbol()).space();
                right.write(ts, dialect);
            }
            Expr::Call { name, args } => {
                ts.push(Token::Function(name.clone())).word("(");
                ts.list(args, ",", |ts, arg| arg.write(ts, dialect));
                ts.word(")");
            }
            Expr::NullCheck { expr, negated } => {
                expr.write(ts, dialect);
                ts.space()
                    .word(if *negated { "IS NOT NULL" } else { "IS NULL" });
            }
            Expr::Paren(inner) => {
                ts.word("(");
                inner.write(ts, dialect);
                ts.word(")");
            }
        }
    }

    /// Single-line SQL for this expression alone.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut ts = TokenStream::new();
        self.write(&mut ts, dialect);
        ts.to_text(dialect)
    }
}
