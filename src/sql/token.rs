//! Tokens and their rendering.
//!
//! Expressions and queries write into a [`TokenStream`]; nothing is
//! dialect-specific until the stream is rendered. One stream renders three
//! ways: compact single-line text, text broken at clause boundaries, and
//! compact text with bound values replaced by placeholders.

use super::dialect::Dialect;
use super::expr::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Keyword, operator or punctuation, written verbatim.
    Word(&'static str),
    /// Table, column or alias name.
    Ident(String),
    /// Value written into the text.
    Literal(Literal),
    /// Value written into the text, or a placeholder when parameterized.
    Param(Literal),
    /// Function name, spelled per dialect.
    Function(String),
    Space,
    /// Clause boundary: a space in compact output, a newline indented by
    /// `depth` levels in pretty output.
    Break(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Compact,
    Pretty,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn word(&mut self, word: &'static str) -> &mut Self {
        self.push(Token::Word(word))
    }

    pub fn ident(&mut self, name: &str) -> &mut Self {
        self.push(Token::Ident(name.to_string()))
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn brk(&mut self, depth: usize) -> &mut Self {
        self.push(Token::Break(depth))
    }

    /// `sep` between items, each written by `write`.
    pub fn list<T>(
        &mut self,
        items: &[T],
        sep: &'static str,
        mut write: impl FnMut(&mut Self, &T),
    ) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.word(sep).space();
            }
            write(self, item);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Single-line SQL with every value inlined.
    pub fn to_text(&self, dialect: Dialect) -> String {
        self.render(dialect, Layout::Compact, None)
    }

    /// SQL with a newline at each clause boundary.
    pub fn to_pretty_text(&self, dialect: Dialect) -> String {
        self.render(dialect, Layout::Pretty, None)
    }

    /// Single-line SQL with placeholders, plus the values they stand for.
    pub fn to_parameterized_text(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        let mut values = Vec::new();
        let text = self.render(dialect, Layout::Compact, Some(&mut values));
        (text, values)
    }

    fn render(
        &self,
        dialect: Dialect,
        layout: Layout,
        mut params: Option<&mut Vec<Literal>>,
    ) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Word(word) => out.push_str(word),
                Token::Ident(name) => out.push_str(&dialect.quote_identifier(name)),
                Token::Literal(lit) => out.push_str(&literal_text(lit, dialect)),
                Token::Param(lit) => match params.as_deref_mut() {
                    Some(values) => {
                        values.push(lit.clone());
                        out.push_str(&dialect.placeholder(values.len()));
                    }
                    None => out.push_str(&literal_text(lit, dialect)),
                },
                Token::Function(name) => out.push_str(&dialect.function_name(name)),
                Token::Space => out.push(' '),
                Token::Break(depth) => match layout {
                    Layout::Compact => out.push(' '),
                    Layout::Pretty => {
                        out.push('\n');
                        out.push_str(&"  ".repeat(*depth));
                    }
                },
            }
        }
        out
    }
}

fn literal_text(lit: &Literal, dialect: Dialect) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        // JSON cannot carry NaN or infinities; builder input can
        Literal::Float(f) if !f.is_finite() => "NULL".to_string(),
        Literal::Float(f) => ryu::Buffer::new().format(*f).to_string(),
        Literal::String(s) => dialect.quote_string(s),
        Literal::Bool(b) => dialect.bool_literal(*b).to_string(),
        Literal::Null => "NULL".to_string(),
    }
}
