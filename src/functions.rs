//! SQL function adapters and the registry that holds them.
//!
//! An adapter wraps one SQL expression in a function call. It carries an
//! argument template in which [`FunctionArg::Hole`] marks where the wrapped
//! expression goes; with no hole, the expression is appended last.
//!
//! ```text
//! register("YEAR", Some("DATE_PART"), ['year', Hole])
//! YEAR applied to "t"."created_at"  =>  DATE_PART('year', "t"."created_at")
//! ```

use dashmap::DashMap;

use crate::sql::{Expr, Literal};

/// Functions every registry starts with, as plain pass-through adapters.
const BUILTINS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "DISTINCT", "LOWER", "UPPER", "LENGTH", "ABS", "ROUND",
    "COALESCE", "TRIM",
];

/// One argument slot in an adapter or call template.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    /// Where the wrapped expression is substituted.
    Hole,
    /// A prefilled value, rendered as an inline literal.
    Value(Literal),
}

impl From<&serde_json::Value> for FunctionArg {
    /// JSON `null` is the hole.
    fn from(value: &serde_json::Value) -> Self {
        if value.is_null() {
            FunctionArg::Hole
        } else {
            FunctionArg::Value(Literal::from(value))
        }
    }
}

impl From<Literal> for FunctionArg {
    fn from(lit: Literal) -> Self {
        FunctionArg::Value(lit)
    }
}

/// A registered SQL function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionAdapter {
    id: String,
    emitted_name: String,
    args: Vec<FunctionArg>,
}

impl FunctionAdapter {
    /// Create an adapter. `emitted_name` defaults to the id.
    pub fn new(id: &str, emitted_name: Option<&str>, args: Vec<FunctionArg>) -> Self {
        let id = id.to_uppercase();
        Self {
            emitted_name: emitted_name.map(str::to_string).unwrap_or_else(|| id.clone()),
            id,
            args,
        }
    }

    /// An adapter that just wraps its argument: `NAME(expr)`.
    pub fn passthrough(id: &str) -> Self {
        Self::new(id, None, Vec::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The function name written into SQL.
    pub fn emitted_name(&self) -> &str {
        &self.emitted_name
    }

    pub fn args(&self) -> &[FunctionArg] {
        &self.args
    }

    /// Wrap `expr` in this function.
    pub fn apply(&self, expr: Expr) -> Expr {
        self.apply_call(&[], expr)
    }

    /// Wrap `expr` using a call-level argument template.
    ///
    /// The call template is spliced in at this adapter's hole (or appended),
    /// then `expr` fills the call template's hole (or is appended to it).
    pub fn apply_call(&self, call_args: &[FunctionArg], expr: Expr) -> Expr {
        let mut call = call_args.to_vec();
        if !call.contains(&FunctionArg::Hole) {
            call.push(FunctionArg::Hole);
        }

        let mut slots = self.args.clone();
        match slots.iter().position(|a| *a == FunctionArg::Hole) {
            Some(at) => {
                slots.splice(at..=at, call);
            }
            None => slots.extend(call),
        }

        let mut expr = Some(expr);
        let args = slots
            .into_iter()
            .map(|slot| match slot {
                FunctionArg::Value(lit) => Expr::Literal(lit),
                // Only the first hole receives the expression
                FunctionArg::Hole => expr
                    .take()
                    .unwrap_or(Expr::Literal(Literal::Null)),
            })
            .collect();

        crate::sql::func(&self.emitted_name, args)
    }
}

/// Function adapters keyed by upper-cased id.
///
/// Safe to share between threads; registration takes `&self`.
#[derive(Debug)]
pub struct FunctionRegistry {
    adapters: DashMap<String, FunctionAdapter>,
    persist_unknown: bool,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// A registry seeded with the common built-in functions.
    pub fn new() -> Self {
        let adapters = DashMap::new();
        for id in BUILTINS {
            adapters.insert(id.to_string(), FunctionAdapter::passthrough(id));
        }
        Self {
            adapters,
            persist_unknown: false,
        }
    }

    /// Keep adapters synthesized for unknown functions after the call
    /// that needed them.
    pub fn persist_unknown(mut self, persist: bool) -> Self {
        self.persist_unknown = persist;
        self
    }

    /// Register (or replace) an adapter and return it.
    pub fn register(
        &self,
        id: &str,
        emitted_name: Option<&str>,
        args: Vec<FunctionArg>,
    ) -> FunctionAdapter {
        let adapter = FunctionAdapter::new(id, emitted_name, args);
        log::debug!(
            "registered function {} as {}",
            adapter.id(),
            adapter.emitted_name()
        );
        self.adapters
            .insert(adapter.id().to_string(), adapter.clone());
        adapter
    }

    pub fn get(&self, id: &str) -> Option<FunctionAdapter> {
        self.adapters
            .get(&id.to_uppercase())
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adapters.contains_key(&id.to_uppercase())
    }

    /// Find the adapter for `id`, synthesizing a pass-through one for
    /// unknown functions.
    ///
    /// Synthesized adapters are only stored when the registry was built
    /// with [`persist_unknown`](Self::persist_unknown).
    pub fn resolve(&self, id: &str) -> FunctionAdapter {
        if let Some(adapter) = self.get(id) {
            return adapter;
        }

        let adapter = FunctionAdapter::passthrough(id);
        if self.persist_unknown {
            log::warn!("unknown function {}, registering pass-through", adapter.id());
            self.adapters
                .insert(adapter.id().to_string(), adapter.clone());
        } else {
            log::warn!("unknown function {}, passing through", adapter.id());
        }
        adapter
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
