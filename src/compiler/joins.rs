//! Join resolution.
//!
//! Turns the spec's join requests into one linear chain of inner joins,
//! each with a unique SQL alias. A join defined `via` a junction table is
//! expanded into two joins (source -> via, via -> target); expansions may
//! nest, so the work is driven by an explicit stack of tasks.

use std::collections::{HashMap, HashSet};

use crate::schema::{Definitions, TableDefinition};
use crate::spec::{JoinRequest, RequestId};
use crate::sql::{table_col, Expr, TableRef};

use super::{CompileError, CompileResult};

/// A table bound to its alias in one compiled query.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedJoin<'d> {
    pub table: &'d TableDefinition,
    pub alias: String,
    /// `None` for the FROM table.
    pub on: Option<Expr>,
}

impl ResolvedJoin<'_> {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.table.name).with_alias(&self.alias)
    }
}

/// The resolved chain plus the request ids that point into it.
#[derive(Debug)]
pub(crate) struct JoinPlan<'d> {
    /// `joins[0]` is FROM.
    pub joins: Vec<ResolvedJoin<'d>>,
    ids: HashMap<RequestId, usize>,
}

impl<'d> JoinPlan<'d> {
    /// Index of the join a reference points at, or `default` when there is
    /// no reference or the id is unknown.
    pub fn lookup(&self, join_id: Option<&RequestId>, default: usize) -> usize {
        lookup_id(&self.ids, join_id, default)
    }
}

/// Unknown ids warn and resolve to `default`.
fn lookup_id(
    ids: &HashMap<RequestId, usize>,
    join_id: Option<&RequestId>,
    default: usize,
) -> usize {
    let Some(id) = join_id else {
        return default;
    };
    match ids.get(id) {
        Some(&at) => at,
        None => {
            log::warn!("unknown join id {}, using join {}", id, default);
            default
        }
    }
}

/// Where a task's source join comes from.
#[derive(Debug, Clone, Copy)]
enum Source {
    Index(usize),
    /// Whatever join was resolved last.
    Latest,
}

#[derive(Debug)]
struct Task {
    source: Source,
    target: String,
    /// Alias requested for this target, if any.
    alias: Option<String>,
    /// Edges already expanded on the way to this task.
    path: Vec<(String, String)>,
}

pub(crate) fn resolve<'d>(
    defs: &'d Definitions,
    requests: &[JoinRequest],
) -> CompileResult<JoinPlan<'d>> {
    let mut resolver = JoinResolver {
        defs,
        joins: Vec::with_capacity(requests.len()),
        alias_counts: HashMap::new(),
        used: HashSet::new(),
    };

    let (from, rest) = requests
        .split_first()
        .ok_or(CompileError::QuerySpec(crate::spec::QuerySpecError::MissingFrom))?;
    let table = defs
        .get(&from.table)
        .ok_or_else(|| CompileError::UnknownTable(from.table.clone()))?;
    let alias = resolver.assign_alias(base_alias(from.alias.as_deref(), table));
    log::debug!("FROM {} as {}", table.name, alias);
    resolver.joins.push(ResolvedJoin {
        table,
        alias,
        on: None,
    });

    let mut ids = HashMap::new();
    if let Some(id) = &from.id {
        ids.insert(id.clone(), 0);
    }

    for request in rest {
        // FROM is the default source
        let source = lookup_id(&ids, request.join_id.as_ref(), 0);

        let last = resolver.run(Task {
            source: Source::Index(source),
            target: request.table.clone(),
            alias: request.alias.clone(),
            path: Vec::new(),
        })?;

        if let Some(id) = &request.id {
            ids.insert(id.clone(), last);
        }
    }

    Ok(JoinPlan {
        joins: resolver.joins,
        ids,
    })
}

struct JoinResolver<'d> {
    defs: &'d Definitions,
    joins: Vec<ResolvedJoin<'d>>,
    alias_counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl<'d> JoinResolver<'d> {
    /// Resolve one request, expanding via tables. Returns the index of the
    /// join for the request's own target table.
    fn run(&mut self, task: Task) -> CompileResult<usize> {
        let mut stack = vec![task];
        let mut last = 0;

        while let Some(task) = stack.pop() {
            let source_at = match task.source {
                Source::Index(at) => at,
                Source::Latest => self.joins.len() - 1,
            };
            let source = self.joins[source_at].table;
            let target = self
                .defs
                .get(&task.target)
                .ok_or_else(|| CompileError::UnknownTable(task.target.clone()))?;
            let def = source.join(&target.name).ok_or_else(|| CompileError::NoJoin {
                from: source.name.clone(),
                to: target.name.clone(),
            })?;

            let edge = (source.name.clone(), target.name.clone());
            if task.path.contains(&edge) {
                let mut path: Vec<String> = task.path.iter().map(|(from, _)| from.clone()).collect();
                path.push(edge.0);
                path.push(edge.1);
                return Err(CompileError::CyclicJoin { path });
            }

            if let Some(via) = &def.via {
                log::debug!("expanding {} -> {} via {}", source.name, target.name, via);
                let mut path = task.path;
                path.push(edge);
                // Popped last: runs once source -> via is fully resolved
                stack.push(Task {
                    source: Source::Latest,
                    target: target.name.clone(),
                    alias: task.alias,
                    path: path.clone(),
                });
                stack.push(Task {
                    source: Source::Index(source_at),
                    target: via.clone(),
                    alias: None,
                    path,
                });
                continue;
            }

            let source_key = def
                .source_key
                .as_ref()
                .or(source.primary_key.as_ref())
                .ok_or_else(|| missing_key(source, target))?;
            let target_key = def
                .target_key
                .as_ref()
                .or(target.primary_key.as_ref())
                .ok_or_else(|| missing_key(source, target))?;

            let alias = self.assign_alias(base_alias(task.alias.as_deref(), target));
            let on = table_col(&self.joins[source_at].alias, source_key)
                .equals(table_col(&alias, target_key))
                .paren();
            log::debug!(
                "JOIN {} as {} on {}.{} = {}.{}",
                target.name,
                alias,
                self.joins[source_at].alias,
                source_key,
                alias,
                target_key
            );

            self.joins.push(ResolvedJoin {
                table: target,
                alias,
                on: Some(on),
            });
            last = self.joins.len() - 1;
        }

        Ok(last)
    }

    /// First use of a base alias keeps it; later uses get `_<n>`.
    fn assign_alias(&mut self, base: &str) -> String {
        let count = self.alias_counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        let mut alias = if *count == 1 {
            base.to_string()
        } else {
            format!("{}_{}", base, count)
        };
        while self.used.contains(&alias) {
            *count += 1;
            alias = format!("{}_{}", base, count);
        }
        self.used.insert(alias.clone());
        alias
    }
}

fn base_alias<'a>(requested: Option<&'a str>, table: &'a TableDefinition) -> &'a str {
    requested.unwrap_or_else(|| table.display_name())
}

fn missing_key(source: &TableDefinition, target: &TableDefinition) -> CompileError {
    CompileError::MissingJoinKey {
        from: source.name.clone(),
        to: target.name.clone(),
    }
}
