//! Function chains, registered adapters and per-call arguments.

#[path = "../common/mod.rs"]
mod common;

use qb::sql::Literal;
use qb::{CompileOptions, FunctionArg, QueryCompiler};
use serde_json::{json, Value};

fn compiler() -> QueryCompiler {
    QueryCompiler::new(&json!({"users": {"columns": ["id", "name", "created_at"]}})).unwrap()
}

fn select_sql(compiler: &QueryCompiler, select: Value) -> String {
    compiler
        .query(&json!({"select": select, "from": "users"}))
        .unwrap()
        .text
}

fn arg(s: &str) -> FunctionArg {
    FunctionArg::Value(Literal::String(s.into()))
}

#[test]
fn test_function_spellings() {
    let compiler = compiler();
    for select in [
        json!({"name": "id", "functions": "count"}),
        json!({"name": "id", "functions": "COUNT"}),
        json!({"name": "id", "functions": ["COUNT"]}),
        json!({"name": "id", "function": "Count"}),
        json!({"name": "id", "functions": [{"name": "count"}]}),
    ] {
        assert_eq!(
            select_sql(&compiler, select.clone()),
            r#"SELECT COUNT("users"."id") AS "id_count" FROM "users""#,
            "{}",
            select
        );
    }
}

#[test]
fn test_chain_is_outermost_first() {
    let compiler = QueryCompiler::new(&common::blog_definitions()).unwrap();
    let compiled = compiler
        .query(&json!({
            "select": {"name": "id", "functions": ["count", "distinct"]},
            "from": "posts"
        }))
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT COUNT(DISTINCT("Blog Posts"."id")) AS "Post ID_count_distinct" FROM "posts" AS "Blog Posts""#
    );
}

#[test]
fn test_unknown_function_passes_through() {
    let compiler = compiler();
    assert_eq!(
        select_sql(&compiler, json!({"name": "id", "functions": "my_function"})),
        r#"SELECT MY_FUNCTION("users"."id") AS "id_my_function" FROM "users""#
    );
}

#[test]
fn test_unknown_function_not_persisted_by_default() {
    let compiler = compiler();
    let before = compiler.functions().len();
    select_sql(&compiler, json!({"name": "id", "functions": "my_function"}));

    assert!(!compiler.functions().contains("MY_FUNCTION"));
    assert_eq!(compiler.functions().len(), before);
}

#[test]
fn test_unknown_function_persisted_when_enabled() {
    let compiler = QueryCompiler::with_options(
        &json!({"users": {"columns": ["id"]}}),
        CompileOptions::default().with_persist_unknown_functions(true),
    )
    .unwrap();
    select_sql(&compiler, json!({"name": "id", "functions": "my_function"}));

    assert!(compiler.functions().contains("my_function"));
}

#[test]
fn test_registered_emitted_name() {
    let compiler = compiler();
    compiler.register_function("different_name", Some("MY_FUNC"), vec![]);

    assert_eq!(
        select_sql(&compiler, json!({"name": "id", "functions": "different_name"})),
        r#"SELECT MY_FUNC("users"."id") AS "id_different_name" FROM "users""#
    );
}

#[test]
fn test_registered_prefilled_args() {
    let compiler = compiler();
    compiler.register_function("appended", Some("MY_FUNC"), vec![arg("ARG1"), arg("ARG2")]);
    compiler.register_function(
        "hole_first",
        Some("MY_FUNC"),
        vec![FunctionArg::Hole, arg("ARG1"), arg("ARG2")],
    );

    assert_eq!(
        select_sql(&compiler, json!({"name": "id", "functions": "appended", "as": "x"})),
        r#"SELECT MY_FUNC('ARG1', 'ARG2', "users"."id") AS "x" FROM "users""#
    );
    assert_eq!(
        select_sql(&compiler, json!({"name": "id", "functions": "hole_first", "as": "x"})),
        r#"SELECT MY_FUNC("users"."id", 'ARG1', 'ARG2') AS "x" FROM "users""#
    );
}

#[test]
fn test_registered_adapter_in_chain() {
    let compiler = compiler();
    compiler.register_function(
        "year",
        Some("DATE_PART"),
        vec![arg("year"), FunctionArg::Hole],
    );

    assert_eq!(
        select_sql(&compiler, json!({"name": "created_at", "functions": ["count", "year"]})),
        r#"SELECT COUNT(DATE_PART('year', "users"."created_at")) AS "created_at_count_year" FROM "users""#
    );
}

#[test]
fn test_call_args() {
    let compiler = compiler();

    assert_eq!(
        select_sql(
            &compiler,
            json!({"name": "id", "functions": [{"name": "round", "args": [null, 2]}], "as": "r"})
        ),
        r#"SELECT ROUND("users"."id", 2) AS "r" FROM "users""#
    );
    assert_eq!(
        select_sql(
            &compiler,
            json!({"name": "name", "functions": [{"name": "coalesce", "args": "unknown"}], "as": "n"})
        ),
        r#"SELECT COALESCE('unknown', "users"."name") AS "n" FROM "users""#
    );
}

#[test]
fn test_call_args_fill_adapter_hole() {
    let compiler = compiler();
    compiler.register_function(
        "fmt",
        Some("TO_CHAR"),
        vec![arg("x"), FunctionArg::Hole],
    );

    assert_eq!(
        select_sql(
            &compiler,
            json!({"name": "created_at", "functions": [{"name": "fmt", "args": [null, "YYYY"]}], "as": "d"})
        ),
        r#"SELECT TO_CHAR('x', "users"."created_at", 'YYYY') AS "d" FROM "users""#
    );
}

#[test]
fn test_registry_shared_between_threads() {
    let compiler = compiler();
    std::thread::scope(|scope| {
        for i in 0..4 {
            let compiler = &compiler;
            scope.spawn(move || {
                compiler.register_function(&format!("f{}", i), None, vec![]);
                select_sql(compiler, json!({"name": "id", "functions": format!("f{}", i)}))
            });
        }
    });

    for i in 0..4 {
        assert!(compiler.functions().contains(&format!("F{}", i)));
    }
}
