//! WHERE clauses: matches, AND/OR composition, operators, default filters.

#[path = "../common/mod.rs"]
mod common;

use common::compile;
use qb::{CompileError, QueryCompiler, QuerySpecError};
use serde_json::{json, Value};

fn definitions() -> Value {
    json!({
        "users": {"columns": ["id", "postId"], "joins": {"posts": {"source_key": "postId"}}},
        "posts": {"columns": {"id": "ID", "title": "Title"}, "as": "Blogs"}
    })
}

fn compile_where(where_: Value) -> String {
    compile(
        &definitions(),
        &json!({"select": "id", "from": "users", "where": where_}),
    )
}

#[test]
fn test_match_value() {
    assert_eq!(
        compile_where(json!({"field": "id", "match": {"value": 1}})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" = 1)"#
    );
}

#[test]
fn test_match_column() {
    assert_eq!(
        compile_where(json!({"field": "id", "match": "postId"})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" = "users"."postId")"#
    );
}

#[test]
fn test_field_on_joined_table() {
    let spec = json!({
        "select": "id",
        "from": "users",
        "join": {"name": "posts", "id": 1},
        "where": {"field": {"name": "id", "joinId": 1}, "match": {"value": 1}}
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "posts" AS "Blogs" ON ("users"."postId" = "Blogs"."id") WHERE ("Blogs"."id" = 1)"#
    );
}

#[test]
fn test_and() {
    assert_eq!(
        compile_where(json!([
            {"field": "id", "match": {"value": 1}},
            {"field": "postId", "match": {"value": 2}}
        ])),
        r#"SELECT "users"."id" FROM "users" WHERE (("users"."id" = 1) AND ("users"."postId" = 2))"#
    );
}

#[test]
fn test_or() {
    assert_eq!(
        compile_where(json!({
            "or": [
                {"field": "id", "match": {"value": 1}},
                {"field": "id", "match": {"value": 2}}
            ]
        })),
        r#"SELECT "users"."id" FROM "users" WHERE (("users"."id" = 1) OR ("users"."id" = 2))"#
    );
}

#[test]
fn test_and_of_ors() {
    assert_eq!(
        compile_where(json!([
            {"or": [{"field": "id", "match": {"value": 1}}, {"field": "id", "match": {"value": 2}}]},
            {"or": [{"field": "postId", "match": {"value": 2}}, {"field": "postId", "match": {"value": 3}}]}
        ])),
        concat!(
            r#"SELECT "users"."id" FROM "users" WHERE "#,
            r#"((("users"."id" = 1) OR ("users"."id" = 2)) AND (("users"."postId" = 2) OR ("users"."postId" = 3)))"#
        )
    );
}

#[test]
fn test_comparison_with_or() {
    assert_eq!(
        compile_where(json!({
            "field": "id",
            "match": {"value": 1},
            "or": [{"field": "postId", "match": {"value": 2}}]
        })),
        r#"SELECT "users"."id" FROM "users" WHERE (("users"."id" = 1) OR ("users"."postId" = 2))"#
    );
}

#[test]
fn test_operators() {
    let cases = [
        ("equal", "="),
        ("equals", "="),
        ("notEqual", "<>"),
        ("notEquals", "<>"),
        ("like", "LIKE"),
        ("notLike", "NOT LIKE"),
        ("gt", ">"),
        ("gte", ">="),
        ("lt", "<"),
        ("lte", "<="),
        ("ilike", "ILIKE"),
        ("notIlike", "NOT ILIKE"),
    ];

    for (name, sql) in cases {
        assert_eq!(
            compile_where(json!({"field": "id", "op": name, "match": {"value": 42}})),
            format!(r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" {} 42)"#, sql),
            "operator {}",
            name
        );
    }
}

#[test]
fn test_operator_key_spelling() {
    assert_eq!(
        compile_where(json!({"field": "id", "operator": "GTE", "match": {"value": 5}})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" >= 5)"#
    );
}

#[test]
fn test_null_checks_ignore_match() {
    assert_eq!(
        compile_where(json!({"field": "id", "op": "isNull", "match": {"value": 1}})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" IS NULL)"#
    );
    assert_eq!(
        compile_where(json!({"field": "postId", "op": "isNotNull"})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."postId" IS NOT NULL)"#
    );
}

#[test]
fn test_string_match() {
    assert_eq!(
        compile_where(json!({"field": "id", "op": "like", "match": {"value": "O'Brien%"}})),
        r#"SELECT "users"."id" FROM "users" WHERE ("users"."id" LIKE 'O''Brien%')"#
    );
}

#[test]
fn test_function_on_field() {
    assert_eq!(
        compile_where(json!({"field": {"name": "id", "function": "abs"}, "op": "gt", "match": {"value": 3}})),
        r#"SELECT "users"."id" FROM "users" WHERE (ABS("users"."id") > 3)"#
    );
}

#[test]
fn test_where_errors() {
    let compiler = QueryCompiler::new(&definitions()).unwrap();
    let query = |where_: Value| {
        compiler
            .query(&json!({"select": "id", "from": "users", "where": where_}))
            .unwrap_err()
    };

    assert_eq!(
        query(json!({"field": "id"})),
        CompileError::QuerySpec(QuerySpecError::MissingMatch("id".into()))
    );
    assert_eq!(
        query(json!({})),
        CompileError::QuerySpec(QuerySpecError::EmptyClause)
    );
    assert_eq!(
        query(json!({"field": "id", "op": "between", "match": {"value": 1}})),
        CompileError::QuerySpec(QuerySpecError::UnknownOperator("between".into()))
    );
    assert_eq!(
        query(json!({"field": "title", "match": {"value": 1}})),
        CompileError::ColumnNotDefined {
            table: "users".into(),
            column: "title".into()
        }
    );
}

#[test]
fn test_default_filters_apply_per_join() {
    let defs = json!({
        "users": {
            "columns": ["id", "deleted_at"],
            "where": {"field": "deleted_at", "op": "isNull"},
            "joins": {"users": {"source_key": "id"}, "posts": {"target_key": "user_id"}}
        },
        "posts": {
            "columns": ["id", "user_id", "status"],
            "where": {"field": "status", "op": "notEqual", "match": {"value": "draft"}}
        }
    });

    let spec = json!({
        "select": "id",
        "from": "users",
        "joins": ["posts", "users"],
        "where": {"field": "id", "op": "gt", "match": {"value": 10}}
    });
    assert_eq!(
        compile(&defs, &spec),
        concat!(
            r#"SELECT "users"."id" FROM "users" "#,
            r#"INNER JOIN "posts" ON ("users"."id" = "posts"."user_id") "#,
            r#"INNER JOIN "users" AS "users_2" ON ("users"."id" = "users_2"."id") "#,
            r#"WHERE (((("users"."id" > 10) AND ("users"."deleted_at" IS NULL)) "#,
            r#"AND ("posts"."status" <> 'draft')) AND ("users_2"."deleted_at" IS NULL))"#
        )
    );
}

#[test]
fn test_default_filter_with_unknown_join_id_stays_on_its_join() {
    let defs = json!({
        "users": {
            "columns": ["id", "deleted_at"],
            "where": {"field": {"name": "deleted_at", "joinId": "gone"}, "op": "isNull"}
        },
        "posts": {
            "columns": ["id", "user_id"],
            "joins": {"users": {"source_key": "user_id"}}
        }
    });

    let spec = json!({"select": "id", "from": "posts", "join": "users"});
    assert_eq!(
        compile(&defs, &spec),
        concat!(
            r#"SELECT "posts"."id" FROM "posts" "#,
            r#"INNER JOIN "users" ON ("posts"."user_id" = "users"."id") "#,
            r#"WHERE ("users"."deleted_at" IS NULL)"#
        )
    );
}
