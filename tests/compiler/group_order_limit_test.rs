//! GROUP BY, ORDER BY, LIMIT and OFFSET.

#[path = "../common/mod.rs"]
mod common;

use common::compile;
use serde_json::{json, Value};

fn definitions() -> Value {
    json!({"users": {"columns": ["id", "name"], "as": "Users"}})
}

#[test]
fn test_order_by() {
    assert_eq!(
        compile(
            &definitions(),
            &json!({"select": "id", "from": "users", "orderBy": "id"})
        ),
        r#"SELECT "Users"."id" FROM "users" AS "Users" ORDER BY "Users"."id""#
    );
}

#[test]
fn test_order_by_several() {
    let spec = json!({
        "select": "id",
        "from": "users",
        "orderBys": [{"name": "id", "orderBy": "desc"}, "name"]
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" ORDER BY "Users"."id" DESC, "Users"."name""#
    );
}

#[test]
fn test_order_by_flag_on_select() {
    let spec = json!({"select": {"name": "id", "orderBy": "DESC"}, "from": "users"});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" ORDER BY "Users"."id" DESC"#
    );

    let spec = json!({"select": {"name": "id", "orderBy": true}, "from": "users"});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" ORDER BY "Users"."id""#
    );
}

#[test]
fn test_explicit_order_before_flags() {
    let spec = json!({
        "selects": [{"name": "id", "orderBy": "desc"}],
        "from": "users",
        "orderBy": "name"
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" ORDER BY "Users"."name", "Users"."id" DESC"#
    );
}

#[test]
fn test_group_by() {
    let spec = json!({"select": "name", "from": "users", "groupBy": ["id", "name"]});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."name" FROM "users" AS "Users" GROUP BY "Users"."id", "Users"."name""#
    );
}

#[test]
fn test_group_by_flag_keeps_functions() {
    let spec = json!({
        "select": {"name": "name", "groupBy": true, "functions": "date"},
        "from": "users"
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT DATE("Users"."name") AS "name_date" FROM "users" AS "Users" GROUP BY DATE("Users"."name")"#
    );
}

#[test]
fn test_group_and_order_flags() {
    let spec = json!({
        "select": {"name": "name", "groupBy": true, "orderBy": "desc"},
        "from": "users"
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."name" FROM "users" AS "Users" GROUP BY "Users"."name" ORDER BY "Users"."name" DESC"#
    );
}

#[test]
fn test_aggregate_with_group_by() {
    let spec = json!({
        "selects": [
            {"name": "name", "groupBy": true},
            {"name": "id", "function": "COUNT", "as": "num"}
        ],
        "from": "users"
    });
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."name", COUNT("Users"."id") AS "num" FROM "users" AS "Users" GROUP BY "Users"."name""#
    );
}

#[test]
fn test_limit() {
    for limit in [json!(5), json!(5.9), json!("5"), json!("5 rows")] {
        let spec = json!({"select": "id", "from": "users", "limit": limit});
        assert_eq!(
            compile(&definitions(), &spec),
            r#"SELECT "Users"."id" FROM "users" AS "Users" LIMIT 5"#,
            "limit {}",
            limit
        );
    }

    let spec = json!({"select": "id", "from": "users", "limitTo": 7});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" LIMIT 7"#
    );
}

#[test]
fn test_invalid_limit_is_ignored() {
    for limit in [json!(-1), json!("many"), json!(null), json!(true)] {
        let spec = json!({"select": "id", "from": "users", "limit": limit});
        assert_eq!(
            compile(&definitions(), &spec),
            r#"SELECT "Users"."id" FROM "users" AS "Users""#,
            "limit {}",
            limit
        );
    }
}

#[test]
fn test_offset() {
    let spec = json!({"select": "id", "from": "users", "limit": 10, "offset": 20});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" LIMIT 10 OFFSET 20"#
    );

    let spec = json!({"select": "id", "from": "users", "offsetBy": "3"});
    assert_eq!(
        compile(&definitions(), &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" OFFSET 3"#
    );
}

#[test]
fn test_full_clause_order() {
    let spec = json!({
        "selects": [
            {"name": "name", "groupBy": true, "orderBy": "asc"},
            {"name": "id", "function": "count", "as": "n"}
        ],
        "from": "users",
        "where": {"field": "id", "op": "gt", "match": {"value": 0}},
        "limit": 3
    });
    assert_eq!(
        compile(&definitions(), &spec),
        concat!(
            r#"SELECT "Users"."name", COUNT("Users"."id") AS "n" FROM "users" AS "Users" "#,
            r#"WHERE ("Users"."id" > 0) GROUP BY "Users"."name" ORDER BY "Users"."name" LIMIT 3"#
        )
    );
}
