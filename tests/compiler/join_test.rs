//! Join resolution: FROM aliases, direct joins, self-joins, via tables.

#[path = "../common/mod.rs"]
mod common;

use common::compile;
use qb::{CompileError, QueryCompiler};
use serde_json::{json, Value};

fn users_and_posts() -> Value {
    json!({
        "users": {"columns": ["id", "postId"], "joins": {"posts": {"source_key": "postId"}}},
        "posts": {"columns": ["id"]}
    })
}

/// posts and tags are many-to-many through posts_tags; users reach tags
/// through posts.
fn tagged_posts() -> Value {
    json!({
        "users": {
            "columns": ["id"],
            "joins": {
                "posts": {"target_key": "user_id"},
                "tags": {"via": "posts"}
            }
        },
        "posts": {
            "columns": ["id", "user_id"],
            "joins": {
                "tags": {"via": "posts_tags"},
                "users": {"source_key": "user_id"},
                "posts_tags": {"target_key": "post_id"}
            }
        },
        "posts_tags": {
            "hidden": true,
            "columns": ["post_id", "tag_id"],
            "joins": {
                "posts": {"source_key": "post_id"},
                "tags": {"source_key": "tag_id"}
            }
        },
        "tags": {
            "columns": ["id"],
            "join": {"posts_tags": {"target_key": "tag_id"}}
        }
    })
}

#[test]
fn test_from_name() {
    let defs = json!({"users": {"columns": ["id"]}});

    for spec in [
        json!({"select": "id", "from": "users"}),
        json!({"select": "id", "joins": ["users"]}),
        json!({"select": "id", "joins": [{"name": "users"}]}),
    ] {
        assert_eq!(compile(&defs, &spec), r#"SELECT "users"."id" FROM "users""#);
    }
}

#[test]
fn test_from_alias() {
    let defs = json!({"users": {"columns": ["id"]}});
    let spec = json!({"select": "id", "from": {"name": "users", "as": "Users"}});
    assert_eq!(
        compile(&defs, &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users""#
    );

    let defs = json!({"users": {"as": "Users", "columns": ["id"]}});
    let spec = json!({"select": "id", "from": "users"});
    assert_eq!(
        compile(&defs, &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users""#
    );
}

#[test]
fn test_direct_join() {
    let spec = json!({"select": "id", "from": "users", "join": "posts"});
    assert_eq!(
        compile(&users_and_posts(), &spec),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "posts" ON ("users"."postId" = "posts"."id")"#
    );
}

#[test]
fn test_join_alias_referenced_by_select() {
    let spec = json!({
        "from": "users",
        "joins": [{"name": "posts", "as": "Posts", "id": 1}],
        "select": {"name": "id", "joinId": 1}
    });
    assert_eq!(
        compile(&users_and_posts(), &spec),
        r#"SELECT "Posts"."id" FROM "users" INNER JOIN "posts" AS "Posts" ON ("users"."postId" = "Posts"."id")"#
    );
}

#[test]
fn test_self_join() {
    let defs = json!({
        "users": {
            "as": "Users",
            "columns": ["id", "friend_id"],
            "joins": {"users": {"source_key": "friend_id"}}
        }
    });

    let spec = json!({"select": "id", "from": "users", "join": "users"});
    assert_eq!(
        compile(&defs, &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" INNER JOIN "users" AS "Users_2" ON ("Users"."friend_id" = "Users_2"."id")"#
    );

    let spec = json!({"select": "id", "from": "users", "join": {"name": "users", "as": "Friends"}});
    assert_eq!(
        compile(&defs, &spec),
        r#"SELECT "Users"."id" FROM "users" AS "Users" INNER JOIN "users" AS "Friends" ON ("Users"."friend_id" = "Friends"."id")"#
    );
}

#[test]
fn test_join_chain_by_join_id() {
    let defs = json!({
        "users": {
            "columns": ["id", "friend_id"],
            "joins": {"users": {"source_key": "friend_id"}}
        }
    });
    let spec = json!({
        "select": {"name": "id", "joinId": "fof"},
        "from": {"name": "users", "id": "me"},
        "joins": [
            {"name": "users", "id": "friend", "joinId": "me"},
            {"name": "users", "id": "fof", "joinId": "friend"}
        ]
    });
    assert_eq!(
        compile(&defs, &spec),
        concat!(
            r#"SELECT "users_3"."id" FROM "users" "#,
            r#"INNER JOIN "users" AS "users_2" ON ("users"."friend_id" = "users_2"."id") "#,
            r#"INNER JOIN "users" AS "users_3" ON ("users_2"."friend_id" = "users_3"."id")"#
        )
    );
}

#[test]
fn test_via_join() {
    let spec = json!({"select": "id", "from": "posts", "join": "tags"});
    assert_eq!(
        compile(&tagged_posts(), &spec),
        concat!(
            r#"SELECT "posts"."id" FROM "posts" "#,
            r#"INNER JOIN "posts_tags" ON ("posts"."id" = "posts_tags"."post_id") "#,
            r#"INNER JOIN "tags" ON ("posts_tags"."tag_id" = "tags"."id")"#
        )
    );
}

#[test]
fn test_nested_via_join() {
    let spec = json!({"select": "id", "from": "users", "join": "tags"});
    assert_eq!(
        compile(&tagged_posts(), &spec),
        concat!(
            r#"SELECT "users"."id" FROM "users" "#,
            r#"INNER JOIN "posts" ON ("users"."id" = "posts"."user_id") "#,
            r#"INNER JOIN "posts_tags" ON ("posts"."id" = "posts_tags"."post_id") "#,
            r#"INNER JOIN "tags" ON ("posts_tags"."tag_id" = "tags"."id")"#
        )
    );
}

#[test]
fn test_via_join_with_aliases() {
    let spec = json!({
        "select": "id",
        "from": {"name": "posts", "as": "Blogs"},
        "join": {"name": "tags", "as": "Tags"}
    });
    assert_eq!(
        compile(&tagged_posts(), &spec),
        concat!(
            r#"SELECT "Blogs"."id" FROM "posts" AS "Blogs" "#,
            r#"INNER JOIN "posts_tags" ON ("Blogs"."id" = "posts_tags"."post_id") "#,
            r#"INNER JOIN "tags" AS "Tags" ON ("posts_tags"."tag_id" = "Tags"."id")"#
        )
    );
}

#[test]
fn test_join_id_of_via_request_points_at_target() {
    let spec = json!({
        "select": {"name": "id", "joinId": 2},
        "from": "posts",
        "join": {"name": "tags", "id": 2}
    });
    let sql = compile(&tagged_posts(), &spec);
    assert!(sql.starts_with(r#"SELECT "tags"."id" FROM "posts""#), "{}", sql);
}

#[test]
fn test_unknown_join_id_falls_back_to_from() {
    let spec = json!({
        "select": {"name": "id", "joinId": 99},
        "from": "users",
        "joins": [{"name": "posts", "joinId": 42}]
    });
    assert_eq!(
        compile(&users_and_posts(), &spec),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "posts" ON ("users"."postId" = "posts"."id")"#
    );
}

#[test]
fn test_undefined_relationship() {
    let compiler = QueryCompiler::new(&users_and_posts()).unwrap();
    let err = compiler
        .query(&json!({"select": "id", "from": "posts", "join": "users"}))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::NoJoin {
            from: "posts".into(),
            to: "users".into()
        }
    );
    assert_eq!(err.to_string(), "No join defined from posts to users");
}

#[test]
fn test_unknown_tables() {
    let compiler = QueryCompiler::new(&users_and_posts()).unwrap();
    assert_eq!(
        compiler
            .query(&json!({"select": "id", "from": "ghosts"}))
            .unwrap_err(),
        CompileError::UnknownTable("ghosts".into())
    );
    assert_eq!(
        compiler
            .query(&json!({"select": "id", "from": "users", "join": "ghosts"}))
            .unwrap_err(),
        CompileError::UnknownTable("ghosts".into())
    );
}

#[test]
fn test_missing_primary_key_fails_at_query_time() {
    let defs = json!({
        "events": {"columns": ["code"], "joins": {"logs": null}},
        "logs": {"columns": ["event_code"]}
    });
    let compiler = QueryCompiler::new(&defs).expect("keys are checked lazily");

    assert_eq!(
        compiler
            .query(&json!({"select": "code", "from": "events", "join": "logs"}))
            .unwrap_err(),
        CompileError::MissingJoinKey {
            from: "events".into(),
            to: "logs".into()
        }
    );
    // Queries that never use the join still compile
    assert_eq!(
        compiler
            .query(&json!({"select": "code", "from": "events"}))
            .unwrap()
            .text,
        r#"SELECT "events"."code" FROM "events""#
    );
}

#[test]
fn test_pretty_output() {
    let compiler = QueryCompiler::new(&common::blog_definitions()).unwrap();
    let compiled = compiler
        .query(&json!({
            "select": {"name": "tag", "joinId": "t"},
            "from": "posts",
            "join": {"name": "tags", "id": "t"}
        }))
        .unwrap();

    insta::assert_snapshot!(compiled.formatted, @r#"
    SELECT "Tags"."tag" AS "Tag"
    FROM "posts" AS "Blog Posts"
    INNER JOIN "posts_tags"
      ON ("Blog Posts"."id" = "posts_tags"."post_id")
    INNER JOIN "tags" AS "Tags"
      ON ("posts_tags"."tag_id" = "Tags"."id")
    "#);
}
