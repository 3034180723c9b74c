use sql_query_inspector::{
    aliases::AliasMap,
    query::{SqlDialect, parse_statements}
};

fn aliases_of(sql: &str) -> AliasMap {
    let statements = parse_statements(sql, SqlDialect::Generic).unwrap();
    AliasMap::from_statements(&statements)
}

#[test]
fn test_aliased_tables_collected() {
    let aliases = aliases_of("SELECT * FROM users u JOIN sales.orders o ON o.user_id = u.id");
    assert_eq!(aliases.len(), 2);
    assert_eq!(aliases.resolve("u"), Some("users"));
    assert_eq!(aliases.resolve("o"), Some("sales.orders"));
}

#[test]
fn test_unaliased_tables_not_collected() {
    let aliases = aliases_of("SELECT * FROM users WHERE users.id = 1");
    assert!(aliases.is_empty());
    assert_eq!(aliases.resolve("users"), None);
}

#[test]
fn test_nested_scopes_collected() {
    let aliases = aliases_of(
        "WITH r AS (SELECT * FROM orders o) \
         SELECT * FROM r WHERE r.id IN (SELECT i.order_id FROM items i)"
    );
    assert_eq!(aliases.resolve("o"), Some("orders"));
    assert_eq!(aliases.resolve("i"), Some("items"));
}

#[test]
fn test_later_alias_wins() {
    let aliases = aliases_of("SELECT * FROM a x WHERE EXISTS (SELECT 1 FROM b x)");
    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases.resolve("x"), Some("b"));
}

#[test]
fn test_from_iterator_and_extend() {
    let mut aliases: AliasMap = [("a", "accounts")].into_iter().collect();
    aliases.extend([("a", "archive"), ("c", "customers")]);
    assert_eq!(aliases.len(), 2);
    assert_eq!(aliases.resolve("a"), Some("archive"));
    assert_eq!(aliases.resolve("c"), Some("customers"));
}

#[test]
fn test_serializes_as_plain_map() {
    let aliases: AliasMap = [("u", "users")].into_iter().collect();
    let json = serde_json::to_string(&aliases).unwrap();
    assert_eq!(json, r#"{"u":"users"}"#);
    let decoded: AliasMap = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, aliases);
}
