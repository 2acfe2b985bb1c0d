// SQL fragment builder — turns field maps into parameterized statements.
//
// Caller values never appear in the SQL text; they travel as positional
// binds, with placeholder syntax supplied by the dialect. Identifiers are
// quoted through the dialect as well.

use serde_json::{Map, Value};

use crate::dialect::Dialect;

/// A built statement with its bind values in order.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// `INSERT INTO t (a, b) VALUES (?, ?)`.
pub fn build_insert(dialect: Dialect, table: &str, data: &Map<String, Value>) -> SqlFragment {
    let mut columns = Vec::with_capacity(data.len());
    let mut placeholders = Vec::with_capacity(data.len());
    let mut binds = Vec::with_capacity(data.len());

    for (n, (key, value)) in data.iter().enumerate() {
        columns.push(dialect.quote_identifier(key));
        placeholders.push(dialect.placeholder(n + 1));
        binds.push(value.clone());
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    );

    SqlFragment { sql, binds }
}

/// `SELECT * FROM t WHERE key = ?`. One bind, appended by the caller.
pub fn build_select_by(dialect: Dialect, table: &str, key_column: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = {}",
        dialect.quote_identifier(table),
        dialect.quote_identifier(key_column),
        dialect.placeholder(1)
    )
}

/// `DELETE FROM t WHERE key = ?`. One bind, appended by the caller.
pub fn build_delete_by(dialect: Dialect, table: &str, key_column: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_identifier(table),
        dialect.quote_identifier(key_column),
        dialect.placeholder(1)
    )
}

/// `UPDATE t SET a = ?, b = ? WHERE key = ?`. Binds carry the SET values;
/// the key value is the final bind, appended here so positions line up.
pub fn build_update_by(
    dialect: Dialect,
    table: &str,
    data: &Map<String, Value>,
    key_column: &str,
    key: &str,
) -> SqlFragment {
    let mut set_parts = Vec::with_capacity(data.len());
    let mut binds: Vec<Value> = Vec::with_capacity(data.len() + 1);

    for (n, (column, value)) in data.iter().enumerate() {
        set_parts.push(format!(
            "{} = {}",
            dialect.quote_identifier(column),
            dialect.placeholder(n + 1)
        ));
        binds.push(value.clone());
    }

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.quote_identifier(table),
        set_parts.join(", "),
        dialect.quote_identifier(key_column),
        dialect.placeholder(data.len() + 1)
    );
    binds.push(Value::String(key.to_string()));

    SqlFragment { sql, binds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_postgres_placeholders() {
        let data = map(json!({ "id": "u1", "provider_id": "email:a@b.com" }));
        let frag = build_insert(Dialect::Postgres, "user", &data);
        assert_eq!(
            frag.sql,
            "INSERT INTO \"user\" (\"id\", \"provider_id\") VALUES ($1, $2)"
        );
        assert_eq!(frag.binds, vec![json!("u1"), json!("email:a@b.com")]);
    }

    #[test]
    fn insert_mysql_placeholders_and_backticks() {
        let data = map(json!({ "id": "u1", "provider_id": "email:a@b.com" }));
        let frag = build_insert(Dialect::Mysql, "user", &data);
        assert_eq!(
            frag.sql,
            "INSERT INTO `user` (`id`, `provider_id`) VALUES (?, ?)"
        );
        assert_eq!(frag.binds.len(), 2);
    }

    #[test]
    fn insert_preserves_null_values() {
        let data = map(json!({ "hashed_password": null, "id": "u1" }));
        let frag = build_insert(Dialect::Sqlite, "user", &data);
        assert!(frag.binds.contains(&Value::Null));
    }

    #[test]
    fn select_by_key() {
        assert_eq!(
            build_select_by(Dialect::Postgres, "session", "user_id"),
            "SELECT * FROM \"session\" WHERE \"user_id\" = $1"
        );
        assert_eq!(
            build_select_by(Dialect::Sqlite, "session", "id"),
            "SELECT * FROM \"session\" WHERE \"id\" = ?"
        );
    }

    #[test]
    fn delete_by_key() {
        assert_eq!(
            build_delete_by(Dialect::Mysql, "session", "user_id"),
            "DELETE FROM `session` WHERE `user_id` = ?"
        );
    }

    #[test]
    fn update_binds_key_last() {
        let data = map(json!({ "expires": 1000, "idle_expires": 500 }));
        let frag = build_update_by(Dialect::Postgres, "session", &data, "id", "s1");
        assert_eq!(
            frag.sql,
            "UPDATE \"session\" SET \"expires\" = $1, \"idle_expires\" = $2 WHERE \"id\" = $3"
        );
        assert_eq!(frag.binds.len(), 3);
        assert_eq!(frag.binds[2], json!("s1"));
    }

    #[test]
    fn extension_column_names_are_quoted() {
        let data = map(json!({ "user\"name": "alice" }));
        let frag = build_insert(Dialect::Postgres, "user", &data);
        // Quote characters in caller-supplied keys are stripped, not executed.
        assert!(frag.sql.contains("\"username\""));
    }
}
