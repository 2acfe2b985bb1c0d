// SqlStoreAdapter — the facade implementing the core StorageAdapter trait
// over sqlx::Any (Postgres, MySQL, SQLite through one runtime-polymorphic
// pool).
//
// The dialect is bound once at construction; every failure from the pool is
// piped through the classifier for that dialect. Timestamp columns are
// normalized to canonical i64 at the read boundary, since some drivers hand
// large integers back as numeric-or-string hybrids.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Column, Row};

use auth_store_core::adapter::{FieldMap, StorageAdapter};
use auth_store_core::schema::{session_columns, user_columns};
use auth_store_core::{AdapterError, AdapterResult, SessionRecord, TableNames, UserRecord};

use crate::classify::classify;
use crate::dialect::Dialect;
use crate::query_builder;

/// Construction-time options for the facade.
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    /// Physical table names; defaults to `user` / `session`.
    pub tables: TableNames,
    /// Emit a `tracing` debug line per operation.
    pub debug_logs: bool,
}

/// SQLx-backed storage adapter bound to one dialect.
///
/// Stateless between calls; safe to clone and share across concurrent
/// requests, since all state lives in the external store.
#[derive(Debug, Clone)]
pub struct SqlStoreAdapter {
    pool: AnyPool,
    dialect: Dialect,
    tables: TableNames,
    debug_logs: bool,
}

impl SqlStoreAdapter {
    /// Bind an existing pool to a dialect. Table names are validated here;
    /// storage operations assume the configuration is sound.
    pub fn new(pool: AnyPool, dialect: Dialect, config: AdapterConfig) -> AdapterResult<Self> {
        config.tables.validate()?;
        Ok(Self {
            pool,
            dialect,
            tables: config.tables,
            debug_logs: config.debug_logs,
        })
    }

    /// As [`new`](Self::new), resolving the dialect from its external tag
    /// (`pg` | `mysql` | `better-sqlite3`).
    pub fn from_tag(pool: AnyPool, tag: &str, config: AdapterConfig) -> AdapterResult<Self> {
        Self::new(pool, Dialect::from_tag(tag)?, config)
    }

    /// Connect to a database URL and bind the dialect.
    pub async fn connect(
        url: &str,
        dialect: Dialect,
        config: AdapterConfig,
    ) -> AdapterResult<Self> {
        sqlx::any::install_default_drivers();

        // SQLite in-memory databases get one database per connection; pin the
        // pool to a single connection so all calls see the same store.
        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            sqlx::any::AnyPoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
        } else {
            AnyPool::connect(url).await
        }
        .map_err(|e| classify(dialect, e))?;

        Self::new(pool, dialect, config)
    }

    /// The bound dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    fn debug(&self, op: &str, table: &str, key: &str) {
        if self.debug_logs {
            tracing::debug!(dialect = %self.dialect, table, key, "{op}");
        }
    }

    async fn fetch_optional(
        &self,
        sql: &str,
        binds: &[Value],
    ) -> AdapterResult<Option<AnyRow>> {
        bind_all(sqlx::query(sql), binds)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(self.dialect, e))
    }

    async fn fetch_all(&self, sql: &str, binds: &[Value]) -> AdapterResult<Vec<AnyRow>> {
        bind_all(sqlx::query(sql), binds)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(self.dialect, e))
    }

    async fn execute(&self, sql: &str, binds: &[Value]) -> AdapterResult<u64> {
        bind_all(sqlx::query(sql), binds)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| classify(self.dialect, e))
    }

    async fn select_one(
        &self,
        table: &str,
        key_column: &str,
        key: &str,
    ) -> AdapterResult<Option<Value>> {
        let sql = query_builder::build_select_by(self.dialect, table, key_column);
        let row = self
            .fetch_optional(&sql, &[Value::String(key.to_string())])
            .await?;
        Ok(row.as_ref().map(row_to_json))
    }

    fn decode_user(&self, value: Value) -> AdapterResult<UserRecord> {
        serde_json::from_value(value).map_err(|e| AdapterError::Corrupted {
            table: self.tables.user.clone(),
            message: e.to_string(),
        })
    }

    fn decode_session(&self, mut value: Value) -> AdapterResult<SessionRecord> {
        for column in [session_columns::EXPIRES, session_columns::IDLE_EXPIRES] {
            normalize_timestamp(&mut value, column).map_err(|message| {
                AdapterError::Corrupted {
                    table: self.tables.session.clone(),
                    message,
                }
            })?;
        }
        serde_json::from_value(value).map_err(|e| AdapterError::Corrupted {
            table: self.tables.session.clone(),
            message: e.to_string(),
        })
    }
}

/// Typed bind value; sqlx binds need owned, concretely-typed arguments.
enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Null,
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>>,
    binds: &[Value],
) -> sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>> {
    for value in binds {
        let bv = match value {
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    BindValue::Float(f)
                } else {
                    BindValue::Text(n.to_string())
                }
            }
            Value::Bool(b) => BindValue::Int(i64::from(*b)),
            Value::Null => BindValue::Null,
            other => BindValue::Text(other.to_string()),
        };
        query = match bv {
            BindValue::Text(s) => query.bind(s),
            BindValue::Int(i) => query.bind(i),
            BindValue::Float(f) => query.bind(f),
            BindValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

/// Read every column of a row into a JSON object, trying the narrow types in
/// priority order. NULL and unsupported types come out as JSON null.
fn row_to_json(row: &AnyRow) -> Value {
    let mut map = serde_json::Map::new();

    for col in row.columns() {
        let name = col.name();
        let value: Value = if let Ok(v) = row.try_get::<String, _>(name) {
            Value::String(v)
        } else if let Ok(v) = row.try_get::<i64, _>(name) {
            Value::Number(v.into())
        } else if let Ok(v) = row.try_get::<i32, _>(name) {
            Value::Number(v.into())
        } else if let Ok(v) = row.try_get::<f64, _>(name) {
            serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        } else if let Ok(v) = row.try_get::<bool, _>(name) {
            Value::Bool(v)
        } else {
            Value::Null
        };

        map.insert(name.to_string(), value);
    }

    Value::Object(map)
}

/// Coerce one timestamp cell to canonical i64 in place. Accepts a native
/// integer or a numeric string (string/bigint hybrid drivers); anything else
/// fails with a column-naming message.
fn normalize_timestamp(value: &mut Value, column: &str) -> Result<(), String> {
    let Some(obj) = value.as_object_mut() else {
        return Err("row is not an object".to_string());
    };
    let Some(cell) = obj.get_mut(column) else {
        return Err(format!("missing timestamp column `{column}`"));
    };
    let normalized: i64 = match &*cell {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("non-integral timestamp in `{column}`: {n}"))?,
        Value::String(s) => s
            .parse()
            .map_err(|_| format!("non-numeric timestamp in `{column}`: {s:?}"))?,
        other => {
            return Err(format!("unexpected timestamp value in `{column}`: {other}"));
        }
    };
    *cell = Value::Number(normalized.into());
    Ok(())
}

/// A record that fails to serialize to a JSON object cannot produce a valid
/// INSERT; surface that as a decode-class error rather than letting an empty
/// column list reach the backend.
fn record_fields(table: &str, value: serde_json::Result<Value>) -> AdapterResult<FieldMap> {
    match value {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AdapterError::Corrupted {
            table: table.to_string(),
            message: format!("record serialized to a non-object value: {other}"),
        }),
        Err(e) => Err(AdapterError::Corrupted {
            table: table.to_string(),
            message: e.to_string(),
        }),
    }
}

#[async_trait]
impl StorageAdapter for SqlStoreAdapter {
    async fn get_user(&self, id: &str) -> AdapterResult<Option<UserRecord>> {
        self.debug("get_user", &self.tables.user, id);
        let row = self
            .select_one(&self.tables.user, user_columns::ID, id)
            .await?;
        row.map(|v| self.decode_user(v)).transpose()
    }

    async fn get_user_by_provider_id(
        &self,
        provider_id: &str,
    ) -> AdapterResult<Option<UserRecord>> {
        self.debug("get_user_by_provider_id", &self.tables.user, provider_id);
        let row = self
            .select_one(&self.tables.user, user_columns::PROVIDER_ID, provider_id)
            .await?;
        row.map(|v| self.decode_user(v)).transpose()
    }

    async fn create_user(&self, user: UserRecord) -> AdapterResult<UserRecord> {
        self.debug("create_user", &self.tables.user, &user.id);
        let data = record_fields(&self.tables.user, serde_json::to_value(&user))?;
        let frag = query_builder::build_insert(self.dialect, &self.tables.user, &data);
        self.execute(&frag.sql, &frag.binds).await?;

        // Select the row back so backend-applied defaults are reflected.
        match self
            .select_one(&self.tables.user, user_columns::ID, &user.id)
            .await?
        {
            Some(row) => self.decode_user(row),
            None => Ok(user),
        }
    }

    async fn update_user(&self, id: &str, fields: FieldMap) -> AdapterResult<u64> {
        self.debug("update_user", &self.tables.user, id);
        if fields.is_empty() {
            return Ok(0);
        }
        let frag = query_builder::build_update_by(
            self.dialect,
            &self.tables.user,
            &fields,
            user_columns::ID,
            id,
        );
        self.execute(&frag.sql, &frag.binds).await
    }

    async fn delete_user(&self, id: &str) -> AdapterResult<u64> {
        self.debug("delete_user", &self.tables.user, id);
        let sql = query_builder::build_delete_by(self.dialect, &self.tables.user, user_columns::ID);
        self.execute(&sql, &[Value::String(id.to_string())]).await
    }

    async fn get_session(&self, id: &str) -> AdapterResult<Option<SessionRecord>> {
        self.debug("get_session", &self.tables.session, id);
        let row = self
            .select_one(&self.tables.session, session_columns::ID, id)
            .await?;
        row.map(|v| self.decode_session(v)).transpose()
    }

    async fn get_sessions_by_user_id(
        &self,
        user_id: &str,
    ) -> AdapterResult<Vec<SessionRecord>> {
        self.debug("get_sessions_by_user_id", &self.tables.session, user_id);
        let sql = query_builder::build_select_by(
            self.dialect,
            &self.tables.session,
            session_columns::USER_ID,
        );
        let rows = self
            .fetch_all(&sql, &[Value::String(user_id.to_string())])
            .await?;
        rows.iter()
            .map(|row| self.decode_session(row_to_json(row)))
            .collect()
    }

    async fn create_session(&self, session: SessionRecord) -> AdapterResult<SessionRecord> {
        self.debug("create_session", &self.tables.session, &session.id);
        let data = record_fields(&self.tables.session, serde_json::to_value(&session))?;
        let frag = query_builder::build_insert(self.dialect, &self.tables.session, &data);
        self.execute(&frag.sql, &frag.binds).await?;

        match self
            .select_one(&self.tables.session, session_columns::ID, &session.id)
            .await?
        {
            Some(row) => self.decode_session(row),
            None => Ok(session),
        }
    }

    async fn update_session(&self, id: &str, fields: FieldMap) -> AdapterResult<u64> {
        self.debug("update_session", &self.tables.session, id);
        if fields.is_empty() {
            return Ok(0);
        }
        let frag = query_builder::build_update_by(
            self.dialect,
            &self.tables.session,
            &fields,
            session_columns::ID,
            id,
        );
        self.execute(&frag.sql, &frag.binds).await
    }

    async fn delete_session(&self, id: &str) -> AdapterResult<u64> {
        self.debug("delete_session", &self.tables.session, id);
        let sql = query_builder::build_delete_by(
            self.dialect,
            &self.tables.session,
            session_columns::ID,
        );
        self.execute(&sql, &[Value::String(id.to_string())]).await
    }

    async fn delete_sessions_by_user_id(&self, user_id: &str) -> AdapterResult<u64> {
        self.debug("delete_sessions_by_user_id", &self.tables.session, user_id);
        let sql = query_builder::build_delete_by(
            self.dialect,
            &self.tables.session,
            session_columns::USER_ID,
        );
        self.execute(&sql, &[Value::String(user_id.to_string())])
            .await
    }
}
