// StorageAdapter trait — the CRUD contract every database backend implements.
//
// Each method is one logical storage operation, a single parameterized
// statement against the backend. The adapter holds no state between calls;
// the backing store is the sole source of truth, so one instance may be
// shared across concurrent requests.

use std::fmt;

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::models::{SessionRecord, UserRecord};

/// Partial-update field map: column name to new value. Extension columns
/// pass through verbatim.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait StorageAdapter: Send + Sync + fmt::Debug {
    /// Fetch a user by id. Absence is `Ok(None)`, not an error.
    async fn get_user(&self, id: &str) -> AdapterResult<Option<UserRecord>>;

    /// Fetch a user by its unique provider id.
    async fn get_user_by_provider_id(
        &self,
        provider_id: &str,
    ) -> AdapterResult<Option<UserRecord>>;

    /// Insert a user row. Fails with `ConstraintViolation` when `id` or
    /// `provider_id` collides.
    async fn create_user(&self, user: UserRecord) -> AdapterResult<UserRecord>;

    /// Partial update. Returns the number of affected rows; zero means the
    /// id did not match (not an error — callers check the count).
    async fn update_user(&self, id: &str, fields: FieldMap) -> AdapterResult<u64>;

    /// Delete by id; zero-match completes without error. Whether sessions of
    /// the user go with it is the schema's `ON DELETE` decision, not adapter
    /// logic.
    async fn delete_user(&self, id: &str) -> AdapterResult<u64>;

    /// Fetch a session by id.
    async fn get_session(&self, id: &str) -> AdapterResult<Option<SessionRecord>>;

    /// All sessions referencing the user. Order is not significant.
    async fn get_sessions_by_user_id(
        &self,
        user_id: &str,
    ) -> AdapterResult<Vec<SessionRecord>>;

    /// Insert a session row. Fails with `ConstraintViolation` when `id`
    /// collides or `user_id` references no existing user.
    async fn create_session(&self, session: SessionRecord) -> AdapterResult<SessionRecord>;

    /// Partial update of `expires`/`idle_expires`. Same affected-rows
    /// contract as `update_user`.
    async fn update_session(&self, id: &str, fields: FieldMap) -> AdapterResult<u64>;

    /// Delete by id; zero-match completes without error.
    async fn delete_session(&self, id: &str) -> AdapterResult<u64>;

    /// Delete every session of a user; returns the number removed.
    async fn delete_sessions_by_user_id(&self, user_id: &str) -> AdapterResult<u64>;
}
