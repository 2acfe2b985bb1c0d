// auth-store-sqlx — SQLx-backed implementation of the StorageAdapter contract.
//
// One adapter, three dialects (Postgres, MySQL, SQLite) through sqlx's `any`
// driver. The dialect is resolved once at construction into a strategy that
// supplies placeholder syntax, identifier quoting, and the error-pattern
// table used to normalize backend-native failures.

pub mod adapter;
pub mod classify;
pub mod dialect;
pub mod query_builder;

pub use adapter::{AdapterConfig, SqlStoreAdapter};
pub use dialect::Dialect;
