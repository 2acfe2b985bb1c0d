// auth-store-core — backend-agnostic storage contract for auth persistence.
//
// Defines the record models, the minimal table schema binding, the normalized
// error taxonomy, and the StorageAdapter trait that concrete database
// adapters implement.

pub mod adapter;
pub mod error;
pub mod models;
pub mod schema;

pub use adapter::StorageAdapter;
pub use error::{AdapterError, AdapterResult, ConstraintKind};
pub use models::{SessionRecord, UserRecord};
pub use schema::TableNames;
