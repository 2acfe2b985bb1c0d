// Schema binding — the minimal table/column contract the adapter relies on.
//
// Column names are fixed; physical table names may be remapped by the caller.
// Validation happens once at adapter construction, never per operation.

use crate::error::{AdapterError, AdapterResult};

/// Required columns of the `user` table.
pub mod user_columns {
    pub const ID: &str = "id";
    pub const PROVIDER_ID: &str = "provider_id";
    pub const HASHED_PASSWORD: &str = "hashed_password";

    pub const REQUIRED: &[&str] = &[ID, PROVIDER_ID, HASHED_PASSWORD];
}

/// Required columns of the `session` table.
pub mod session_columns {
    pub const ID: &str = "id";
    pub const USER_ID: &str = "user_id";
    pub const EXPIRES: &str = "expires";
    pub const IDLE_EXPIRES: &str = "idle_expires";

    pub const REQUIRED: &[&str] = &[ID, USER_ID, EXPIRES, IDLE_EXPIRES];
}

/// Physical table names the adapter targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub user: String,
    pub session: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            user: "user".into(),
            session: "session".into(),
        }
    }
}

impl TableNames {
    /// Reject names that cannot be safely quoted as identifiers.
    /// Configuration-time check; storage operations assume it already ran.
    pub fn validate(&self) -> AdapterResult<()> {
        for name in [&self.user, &self.session] {
            if name.is_empty() {
                return Err(AdapterError::Config("table name must not be empty".into()));
            }
            if name.contains(['"', '`']) {
                return Err(AdapterError::Config(format!(
                    "table name `{name}` contains a quote character"
                )));
            }
        }
        Ok(())
    }
}
