// Dialect strategy — resolved once at construction, then consulted for
// placeholder syntax and identifier quoting. No per-call string comparison.

use auth_store_core::{AdapterError, AdapterResult};

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    Mysql,
    Sqlite,
}

impl Dialect {
    /// Parse the external dialect tag. The set is closed; anything else is a
    /// configuration error, raised before the adapter exists.
    pub fn from_tag(tag: &str) -> AdapterResult<Self> {
        match tag {
            "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "better-sqlite3" => Ok(Self::Sqlite),
            other => Err(AdapterError::Config(format!(
                "unknown dialect tag `{other}` (expected `pg`, `mysql`, or `better-sqlite3`)"
            ))),
        }
    }

    /// The canonical external tag, used in error context and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Postgres => "pg",
            Self::Mysql => "mysql",
            Self::Sqlite => "better-sqlite3",
        }
    }

    /// Positional bind placeholder for 1-based parameter `n`.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Self::Postgres => format!("${n}"),
            Self::Mysql | Self::Sqlite => "?".to_string(),
        }
    }

    /// Quote a table/column identifier. Quote characters are stripped first;
    /// table names were validated at construction and column names are
    /// adapter-owned constants, so this only defends extension-column keys.
    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            Self::Mysql => {
                let clean = name.replace('`', "");
                format!("`{clean}`")
            }
            Self::Postgres | Self::Sqlite => {
                let clean = name.replace('"', "");
                format!("\"{clean}\"")
            }
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
