// Normalized error taxonomy shared by all storage backends.
//
// Three rules govern propagation: absence is `Ok(None)` (never an error),
// recognized constraint failures become `ConstraintViolation`, and anything
// the classifier cannot map is re-surfaced unmodified as `Unrecognized` with
// the dialect attached. Nothing is swallowed and nothing is retried here.

use std::fmt;

use thiserror::Error;

/// Which class of constraint a backend reported as violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Unique or primary-key collision.
    Unique,
    /// Foreign-key reference failure.
    ForeignKey,
    /// Some other constraint (NOT NULL, CHECK, ...).
    Other,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Other => "constraint",
        };
        write!(f, "{s}")
    }
}

/// Normalized storage error, stable across dialects.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A unique or foreign-key constraint failed. Recoverable by the caller
    /// (e.g. "account already exists").
    #[error("{kind} constraint violated")]
    ConstraintViolation {
        kind: ConstraintKind,
        /// Constraint or column name, when the backend exposes one.
        constraint: Option<String>,
    },

    /// The backend raised an error the classifier has no pattern for.
    /// The original error is preserved as the source for diagnosis.
    #[error("unrecognized {dialect} error")]
    Unrecognized {
        dialect: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A stored row could not be decoded into the expected record shape.
    #[error("corrupted row in `{table}`: {message}")]
    Corrupted { table: String, message: String },

    /// Construction-time misconfiguration (bad dialect tag, invalid table
    /// names). Never raised by a storage operation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AdapterError {
    /// True for the recoverable constraint-failure case.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// The violated constraint's name, when known.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::ConstraintViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }
}

/// Result type for all adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_display() {
        let err = AdapterError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            constraint: Some("user.provider_id".into()),
        };
        assert_eq!(err.to_string(), "unique constraint violated");
        assert_eq!(err.constraint(), Some("user.provider_id"));
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn unrecognized_preserves_source() {
        let source = anyhow::anyhow!("connection reset by peer");
        let err = AdapterError::Unrecognized {
            dialect: "pg",
            source,
        };
        assert!(!err.is_constraint_violation());
        assert!(err.constraint().is_none());
        let source = std::error::Error::source(&err).expect("source must survive");
        assert!(source.to_string().contains("connection reset"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(ConstraintKind::Unique.to_string(), "unique");
        assert_eq!(ConstraintKind::ForeignKey.to_string(), "foreign key");
        assert_eq!(ConstraintKind::Other.to_string(), "constraint");
    }
}
