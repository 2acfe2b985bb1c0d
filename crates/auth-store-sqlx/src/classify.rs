// Dialect error classifier — maps backend-native errors onto the normalized
// taxonomy.
//
// The driver-reported error kind decides the constraint class; a static
// per-dialect code table (error code → constraint kind) backs it up, rather
// than conditionals scattered through the operations. Anything without a
// matching pattern propagates unmodified as `Unrecognized` so the caller can
// log and diagnose the original error.

use auth_store_core::{AdapterError, ConstraintKind};
use sqlx::error::{DatabaseError, ErrorKind};

use crate::dialect::Dialect;

// Postgres reports SQLSTATE codes; class 23 is integrity violation.
const PG_CODES: &[(&str, ConstraintKind)] = &[
    ("23505", ConstraintKind::Unique),
    ("23503", ConstraintKind::ForeignKey),
    ("23502", ConstraintKind::Other),
    ("23514", ConstraintKind::Other),
];

// MySQL's driver reports the SQLSTATE, not the native error number, through
// `DatabaseError::code()` — and 23000 covers duplicate entry and foreign key
// alike. The specific kind comes from `kind()`; this table only catches
// integrity violations the driver left unmapped.
const MYSQL_CODES: &[(&str, ConstraintKind)] = &[
    ("23000", ConstraintKind::Other),
    ("23001", ConstraintKind::Other),
];

// SQLite reports extended result codes; 19 is the bare SQLITE_CONSTRAINT.
const SQLITE_CODES: &[(&str, ConstraintKind)] = &[
    ("1555", ConstraintKind::Unique),
    ("2067", ConstraintKind::Unique),
    ("787", ConstraintKind::ForeignKey),
    ("1299", ConstraintKind::Other),
    ("275", ConstraintKind::Other),
    ("19", ConstraintKind::Other),
];

fn code_table(dialect: Dialect) -> &'static [(&'static str, ConstraintKind)] {
    match dialect {
        Dialect::Postgres => PG_CODES,
        Dialect::Mysql => MYSQL_CODES,
        Dialect::Sqlite => SQLITE_CODES,
    }
}

/// Look up a native error code in the dialect's pattern table.
pub(crate) fn lookup(dialect: Dialect, code: &str) -> Option<ConstraintKind> {
    let table = code_table(dialect);
    if let Some((_, kind)) = table.iter().find(|(c, _)| *c == code) {
        return Some(*kind);
    }
    // Any remaining SQLSTATE in class 23 is still an integrity violation.
    if dialect == Dialect::Postgres && code.starts_with("23") {
        return Some(ConstraintKind::Other);
    }
    None
}

/// Normalize a raw sqlx error for the bound dialect.
///
/// Recognized constraint failures become `ConstraintViolation` with a
/// best-effort constraint name; everything else — connection failures,
/// timeouts, driver bugs — passes through as `Unrecognized` with the
/// original error attached as source.
pub fn classify(dialect: Dialect, err: sqlx::Error) -> AdapterError {
    if let sqlx::Error::Database(db) = &err {
        if let Some(kind) = constraint_kind_of(dialect, db.as_ref()) {
            let constraint = extract_constraint(dialect, db.as_ref());
            return AdapterError::ConstraintViolation { kind, constraint };
        }
    }
    tracing::warn!(dialect = dialect.tag(), error = %err, "unclassified backend error");
    AdapterError::Unrecognized {
        dialect: dialect.tag(),
        source: anyhow::Error::new(err),
    }
}

/// The driver-reported kind is authoritative: each driver derives it from
/// the native error number, so it is uniform through the `any` driver. The
/// code table is the fallback for shapes a driver reports as `Other`.
fn constraint_kind_of(dialect: Dialect, db: &dyn DatabaseError) -> Option<ConstraintKind> {
    match db.kind() {
        ErrorKind::UniqueViolation => return Some(ConstraintKind::Unique),
        ErrorKind::ForeignKeyViolation => return Some(ConstraintKind::ForeignKey),
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            return Some(ConstraintKind::Other)
        }
        _ => {}
    }
    db.code().and_then(|code| lookup(dialect, code.as_ref()))
}

/// Pull the violated constraint's name out of the backend error, when the
/// backend exposes one. Postgres carries it structurally; MySQL and SQLite
/// only embed it in the message text.
fn extract_constraint(dialect: Dialect, db: &dyn DatabaseError) -> Option<String> {
    if let Some(name) = db.constraint() {
        return Some(name.to_string());
    }
    let message = db.message();
    match dialect {
        Dialect::Postgres => None,
        Dialect::Mysql => mysql_constraint_from_message(message),
        Dialect::Sqlite => sqlite_constraint_from_message(message),
    }
}

/// MySQL shapes: `Duplicate entry 'x' for key 'user.provider_id'` and
/// `... CONSTRAINT `session_ibfk_1` FOREIGN KEY ...`.
fn mysql_constraint_from_message(message: &str) -> Option<String> {
    if let Some(rest) = message.split("for key '").nth(1) {
        return rest.split('\'').next().map(str::to_string);
    }
    if let Some(rest) = message.split("CONSTRAINT `").nth(1) {
        return rest.split('`').next().map(str::to_string);
    }
    None
}

/// SQLite shape: `UNIQUE constraint failed: user.provider_id`. The plain
/// `FOREIGN KEY constraint failed` names nothing.
fn sqlite_constraint_from_message(message: &str) -> Option<String> {
    let rest = message.split("constraint failed: ").nth(1)?;
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
