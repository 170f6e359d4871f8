//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use launchkit_core::users::{UserRecord, UserRole};
use rusqlite::Row;

/// Convert a SQLite row to a UserRecord.
///
/// Expected columns: id, email, full_name, role
pub fn row_to_user(row: &Row) -> rusqlite::Result<UserRecord> {
    let id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let full_name: Option<String> = row.get(2)?;
    let role: String = row.get(3)?;

    Ok(UserRecord {
        id,
        email,
        full_name,
        role: parse_role(3, &role)?,
    })
}

fn parse_role(column: usize, s: &str) -> rusqlite::Result<UserRole> {
    s.parse::<UserRole>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other(e)),
        )
    })
}
