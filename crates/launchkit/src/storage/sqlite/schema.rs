//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- User directory, one row per email
CREATE TABLE IF NOT EXISTS users (
    email TEXT PRIMARY KEY,
    id TEXT NOT NULL,
    full_name TEXT,
    role TEXT NOT NULL DEFAULT 'unsubscribed',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_users_id ON users(id);
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, email, full_name, role
FROM users
WHERE email = ?1
"#;

/// Insert, or overwrite `id` and `full_name` of the row with this email.
/// `role` is only ever written by the column default.
pub const UPSERT_USER: &str = r#"
INSERT INTO users (email, id, full_name)
VALUES (?1, ?2, ?3)
ON CONFLICT(email) DO UPDATE
SET id = excluded.id, full_name = excluded.full_name, updated_at = CURRENT_TIMESTAMP
RETURNING id, email, full_name, role
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(CREATE_TABLES.contains("email TEXT PRIMARY KEY"));
    }

    #[test]
    fn test_upsert_never_sets_role() {
        let update_clause = UPSERT_USER.split("DO UPDATE").nth(1).unwrap();
        let set_clause = update_clause.split("RETURNING").next().unwrap();

        assert!(UPSERT_USER.contains("ON CONFLICT(email)"));
        assert!(!set_clause.contains("role"));
    }
}
