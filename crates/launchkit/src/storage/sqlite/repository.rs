//! SQLite repository implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use launchkit_core::storage::{RepositoryError, Result, UserRepository};
use launchkit_core::users::{UserRecord, UserUpsert};

use super::conversions::row_to_user;
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-backed user directory.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository over an in-memory database.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email_param = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email_param], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn upsert_user(&self, user: &UserUpsert) -> Result<UserRecord> {
        let email = user.email.clone();
        let id = user.id.clone();
        let full_name = user.full_name.clone();

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::UPSERT_USER,
                    rusqlite::params![email, id, full_name],
                    row_to_user,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}
