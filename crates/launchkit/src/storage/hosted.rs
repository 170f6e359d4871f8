//! Hosted user directory behind a PostgREST-style API.
//!
//! Upserts go through `on_conflict=email` with merge-duplicates resolution.
//! The payload never carries `role`, so the column default applies on insert
//! and the stored value survives a conflict.

use async_trait::async_trait;
use reqwest::{header::HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};

use launchkit_core::storage::{RepositoryError, Result, UserRepository};
use launchkit_core::users::{UserRecord, UserUpsert};

const USERS_TABLE: &str = "users";
const SELECT_COLUMNS: &str = "id,email,full_name,role";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

#[derive(Serialize)]
struct UserRow<'a> {
    id: &'a str,
    email: &'a str,
    full_name: Option<&'a str>,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

/// User directory client for a hosted REST database.
pub struct HostedRepository {
    http_client: reqwest::Client,
    table_url: String,
    service_key: String,
}

impl HostedRepository {
    /// * `rest_url` - Base of the REST API, e.g. `https://db.example.com/rest/v1`
    /// * `service_key` - Key sent as both `apikey` and bearer token
    pub fn new(rest_url: &str, service_key: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http_client,
            table_url: format!("{}/{USERS_TABLE}", rest_url.trim_end_matches('/')),
            service_key: service_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, &self.table_url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<UserRecord>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        response
            .json::<Vec<UserRecord>>()
            .await
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }
}

/// Prefer PostgREST's `message` field; fall back to the raw body.
fn error_for_status(status: StatusCode, body: &str) -> RepositoryError {
    let message = serde_json::from_str::<PostgrestError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RepositoryError::ConnectionFailed(format!("{status}: {message}"))
        }
        _ => RepositoryError::QueryFailed(format!("{status}: {message}")),
    }
}

#[async_trait]
impl UserRepository for HostedRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[
                ("email", format!("eq.{email}")),
                ("select", SELECT_COLUMNS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn upsert_user(&self, user: &UserUpsert) -> Result<UserRecord> {
        let response = self
            .request(reqwest::Method::POST)
            .query(&[("on_conflict", "email"), ("select", SELECT_COLUMNS)])
            .header("Prefer", HeaderValue::from_static(UPSERT_PREFER))
            .json(&[UserRow {
                id: &user.id,
                email: &user.email,
                full_name: user.full_name.as_deref(),
            }])
            .send()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::InvalidData("upsert returned no rows".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use launchkit_core::users::UserRole;
    use tokio::net::TcpListener;

    use super::*;

    type Table = Arc<Mutex<HashMap<String, UserRecord>>>;

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("apikey").is_some_and(|v| v == "service-key")
            && headers
                .get("authorization")
                .is_some_and(|v| v == "Bearer service-key")
    }

    async fn select(
        State(table): State<Table>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        if !authorized(&headers) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "Invalid API key" })),
            );
        }
        let email = params
            .get("email")
            .and_then(|v| v.strip_prefix("eq."))
            .unwrap_or_default();
        let rows: Vec<_> = table.lock().unwrap().get(email).cloned().into_iter().collect();
        (StatusCode::OK, Json(serde_json::json!(rows)))
    }

    async fn upsert(
        State(table): State<Table>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
        Json(rows): Json<Vec<serde_json::Value>>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        assert_eq!(params.get("on_conflict").map(String::as_str), Some("email"));
        assert_eq!(headers["prefer"], UPSERT_PREFER);
        assert!(rows[0].get("role").is_none());

        let mut table = table.lock().unwrap();
        let mut out = Vec::new();
        for row in rows {
            let upsert: UserUpsert = serde_json::from_value(row).unwrap();
            let record = table
                .entry(upsert.email.clone())
                .and_modify(|r| r.apply_upsert(&upsert))
                .or_insert_with(|| UserRecord::from_upsert(&upsert));
            out.push(record.clone());
        }
        (StatusCode::CREATED, Json(serde_json::json!(out)))
    }

    async fn serve() -> (String, Table) {
        let table = Table::default();
        let app = Router::new()
            .route("/rest/v1/users", get(select).post(upsert))
            .with_state(table.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/rest/v1/"), table)
    }

    fn upsert_for(id: &str) -> UserUpsert {
        UserUpsert {
            id: id.to_string(),
            email: "a@x.com".to_string(),
            full_name: Some("Jane".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let (rest_url, _) = serve().await;
        let repo = HostedRepository::new(&rest_url, "service-key").unwrap();

        let user = repo.upsert_user(&upsert_for("u1")).await.unwrap();

        assert_eq!(user.role, UserRole::Unsubscribed);
        assert_eq!(
            repo.get_user_by_email("a@x.com").await.unwrap(),
            Some(user)
        );
        assert_eq!(repo.get_user_by_email("b@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_keeps_remote_role() {
        let (rest_url, table) = serve().await;
        let repo = HostedRepository::new(&rest_url, "service-key").unwrap();
        repo.upsert_user(&upsert_for("u1")).await.unwrap();
        table.lock().unwrap().get_mut("a@x.com").unwrap().role = UserRole::Subscribed;

        let user = repo.upsert_user(&upsert_for("u2")).await.unwrap();

        assert_eq!(user.id, "u2");
        assert_eq!(user.role, UserRole::Subscribed);
    }

    #[tokio::test]
    async fn test_rejected_key_surfaces_message() {
        let (rest_url, _) = serve().await;
        let repo = HostedRepository::new(&rest_url, "wrong").unwrap();

        let err = repo.get_user_by_email("a@x.com").await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::ConnectionFailed("401 Unauthorized: Invalid API key".to_string())
        );
    }

    #[test]
    fn test_error_for_status_falls_back_to_body() {
        let err = error_for_status(StatusCode::BAD_REQUEST, "not json");
        assert_eq!(
            err,
            RepositoryError::QueryFailed("400 Bad Request: not json".to_string())
        );
    }
}
