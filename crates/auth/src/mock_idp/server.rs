//! Mock IdP server for development and testing.
//!
//! Renders a sign-in form in place of the provider's authorize page and sends
//! the browser back to the callback with a code [`MockProvider`] can exchange.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use launchkit_core::auth::{Identity, OAuthProvider};
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use url::Url;

use super::templates;
use crate::providers::MockProvider;

#[derive(Deserialize)]
struct AuthorizeQuery {
    provider: String,
    redirect_to: String,
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    name: Option<String>,
    provider: String,
    redirect_to: String,
}

/// Mock IdP server that simulates the provider's authorize page.
pub struct MockIdpServer {
    port: u16,
}

impl MockIdpServer {
    /// Create a new Mock IdP server.
    ///
    /// # Arguments
    /// * `port` - The port to listen on (typically 3001)
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Routes served by the mock IdP.
    ///
    /// - `GET /authorize` - Sign-in form
    /// - `POST /authorize/submit` - Form submission handler
    pub fn router() -> Router {
        Router::new()
            .route("/authorize", get(authorize))
            .route("/authorize/submit", post(authorize_submit))
    }

    /// Run the Mock IdP server until the process exits.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        tracing::info!("Mock IdP server listening on http://{}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, Self::router()).await
    }
}

async fn authorize(Query(params): Query<AuthorizeQuery>) -> Response {
    match params.provider.parse::<OAuthProvider>() {
        Ok(provider) => Html(templates::login_page(provider, &params.redirect_to)).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e).into_response(),
    }
}

async fn authorize_submit(Form(form): Form<LoginForm>) -> Response {
    let Ok(mut callback_url) = Url::parse(&form.redirect_to) else {
        return (StatusCode::BAD_REQUEST, "Invalid redirect_to").into_response();
    };

    let mut identity = Identity::new(
        format!("mock-{}-{}", form.provider, form.email),
        form.email,
    );
    if let Some(name) = form.name.filter(|n| !n.trim().is_empty()) {
        identity = identity.with_metadata("full_name", name);
    }

    callback_url
        .query_pairs_mut()
        .append_pair("code", &MockProvider::code_for(&identity));

    Redirect::to(callback_url.as_str()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, http::Request};
    use launchkit_core::auth::IdentityProvider;
    use tower::ServiceExt;

    #[tokio::test]
    async fn authorize_renders_form_for_known_provider() {
        let response = MockIdpServer::router()
            .oneshot(
                Request::builder()
                    .uri("/authorize?provider=github&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn authorize_rejects_unknown_provider() {
        let response = MockIdpServer::router()
            .oneshot(
                Request::builder()
                    .uri("/authorize?provider=myspace&redirect_to=http%3A%2F%2Flocalhost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_redirects_with_exchangeable_code() {
        let response = MockIdpServer::router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/authorize/submit")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "email=a%40x.com&name=Jane&provider=google&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let location = Url::parse(location).unwrap();
        assert_eq!(location.path(), "/auth/callback");

        let code = location
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let provider = MockProvider::new(Url::parse("http://localhost:3001").unwrap());
        let session = provider.exchange_code(&code, None).await.unwrap();

        assert_eq!(session.user.email.as_deref(), Some("a@x.com"));
        assert_eq!(session.user.id, "mock-google-a@x.com");
        assert_eq!(session.user.user_metadata["full_name"], "Jane");
    }
}
