//! Minimal HTML pages behind and in front of the route guard.

use axum::{extract::State, response::Html};
use launchkit_auth::CurrentIdentity;
use launchkit_core::auth::derive_full_name;
use launchkit_core::users::UserRole;

use crate::handlers::AppError;
use crate::state::AppState;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, sans-serif; max-width: 480px; margin: 80px auto; padding: 0 20px; }}
        a.button, button {{ display: inline-block; padding: 10px 16px; border-radius: 6px; border: 1px solid #ced4da; background: #f8f9fa; color: inherit; text-decoration: none; cursor: pointer; font-size: 16px; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#
    ))
}

/// GET /login
///
/// Signed-in visitors never get here; the route guard sends them on.
pub async fn login_page() -> Html<String> {
    page(
        "Sign in",
        r#"    <h1>Sign in</h1>
    <p><a class="button" href="/auth/login">Continue</a></p>"#,
    )
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Html<String>, AppError> {
    let record = match identity.email.as_deref() {
        Some(email) => state.users.get_user_by_email(email).await?,
        None => None,
    };

    let name = record
        .as_ref()
        .and_then(|r| r.full_name.clone())
        .or_else(|| derive_full_name(&identity.user_metadata))
        .or_else(|| identity.email.clone())
        .unwrap_or_else(|| identity.id.clone());
    let role = record.map(|r| r.role).unwrap_or_default();

    let plan = match role {
        UserRole::Subscribed => "You are subscribed.",
        UserRole::Unsubscribed => "You are not subscribed yet.",
    };

    Ok(page(
        "Dashboard",
        &format!(
            r#"    <h1>Welcome, {name}</h1>
    <p data-role="{role}">{plan}</p>
    <form method="POST" action="/auth/logout">
        <button type="submit">Sign out</button>
    </form>"#,
            name = html_escape(&name),
        ),
    ))
}
