//! HTML for the mock IdP sign-in page.

use launchkit_core::auth::OAuthProvider;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn display_name(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Google => "Google",
        OAuthProvider::Github => "GitHub",
        OAuthProvider::Apple => "Apple",
    }
}

/// Sign-in form standing in for `provider`'s consent screen.
pub fn login_page(provider: OAuthProvider, redirect_to: &str) -> String {
    let provider_name = display_name(provider);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Mock {provider_name} Sign In (DEV ONLY)</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, sans-serif;
            max-width: 400px;
            margin: 100px auto;
            padding: 20px;
        }}
        .warning {{
            background: #fff3cd;
            border: 1px solid #ffc107;
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 20px;
        }}
        label {{ display: block; margin-bottom: 5px; }}
        input {{ width: 100%; padding: 10px; margin-bottom: 15px; box-sizing: border-box; }}
        button {{ width: 100%; padding: 12px; }}
    </style>
</head>
<body>
    <div class="warning">
        <h2>Development Only</h2>
        <p>Any email signs you in as that user via mock {provider_name}.</p>
    </div>

    <form action="/authorize/submit" method="POST">
        <input type="hidden" name="provider" value="{provider}" />
        <input type="hidden" name="redirect_to" value="{redirect_to}" />

        <label for="email">Email Address</label>
        <input type="email" id="email" name="email" placeholder="dev@example.com" required />

        <label for="name">Name (optional)</label>
        <input type="text" id="name" name="name" placeholder="Dev User" />

        <button type="submit">Sign in with {provider_name}</button>
    </form>
</body>
</html>"#,
        redirect_to = html_escape(redirect_to),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_escapes_redirect() {
        let html = login_page(OAuthProvider::Github, "http://x/?a=\"b\"");

        assert!(html.contains("Sign in with GitHub"));
        assert!(html.contains("&quot;b&quot;"));
        assert!(html.contains(r#"name="provider" value="github""#));
    }
}
