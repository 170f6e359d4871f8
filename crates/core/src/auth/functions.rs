use serde_json::{Map, Value};

use super::SessionToken;

/// Metadata keys checked, in order, when deriving a display name.
const NAME_KEYS: [&str; 2] = ["full_name", "name"];

/// Derive a display name from provider-supplied profile metadata.
///
/// Checks `full_name`, then `name`. Empty or non-string values are skipped;
/// anything else is returned as supplied.
pub fn derive_full_name(metadata: &Map<String, Value>) -> Option<String> {
    NAME_KEYS.iter().find_map(|key| {
        metadata
            .get(*key)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(String::from)
    })
}

/// Extract a session token from an `Authorization` header value.
pub fn parse_bearer_token(header_value: &str) -> Option<SessionToken> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SessionToken::new(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn derive_full_name_prefers_full_name() {
        let meta = metadata(json!({ "full_name": "Jane Doe", "name": "jane" }));
        assert_eq!(derive_full_name(&meta), Some("Jane Doe".to_string()));
    }

    #[test]
    fn derive_full_name_falls_back_to_name() {
        let meta = metadata(json!({ "name": "Jane" }));
        assert_eq!(derive_full_name(&meta), Some("Jane".to_string()));
    }

    #[test]
    fn derive_full_name_skips_empty_full_name() {
        let meta = metadata(json!({ "full_name": "", "name": "Jane" }));
        assert_eq!(derive_full_name(&meta), Some("Jane".to_string()));
    }

    #[test]
    fn derive_full_name_keeps_value_as_supplied() {
        let meta = metadata(json!({ "full_name": "  Jane ", "name": "jane" }));
        assert_eq!(derive_full_name(&meta), Some("  Jane ".to_string()));

        let meta = metadata(json!({ "full_name": " ", "name": "Jane" }));
        assert_eq!(derive_full_name(&meta), Some(" ".to_string()));
    }

    #[test]
    fn derive_full_name_ignores_non_string_values() {
        let meta = metadata(json!({ "full_name": 42 }));
        assert_eq!(derive_full_name(&meta), None);
    }

    #[test]
    fn derive_full_name_returns_none_without_metadata() {
        assert_eq!(derive_full_name(&Map::new()), None);
    }

    #[test]
    fn parse_bearer_token_extracts_token() {
        let token = parse_bearer_token("Bearer abc.def").unwrap();
        assert_eq!(token.as_str(), "abc.def");
    }

    #[test]
    fn parse_bearer_token_rejects_other_schemes() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
    }

    #[test]
    fn parse_bearer_token_rejects_empty_token() {
        assert_eq!(parse_bearer_token("Bearer "), None);
    }
}
