//! CORS headers for every response.
//!
//! An allow-listed or localhost origin is echoed back. Anything else gets the
//! first configured origin, which browsers will then refuse.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};

use crate::server::AppState;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Pick the `Access-Control-Allow-Origin` value for a request.
pub fn resolve_cors_origin(origin: Option<&str>, allowed: &[String]) -> String {
    let Some(first) = allowed.first() else {
        return "*".to_string();
    };
    match origin {
        Some(origin) if is_local(origin) || allowed.iter().any(|p| origin_matches(origin, p)) => {
            origin.to_string()
        }
        _ => first.clone(),
    }
}

fn split_scheme(value: &str) -> (Option<&str>, &str) {
    match value.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, value),
    }
}

/// Host of an origin, without scheme, port or path.
fn host_of(origin: &str) -> &str {
    let (_, rest) = split_scheme(origin);
    let authority = rest.split('/').next().unwrap_or(rest);
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    authority.split(':').next().unwrap_or(authority)
}

fn is_local(origin: &str) -> bool {
    LOCAL_HOSTS.contains(&host_of(origin))
}

fn origin_matches(origin: &str, pattern: &str) -> bool {
    let pattern = pattern.trim();
    if pattern == "*" || pattern == origin {
        return true;
    }

    let (pattern_scheme, pattern_host) = split_scheme(pattern);
    let (origin_scheme, _) = split_scheme(origin);
    if pattern_scheme.is_some() && pattern_scheme != origin_scheme {
        return false;
    }

    let host = host_of(origin);
    if let Some(domain) = pattern_host.strip_prefix("*.") {
        host.len() > domain.len() + 1 && host.ends_with(domain) && host[..host.len() - domain.len()].ends_with('.')
    } else if let Some(domain) = pattern_host.strip_prefix('.') {
        host == domain || host.ends_with(pattern_host)
    } else {
        false
    }
}

/// Middleware adding CORS headers, plus `Max-Age` on preflight answers.
pub async fn cors(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let preflight = request.method() == Method::OPTIONS;

    let mut response = next.run(request).await;

    let allow_origin = resolve_cors_origin(origin.as_deref(), &state.allowed_origins);
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&allow_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    if preflight {
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![
            "https://snapstory.app".into(),
            "*.preview.dev".into(),
            "https://.kids.example".into(),
        ]
    }

    #[test]
    fn echoes_exact_match() {
        assert_eq!(
            resolve_cors_origin(Some("https://snapstory.app"), &allowed()),
            "https://snapstory.app"
        );
    }

    #[test]
    fn wildcard_matches_subdomains_only() {
        let allowed = allowed();
        assert_eq!(
            resolve_cors_origin(Some("https://pr-12.preview.dev"), &allowed),
            "https://pr-12.preview.dev"
        );
        assert_eq!(resolve_cors_origin(Some("https://preview.dev"), &allowed), "https://snapstory.app");
        assert_eq!(resolve_cors_origin(Some("https://evilpreview.dev"), &allowed), "https://snapstory.app");
    }

    #[test]
    fn suffix_matches_apex_and_subdomains_with_scheme() {
        let allowed = allowed();
        assert_eq!(resolve_cors_origin(Some("https://kids.example"), &allowed), "https://kids.example");
        assert_eq!(resolve_cors_origin(Some("https://app.kids.example"), &allowed), "https://app.kids.example");
        assert_eq!(resolve_cors_origin(Some("http://app.kids.example"), &allowed), "https://snapstory.app");
    }

    #[test]
    fn localhost_on_any_port_is_echoed() {
        for origin in ["http://localhost:5173", "http://127.0.0.1:8080", "http://[::1]:3000", "http://localhost"] {
            assert_eq!(resolve_cors_origin(Some(origin), &allowed()), origin);
        }
        assert_eq!(
            resolve_cors_origin(Some("http://localhost.evil.test"), &allowed()),
            "https://snapstory.app"
        );
    }

    #[test]
    fn unknown_or_missing_origin_gets_first_entry() {
        assert_eq!(resolve_cors_origin(Some("https://evil.test"), &allowed()), "https://snapstory.app");
        assert_eq!(resolve_cors_origin(None, &allowed()), "https://snapstory.app");
    }

    #[test]
    fn empty_allow_list_is_open() {
        assert_eq!(resolve_cors_origin(Some("https://evil.test"), &[]), "*");
    }

    #[test]
    fn never_returns_an_unlisted_foreign_origin() {
        let allowed = allowed();
        for origin in ["https://a.test", "null", "https://snapstory.app.evil.test", "ftp://x"] {
            let resolved = resolve_cors_origin(Some(origin), &allowed);
            assert!(resolved == allowed[0] || allowed.iter().any(|p| origin_matches(&resolved, p)));
        }
    }
}
