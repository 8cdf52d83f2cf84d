//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: size check, route matching,
//! dispatch, common headers and access logging.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::{clean, correct};
use crate::config::{AppState, Fallback, RoutesConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};

pub const CORRECT_PATH: &str = "/correct";
pub const CLEAN_PATH: &str = "/clean";
pub const CLEAN_BATCH_PATH: &str = "/clean/batch";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state.config.logging.access_log.then(|| access_entry(&req, peer_addr));

    let (parts, body) = req.into_parts();
    let http_config = &state.config.http;

    let mut response = match check_body_size(&parts.headers, http_config.max_body_size) {
        Some(resp) => resp,
        None => route(&parts.method, parts.uri.path(), body, &state).await,
    };
    http::apply_common_headers(
        &mut response,
        &http_config.server_name,
        http_config.enable_cors,
    );

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Match `path` and `method` to an endpoint and produce its response
pub async fn route<B>(
    method: &Method,
    path: &str,
    body: B,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;
    let routes = &state.config.routes;
    let limit = usize::try_from(http_config.max_body_size).unwrap_or(usize::MAX);

    if *method == Method::OPTIONS && http_config.enable_cors {
        return http::build_options_response();
    }

    if routes.health.enabled
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return http::build_health_response("ok");
    }

    let result = match path {
        CORRECT_PATH => correct::handle(body, state, limit).await,
        CLEAN_PATH if *method == Method::POST => {
            clean::handle(body, state.config.clean.profile, limit).await
        }
        CLEAN_BATCH_PATH if *method == Method::POST => {
            clean::handle_batch(body, state.config.clean.profile, limit).await
        }
        CLEAN_PATH | CLEAN_BATCH_PATH => return http::build_404_response(),
        _ => return fallback_response(routes),
    };

    result.unwrap_or_else(|err| {
        logger::log_rejected_request(path, &err);
        err.into_response()
    })
}

/// Response for paths no endpoint claims
fn fallback_response(routes: &RoutesConfig) -> Response<Full<Bytes>> {
    match routes.fallback {
        Fallback::Banner => http::build_text_response(StatusCode::OK, routes.banner.clone()),
        Fallback::NotFound => http::build_404_response(),
    }
}

/// Reject early when Content-Length already exceeds the limit
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::CleanProfile;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state(configure: impl FnOnce(&mut Config)) -> AppState {
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        configure(&mut config);
        AppState::new(&config).unwrap()
    }

    fn body(s: &str) -> Full<Bytes> {
        Full::new(Bytes::from(s.to_string()))
    }

    async fn call(
        state: &AppState,
        method: Method,
        path: &str,
        payload: &str,
    ) -> (StatusCode, String) {
        let response = route(&method, path, body(payload), state).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_correct_literal_scenario() {
        let state = test_state(|_| {});
        let (status, body) = call(
            &state,
            Method::POST,
            "/correct",
            r#"{"name":"imndfia","type":"country"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"original":"imndfia","corrected":"India","type":"country","confidence":0.99}"#
        );
    }

    #[tokio::test]
    async fn test_correct_every_builtin_alias() {
        let state = test_state(|_| {});
        let cases = [
            ("country", "IMNDFIA", "India"),
            ("country", "untied states", "United States"),
            ("CITY", "Punee", "Pune"),
            ("city", "nyork", "New York"),
            ("Name", "johhn", "John"),
            ("name", "kali", "Kylie"),
        ];
        for (category, name, expected) in cases {
            let payload = serde_json::json!({"name": name, "type": category}).to_string();
            let (status, body) = call(&state, Method::POST, "/correct", &payload).await;
            assert_eq!(status, StatusCode::OK);
            let body = json(&body);
            assert_eq!(body["original"], name);
            assert_eq!(body["corrected"], expected);
            assert_eq!(body["type"], category);
            assert_eq!(body["confidence"], 0.99);
        }
    }

    #[tokio::test]
    async fn test_correct_unknown_name_keeps_case() {
        let state = test_state(|_| {});
        let (status, body) = call(
            &state,
            Method::POST,
            "/correct",
            r#"{"name":"Atlantis","type":"country"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["corrected"], "Atlantis");
        assert_eq!(body["confidence"], 0.85);
    }

    #[tokio::test]
    async fn test_correct_without_type() {
        let state = test_state(|_| {});
        let (status, body) = call(&state, Method::POST, "/correct", r#"{"name":"imndfia"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"original":"imndfia","corrected":"imndfia","confidence":0.85}"#
        );

        let (_, body) = call(
            &state,
            Method::POST,
            "/correct",
            r#"{"name":"imndfia","type":"planet"}"#,
        )
        .await;
        assert_eq!(json(&body)["corrected"], "imndfia");
        assert_eq!(json(&body)["type"], "planet");
    }

    #[tokio::test]
    async fn test_correct_method_unchecked() {
        let state = test_state(|_| {});
        let payload = r#"{"name":"punee","type":"city"}"#;
        let (status, body) = call(&state, Method::PUT, "/correct", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["corrected"], "Pune");
    }

    #[tokio::test]
    async fn test_missing_or_invalid_name_is_rejected() {
        let state = test_state(|_| {});
        for path in ["/correct", "/clean"] {
            for payload in ["{}", r#"{"name":null}"#, r#"{"name":7}"#, "not json", ""] {
                let (status, body) = call(&state, Method::POST, path, payload).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {payload:?}");
                assert_eq!(json(&body), serde_json::json!({"error": "Invalid request format"}));
            }
        }
    }

    #[tokio::test]
    async fn test_clean_letters_only() {
        let state = test_state(|_| {});
        let (status, body) = call(&state, Method::POST, "/clean", r#"{"name":"mary-ann_99"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"cleaned_name":"Maryann"}"#);
    }

    #[tokio::test]
    async fn test_clean_strip_digits_punctuation() {
        let state = test_state(|c| c.clean.profile = CleanProfile::StripDigitsPunctuation);
        let (status, body) = call(&state, Method::POST, "/clean", r#"{"name":"mary-ann_99"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["cleaned_name"], "Mary-ann_");
    }

    #[tokio::test]
    async fn test_clean_is_idempotent_over_http() {
        let state = test_state(|_| {});
        let (_, first) = call(&state, Method::POST, "/clean", r#"{"name":"  j0hn!! DOE  "}"#).await;
        let cleaned = json(&first)["cleaned_name"].as_str().unwrap().to_string();
        assert_eq!(cleaned, "Jhn Doe");

        let payload = serde_json::json!({ "name": cleaned }).to_string();
        let (_, second) = call(&state, Method::POST, "/clean", &payload).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_clean_requires_post() {
        let state = test_state(|_| {});
        for path in ["/clean", "/clean/batch"] {
            let (status, body) = call(&state, Method::GET, path, "").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, "Not found");
        }
    }

    #[tokio::test]
    async fn test_clean_batch_dedupes() {
        let state = test_state(|_| {});
        let payload = r#"{"names":["  john  DOE","j0hn doe","mary-ann_99","John Doe","maryann"]}"#;
        let (status, body) = call(&state, Method::POST, "/clean/batch", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"cleaned":["John Doe","Jhn Doe","Maryann"],"cleaned_rows":3}"#);
    }

    #[tokio::test]
    async fn test_clean_batch_uses_profile() {
        let state = test_state(|c| c.clean.profile = CleanProfile::StripDigitsPunctuation);
        let payload = r#"{"names":["mary-ann_99","Mary-Ann_","ßen"]}"#;
        let (status, body) = call(&state, Method::POST, "/clean/batch", payload).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["cleaned"], serde_json::json!(["Mary-ann_", "Ssen"]));
        assert_eq!(body["cleaned_rows"], 2);
    }

    #[tokio::test]
    async fn test_clean_batch_rejects_bad_input() {
        let state = test_state(|_| {});
        for payload in ["{}", r#"{"names":"ann"}"#, r#"{"names":["ann",7]}"#, ""] {
            let (status, body) = call(&state, Method::POST, "/clean/batch", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload:?}");
            assert_eq!(json(&body), serde_json::json!({"error": "Invalid request format"}));
        }

        let (status, body) = call(&state, Method::POST, "/clean/batch", r#"{"names":[]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"cleaned":[],"cleaned_rows":0}"#);
    }

    #[tokio::test]
    async fn test_fallback_banner_and_not_found() {
        let state = test_state(|_| {});
        let (status, body) = call(&state, Method::GET, "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "AI Correction API running ✅");

        let state = test_state(|c| c.routes.fallback = Fallback::NotFound);
        let (status, body) = call(&state, Method::POST, "/elsewhere", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn test_health_probes() {
        let state = test_state(|_| {});
        let (status, body) = call(&state, Method::GET, "/healthz", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["status"], "ok");

        let state = test_state(|c| c.routes.health.enabled = false);
        let (status, _) = call(&state, Method::GET, "/readyz", "").await;
        assert_eq!(status, StatusCode::OK); // falls through to the banner
    }

    #[tokio::test]
    async fn test_options_only_with_cors() {
        let state = test_state(|c| c.http.enable_cors = true);
        let response = route(&Method::OPTIONS, "/correct", body(""), &state).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let state = test_state(|_| {});
        let response = route(&Method::OPTIONS, "/correct", body(""), &state).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let state = test_state(|c| c.http.max_body_size = 16);
        let (status, _) = call(
            &state,
            Method::POST,
            "/clean",
            r#"{"name":"a name longer than sixteen bytes"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_content_length_precheck() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, "1024".parse().unwrap());
        assert!(check_body_size(&headers, 100).is_some());
        assert!(check_body_size(&headers, 4096).is_none());

        headers.insert(CONTENT_LENGTH, "abc".parse().unwrap());
        assert!(check_body_size(&headers, 100).is_none());
    }

    #[tokio::test]
    async fn test_handle_request_sets_server_header() {
        let state = Arc::new(test_state(|c| c.logging.access_log = false));
        let req = Request::builder()
            .method(Method::POST)
            .uri("/correct")
            .body(body(r#"{"name":"nyork","type":"city"}"#))
            .unwrap();
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();

        let response = handle_request(req, state, peer).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[hyper::header::SERVER], "name-normalizer/0.1");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/clean?trace=1")
            .header(USER_AGENT, "curl/8.5")
            .body(())
            .unwrap();
        let entry = access_entry(&req, "10.1.2.3:4000".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.1.2.3");
        assert_eq!(entry.path, "/clean");
        assert_eq!(entry.query.as_deref(), Some("trace=1"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5"));
        assert!(entry.referer.is_none());
    }
}
