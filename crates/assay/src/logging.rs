//! Request and response logging through `tracing`.
//!
//! The library never installs a subscriber on its own. Test binaries that want to
//! see the output call [`init_tracing`] once (it is safe to call repeatedly).
//!
//! Every rendered line (request line, each header, each body line) is a separate
//! event, so each one carries the span context of the caller.

use std::fmt::Write as _;

use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use tracing::{info, warn};

use crate::config::{LogConfig, RequestLogLevel, ResponseLogLevel};
use crate::response::Response;

const MASK: &str = "*****";

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        // Another subscriber may already be installed by the host test harness.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub(crate) fn log_request(level: RequestLogLevel, request: &reqwest::Request, config: &LogConfig) {
    if !level.is_enabled() {
        return;
    }

    let mut out = format!("Request: {} {}", request.method(), request.url());
    if level.logs_headers() {
        write_headers(&mut out, request.headers(), config);
    }
    if level.logs_body() {
        if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
            let body = String::from_utf8_lossy(body);
            out.push('\n');
            out.push_str(&pretty_body(&body));
        }
    }
    emit_info(&out);
}

/// Log `response` as requested by `level`. `OnError` only logs 4xx/5xx
/// responses; `OnVerificationFailure` is handled by [`log_verification_failure`].
pub(crate) fn log_response(level: ResponseLogLevel, response: &Response, config: &LogConfig) {
    match level {
        ResponseLogLevel::None | ResponseLogLevel::OnVerificationFailure => {}
        ResponseLogLevel::OnError if !response.is_error() => {}
        _ => emit_info(&render_response(level, response, config)),
    }
}

pub(crate) fn log_verification_failure(message: &str, response: &Response, config: &LogConfig) {
    for line in message.lines() {
        warn!("Verification failed: {}", line);
    }
    for line in render_response(ResponseLogLevel::All, response, config).lines() {
        warn!("{}", line);
    }
}

fn emit_info(rendered: &str) {
    for line in rendered.lines() {
        info!("{}", line);
    }
}

fn render_response(level: ResponseLogLevel, response: &Response, config: &LogConfig) -> String {
    let status = response.status_code();
    let mut out = format!(
        "Response: HTTP {} ({})",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    if level.logs_headers() {
        write_headers(&mut out, response.headers(), config);
    }
    if level.logs_response_time() {
        let _ = write!(out, "\nResponse time: {} ms", response.elapsed().as_millis());
    }
    if level.logs_body() && !response.text().is_empty() {
        out.push('\n');
        out.push_str(&pretty_body(response.text()));
    }
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap, config: &LogConfig) {
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>");
        let shown = if config.is_sensitive_header(name.as_str()) {
            MASK.to_string()
        } else if *name == COOKIE || *name == SET_COOKIE {
            mask_cookies(value, config)
        } else {
            value.to_string()
        };
        let _ = write!(out, "\n{}: {}", name, shown);
    }
}

/// Mask the values of sensitive cookies in a `Cookie` or `Set-Cookie` value.
fn mask_cookies(header_value: &str, config: &LogConfig) -> String {
    header_value
        .split(';')
        .map(|part| match part.split_once('=') {
            Some((name, _)) if config.is_sensitive_cookie(name.trim()) => {
                format!("{}={}", name, MASK)
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// JSON bodies are pretty-printed; everything else is logged as received.
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use std::time::Duration;
    use tracing_test::traced_test;

    fn config() -> LogConfig {
        LogConfig {
            sensitive_cookies: vec!["session".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_mask_cookies() {
        assert_eq!(
            mask_cookies("session=abc; theme=dark", &config()),
            "session=*****; theme=dark"
        );
        assert_eq!(
            mask_cookies("session=abc; Path=/; HttpOnly", &config()),
            "session=*****; Path=/; HttpOnly"
        );
        assert_eq!(mask_cookies("theme=dark", &config()), "theme=dark");
    }

    #[test]
    fn test_render_response_levels() {
        let response = Response::builder()
            .status(404)
            .header("Content-Type", "application/json")
            .header("Authorization", "Bearer secret")
            .header("Set-Cookie", "session=abc; HttpOnly")
            .body(r#"{"error":"not found"}"#)
            .elapsed(Duration::from_millis(12))
            .build();

        let headers = render_response(ResponseLogLevel::Headers, &response, &config());
        assert!(headers.starts_with("Response: HTTP 404 (Not Found)"));
        assert!(headers.contains("content-type: application/json"));
        assert!(headers.contains("authorization: *****"));
        assert!(headers.contains("set-cookie: session=*****; HttpOnly"));
        assert!(!headers.contains("not found\""));

        let time = render_response(ResponseLogLevel::ResponseTime, &response, &config());
        assert!(time.contains("Response time: 12 ms"));
        assert!(!time.contains("content-type"));

        let all = render_response(ResponseLogLevel::All, &response, &config());
        assert!(all.contains("\"error\": \"not found\""));
    }

    #[test]
    fn test_pretty_body_leaves_non_json_alone() {
        assert_eq!(pretty_body("<a>1</a>"), "<a>1</a>");
        assert_eq!(pretty_body(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
    }

    #[test]
    #[traced_test]
    fn test_every_line_is_logged_in_caller_span() {
        let response = Response::builder()
            .status(500)
            .header("Content-Type", "application/json")
            .header("Set-Cookie", "session=abc; HttpOnly")
            .body(r#"{"error":"boom"}"#)
            .build();

        log_response(ResponseLogLevel::OnError, &response, &config());
        assert!(logs_contain("Response: HTTP 500 (Internal Server Error)"));
        assert!(logs_contain("content-type: application/json"));
        assert!(logs_contain("set-cookie: session=*****; HttpOnly"));
        assert!(logs_contain("\"error\": \"boom\""));

        log_verification_failure("Expected status code 200 but was 500", &response, &config());
        assert!(logs_contain("Verification failed: Expected status code 200 but was 500"));
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
