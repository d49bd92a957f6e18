//! Request/response logging levels and masking configuration.

use serde::{Deserialize, Serialize};

/// How much of an outgoing request is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestLogLevel {
    #[default]
    None,
    /// Method and URL only
    Endpoint,
    Headers,
    Body,
    All,
}

impl RequestLogLevel {
    pub fn is_enabled(self) -> bool {
        self != RequestLogLevel::None
    }

    pub fn logs_headers(self) -> bool {
        matches!(self, RequestLogLevel::Headers | RequestLogLevel::All)
    }

    pub fn logs_body(self) -> bool {
        matches!(self, RequestLogLevel::Body | RequestLogLevel::All)
    }
}

/// How much of a received response is logged, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLogLevel {
    #[default]
    None,
    /// Everything, but only for 4xx and 5xx responses
    OnError,
    /// Everything, but only when a verification fails
    OnVerificationFailure,
    Headers,
    Body,
    ResponseTime,
    All,
}

impl ResponseLogLevel {
    pub fn logs_headers(self) -> bool {
        matches!(
            self,
            ResponseLogLevel::Headers
                | ResponseLogLevel::All
                | ResponseLogLevel::OnError
                | ResponseLogLevel::OnVerificationFailure
        )
    }

    pub fn logs_body(self) -> bool {
        matches!(
            self,
            ResponseLogLevel::Body
                | ResponseLogLevel::All
                | ResponseLogLevel::OnError
                | ResponseLogLevel::OnVerificationFailure
        )
    }

    pub fn logs_response_time(self) -> bool {
        matches!(
            self,
            ResponseLogLevel::ResponseTime
                | ResponseLogLevel::All
                | ResponseLogLevel::OnError
                | ResponseLogLevel::OnVerificationFailure
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default)]
    pub request: RequestLogLevel,
    #[serde(default)]
    pub response: ResponseLogLevel,
    /// Header names whose values are written as `*****` (case-insensitive)
    #[serde(default = "default_sensitive_headers")]
    pub sensitive_headers: Vec<String>,
    /// Cookie names whose values are written as `*****`
    #[serde(default)]
    pub sensitive_cookies: Vec<String>,
}

fn default_sensitive_headers() -> Vec<String> {
    vec!["authorization".to_string(), "proxy-authorization".to_string()]
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            request: RequestLogLevel::None,
            response: ResponseLogLevel::None,
            sensitive_headers: default_sensitive_headers(),
            sensitive_cookies: Vec::new(),
        }
    }
}

impl LogConfig {
    pub fn is_sensitive_header(&self, name: &str) -> bool {
        self.sensitive_headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn is_sensitive_cookie(&self, name: &str) -> bool {
        self.sensitive_cookies.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_levels() {
        assert!(!RequestLogLevel::None.is_enabled());
        assert!(RequestLogLevel::Endpoint.is_enabled());
        assert!(!RequestLogLevel::Endpoint.logs_headers());
        assert!(RequestLogLevel::Headers.logs_headers());
        assert!(!RequestLogLevel::Headers.logs_body());
        assert!(RequestLogLevel::All.logs_headers() && RequestLogLevel::All.logs_body());
    }

    #[test]
    fn test_response_levels() {
        assert!(ResponseLogLevel::ResponseTime.logs_response_time());
        assert!(!ResponseLogLevel::ResponseTime.logs_body());
        assert!(ResponseLogLevel::OnError.logs_body());
        assert!(!ResponseLogLevel::None.logs_headers());
    }

    #[test]
    fn test_sensitive_names() {
        let config = LogConfig {
            sensitive_cookies: vec!["Auth".to_string()],
            ..Default::default()
        };
        assert!(config.is_sensitive_header("Authorization"));
        assert!(!config.is_sensitive_header("Accept"));
        assert!(config.is_sensitive_cookie("Auth"));
        assert!(!config.is_sensitive_cookie("auth"));
    }

    #[test]
    fn test_deserialize_levels() {
        let config: LogConfig =
            serde_yaml::from_str("request: all\nresponse: on_verification_failure\n").unwrap();
        assert_eq!(config.request, RequestLogLevel::All);
        assert_eq!(config.response, ResponseLogLevel::OnVerificationFailure);
        assert_eq!(config.sensitive_headers, default_sensitive_headers());
    }
}
