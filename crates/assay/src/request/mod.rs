//! Request specification: everything set between `given()` and `when()`.
//!
//! The specification only records settings. Bodies, files and headers are
//! validated when the request is prepared for dispatch, so the fluent chain
//! never has to return `Result` before the HTTP method is chosen.

mod body;
mod dispatch;

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub use body::{to_xml, BodyFormat, RequestBody};
pub use dispatch::When;

use crate::config::{Config, LogConfig, RequestDefaults, RequestLogLevel};
use crate::error::{RequestCreationError, TransportError};

static PATH_PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Za-z_][A-Za-z0-9_.-]*)\]").expect("valid regex"));

/// A GraphQL operation posted as a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        GraphQlRequest {
            query: query.into(),
            operation_name: None,
            variables: None,
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

#[derive(Debug, Clone)]
enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
    ApiKey { header: String, key: String },
}

#[derive(Debug, Clone)]
struct MultipartFile {
    path: PathBuf,
    control_name: String,
    content_type: Option<String>,
}

/// Accumulated request settings, created by [`given`](crate::given).
#[derive(Debug, Clone, Default)]
pub struct RequestSpecification {
    defaults: RequestDefaults,
    log: LogConfig,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    accept: Option<String>,
    query: Vec<(String, String)>,
    path_params: BTreeMap<String, String>,
    cookies: Vec<(String, String)>,
    body: Option<RequestBody>,
    form: Vec<(String, String)>,
    files: Vec<MultipartFile>,
    auth: Option<Auth>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    disable_ssl_certificate_validation: bool,
    deferred: Option<RequestCreationError>,
}

impl RequestSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the specification from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        RequestSpecification {
            log: config.log.clone(),
            ..Self::new().spec(&config.request)
        }
    }

    /// Apply shared request defaults (base URI, headers, timeout, ...).
    pub fn spec(mut self, defaults: &RequestDefaults) -> Self {
        self.defaults = defaults.clone();
        self.disable_ssl_certificate_validation |= defaults.disable_ssl_certificate_validation;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Value for a `[name]` placeholder in the request URL.
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json_body<T: Serialize>(self, value: &T) -> Self {
        let body = RequestBody::json(value);
        self.deferred_body(body)
    }

    pub fn xml_body<T: Serialize>(self, root: impl Into<String>, value: &T) -> Self {
        let body = RequestBody::xml(root, value);
        self.deferred_body(body)
    }

    pub fn graphql(self, request: GraphQlRequest) -> Self {
        let body = RequestBody::json(&request);
        self.deferred_body(body)
    }

    fn deferred_body(mut self, body: Result<RequestBody, RequestCreationError>) -> Self {
        match body {
            Ok(body) => self.body = Some(body),
            Err(e) => {
                self.deferred.get_or_insert(e);
            }
        }
        self
    }

    /// URL-encoded form fields; sent instead of any other body.
    pub fn form_data<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.form
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Upload a file as a multipart form part. The file is read at dispatch.
    pub fn multipart(mut self, path: impl Into<PathBuf>, control_name: impl Into<String>) -> Self {
        self.files.push(MultipartFile {
            path: path.into(),
            control_name: control_name.into(),
            content_type: None,
        });
        self
    }

    pub fn multipart_with_content_type(
        mut self,
        path: impl Into<PathBuf>,
        control_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.files.push(MultipartFile {
            path: path.into(),
            control_name: control_name.into(),
            content_type: Some(content_type.into()),
        });
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// OAuth2 bearer token.
    pub fn oauth2(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    pub fn api_key(mut self, header: impl Into<String>, key: impl Into<String>) -> Self {
        self.auth = Some(Auth::ApiKey {
            header: header.into(),
            key: key.into(),
        });
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn disable_ssl_certificate_validation(mut self) -> Self {
        self.disable_ssl_certificate_validation = true;
        self
    }

    pub fn log(mut self, level: RequestLogLevel) -> Self {
        self.log.request = level;
        self
    }

    pub fn when(self) -> When {
        When::new(self)
    }

    fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.or_else(|| self.defaults.timeout())
    }

    fn effective_content_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .or(self.defaults.content_type.as_deref())
    }

    /// Substitute `[name]` placeholders, resolve against the base URI.
    fn resolve_url(&self, url: &str) -> Result<String, RequestCreationError> {
        let mut missing = None;
        let substituted = PATH_PARAMETER.replace_all(url, |captures: &regex::Captures<'_>| {
            match self.path_params.get(&captures[1]) {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => {
                    missing.get_or_insert_with(|| captures[1].to_string());
                    captures[0].to_string()
                }
            }
        });
        if let Some(name) = missing {
            return Err(RequestCreationError::MissingPathParameter(name));
        }
        self.defaults.resolve_url(&substituted)
    }

    fn build_headers(&self) -> Result<HeaderMap, RequestCreationError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.defaults.headers {
            let (name, value) = header_pair(name, value)?;
            headers.insert(name, value);
        }
        // Explicit headers replace a default of the same name; repeats append.
        let mut replaced = HashSet::new();
        for (name, value) in &self.headers {
            let (name, value) = header_pair(name, value)?;
            if replaced.insert(name.clone()) {
                headers.insert(name, value);
            } else {
                headers.append(name, value);
            }
        }

        if let Some(accept) = &self.accept {
            let (_, value) = header_pair(ACCEPT.as_str(), accept)?;
            headers.insert(ACCEPT, value);
        }
        if !self.cookies.is_empty() {
            let cookies: Vec<String> = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            let (_, value) = header_pair(COOKIE.as_str(), &cookies.join("; "))?;
            headers.insert(COOKIE, value);
        }
        if let Some(Auth::ApiKey { header, key }) = &self.auth {
            let (name, value) = header_pair(header, key)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn build_client(&self) -> Result<Client, RequestCreationError> {
        let mut builder = Client::builder();
        if let Some(user_agent) = self.user_agent.as_ref().or(self.defaults.user_agent.as_ref()) {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                RequestCreationError::InvalidUrl {
                    url: proxy.clone(),
                    reason: e.to_string(),
                }
            })?;
            builder = builder.proxy(proxy);
        }
        if self.disable_ssl_certificate_validation {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder
            .build()
            .map_err(|e| RequestCreationError::Serialization(format!("could not create HTTP client: {e}")))
    }

    async fn multipart_form(&self) -> Result<reqwest::multipart::Form, RequestCreationError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.form {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let display = file.path.display().to_string();
            let bytes = tokio::fs::read(&file.path).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => RequestCreationError::FileNotFound(display.clone()),
                _ => RequestCreationError::Serialization(format!("could not read '{display}': {e}")),
            })?;
            let file_name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| display.clone());
            let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| RequestCreationError::InvalidHeader {
                    name: CONTENT_TYPE.to_string(),
                    reason: e.to_string(),
                })?;
            }
            form = form.part(file.control_name.clone(), part);
        }
        Ok(form)
    }

    /// Build the client and the transport request for `method url`.
    pub(crate) async fn prepare(
        &self,
        method: Method,
        url: &str,
    ) -> Result<(Client, reqwest::Request), RequestCreationError> {
        if let Some(error) = &self.deferred {
            return Err(error.clone());
        }

        let resolved = self.resolve_url(url)?;
        let client = self.build_client()?;
        let mut builder = client
            .request(method, resolved.as_str())
            .headers(self.build_headers()?);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        builder = match &self.auth {
            Some(Auth::Basic { username, password }) => builder.basic_auth(username, Some(password)),
            Some(Auth::Bearer(token)) => builder.bearer_auth(token),
            Some(Auth::ApiKey { .. }) | None => builder,
        };
        if let Some(timeout) = self.effective_timeout() {
            builder = builder.timeout(timeout);
        }

        let content_type = self.effective_content_type();
        if !self.files.is_empty() {
            builder = builder.multipart(self.multipart_form().await?);
        } else if !self.form.is_empty() {
            builder = builder.form(&self.form);
        } else if let Some(body) = &self.body {
            let (text, default_content_type) = body.render(content_type)?;
            if let Some(content_type) = content_type.or(default_content_type) {
                let (_, value) = header_pair(CONTENT_TYPE.as_str(), content_type)?;
                builder = builder.header(CONTENT_TYPE, value);
            }
            builder = builder.body(text);
        } else if let Some(content_type) = content_type {
            let (_, value) = header_pair(CONTENT_TYPE.as_str(), content_type)?;
            builder = builder.header(CONTENT_TYPE, value);
        }

        let request = builder.build().map_err(|e| RequestCreationError::InvalidUrl {
            url: resolved.clone(),
            reason: e.to_string(),
        })?;
        debug!("Prepared {} {}", request.method(), request.url());
        Ok((client, request))
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), RequestCreationError> {
    let invalid = |reason: String| RequestCreationError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}

/// Map a transport failure onto the public error taxonomy.
pub(crate) fn transport_error(error: reqwest::Error, timeout: Option<Duration>) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout(timeout.unwrap_or_default());
    }
    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportError::Network(message)
}
