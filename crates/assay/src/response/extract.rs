//! Value extraction from a captured response.

use std::io::Cursor;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;

use super::Response;
use crate::content_type::{resolve, ExtractAs};
use crate::error::ExtractionError;
use crate::path::{self, Cardinality, Extracted};

/// Pulls values out of a response without asserting anything about them.
///
/// Lookups that find nothing are errors, never empty values.
#[derive(Debug, Clone, Copy)]
pub struct ExtractableResponse<'a> {
    response: &'a Response,
}

impl<'a> ExtractableResponse<'a> {
    pub fn new(response: &'a Response) -> Self {
        ExtractableResponse { response }
    }

    /// Value selected by `path`. JSON matches keep their type; XML and HTML
    /// matches are strings. Several matches come back as an array.
    pub fn body(&self, path: &str) -> Result<Value, ExtractionError> {
        self.body_as(path, ExtractAs::UseResponseContentTypeHeaderValue)
    }

    pub fn body_as(&self, path: &str, extract_as: ExtractAs) -> Result<Value, ExtractionError> {
        self.body_with(path, extract_as, Cardinality::Singular)
            .map(Extracted::into_value)
    }

    /// Every value selected by `path`, as a list even for a single match.
    pub fn body_list(&self, path: &str) -> Result<Vec<Value>, ExtractionError> {
        self.body_with(
            path,
            ExtractAs::UseResponseContentTypeHeaderValue,
            Cardinality::List,
        )
        .map(Extracted::into_list)
    }

    pub fn body_with(
        &self,
        path: &str,
        extract_as: ExtractAs,
        cardinality: Cardinality,
    ) -> Result<Extracted, ExtractionError> {
        let format = resolve(self.response.content_type(), extract_as)
            .map_err(|e| ExtractionError::new(e.to_string()))?;
        path::extract(self.response.text(), format, path, cardinality)
            .map_err(|e| ExtractionError::new(e.to_string()))
    }

    pub fn body_as_string(&self) -> String {
        self.response.text().to_string()
    }

    pub fn body_as_byte_array(&self) -> Vec<u8> {
        self.response.body().to_vec()
    }

    /// Readable view over the buffered body.
    pub fn body_as_stream(&self) -> Cursor<Bytes> {
        Cursor::new(self.response.body().clone())
    }

    /// First value of header `name`.
    pub fn header(&self, name: &str) -> Result<String, ExtractionError> {
        self.response
            .header(name)
            .map(str::to_string)
            .ok_or_else(|| {
                ExtractionError::new(format!(
                    "Header with name '{name}' could not be found in the response."
                ))
            })
    }

    pub fn cookie(&self, name: &str) -> Result<String, ExtractionError> {
        self.response
            .cookie(name)
            .map(|c| c.value().to_string())
            .ok_or_else(|| {
                ExtractionError::new(format!(
                    "Cookie with name '{name}' could not be found in the response."
                ))
            })
    }

    pub fn response(&self) -> &'a Response {
        self.response
    }

    pub fn response_time(&self) -> Duration {
        self.response.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseCookie;
    use serde_json::json;
    use std::io::Read;

    fn xml_response() -> Response {
        Response::builder()
            .header("Content-Type", "application/xml")
            .header("Location", "/places/1")
            .cookie(
                ResponseCookie::new("Auth", "123")
                    .http_only(true)
                    .secure(true),
            )
            .body(
                r#"<Places><Place><Name>Sun City</Name></Place><Place><Name>Pleasure Meadow</Name></Place></Places>"#,
            )
            .elapsed(Duration::from_millis(25))
            .build()
    }

    #[test]
    fn test_body_by_path() {
        let response = xml_response();
        let extract = ExtractableResponse::new(&response);
        assert_eq!(
            extract.body("//Place[1]/Name").unwrap(),
            json!("Sun City")
        );
        assert_eq!(
            extract.body("//Place/Name").unwrap(),
            json!(["Sun City", "Pleasure Meadow"])
        );
        assert_eq!(
            extract.body_list("//Place[2]/Name").unwrap(),
            vec![json!("Pleasure Meadow")]
        );
        assert_eq!(
            extract.body("//Country").unwrap_err().message(),
            "XPath expression '//Country' did not yield any results."
        );
    }

    #[test]
    fn test_json_values_keep_their_type() {
        let response = Response::builder()
            .body(r#"{"id": 7, "tags": ["a"], "active": true}"#)
            .build();
        let extract = ExtractableResponse::new(&response);
        assert_eq!(extract.body("$.id").unwrap(), json!(7));
        assert_eq!(extract.body("$.active").unwrap(), json!(true));
        assert_eq!(
            extract
                .body_with("$.tags[*]", ExtractAs::Json, Cardinality::List)
                .unwrap(),
            Extracted::List(vec![json!("a")])
        );
    }

    #[test]
    fn test_unsupported_content_type() {
        let response = Response::builder()
            .header("Content-Type", "text/csv")
            .body("a,b")
            .build();
        let extract = ExtractableResponse::new(&response);
        assert_eq!(
            extract.body("$.a").unwrap_err().message(),
            "Unable to extract elements from response with Content-Type 'text/csv'"
        );
    }

    #[test]
    fn test_headers_and_cookies() {
        let response = xml_response();
        let extract = ExtractableResponse::new(&response);
        assert_eq!(extract.header("location").unwrap(), "/places/1");
        assert_eq!(
            extract.header("X-Missing").unwrap_err().message(),
            "Header with name 'X-Missing' could not be found in the response."
        );
        assert_eq!(extract.cookie("Auth").unwrap(), "123");
        assert_eq!(
            extract.cookie("missing").unwrap_err().message(),
            "Cookie with name 'missing' could not be found in the response."
        );
    }

    #[test]
    fn test_whole_body_forms() {
        let response = xml_response();
        let extract = ExtractableResponse::new(&response);
        let text = extract.body_as_string();
        assert!(text.starts_with("<Places>"));
        assert_eq!(extract.body_as_byte_array(), text.as_bytes());

        let mut streamed = String::new();
        extract.body_as_stream().read_to_string(&mut streamed).unwrap();
        assert_eq!(streamed, text);

        assert_eq!(extract.response_time(), Duration::from_millis(25));
        assert_eq!(extract.response().status(), 200);
    }
}
