//! Assay: a fluent DSL for sending HTTP requests and verifying the responses.
//!
//! ```no_run
//! use assay::matcher::{equal_to, has_item};
//!
//! # async fn run() -> assay::Result<()> {
//! let response = assay::given()
//!     .accept("application/json")
//!     .when()
//!     .get("http://localhost:9876/places")
//!     .await?;
//!
//! response
//!     .then()
//!     .status_code(200)?
//!     .body_path("$.Places[0].Name", equal_to("Sun City"))?
//!     .body_path_list("$.Places[*].Name", has_item(equal_to("Sin City")))?;
//!
//! let first = response.extract().body("$.Places[0].Name")?;
//! assert_eq!(first, "Sun City");
//! # Ok(())
//! # }
//! ```

// ===== Response interpretation =====
pub mod content_type;
pub mod deserialize;
pub mod matcher;
pub mod path;
pub mod schema;

// ===== Request / response lifecycle =====
pub mod request;
pub mod response;

// ===== Ambient =====
pub mod config;
pub mod error;
pub mod logging;

mod xml_tree;

pub use config::{Config, LogConfig, RequestDefaults, RequestLogLevel, ResponseLogLevel};
pub use content_type::{ExtractAs, VerifyAs};
pub use error::{
    DeserializationError, Error, ExtractionError, RequestCreationError, Result, TransportError,
    VerificationError,
};
pub use path::{Cardinality, Extracted};
pub use request::{BodyFormat, GraphQlRequest, RequestBody, RequestSpecification, When};
pub use response::{
    ExtractableResponse, Response, ResponseCookie, ResponseSpecification, VerifiableResponse,
};
pub use schema::{JsonSchema, XmlSchemaSet};

/// Start a request with default configuration.
pub fn given() -> RequestSpecification {
    RequestSpecification::new()
}

/// Start a request seeded from `config`.
pub fn given_with(config: &Config) -> RequestSpecification {
    RequestSpecification::from_config(config)
}
