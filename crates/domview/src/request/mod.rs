//! Promise-style HTTP helper.
//!
//! [`prepare`] turns loosely specified [`RequestOptions`] into a
//! [`PreparedRequest`] (method, headers, credentials and body encoding);
//! a [`Transport`] performs it and the response is decoded according to its
//! content type.
//!
//! # Example
//!
//! ```ignore
//! use domview::request::{HttpClient, RequestOptions};
//! use serde_json::json;
//!
//! let client = HttpClient::new(transport, location);
//! let body = client
//!     .request(RequestOptions::from("/api/items").fields(json!({"page": "2"})))
//!     .await?;
//! ```

mod buffered;
mod client;
mod error;
mod multipart;
mod options;
mod prepare;
mod response;
mod transport;

pub use buffered::{BufferedResponse, decode_bytes};
pub use client::{HttpClient, decode_response, request};
pub use error::{RequestError, RequestResult};
pub use multipart::parse_multipart;
pub use options::{
    Credentials, FormData, FormDataValue, Headers, Location, RequestBody, RequestDefaults,
    RequestOptions,
};
pub use prepare::{ALLOW_ORIGIN, OutgoingBody, PreparedRequest, append_query, prepare};
pub use response::{Blob, BodyKind, RawResponse, ResponseBody};
pub use transport::{Transport, TransportResponse};
