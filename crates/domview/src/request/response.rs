use serde_json::Value;

use super::options::{FormData, Headers};
use super::transport::TransportResponse;

/// How a successful response body is decoded, chosen from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Text,
    FormData,
    Blob,
    ArrayBuffer,
    /// The response is returned undecoded.
    Raw,
}

impl BodyKind {
    /// First matching rule wins: JSON, `text/`, form data, `image/`,
    /// audio/video/ogg, otherwise raw.
    pub fn from_content_type(content_type: Option<&str>) -> BodyKind {
        let Some(content_type) = content_type else {
            return BodyKind::Raw;
        };
        let content_type = content_type.to_ascii_lowercase();
        let has = |needle: &str| content_type.contains(needle);

        if has("application/json") {
            BodyKind::Json
        } else if has("text/") {
            BodyKind::Text
        } else if has("form-data") {
            BodyKind::FormData
        } else if has("image/") {
            BodyKind::Blob
        } else if has("audio/") || has("video/") || has("application/ogg") {
            BodyKind::ArrayBuffer
        } else {
            BodyKind::Raw
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Json => "json",
            BodyKind::Text => "text",
            BodyKind::FormData => "form-data",
            BodyKind::Blob => "blob",
            BodyKind::ArrayBuffer => "array-buffer",
            BodyKind::Raw => "raw",
        }
    }
}

/// Binary payload together with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Status line and headers of a response whose body was not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub url: String,
    pub headers: Headers,
}

impl RawResponse {
    pub fn from_response(response: &dyn TransportResponse) -> Self {
        Self {
            status: response.status(),
            url: response.url(),
            headers: response.headers(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    FormData(FormData),
    Blob(Blob),
    ArrayBuffer(Vec<u8>),
    Raw(RawResponse),
}

impl ResponseBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            ResponseBody::Json(_) => BodyKind::Json,
            ResponseBody::Text(_) => BodyKind::Text,
            ResponseBody::FormData(_) => BodyKind::FormData,
            ResponseBody::Blob(_) => BodyKind::Blob,
            ResponseBody::ArrayBuffer(_) => BodyKind::ArrayBuffer,
            ResponseBody::Raw(_) => BodyKind::Raw,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_kind_rules() {
        let cases = [
            (Some("application/json; charset=utf-8"), BodyKind::Json),
            (Some("text/html"), BodyKind::Text),
            (Some("text/plain"), BodyKind::Text),
            (Some("multipart/form-data; boundary=x"), BodyKind::FormData),
            (Some("image/png"), BodyKind::Blob),
            (Some("audio/mpeg"), BodyKind::ArrayBuffer),
            (Some("video/mp4"), BodyKind::ArrayBuffer),
            (Some("application/ogg"), BodyKind::ArrayBuffer),
            (Some("application/octet-stream"), BodyKind::Raw),
            (Some("Application/JSON"), BodyKind::Json),
            (None, BodyKind::Raw),
        ];
        for (content_type, expected) in cases {
            assert_eq!(
                BodyKind::from_content_type(content_type),
                expected,
                "{:?}",
                content_type
            );
        }
    }
}
