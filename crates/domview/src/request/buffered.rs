use futures_lite::future::{self, BoxedLocal};

use super::error::{RequestError, RequestResult};
use super::multipart::parse_multipart;
use super::options::Headers;
use super::response::{Blob, BodyKind, RawResponse, ResponseBody};
use super::transport::TransportResponse;

/// A response whose body is already in memory.
///
/// Useful for transports that read the whole body up front, and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    status: u16,
    url: String,
    headers: Headers,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new(status: u16, url: impl Into<String>, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status,
            url: url.into(),
            headers,
            body,
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl TransportResponse for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn read(self: Box<Self>, kind: BodyKind) -> BoxedLocal<RequestResult<ResponseBody>> {
        let result = if kind == BodyKind::Raw {
            Ok(ResponseBody::Raw(RawResponse::from_response(&*self)))
        } else {
            let content_type = self.header("content-type");
            let BufferedResponse { url, body, .. } = *self;
            decode_bytes(kind, content_type.as_deref(), &url, body)
        };
        Box::pin(future::ready(result))
    }
}

/// Decode an in-memory body as `kind`.
pub fn decode_bytes(
    kind: BodyKind,
    content_type: Option<&str>,
    url: &str,
    bytes: Vec<u8>,
) -> RequestResult<ResponseBody> {
    let decode_error = |message: String| RequestError::Decode {
        url: url.to_string(),
        kind,
        message,
    };

    match kind {
        BodyKind::Json => serde_json::from_slice(&bytes)
            .map(ResponseBody::Json)
            .map_err(|err| decode_error(err.to_string())),
        BodyKind::Text => Ok(ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned())),
        BodyKind::FormData => parse_multipart(content_type.unwrap_or_default(), &bytes)
            .map(ResponseBody::FormData)
            .map_err(decode_error),
        BodyKind::Blob => Ok(ResponseBody::Blob(Blob {
            content_type: content_type.unwrap_or_default().to_string(),
            bytes,
        })),
        BodyKind::ArrayBuffer => Ok(ResponseBody::ArrayBuffer(bytes)),
        BodyKind::Raw => Err(decode_error("raw bodies carry no decoded payload".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json() {
        let body = decode_bytes(BodyKind::Json, Some("application/json"), "/x", br#"{"a":1}"#.to_vec());
        assert_eq!(body.unwrap(), ResponseBody::Json(json!({"a": 1})));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_bytes(BodyKind::Json, Some("application/json"), "/x", b"{".to_vec()).unwrap_err();
        assert!(matches!(err, RequestError::Decode { kind: BodyKind::Json, .. }));
    }

    #[test]
    fn test_decode_blob_keeps_type() {
        let body = decode_bytes(BodyKind::Blob, Some("image/png"), "/x", vec![1, 2, 3]).unwrap();
        assert_eq!(
            body,
            ResponseBody::Blob(Blob {
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3]
            })
        );
    }

    #[test]
    fn test_raw_read_reports_status() {
        let mut headers = Headers::new();
        headers.insert("X-Id".into(), "7".into());
        let response = Box::new(BufferedResponse::new(204, "/x", headers, Vec::new()));
        let body = pollster::block_on(response.read(BodyKind::Raw)).unwrap();
        match body {
            ResponseBody::Raw(raw) => {
                assert_eq!(raw.status, 204);
                assert_eq!(raw.header("x-id"), Some("7"));
            }
            other => panic!("expected raw body, got {:?}", other),
        }
    }
}
