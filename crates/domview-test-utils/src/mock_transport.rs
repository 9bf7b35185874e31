//! Scripted [`Transport`] for request tests.

use domview::request::{
    BufferedResponse, Headers, PreparedRequest, RequestError, RequestResult, Transport,
    TransportResponse,
};
use futures_lite::future::BoxedLocal;
use indexmap::IndexMap;
use parking_lot::Mutex;

/// A canned response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl MockResponse {
    /// `200 OK` with the given content type and body.
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::status(200)
            .header("Content-Type", content_type)
            .body(body)
    }

    /// A response with no headers and an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(MockResponse),
    Fail(String),
}

/// Transport answering from a URL-keyed script and recording every request.
///
/// URLs without a scripted reply answer `404` with no content type.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<IndexMap<String, Reply>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `url` with `response`.
    pub fn reply(&self, url: impl Into<String>, response: MockResponse) -> &Self {
        self.replies.lock().insert(url.into(), Reply::Respond(response));
        self
    }

    /// Fail requests for `url` as if the network were down.
    pub fn fail(&self, url: impl Into<String>, message: impl Into<String>) -> &Self {
        self.replies.lock().insert(url.into(), Reply::Fail(message.into()));
        self
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: PreparedRequest) -> BoxedLocal<RequestResult<Box<dyn TransportResponse>>> {
        let url = request.url.clone();
        let reply = self.replies.lock().get(&url).cloned();
        self.requests.lock().push(request);

        let result = match reply {
            Some(Reply::Respond(response)) => Ok(Box::new(BufferedResponse::new(
                response.status,
                url,
                response.headers,
                response.body,
            )) as Box<dyn TransportResponse>),
            Some(Reply::Fail(message)) => Err(RequestError::Network { url, message }),
            None => Ok(Box::new(BufferedResponse::new(404, url, Headers::new(), Vec::new()))
                as Box<dyn TransportResponse>),
        };
        Box::pin(futures_lite::future::ready(result))
    }
}
