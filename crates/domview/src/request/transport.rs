use futures_lite::future::BoxedLocal;

use super::error::RequestResult;
use super::options::Headers;
use super::prepare::PreparedRequest;
use super::response::{BodyKind, ResponseBody};

/// A response whose body has not been read yet.
pub trait TransportResponse {
    fn status(&self) -> u16;

    /// Whether the status is in the 2xx range.
    fn ok(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Header lookup, case-insensitive.
    fn header(&self, name: &str) -> Option<String>;

    fn headers(&self) -> Headers;

    fn url(&self) -> String;

    /// Consume the response and decode its body as `kind`.
    fn read(self: Box<Self>, kind: BodyKind) -> BoxedLocal<RequestResult<ResponseBody>>;
}

/// Something that can perform a [`PreparedRequest`].
///
/// The browser implementation is `web::FetchTransport`; tests script
/// responses instead.
pub trait Transport {
    fn send(&self, request: PreparedRequest) -> BoxedLocal<RequestResult<Box<dyn TransportResponse>>>;
}
