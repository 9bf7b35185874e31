use super::error::{RequestError, RequestResult};
use super::options::{Location, RequestDefaults, RequestOptions};
use super::prepare::{PreparedRequest, prepare};
use super::response::{BodyKind, RawResponse, ResponseBody};
use super::transport::{Transport, TransportResponse};

/// Perform a request with the default settings.
///
/// `options` may be a bare URL. Failures are logged once and returned.
pub async fn request<T: Transport + ?Sized>(
    transport: &T,
    location: &Location,
    options: impl Into<RequestOptions>,
) -> RequestResult<ResponseBody> {
    let prepared = prepare(options.into(), location, &RequestDefaults::default());
    send_prepared(transport, prepared).await
}

/// Decode a response according to its status and content type.
pub async fn decode_response(response: Box<dyn TransportResponse>) -> RequestResult<ResponseBody> {
    if !response.ok() {
        return Err(RequestError::Status(RawResponse::from_response(&*response)));
    }

    let content_type = response.header("content-type");
    match BodyKind::from_content_type(content_type.as_deref()) {
        BodyKind::Raw => Ok(ResponseBody::Raw(RawResponse::from_response(&*response))),
        kind => response.read(kind).await,
    }
}

async fn send_prepared<T: Transport + ?Sized>(
    transport: &T,
    prepared: PreparedRequest,
) -> RequestResult<ResponseBody> {
    tracing::debug!(method = %prepared.method, url = %prepared.url, "sending request");

    let result = match transport.send(prepared).await {
        Ok(response) => decode_response(response).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        tracing::warn!("request failed: {}", err);
    }
    result
}

/// Request helper bound to a transport, a page location and a set of defaults.
pub struct HttpClient<T: Transport> {
    transport: T,
    location: Location,
    defaults: RequestDefaults,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T, location: Location) -> Self {
        Self {
            transport,
            location,
            defaults: RequestDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    /// Apply this client's defaults without sending.
    pub fn prepare(&self, options: impl Into<RequestOptions>) -> PreparedRequest {
        prepare(options.into(), &self.location, &self.defaults)
    }

    pub async fn request(&self, options: impl Into<RequestOptions>) -> RequestResult<ResponseBody> {
        let prepared = self.prepare(options);
        send_prepared(&self.transport, prepared).await
    }
}
