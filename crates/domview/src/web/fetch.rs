use futures_lite::future::BoxedLocal;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{BlobPropertyBag, RequestCredentials, RequestInit, Response, Window};

use super::js_message;
use crate::request::{
    Blob, BodyKind, Credentials, FormData, FormDataValue, Headers, OutgoingBody, PreparedRequest,
    RawResponse, RequestError, RequestResult, ResponseBody, Transport, TransportResponse,
};

/// [`Transport`] over `window.fetch`.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new() -> Option<Self> {
        Some(Self {
            window: web_sys::window()?,
        })
    }
}

impl Transport for FetchTransport {
    fn send(&self, request: PreparedRequest) -> BoxedLocal<RequestResult<Box<dyn TransportResponse>>> {
        let window = self.window.clone();
        Box::pin(async move {
            let url = request.url.clone();
            let network = |err: JsValue| RequestError::Network {
                url: url.clone(),
                message: js_message(&err),
            };

            let init = build_init(&request).map_err(&network)?;
            let js_request =
                web_sys::Request::new_with_str_and_init(&request.url, &init).map_err(&network)?;
            let value = JsFuture::from(window.fetch_with_request(&js_request))
                .await
                .map_err(&network)?;
            let response: Response = value.dyn_into().map_err(&network)?;

            Ok(Box::new(FetchResponse { response }) as Box<dyn TransportResponse>)
        })
    }
}

fn build_init(request: &PreparedRequest) -> Result<RequestInit, JsValue> {
    let init = RequestInit::new();
    init.set_method(&request.method);

    let headers = web_sys::Headers::new()?;
    for (name, value) in &request.headers {
        headers.append(name, value)?;
    }
    init.set_headers(&headers);

    if let Some(credentials) = request.credentials {
        init.set_credentials(match credentials {
            Credentials::Omit => RequestCredentials::Omit,
            Credentials::SameOrigin => RequestCredentials::SameOrigin,
            Credentials::Include => RequestCredentials::Include,
        });
    }

    match &request.body {
        Some(OutgoingBody::Text(text)) => init.set_body(&JsValue::from_str(text)),
        Some(OutgoingBody::Multipart(form)) => init.set_body(&to_js_form_data(form)?),
        None => {}
    }
    Ok(init)
}

fn to_js_form_data(form: &FormData) -> Result<web_sys::FormData, JsValue> {
    let data = web_sys::FormData::new()?;
    for (name, value) in form.iter() {
        match value {
            FormDataValue::Text(text) => data.append_with_str(name, text)?,
            FormDataValue::File {
                filename,
                content_type,
                bytes,
            } => {
                let parts = Array::new();
                parts.push(&Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                if let Some(content_type) = content_type {
                    options.set_type(content_type);
                }
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
                match filename {
                    Some(filename) => data.append_with_blob_and_filename(name, &blob, filename)?,
                    None => data.append_with_blob(name, &blob)?,
                }
            }
        }
    }
    Ok(data)
}

/// A fetch response whose body has not been consumed.
pub struct FetchResponse {
    response: Response,
}

impl TransportResponse for FetchResponse {
    fn status(&self) -> u16 {
        self.response.status()
    }

    fn ok(&self) -> bool {
        self.response.ok()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.response.headers().get(name).ok().flatten()
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        let Ok(Some(entries)) = js_sys::try_iter(&self.response.headers()) else {
            return headers;
        };
        for entry in entries.flatten() {
            let pair = Array::from(&entry);
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                headers.insert(name, value);
            }
        }
        headers
    }

    fn url(&self) -> String {
        self.response.url()
    }

    fn read(self: Box<Self>, kind: BodyKind) -> BoxedLocal<RequestResult<ResponseBody>> {
        Box::pin(async move {
            let url = self.response.url();
            let decode = |err: JsValue| RequestError::Decode {
                url: url.clone(),
                kind,
                message: js_message(&err),
            };
            let response = &self.response;

            match kind {
                BodyKind::Json => {
                    let value = JsFuture::from(response.json().map_err(&decode)?)
                        .await
                        .map_err(&decode)?;
                    let text: String = js_sys::JSON::stringify(&value).map_err(&decode)?.into();
                    serde_json::from_str(&text)
                        .map(ResponseBody::Json)
                        .map_err(|err| RequestError::Decode {
                            url: url.clone(),
                            kind,
                            message: err.to_string(),
                        })
                }
                BodyKind::Text => {
                    let value = JsFuture::from(response.text().map_err(&decode)?)
                        .await
                        .map_err(&decode)?;
                    Ok(ResponseBody::Text(value.as_string().unwrap_or_default()))
                }
                BodyKind::FormData => {
                    let value = JsFuture::from(response.form_data().map_err(&decode)?)
                        .await
                        .map_err(&decode)?;
                    let data: web_sys::FormData = value.dyn_into().map_err(&decode)?;
                    read_form_data(&data).await.map(ResponseBody::FormData).map_err(&decode)
                }
                BodyKind::Blob => {
                    let value = JsFuture::from(response.blob().map_err(&decode)?)
                        .await
                        .map_err(&decode)?;
                    let blob: web_sys::Blob = value.dyn_into().map_err(&decode)?;
                    let bytes = blob_bytes(&blob).await.map_err(&decode)?;
                    Ok(ResponseBody::Blob(Blob {
                        content_type: blob.type_(),
                        bytes,
                    }))
                }
                BodyKind::ArrayBuffer => {
                    let buffer = JsFuture::from(response.array_buffer().map_err(&decode)?)
                        .await
                        .map_err(&decode)?;
                    Ok(ResponseBody::ArrayBuffer(Uint8Array::new(&buffer).to_vec()))
                }
                BodyKind::Raw => Ok(ResponseBody::Raw(RawResponse::from_response(&*self))),
            }
        })
    }
}

async fn blob_bytes(blob: &web_sys::Blob) -> Result<Vec<u8>, JsValue> {
    let buffer = JsFuture::from(blob.array_buffer()).await?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

async fn read_form_data(data: &web_sys::FormData) -> Result<FormData, JsValue> {
    let mut form = FormData::new();
    let Some(entries) = js_sys::try_iter(data)? else {
        return Ok(form);
    };

    for entry in entries {
        let pair = Array::from(&entry?);
        let Some(name) = pair.get(0).as_string() else {
            continue;
        };
        let value = pair.get(1);

        if let Some(text) = value.as_string() {
            form.append(name, FormDataValue::Text(text));
        } else if let Ok(blob) = value.dyn_into::<web_sys::Blob>() {
            let filename = js_sys::Reflect::get(&blob, &JsValue::from_str("name"))
                .ok()
                .and_then(|name| name.as_string());
            let bytes = blob_bytes(&blob).await?;
            form.append(
                name,
                FormDataValue::File {
                    filename,
                    content_type: Some(blob.type_()),
                    bytes,
                },
            );
        }
    }
    Ok(form)
}
