use indexmap::IndexMap;
use serde_json::Value;

/// Header name/value pairs in insertion order.
pub type Headers = IndexMap<String, String>;

/// Credential mode of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

impl Credentials {
    pub fn as_str(&self) -> &'static str {
        match self {
            Credentials::Omit => "omit",
            Credentials::SameOrigin => "same-origin",
            Credentials::Include => "include",
        }
    }
}

/// One value of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataValue {
    Text(String),
    File {
        filename: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormDataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormDataValue::Text(text) => Some(text),
            FormDataValue::File { .. } => None,
        }
    }
}

/// Ordered multipart form entries. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormDataValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: FormDataValue) {
        self.entries.push((name.into(), value));
    }

    /// Builder form of appending a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, FormDataValue::Text(value.into()));
        self
    }

    /// Builder form of appending a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.append(
            name,
            FormDataValue::File {
                filename: Some(filename.into()),
                content_type: Some(content_type.into()),
                bytes: bytes.into(),
            },
        );
        self
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FormDataValue> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormDataValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Request payload as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured data, form-encoded before sending.
    Fields(Value),
    /// Already encoded text, sent verbatim.
    Text(String),
    /// Multipart form, passed through to the transport.
    Multipart(FormData),
}

/// Caller supplied request description. Unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub url: Option<String>,
    pub method: Option<String>,
    pub headers: Option<Headers>,
    pub body: Option<RequestBody>,
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add one header. Supplying any header replaces the default header set.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn fields(mut self, fields: Value) -> Self {
        self.body = Some(RequestBody::Fields(fields));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(text.into()));
        self
    }

    pub fn multipart(mut self, form: FormData) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl From<&str> for RequestOptions {
    fn from(url: &str) -> Self {
        RequestOptions::new().url(url)
    }
}

impl From<String> for RequestOptions {
    fn from(url: String) -> Self {
        RequestOptions::new().url(url)
    }
}

/// Origin and address of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub origin: String,
    pub href: String,
}

impl Location {
    pub fn new(origin: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            href: href.into(),
        }
    }
}

/// Values applied to options the caller leaves unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub method: String,
    pub headers: Headers,
    /// Value for `Access-Control-Allow-Origin` when the header is absent.
    pub allow_origin: Option<String>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.insert(
            "Content-type".to_string(),
            "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
        );
        Self {
            method: "GET".to_string(),
            headers,
            allow_origin: Some("*".to_string()),
        }
    }
}
