use super::options::{
    Credentials, FormData, Headers, Location, RequestBody, RequestDefaults, RequestOptions,
};
use crate::serialize::serialize;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// Body handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingBody {
    Text(String),
    Multipart(FormData),
}

/// A request with every default applied, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    /// Upper-case method name.
    pub method: String,
    pub headers: Headers,
    pub body: Option<OutgoingBody>,
    pub credentials: Option<Credentials>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// Apply defaults to `options` and encode the body.
///
/// GET requests never carry a body: form fields are appended to the URL
/// instead. A multipart body replaces the header set with an empty one so the
/// transport can supply the boundary.
pub fn prepare(
    options: RequestOptions,
    location: &Location,
    defaults: &RequestDefaults,
) -> PreparedRequest {
    let method = options
        .method
        .unwrap_or_else(|| defaults.method.clone())
        .to_uppercase();

    let mut headers = options.headers.unwrap_or_else(|| defaults.headers.clone());
    if let Some(origin) = &defaults.allow_origin {
        let present = headers.keys().any(|key| key.eq_ignore_ascii_case(ALLOW_ORIGIN));
        if !present {
            headers.insert(ALLOW_ORIGIN.to_string(), origin.clone());
        }
    }

    let mut url = options.url.unwrap_or_else(|| location.href.clone());

    let credentials = options.credentials.or_else(|| {
        (!location.origin.is_empty() && url.starts_with(&location.origin))
            .then_some(Credentials::SameOrigin)
    });

    let is_get = method == "GET";
    let body = match options.body {
        None => None,
        Some(RequestBody::Multipart(form)) => {
            headers.clear();
            if is_get {
                tracing::warn!("dropping multipart body of GET request to {}", url);
                None
            } else {
                Some(OutgoingBody::Multipart(form))
            }
        }
        Some(RequestBody::Fields(fields)) => encoded_body(&mut url, serialize(&fields), is_get),
        Some(RequestBody::Text(text)) => encoded_body(&mut url, text, is_get),
    };

    PreparedRequest {
        url,
        method,
        headers,
        body,
        credentials,
    }
}

fn encoded_body(url: &mut String, params: String, is_get: bool) -> Option<OutgoingBody> {
    if params.is_empty() {
        return None;
    }
    if is_get {
        append_query(url, &params);
        None
    } else {
        Some(OutgoingBody::Text(params))
    }
}

/// Append `params` to the query string of `url`.
pub fn append_query(url: &mut String, params: &str) {
    if url.contains('?') {
        if !url.ends_with('?') && !url.ends_with('&') {
            url.push('&');
        }
    } else if !params.starts_with('?') {
        url.push('?');
    }
    url.push_str(params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location() -> Location {
        Location::new("https://app.test", "https://app.test/page")
    }

    fn prepare_default(options: RequestOptions) -> PreparedRequest {
        prepare(options, &location(), &RequestDefaults::default())
    }

    #[test]
    fn test_defaults() {
        let request = prepare_default(RequestOptions::new());
        assert_eq!(request.url, "https://app.test/page");
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded; charset=UTF-8")
        );
        assert_eq!(request.header(ALLOW_ORIGIN), Some("*"));
        assert_eq!(request.credentials, Some(Credentials::SameOrigin));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_method_is_upper_cased() {
        let request = prepare_default(RequestOptions::from("/x").method("post"));
        assert_eq!(request.method, "POST");
    }

    #[test]
    fn test_cross_origin_has_no_credentials() {
        let request = prepare_default(RequestOptions::from("https://other.test/api"));
        assert_eq!(request.credentials, None);
    }

    #[test]
    fn test_explicit_credentials_win() {
        let request = prepare_default(
            RequestOptions::from("https://other.test/api").credentials(Credentials::Include),
        );
        assert_eq!(request.credentials, Some(Credentials::Include));
    }

    #[test]
    fn test_custom_headers_replace_defaults_but_keep_allow_origin() {
        let request = prepare_default(RequestOptions::from("/x").header("Accept", "text/plain"));
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.header("Accept"), Some("text/plain"));
        assert_eq!(request.header(ALLOW_ORIGIN), Some("*"));
        assert_eq!(request.header("Content-type"), None);
    }

    #[test]
    fn test_existing_allow_origin_is_kept() {
        let request = prepare_default(
            RequestOptions::from("/x").header("access-control-allow-origin", "https://a.test"),
        );
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header(ALLOW_ORIGIN), Some("https://a.test"));
    }

    #[test]
    fn test_get_folds_fields_into_query() {
        let request = prepare_default(RequestOptions::from("/x").fields(json!({"a": "1", "b": "2"})));
        assert_eq!(request.url, "/x?a=1&b=2");
        assert!(request.body.is_none());

        let request =
            prepare_default(RequestOptions::from("/x?page=2").fields(json!({"a": "1"})));
        assert_eq!(request.url, "/x?page=2&a=1");
    }

    #[test]
    fn test_get_with_nothing_to_fold_keeps_url() {
        let request = prepare_default(RequestOptions::from("/x").fields(json!({"n": 1})));
        assert_eq!(request.url, "/x");
    }

    #[test]
    fn test_post_serializes_body() {
        let request = prepare_default(
            RequestOptions::from("/x")
                .method("POST")
                .fields(json!({"user": {"name": "Ann Lee"}})),
        );
        assert_eq!(request.url, "/x");
        assert_eq!(
            request.body,
            Some(OutgoingBody::Text("user[name]=Ann%20Lee".into()))
        );
    }

    #[test]
    fn test_multipart_clears_headers() {
        let form = FormData::new().text("a", "1");
        let request = prepare_default(
            RequestOptions::from("/upload")
                .method("POST")
                .header("X-Token", "t")
                .multipart(form.clone()),
        );
        assert!(request.headers.is_empty());
        assert_eq!(request.body, Some(OutgoingBody::Multipart(form)));
    }

    #[test]
    fn test_append_query() {
        let cases = [
            ("/a", "x=1", "/a?x=1"),
            ("/a?", "x=1", "/a?x=1"),
            ("/a?b=2", "x=1", "/a?b=2&x=1"),
            ("/a?b=2&", "x=1", "/a?b=2&x=1"),
            ("/a", "?x=1", "/a?x=1"),
        ];
        for (url, params, expected) in cases {
            let mut url = url.to_string();
            append_query(&mut url, params);
            assert_eq!(url, expected);
        }
    }
}
