//! Request helper tests against a scripted transport.

use domview::request::{
    ALLOW_ORIGIN, BodyKind, Credentials, FormData, FormDataValue, HttpClient, Location,
    OutgoingBody, RequestDefaults, RequestError, RequestOptions, ResponseBody, request,
};
use domview_test_utils::{MockResponse, MockTransport};
use serde_json::json;

const ORIGIN: &str = "https://app.test";

fn location() -> Location {
    Location::new(ORIGIN, "https://app.test/inbox")
}

fn client() -> HttpClient<MockTransport> {
    HttpClient::new(MockTransport::new(), location())
}

#[test]
fn test_json_response() {
    let client = client();
    client.transport().reply(
        "/api/user",
        MockResponse::ok("application/json; charset=utf-8", r#"{"name":"Ann","id":7}"#),
    );

    let body = pollster::block_on(client.request("/api/user")).unwrap();
    assert_eq!(body.kind(), BodyKind::Json);
    assert_eq!(body.into_json(), Some(json!({"name": "Ann", "id": 7})));
}

#[test]
fn test_text_response() {
    let client = client();
    client
        .transport()
        .reply("/fragment", MockResponse::ok("text/html", "<p>hi</p>"));

    let body = pollster::block_on(client.request("/fragment")).unwrap();
    assert_eq!(body.as_text(), Some("<p>hi</p>"));
}

#[test]
fn test_binary_responses() {
    let client = client();
    client
        .transport()
        .reply("/logo.png", MockResponse::ok("image/png", vec![0x89, 0x50]))
        .reply("/clip.ogg", MockResponse::ok("application/ogg", vec![1, 2, 3]));

    match pollster::block_on(client.request("/logo.png")).unwrap() {
        ResponseBody::Blob(blob) => {
            assert_eq!(blob.content_type, "image/png");
            assert_eq!(blob.bytes, vec![0x89, 0x50]);
        }
        other => panic!("expected blob, got {:?}", other),
    }
    assert_eq!(
        pollster::block_on(client.request("/clip.ogg")).unwrap(),
        ResponseBody::ArrayBuffer(vec![1, 2, 3])
    );
}

#[test]
fn test_form_data_response() {
    let client = client();
    let body = "--xyz\r\n\
                Content-Disposition: form-data; name=\"title\"\r\n\r\n\
                Hello\r\n\
                --xyz\r\n\
                Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
                Content-Type: text/plain\r\n\r\n\
                abc\r\n\
                --xyz--\r\n";
    client.transport().reply(
        "/form",
        MockResponse::ok("multipart/form-data; boundary=xyz", body),
    );

    match pollster::block_on(client.request("/form")).unwrap() {
        ResponseBody::FormData(form) => {
            assert_eq!(form.len(), 2);
            assert_eq!(form.get("title").and_then(FormDataValue::as_text), Some("Hello"));
            assert_eq!(
                form.get("file"),
                Some(&FormDataValue::File {
                    filename: Some("a.txt".into()),
                    content_type: Some("text/plain".into()),
                    bytes: b"abc".to_vec(),
                })
            );
        }
        other => panic!("expected form data, got {:?}", other),
    }
}

#[test]
fn test_unknown_content_type_is_raw() {
    let client = client();
    client.transport().reply(
        "/download",
        MockResponse::ok("application/octet-stream", vec![9; 4]).header("X-Request-Id", "r1"),
    );
    client.transport().reply("/empty", MockResponse::status(204));

    match pollster::block_on(client.request("/download")).unwrap() {
        ResponseBody::Raw(raw) => {
            assert_eq!(raw.status, 200);
            assert_eq!(raw.url, "/download");
            assert_eq!(raw.header("x-request-id"), Some("r1"));
        }
        other => panic!("expected raw response, got {:?}", other),
    }
    assert_eq!(
        pollster::block_on(client.request("/empty")).unwrap().kind(),
        BodyKind::Raw
    );
}

#[test]
fn test_error_status_is_rejected() {
    let client = client();
    client.transport().reply(
        "/api/missing",
        MockResponse::status(500).header("Content-Type", "application/json").body("{}"),
    );

    match pollster::block_on(client.request("/api/missing")) {
        Err(RequestError::Status(raw)) => {
            assert_eq!(raw.status, 500);
            assert_eq!(raw.url, "/api/missing");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let unscripted = pollster::block_on(client.request("/nowhere")).unwrap_err();
    assert!(matches!(unscripted, RequestError::Status(raw) if raw.status == 404));
}

#[test]
fn test_network_failure() {
    let client = client();
    client.transport().fail("/offline", "connection refused");

    let err = pollster::block_on(client.request("/offline")).unwrap_err();
    assert_eq!(
        err,
        RequestError::Network {
            url: "/offline".into(),
            message: "connection refused".into(),
        }
    );
    assert_eq!(err.to_string(), "Request to /offline failed: connection refused");
}

#[test]
fn test_malformed_json_is_decode_error() {
    let client = client();
    client
        .transport()
        .reply("/broken", MockResponse::ok("application/json", "{\"a\":"));

    let err = pollster::block_on(client.request("/broken")).unwrap_err();
    assert!(matches!(err, RequestError::Decode { kind: BodyKind::Json, .. }));
}

#[test]
fn test_get_folds_fields_into_query() {
    let client = client();
    let options = RequestOptions::from("/search?lang=en")
        .fields(json!({"q": "red shoes", "filter": {"size": "9"}, "page": 2}));

    let _ = pollster::block_on(client.request(options));

    let sent = client.transport().last_request().unwrap();
    assert_eq!(sent.method, "GET");
    assert_eq!(sent.url, "/search?lang=en&q=red%20shoes&filter[size]=9");
    assert!(sent.body.is_none());
}

#[test]
fn test_get_with_empty_fields_keeps_url() {
    let client = client();
    let _ = pollster::block_on(client.request(RequestOptions::from("/list").fields(json!({"n": 1}))));

    assert_eq!(client.transport().last_request().unwrap().url, "/list");
}

#[test]
fn test_post_sends_encoded_body() {
    let client = client();
    client
        .transport()
        .reply("/api/save", MockResponse::ok("application/json", "true"));

    let options = RequestOptions::from("/api/save")
        .method("post")
        .fields(json!({"title": "a&b"}));
    let body = pollster::block_on(client.request(options)).unwrap();
    assert_eq!(body.as_json(), Some(&json!(true)));

    let sent = client.transport().last_request().unwrap();
    assert_eq!(sent.method, "POST");
    assert_eq!(sent.body, Some(OutgoingBody::Text("title=a%26b".into())));
    assert_eq!(
        sent.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=UTF-8")
    );
    assert_eq!(sent.header(ALLOW_ORIGIN), Some("*"));
}

#[test]
fn test_multipart_post_drops_headers() {
    let client = client();
    let form = FormData::new()
        .text("title", "report")
        .file("upload", "r.csv", "text/csv", b"a,b".to_vec());

    let options = RequestOptions::from("/upload")
        .method("POST")
        .header("X-Token", "t")
        .multipart(form.clone());
    let _ = pollster::block_on(client.request(options));

    let sent = client.transport().last_request().unwrap();
    assert!(sent.headers.is_empty());
    assert_eq!(sent.body, Some(OutgoingBody::Multipart(form)));
}

#[test]
fn test_caller_headers_replace_defaults() {
    let client = client();
    let options = RequestOptions::from("/x").header("access-control-allow-origin", "https://a.test");

    let sent = client.prepare(options);
    assert_eq!(sent.headers.len(), 1);
    assert_eq!(sent.header(ALLOW_ORIGIN), Some("https://a.test"));
    assert_eq!(sent.header("content-type"), None);
}

#[test]
fn test_credentials_follow_origin() {
    let client = client();

    let same = client.prepare("https://app.test/api");
    assert_eq!(same.credentials, Some(Credentials::SameOrigin));

    let relative = client.prepare("/api");
    assert_eq!(relative.credentials, None);

    let page = client.prepare(RequestOptions::new());
    assert_eq!(page.url, "https://app.test/inbox");
    assert_eq!(page.credentials, Some(Credentials::SameOrigin));
}

#[test]
fn test_custom_defaults() {
    let defaults = RequestDefaults {
        method: "post".into(),
        allow_origin: None,
        ..RequestDefaults::default()
    };
    let client = client().with_defaults(defaults);

    let sent = client.prepare("/x");
    assert_eq!(sent.method, "POST");
    assert_eq!(sent.header(ALLOW_ORIGIN), None);
}

#[test]
fn test_free_function_uses_default_settings() {
    let transport = MockTransport::new();
    transport.reply("/ping", MockResponse::ok("text/plain", "pong"));

    let body = pollster::block_on(request(&transport, &location(), "/ping")).unwrap();
    assert_eq!(body.as_text(), Some("pong"));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.requests()[0].method, "GET");
}
