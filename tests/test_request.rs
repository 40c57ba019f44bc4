//! Tests for the request type and its builder.

use alcove::http::request::{Method, RequestBuilder};

#[test]
fn builder_requires_method_and_path() {
    assert!(RequestBuilder::new().build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
    assert!(
        RequestBuilder::new()
            .method(Method::GET)
            .path("/")
            .build()
            .is_ok()
    );
}

#[test]
fn version_defaults_to_http_11() {
    let request = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .build()
        .unwrap();
    assert_eq!(request.version, "HTTP/1.1");
}

#[test]
fn method_parsing_is_case_sensitive() {
    assert_eq!(Method::parse("GET"), Some(Method::GET));
    assert_eq!(Method::parse("HEAD"), Some(Method::HEAD));
    assert_eq!(Method::parse("get"), None);
    assert_eq!(Method::parse("FETCH"), None);
}

#[test]
fn path_only_strips_the_query() {
    let request = RequestBuilder::new()
        .method(Method::GET)
        .path("/files/report?download=1&pretty")
        .build()
        .unwrap();
    assert_eq!(request.path_only(), "/files/report");
    assert_eq!(request.query(), Some("download=1&pretty"));

    let plain = RequestBuilder::new()
        .method(Method::GET)
        .path("/files/report")
        .build()
        .unwrap();
    assert_eq!(plain.path_only(), "/files/report");
    assert_eq!(plain.query(), None);
}

#[test]
fn content_length_parses_or_defaults_to_zero() {
    let request = RequestBuilder::new()
        .method(Method::POST)
        .path("/")
        .header("Content-Length", "42")
        .build()
        .unwrap();
    assert_eq!(request.content_length(), 42);

    let missing = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .build()
        .unwrap();
    assert_eq!(missing.content_length(), 0);
}

#[test]
fn keep_alive_defaults_to_true_for_http_11() {
    let request = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .build()
        .unwrap();
    assert!(request.keep_alive());

    let close = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("Connection", "close")
        .build()
        .unwrap();
    assert!(!close.keep_alive());

    let keep = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("Connection", "Keep-Alive")
        .build()
        .unwrap();
    assert!(keep.keep_alive());
}

#[test]
fn connection_header_name_is_case_insensitive() {
    let close = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("connection", "close")
        .build()
        .unwrap();
    assert!(!close.keep_alive());
}
