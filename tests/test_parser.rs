//! Tests for the incremental HTTP request parser.

use alcove::http::parser::{ParseError, parse_http_request};
use alcove::http::request::Method;

#[test]
fn parses_a_simple_get() {
    let raw = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";

    let (request, consumed) = parse_http_request(raw).unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/index.html");
    assert_eq!(request.version, "HTTP/1.1");
    assert_eq!(request.header("Host"), Some("example.com"));
    assert_eq!(consumed, raw.len());
}

#[test]
fn incomplete_headers_ask_for_more_data() {
    let raw = b"GET / HTTP/1.1\r\nHost: exa";
    assert!(matches!(
        parse_http_request(raw),
        Err(ParseError::Incomplete)
    ));
}

#[test]
fn incomplete_body_asks_for_more_data() {
    let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
    assert!(matches!(
        parse_http_request(raw),
        Err(ParseError::Incomplete)
    ));
}

#[test]
fn body_is_read_to_content_length() {
    let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 7\r\n\r\npayload";

    let (request, consumed) = parse_http_request(raw).unwrap();
    assert_eq!(request.body, b"payload");
    assert_eq!(consumed, raw.len());
}

#[test]
fn unknown_method_is_rejected() {
    let raw = b"BREW /coffee HTTP/1.1\r\n\r\n";
    assert!(matches!(
        parse_http_request(raw),
        Err(ParseError::InvalidMethod)
    ));
}

#[test]
fn malformed_header_is_rejected() {
    let raw = b"GET / HTTP/1.1\r\nNoColonHere\r\n\r\n";
    assert!(matches!(
        parse_http_request(raw),
        Err(ParseError::InvalidHeader)
    ));
}

#[test]
fn invalid_content_length_is_rejected() {
    let raw = b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
    assert!(matches!(
        parse_http_request(raw),
        Err(ParseError::InvalidContentLength)
    ));
}

#[test]
fn pipelined_requests_consume_only_the_first() {
    let raw = b"GET /first HTTP/1.1\r\n\r\nGET /second HTTP/1.1\r\n\r\n";

    let (request, consumed) = parse_http_request(raw).unwrap();
    assert_eq!(request.path, "/first");

    let (request, _) = parse_http_request(&raw[consumed..]).unwrap();
    assert_eq!(request.path, "/second");
}

#[test]
fn head_requests_parse() {
    let raw = b"HEAD /testfile.json HTTP/1.1\r\n\r\n";

    let (request, _) = parse_http_request(raw).unwrap();
    assert_eq!(request.method, Method::HEAD);
}
