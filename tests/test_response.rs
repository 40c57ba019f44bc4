//! Tests for the response type, builder and status codes.

use alcove::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn status_codes_and_reason_phrases() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Found.as_u16(), 302);
    assert_eq!(StatusCode::TemporaryRedirect.as_u16(), 307);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::BadGateway.as_u16(), 502);
    assert_eq!(StatusCode::ServiceUnavailable.as_u16(), 503);
    assert_eq!(StatusCode::GatewayTimeout.as_u16(), 504);

    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Found.reason_phrase(), "Found");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn upstream_status_mapping() {
    assert_eq!(StatusCode::from_u16(200), StatusCode::Ok);
    assert_eq!(StatusCode::from_u16(404), StatusCode::NotFound);
    // Unknown codes collapse to the nearest supported one.
    assert_eq!(StatusCode::from_u16(301), StatusCode::Found);
    assert_eq!(StatusCode::from_u16(418), StatusCode::BadRequest);
    assert_eq!(StatusCode::from_u16(599), StatusCode::BadGateway);
}

#[test]
fn builder_sets_content_length_automatically() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"hello".to_vec())
        .build();
    assert_eq!(response.headers.get("Content-Length").unwrap(), "5");
}

#[test]
fn builder_keeps_an_explicit_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "11")
        .build();
    assert_eq!(response.headers.get("Content-Length").unwrap(), "11");
}

#[test]
fn builder_collects_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(b"{}".to_vec())
        .build();
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "application/json"
    );
    assert_eq!(response.headers.get("Cache-Control").unwrap(), "no-cache");
}

#[test]
fn convenience_constructors() {
    assert_eq!(Response::ok("body").status, StatusCode::Ok);
    assert_eq!(Response::forbidden().status, StatusCode::Forbidden);
    assert_eq!(Response::not_found().status, StatusCode::NotFound);
    assert_eq!(
        Response::method_not_allowed().status,
        StatusCode::MethodNotAllowed
    );
    assert_eq!(
        Response::internal_error().status,
        StatusCode::InternalServerError
    );
}

#[test]
fn redirects_carry_a_location() {
    let response = Response::redirect(StatusCode::Found, "/docs/");
    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.headers.get("Location").unwrap(), "/docs/");
    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}
