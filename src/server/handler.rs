//! Static-file request handling.
//!
//! The routing layer in front of the resolver: mount-prefix stripping,
//! directory redirects, percent-decoding, and mapping resolution outcomes to
//! HTTP responses (200, 302, 403, 404, 405).

use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::http::mime::content_type_for;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::resolve::backend::ListingEntry;
use crate::resolve::{ResolutionResult, ResourceDescriptor, ResourceLocator, ResourceResolver};

/// Serves resolved resources under a mount prefix.
pub struct StaticHandler {
    resolver: ResourceResolver,
    /// Mount prefix, normalized: starts with '/', no trailing '/' except "/".
    resource_path: String,
    /// Health endpoint path; empty means disabled.
    health_path: String,
}

impl StaticHandler {
    pub fn new(resolver: ResourceResolver, resource_path: String, health_path: String) -> Self {
        Self {
            resolver,
            resource_path,
            health_path,
        }
    }

    pub async fn handle(&self, req: &Request) -> Response {
        // The health endpoint answers ahead of resource routing.
        if !self.health_path.is_empty()
            && req.method == Method::GET
            && req.path_only() == self.health_path
        {
            return health_response();
        }

        let decoded = match percent_decode_str(req.path_only()).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => return Response::bad_request(),
        };

        // Directory redirect: a request for the bare mount prefix gets sent
        // to the slash-terminated form before method routing happens, so it
        // applies to every method.
        let relative = match self.strip_prefix(&decoded) {
            PrefixMatch::Exact => {
                let location = format!("{}/", self.resource_path);
                debug!(path = %decoded, location = %location, "directory redirect");
                let status = match req.method {
                    Method::GET | Method::HEAD => StatusCode::Found,
                    _ => StatusCode::TemporaryRedirect,
                };
                return Response::redirect(status, location);
            }
            PrefixMatch::Inside(relative) => relative,
            PrefixMatch::Outside => return Response::not_found(),
        };

        if !matches!(req.method, Method::GET | Method::HEAD) {
            return Response::method_not_allowed();
        }

        let response = match self.resolver.resolve(&relative) {
            ResolutionResult::NotFound => Response::not_found(),
            ResolutionResult::Found(descriptor) if descriptor.is_directory => {
                if !self.resolver.config().directory_listing {
                    Response::forbidden()
                } else if !decoded.ends_with('/') {
                    // Listing links are relative; make sure the browser is on
                    // the slash-terminated URL first.
                    Response::redirect(StatusCode::Found, format!("{decoded}/"))
                } else {
                    self.render_listing(&descriptor)
                }
            }
            ResolutionResult::Found(descriptor) => self.serve_file(&descriptor).await,
        };

        finish(req.method, response)
    }

    fn strip_prefix(&self, path: &str) -> PrefixMatch {
        if self.resource_path == "/" {
            let path = if path.is_empty() { "/" } else { path };
            return PrefixMatch::Inside(path.to_string());
        }
        if path == self.resource_path {
            return PrefixMatch::Exact;
        }
        match path.strip_prefix(&format!("{}/", self.resource_path)) {
            Some(rest) => PrefixMatch::Inside(format!("/{rest}")),
            None => PrefixMatch::Outside,
        }
    }

    async fn serve_file(&self, descriptor: &ResourceDescriptor) -> Response {
        let body = match &descriptor.locator {
            ResourceLocator::Embedded(contents) => contents.to_vec(),
            ResourceLocator::File(path) => match tokio::fs::read(path).await {
                Ok(body) => body,
                // The file disappeared between lookup and read; same outcome
                // as a lookup miss.
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "resource read failed");
                    return Response::not_found();
                }
            },
        };

        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type_for(&descriptor.path))
            .body(body)
            .build()
    }

    fn render_listing(&self, descriptor: &ResourceDescriptor) -> Response {
        let entries = self
            .resolver
            .backend()
            .list(&descriptor.path)
            .unwrap_or_default();
        let html = render_listing_html(&descriptor.path, &entries);

        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html.into_bytes())
            .build()
    }
}

enum PrefixMatch {
    /// The bare mount prefix itself, without a trailing separator.
    Exact,
    /// Inside the mount; carries the root-relative remainder.
    Inside(String),
    Outside,
}

fn health_response() -> Response {
    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "application/json")
        .body(b"{ \"status\": \"UP\" }".to_vec())
        .build()
}

/// HEAD responses keep their headers, including Content-Length, but carry no
/// body.
fn finish(method: Method, mut response: Response) -> Response {
    if method == Method::HEAD {
        response.body.clear();
    }
    response
}

fn render_listing_html(path: &str, entries: &[ListingEntry]) -> String {
    let display = escape_html(path);
    let mut html = format!(
        "<!doctype html>\n<html>\n<head><title>Index of {display}</title></head>\n\
         <body>\n<h1>Index of {display}</h1>\n<ul>\n"
    );
    if path != "/" {
        html.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for entry in entries {
        let name = escape_html(&entry.name);
        let suffix = if entry.is_directory { "/" } else { "" };
        let size = entry
            .size
            .map(|s| format!(" ({s} bytes)"))
            .unwrap_or_default();
        html.push_str(&format!(
            "<li><a href=\"{name}{suffix}\">{name}{suffix}</a>{size}</li>\n"
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
