//! # CORS Headers
//!
//! Every API response carries the same CORS header set. The allowed
//! origin echoes the request's `Origin` header when present.

use actix_web::http::header::{
    HeaderName, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ORIGIN,
};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, X-API-Key, Authorization";
/// Preflight cache lifetime: one day.
pub const MAX_AGE_SECS: u32 = 86_400;

/// Build the CORS header set for an optional request origin.
pub fn cors_headers(origin: Option<&str>) -> [(HeaderName, String); 4] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, origin.unwrap_or("*").to_string()),
        (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS.to_string()),
        (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS.to_string()),
        (ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECS.to_string()),
    ]
}

/// The request's `Origin` header, if it is valid UTF-8 and non-empty.
pub fn request_origin(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Start a response with the CORS headers for this request applied.
pub fn cors_response(req: &HttpRequest, status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    for header in cors_headers(request_origin(req)) {
        builder.insert_header(header);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_wildcard_without_origin() {
        let headers = cors_headers(None);
        assert_eq!(headers[0], (ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()));
        assert_eq!(headers[1].1, "GET, POST, OPTIONS");
        assert_eq!(headers[2].1, "Content-Type, X-API-Key, Authorization");
        assert_eq!(headers[3].1, "86400");
    }

    #[test]
    fn test_echoes_origin() {
        let headers = cors_headers(Some("https://school.example"));
        assert_eq!(headers[0].1, "https://school.example");
    }

    #[test]
    fn test_cors_response_applies_headers() {
        let req = TestRequest::default()
            .insert_header((ORIGIN, "https://school.example"))
            .to_http_request();
        let response = cors_response(&req, StatusCode::OK).finish();

        let get = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        assert_eq!(get(ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(), Some("https://school.example"));
        assert_eq!(get(ACCESS_CONTROL_MAX_AGE).as_deref(), Some("86400"));
    }
}
