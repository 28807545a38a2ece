//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::http::Method;
use actix_web::{web, FromRequest, Handler, HttpRequest, Resource, Responder};

use super::handlers;

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /                         GET  - API information
/// └── /api
///     ├── /hello            GET  - Liveness probe
///     ├── /create-badge     POST - Mint a badge
///     ├── /update-progress  POST - Update badge progress
///     ├── /get-badge        POST - Read a badge
///     ├── /get-balance      POST - Address balance
///     ├── /generate-wallet  POST - New keypair
///     └── /test             GET  - Connection check
/// ```
///
/// Every ledger endpoint also answers `OPTIONS` (CORS preflight) and
/// rejects any other method with 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint - API information
        .route("/", web::get().to(handlers::api_info))
        .service(
            web::scope("/api")
                .route("/hello", web::get().to(handlers::hello))
                .service(endpoint("/create-badge", Method::POST, handlers::create_badge))
                .service(endpoint("/update-progress", Method::POST, handlers::update_progress))
                .service(endpoint("/get-badge", Method::POST, handlers::get_badge))
                .service(endpoint("/get-balance", Method::POST, handlers::get_balance))
                .service(endpoint("/generate-wallet", Method::POST, handlers::generate_wallet))
                .service(endpoint("/test", Method::GET, handlers::connection_test)),
        );
}

/// A resource serving exactly one method, plus preflight and 405.
fn endpoint<F, Args>(path: &str, method: Method, handler: F) -> Resource
where
    F: Handler<Args>,
    Args: FromRequest + 'static,
    F::Output: Responder + 'static,
{
    let allowed = method.to_string();

    web::resource(path)
        .route(web::method(Method::OPTIONS).to(handlers::preflight))
        .route(web::method(method).to(handler))
        .default_service(web::to(move |req: HttpRequest| {
            let allowed = allowed.clone();
            async move { handlers::method_not_allowed(&req, &allowed) }
        }))
}
