// API module entry
// REST surface for the reservation store

mod handlers;
mod query;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// API route handler
///
/// Dispatches to handler functions based on request path and method.
pub async fn handle_api(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let params = query::parse(req.uri().query());

    match (method, path.as_str()) {
        // All reservations, or one court's with ?courtType=
        (Method::GET, "/api/reservations") => handlers::handle_list(&params, &state).await,
        // Create from query parameters or JSON body
        (Method::POST, "/api/reservations") => {
            handlers::handle_create(req, &params, &state).await
        }
        // Exact-match delete keyed by court/start/end/student
        (Method::DELETE, "/api/reservations") => {
            handlers::handle_delete_exact(&params, &state).await
        }
        // Positional delete within one court's listing
        (Method::DELETE, p) if p.starts_with("/api/reservations/") => {
            handlers::handle_delete_index(p, &params, &state).await
        }
        // Unknown route
        (method, path) => {
            logger::log_api_request(method.as_str(), path, 404);
            Ok(response::not_found())
        }
    }
}
