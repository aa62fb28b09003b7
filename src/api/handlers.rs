// Reservation endpoint handlers module

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use super::response::{error_response, json_response, store_error_response};
use super::types::{DeletedResponse, ReservationsSnapshot};
use crate::config::AppState;
use crate::logger;
use crate::store::{parse_slot_time, Category, RawBooking, ReservationStore, StoreError};

type Params = HashMap<String, String>;

/// GET /api/reservations — both courts, or one with `?courtType=`
pub async fn handle_list(
    params: &Params,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let store = state.store.read().await;

    match params.get("courtType") {
        None => {
            let snapshot = ReservationsSnapshot {
                basketball: store.list(Category::Basketball),
                tennis: store.list(Category::Tennis),
            };
            logger::log_api_request("GET", "/api/reservations", 200);
            json_response(StatusCode::OK, &snapshot)
        }
        Some(raw) => match Category::parse(raw) {
            Some(court) => {
                logger::log_api_request("GET", "/api/reservations", 200);
                json_response(StatusCode::OK, &store.list(court))
            }
            None => {
                logger::log_api_request("GET", "/api/reservations", 400);
                Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    "Please select the court type",
                ))
            }
        },
    }
}

/// POST /api/reservations — create a booking.
///
/// Inputs come from query parameters (the courts UI) or, with no query
/// string, from a JSON body (the calendar clients). The handler sequences
/// validate → conflict check → create under one write guard so the
/// check-then-act region is atomic.
pub async fn handle_create(
    req: Request<hyper::body::Incoming>,
    params: &Params,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let input = if params.is_empty() {
        match read_json_body(req).await {
            Ok(input) => input,
            Err(message) => {
                logger::log_api_request("POST", "/api/reservations", 400);
                return Ok(error_response(StatusCode::BAD_REQUEST, message));
            }
        }
    } else {
        booking_from_params(params)
    };

    let request = match ReservationStore::validate(&input) {
        Ok(request) => request,
        Err(e) => {
            logger::log_api_request("POST", "/api/reservations", 400);
            return Ok(store_error_response(&e));
        }
    };

    let mut store = state.store.write().await;
    if store.has_conflict(request.court_type, request.start_time, request.end_time) {
        logger::log_api_request("POST", "/api/reservations", 409);
        return Ok(store_error_response(&StoreError::Conflict(
            "Time conflict: Court is already booked for this time slot".to_string(),
        )));
    }

    let reservation = store.create(request);
    state.store_file.save(&store);
    drop(store);

    logger::log_api_request("POST", "/api/reservations", 201);
    json_response(StatusCode::CREATED, &reservation)
}

/// DELETE /api/reservations — exact-match contract.
///
/// Removal is keyed by the full court/start/end/student tuple. Only the
/// court type is validated up front; times that are missing or unparseable
/// simply match nothing.
pub async fn handle_delete_exact(
    params: &Params,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let Some(court) = params.get("courtType").and_then(|raw| Category::parse(raw)) else {
        logger::log_api_request("DELETE", "/api/reservations", 400);
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            "Court type is required to delete",
        ));
    };

    let start = params.get("startTime").and_then(|raw| parse_slot_time(raw));
    let end = params.get("endTime").and_then(|raw| parse_slot_time(raw));
    let student = params.get("studentId");

    let mut store = state.store.write().await;
    let result = match (start, end, student) {
        (Some(start), Some(end), Some(student)) => {
            store.remove_exact(court, start, end, student)
        }
        _ => Err(StoreError::NotFound(
            "No matching reservation found".to_string(),
        )),
    };

    match result {
        Ok(deleted) => {
            state.store_file.save(&store);
            drop(store);
            logger::log_api_request("DELETE", "/api/reservations", 200);
            json_response(StatusCode::OK, &DeletedResponse::new(deleted))
        }
        Err(e) => {
            logger::log_api_request("DELETE", "/api/reservations", 404);
            Ok(store_error_response(&e))
        }
    }
}

/// DELETE /api/reservations/{index} — positional contract.
///
/// `{index}` is a 0-based position in the court's current listing, the
/// court given by `?courtType=`. Positions shift after each removal, so
/// clients re-fetch the listing between deletes.
pub async fn handle_delete_index(
    path: &str,
    params: &Params,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let index_raw = path
        .strip_prefix("/api/reservations/")
        .unwrap_or_default();
    let Ok(index) = index_raw.parse::<usize>() else {
        logger::log_api_request("DELETE", path, 400);
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid index"));
    };

    let Some(court) = params.get("courtType").and_then(|raw| Category::parse(raw)) else {
        logger::log_api_request("DELETE", path, 400);
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            "Court type is required to delete",
        ));
    };

    let mut store = state.store.write().await;
    match store.remove_at(court, index) {
        Ok(deleted) => {
            state.store_file.save(&store);
            drop(store);
            logger::log_api_request("DELETE", path, 200);
            json_response(StatusCode::OK, &DeletedResponse::new(deleted))
        }
        Err(e) => {
            logger::log_api_request("DELETE", path, 400);
            Ok(store_error_response(&e))
        }
    }
}

/// Collect and parse a JSON request body into raw booking input
async fn read_json_body(req: Request<hyper::body::Incoming>) -> Result<RawBooking, &'static str> {
    let body = req
        .collect()
        .await
        .map_err(|_| "Failed to read request body")?
        .to_bytes();
    serde_json::from_slice(&body).map_err(|_| "Invalid JSON")
}

fn booking_from_params(params: &Params) -> RawBooking {
    RawBooking {
        court_type: params.get("courtType").cloned(),
        start_time: params.get("startTime").cloned(),
        end_time: params.get("endTime").cloned(),
        student_id: params.get("studentId").cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_from_params() {
        let mut params = Params::new();
        params.insert("courtType".to_string(), "Tennis".to_string());
        params.insert("startTime".to_string(), "2026-03-01T09:00".to_string());

        let input = booking_from_params(&params);
        assert_eq!(input.court_type.as_deref(), Some("Tennis"));
        assert_eq!(input.start_time.as_deref(), Some("2026-03-01T09:00"));
        assert!(input.end_time.is_none());
        assert!(input.student_id.is_none());
    }
}
