// API wire types module
// Response shapes for the reservation endpoints

use crate::store::Reservation;
use serde::Serialize;

/// GET /api/reservations response: both courts keyed by name
#[derive(Debug, Serialize)]
pub struct ReservationsSnapshot<'a> {
    pub basketball: &'a [Reservation],
    pub tennis: &'a [Reservation],
}

/// DELETE success response carrying the removed record
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub deleted: Reservation,
}

impl DeletedResponse {
    pub const fn new(deleted: Reservation) -> Self {
        Self {
            message: "Reservation deleted successfully",
            deleted,
        }
    }
}
