// Reservation store module
// Owns the per-court reservation ledgers and enforces the non-overlap invariant

mod persist;
mod types;

pub use persist::StoreFile;
pub use types::{
    format_slot_time, parse_slot_time, BookingRequest, Category, RawBooking, Reservation,
    StoreError,
};

use chrono::NaiveDateTime;

/// One court's bookings plus its id counter.
///
/// Ids are handed out by a counter that only moves forward, so a deleted
/// reservation's id is never reissued within a process lifetime.
#[derive(Debug)]
struct Ledger {
    reservations: Vec<Reservation>,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            reservations: Vec::new(),
            next_id: 1,
        }
    }
}

impl Ledger {
    /// Rebuild a ledger from persisted records, resuming the counter past
    /// the highest id seen.
    fn from_records(reservations: Vec<Reservation>) -> Self {
        let next_id = reservations.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            reservations,
            next_id,
        }
    }
}

/// In-memory reservation store, one ledger per court category.
///
/// Callers sequence `validate` → `has_conflict` → `create` themselves while
/// holding a single mutable borrow, which makes the check-then-act region
/// atomic; in shared state the store sits behind a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct ReservationStore {
    basketball: Ledger,
    tennis: Ledger,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted per-court records
    pub fn from_records(basketball: Vec<Reservation>, tennis: Vec<Reservation>) -> Self {
        Self {
            basketball: Ledger::from_records(basketball),
            tennis: Ledger::from_records(tennis),
        }
    }

    fn ledger(&self, court: Category) -> &Ledger {
        match court {
            Category::Basketball => &self.basketball,
            Category::Tennis => &self.tennis,
        }
    }

    fn ledger_mut(&mut self, court: Category) -> &mut Ledger {
        match court {
            Category::Basketball => &mut self.basketball,
            Category::Tennis => &mut self.tennis,
        }
    }

    /// Validate raw booking input, fail-fast on the first violated rule.
    ///
    /// Timestamps are parsed here, at the boundary; everything downstream
    /// compares chronological values.
    pub fn validate(input: &RawBooking) -> Result<BookingRequest, StoreError> {
        let invalid = |message: &str| Err(StoreError::Validation(message.to_string()));

        let court_raw = input.court_type.as_deref().unwrap_or("");
        if court_raw.trim().is_empty() {
            return invalid("Court type is required");
        }
        let Some(court_type) = Category::parse(court_raw) else {
            return invalid("Please select the court type");
        };

        let start_raw = input.start_time.as_deref().unwrap_or("");
        if start_raw.trim().is_empty() {
            return invalid("Start time is required");
        }
        let end_raw = input.end_time.as_deref().unwrap_or("");
        if end_raw.trim().is_empty() {
            return invalid("End time is required");
        }

        let Some(start_time) = parse_slot_time(start_raw) else {
            return invalid("Start time is not a valid timestamp");
        };
        let Some(end_time) = parse_slot_time(end_raw) else {
            return invalid("End time is not a valid timestamp");
        };
        if start_time >= end_time {
            return invalid("End time must be after start time");
        }

        let student_raw = input.student_id.as_deref().unwrap_or("");
        if student_raw.trim().is_empty() {
            return invalid("Student ID is required");
        }

        Ok(BookingRequest {
            court_type,
            start_time,
            end_time,
            student_id: student_raw.to_string(),
        })
    }

    /// Whether `[start, end)` overlaps any existing reservation on `court`.
    ///
    /// Two half-open intervals are disjoint exactly when one starts at or
    /// after the other ends, so adjacent slots do not conflict.
    pub fn has_conflict(&self, court: Category, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.ledger(court)
            .reservations
            .iter()
            .any(|existing| !(start >= existing.end_time || end <= existing.start_time))
    }

    /// Append a validated booking and return the stored record.
    ///
    /// Precondition (caller-sequenced): `validate` succeeded and
    /// `has_conflict` returned false under the same borrow.
    pub fn create(&mut self, request: BookingRequest) -> Reservation {
        let ledger = self.ledger_mut(request.court_type);
        let reservation = Reservation {
            id: ledger.next_id,
            court_type: request.court_type,
            start_time: request.start_time,
            end_time: request.end_time,
            student_id: request.student_id,
        };
        ledger.next_id += 1;
        ledger.reservations.push(reservation.clone());
        reservation
    }

    /// Remove the first reservation matching all of start, end, and student.
    ///
    /// Absence leaves the ledger untouched. Removal shifts later records;
    /// ids are not reassigned.
    pub fn remove_exact(
        &mut self,
        court: Category,
        start: NaiveDateTime,
        end: NaiveDateTime,
        student_id: &str,
    ) -> Result<Reservation, StoreError> {
        let ledger = self.ledger_mut(court);
        let position = ledger.reservations.iter().position(|existing| {
            existing.start_time == start
                && existing.end_time == end
                && existing.student_id == student_id
        });
        match position {
            Some(index) => Ok(ledger.reservations.remove(index)),
            None => Err(StoreError::NotFound(
                "No matching reservation found".to_string(),
            )),
        }
    }

    /// Remove the reservation at a 0-based position in the court's listing
    pub fn remove_at(&mut self, court: Category, index: usize) -> Result<Reservation, StoreError> {
        let ledger = self.ledger_mut(court);
        if index >= ledger.reservations.len() {
            return Err(StoreError::InvalidIndex("Invalid index".to_string()));
        }
        Ok(ledger.reservations.remove(index))
    }

    /// Reservations for one court, in insertion order
    pub fn list(&self, court: Category) -> &[Reservation] {
        &self.ledger(court).reservations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(court: &str, start: &str, end: &str, student: &str) -> RawBooking {
        let field = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawBooking {
            court_type: field(court),
            start_time: field(start),
            end_time: field(end),
            student_id: field(student),
        }
    }

    fn book(
        store: &mut ReservationStore,
        court: &str,
        start: &str,
        end: &str,
        student: &str,
    ) -> Result<Reservation, StoreError> {
        let request = ReservationStore::validate(&raw(court, start, end, student))?;
        if store.has_conflict(request.court_type, request.start_time, request.end_time) {
            return Err(StoreError::Conflict(
                "Time conflict: Court is already booked for this time slot".to_string(),
            ));
        }
        Ok(store.create(request))
    }

    fn validation_message(input: &RawBooking) -> String {
        match ReservationStore::validate(input) {
            Err(StoreError::Validation(message)) => message,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_messages_are_distinct() {
        assert_eq!(
            validation_message(&raw("", "a", "b", "S1")),
            "Court type is required"
        );
        assert_eq!(
            validation_message(&raw("   ", "a", "b", "S1")),
            "Court type is required"
        );
        assert_eq!(
            validation_message(&raw("Squash", "a", "b", "S1")),
            "Please select the court type"
        );
        assert_eq!(
            validation_message(&raw("Tennis", "", "b", "S1")),
            "Start time is required"
        );
        assert_eq!(
            validation_message(&raw("Tennis", "2026-03-01T09:00", "", "S1")),
            "End time is required"
        );
        assert_eq!(
            validation_message(&raw("Tennis", "nope", "2026-03-01T09:30", "S1")),
            "Start time is not a valid timestamp"
        );
        assert_eq!(
            validation_message(&raw("Tennis", "2026-03-01T09:00", "nope", "S1")),
            "End time is not a valid timestamp"
        );
        assert_eq!(
            validation_message(&raw(
                "Tennis",
                "2026-03-01T09:30",
                "2026-03-01T09:00",
                "S1"
            )),
            "End time must be after start time"
        );
        assert_eq!(
            validation_message(&raw(
                "Tennis",
                "2026-03-01T09:00",
                "2026-03-01T09:00",
                "S1"
            )),
            "End time must be after start time"
        );
        assert_eq!(
            validation_message(&raw("Tennis", "2026-03-01T09:00", "2026-03-01T09:30", "")),
            "Student ID is required"
        );
    }

    #[test]
    fn test_non_overlapping_bookings_succeed() {
        let mut store = ReservationStore::new();
        let first = book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        let second = book(
            &mut store,
            "Tennis",
            "2026-03-01T10:00",
            "2026-03-01T10:30",
            "S2",
        )
        .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list(Category::Tennis).len(), 2);
    }

    #[test]
    fn test_overlap_is_conflict() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();

        // startA < endB and startB < endA
        let result = book(
            &mut store,
            "Tennis",
            "2026-03-01T09:15",
            "2026-03-01T09:45",
            "S2",
        );
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Containment overlaps too
        let result = book(
            &mut store,
            "Tennis",
            "2026-03-01T08:00",
            "2026-03-01T11:00",
            "S3",
        );
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.list(Category::Tennis).len(), 1);
    }

    #[test]
    fn test_adjacent_slots_do_not_conflict() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Basketball",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        book(
            &mut store,
            "Basketball",
            "2026-03-01T09:30",
            "2026-03-01T10:00",
            "S2",
        )
        .unwrap();
        assert_eq!(store.list(Category::Basketball).len(), 2);
    }

    #[test]
    fn test_courts_are_independent() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Basketball",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        // Same interval on the other court is fine
        book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        assert_eq!(store.list(Category::Basketball).len(), 1);
        assert_eq!(store.list(Category::Tennis).len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        let second = book(
            &mut store,
            "Tennis",
            "2026-03-01T10:00",
            "2026-03-01T10:30",
            "S2",
        )
        .unwrap();
        assert_eq!(second.id, 2);

        store.remove_at(Category::Tennis, 1).unwrap();
        let third = book(
            &mut store,
            "Tennis",
            "2026-03-01T11:00",
            "2026-03-01T11:30",
            "S3",
        )
        .unwrap();
        // A count-based scheme would hand out 2 again here
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_remove_exact_round_trip() {
        let mut store = ReservationStore::new();
        let created = book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();

        let removed = store
            .remove_exact(
                Category::Tennis,
                created.start_time,
                created.end_time,
                "S1",
            )
            .unwrap();
        assert_eq!(removed, created);
        assert!(store.list(Category::Tennis).is_empty());
    }

    #[test]
    fn test_remove_exact_absent_is_untouched() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();

        let start = parse_slot_time("2026-03-01T09:00").unwrap();
        let end = parse_slot_time("2026-03-01T09:30").unwrap();

        // Wrong student
        let result = store.remove_exact(Category::Tennis, start, end, "S2");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        // Wrong court
        let result = store.remove_exact(Category::Basketball, start, end, "S1");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.list(Category::Tennis).len(), 1);

        // Deleting twice: second attempt reports not found
        store.remove_exact(Category::Tennis, start, end, "S1").unwrap();
        let result = store.remove_exact(Category::Tennis, start, end, "S1");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_exact_matches_seconds_form() {
        // "09:00" and "09:00:00" are the same instant once parsed
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        let start = parse_slot_time("2026-03-01T09:00:00").unwrap();
        let end = parse_slot_time("2026-03-01T09:30:00").unwrap();
        assert!(store.remove_exact(Category::Tennis, start, end, "S1").is_ok());
    }

    #[test]
    fn test_remove_at_bounds() {
        let mut store = ReservationStore::new();
        book(
            &mut store,
            "Basketball",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        let second = book(
            &mut store,
            "Basketball",
            "2026-03-01T10:00",
            "2026-03-01T10:30",
            "S2",
        )
        .unwrap();

        let result = store.remove_at(Category::Basketball, 2);
        assert!(matches!(result, Err(StoreError::InvalidIndex(_))));

        let removed = store.remove_at(Category::Basketball, 0).unwrap();
        assert_eq!(removed.student_id, "S1");
        // Positions shift after removal
        assert_eq!(store.list(Category::Basketball)[0], second);
        let result = store.remove_at(Category::Basketball, 1);
        assert!(matches!(result, Err(StoreError::InvalidIndex(_))));
    }

    #[test]
    fn test_example_scenario() {
        // Tennis: book 09:00-09:30 as S1, overlap attempt conflicts, exact
        // delete empties the court again.
        let mut store = ReservationStore::new();
        let created = book(
            &mut store,
            "Tennis",
            "2026-03-01T09:00",
            "2026-03-01T09:30",
            "S1",
        )
        .unwrap();
        assert_eq!(created.id, 1);

        let result = book(
            &mut store,
            "Tennis",
            "2026-03-01T09:15",
            "2026-03-01T09:45",
            "S2",
        );
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        store
            .remove_exact(Category::Tennis, created.start_time, created.end_time, "S1")
            .unwrap();
        assert!(store.list(Category::Tennis).is_empty());
    }

    #[test]
    fn test_from_records_resumes_counter() {
        let start = parse_slot_time("2026-03-01T09:00").unwrap();
        let end = parse_slot_time("2026-03-01T09:30").unwrap();
        let record = Reservation {
            id: 7,
            court_type: Category::Tennis,
            start_time: start,
            end_time: end,
            student_id: "S1".to_string(),
        };

        let mut store = ReservationStore::from_records(Vec::new(), vec![record]);
        let created = book(
            &mut store,
            "Tennis",
            "2026-03-01T10:00",
            "2026-03-01T10:30",
            "S2",
        )
        .unwrap();
        assert_eq!(created.id, 8);
        // The empty court still starts at 1
        let created = book(
            &mut store,
            "Basketball",
            "2026-03-01T10:00",
            "2026-03-01T10:30",
            "S2",
        )
        .unwrap();
        assert_eq!(created.id, 1);
    }
}
