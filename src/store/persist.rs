// Store persistence module
// Snapshots the reservation ledgers to a flat JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Category, Reservation};
use super::ReservationStore;
use crate::logger;

/// On-disk shape: both courts keyed by name, mirroring the GET snapshot
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerSnapshot {
    #[serde(default)]
    basketball: Vec<Reservation>,
    #[serde(default)]
    tennis: Vec<Reservation>,
}

/// Flat-file backing for the reservation store.
///
/// The file is read once at startup and rewritten in full after every
/// mutation. Write failures are logged and swallowed; the in-memory store
/// is the source of truth for the rest of the process lifetime.
pub struct StoreFile {
    path: Option<PathBuf>,
}

impl StoreFile {
    pub fn new(data_file: Option<&str>) -> Self {
        Self {
            path: data_file.map(PathBuf::from),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Load the store from the backing file.
    ///
    /// A missing file or unparseable content yields an empty store, logged
    /// so the operator knows a fresh ledger was started.
    pub fn load(&self) -> ReservationStore {
        let Some(path) = self.path.as_deref() else {
            return ReservationStore::new();
        };

        match read_snapshot(path) {
            Some(snapshot) => {
                logger::log_store_loaded(
                    path,
                    snapshot.basketball.len() + snapshot.tennis.len(),
                );
                ReservationStore::from_records(snapshot.basketball, snapshot.tennis)
            }
            None => ReservationStore::new(),
        }
    }

    /// Rewrite the backing file from the current store contents.
    ///
    /// Serialization is pretty-printed (2-space indent) so the file stays
    /// human-readable. Failures are logged, never raised to the caller.
    pub fn save(&self, store: &ReservationStore) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        let snapshot = LedgerSnapshot {
            basketball: store.list(Category::Basketball).to_vec(),
            tennis: store.list(Category::Tennis).to_vec(),
        };

        let content = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                logger::log_store_save_failed(path, &e.to_string());
                return;
            }
        };

        if let Err(e) = fs::write(path, content + "\n") {
            logger::log_store_save_failed(path, &e.to_string());
        }
    }
}

fn read_snapshot(path: &Path) -> Option<LedgerSnapshot> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            logger::log_store_load_failed(path, &e.to_string());
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            logger::log_store_load_failed(path, &e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{parse_slot_time, BookingRequest};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("courtbook-{}-{name}", std::process::id()))
    }

    fn booked_store() -> ReservationStore {
        let mut store = ReservationStore::new();
        store.create(BookingRequest {
            court_type: Category::Tennis,
            start_time: parse_slot_time("2026-03-01T09:00").unwrap(),
            end_time: parse_slot_time("2026-03-01T09:30").unwrap(),
            student_id: "S1".to_string(),
        });
        store
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let path = temp_path("missing.json");
        let file = StoreFile::new(path.to_str());
        let store = file.load();
        assert!(store.list(Category::Basketball).is_empty());
        assert!(store.list(Category::Tennis).is_empty());
    }

    #[test]
    fn test_invalid_json_loads_empty() {
        let path = temp_path("invalid.json");
        fs::write(&path, "not json at all").unwrap();
        let file = StoreFile::new(path.to_str());
        let store = file.load();
        assert!(store.list(Category::Tennis).is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = temp_path("roundtrip.json");
        let file = StoreFile::new(path.to_str());
        file.save(&booked_store());

        let reloaded = file.load();
        let tennis = reloaded.list(Category::Tennis);
        assert_eq!(tennis.len(), 1);
        assert_eq!(tennis[0].id, 1);
        assert_eq!(tennis[0].student_id, "S1");

        // Pretty-printed with the wire field names
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("  \"tennis\""));
        assert!(content.contains("\"startTime\": \"2026-03-01T09:00\""));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_store_file_is_inert() {
        let file = StoreFile::new(None);
        assert!(!file.is_enabled());
        file.save(&booked_store());
        let store = file.load();
        assert!(store.list(Category::Tennis).is_empty());
    }
}
