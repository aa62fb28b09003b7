// Application state module
// Owns the reservation store and its backing file

use std::sync::atomic::AtomicBool;
use tokio::sync::RwLock;

use super::types::Config;
use crate::store::{ReservationStore, StoreFile};

/// Application state shared across connections.
///
/// The store sits behind an `RwLock`; mutating handlers hold the write
/// guard across their whole validate → conflict-check → mutate → persist
/// sequence, which is what keeps double-booking out under concurrent
/// requests.
pub struct AppState {
    pub config: Config,
    pub store: RwLock<ReservationStore>,
    pub store_file: StoreFile,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Create `AppState`, loading the store from its backing file when one
    /// is configured
    pub fn new(config: &Config) -> Self {
        let store_file = StoreFile::new(config.store.data_file.as_deref());
        let store = store_file.load();

        Self {
            config: config.clone(),
            store: RwLock::new(store),
            store_file,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
