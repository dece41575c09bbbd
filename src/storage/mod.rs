//! State history persistence.
//!
//! A typed address → record store behind the narrow [`HistoryBackend`]
//! interface, with a JSON file backend and an in-memory fake.

mod history;

pub use history::{
    HistoryBackend, HistoryMap, HistoryRecord, HistoryUpdate, JsonFileBackend, MemoryBackend,
    StateHistory,
};
