// src/progress.rs
/// Lightweight progress reporting used by ingestion.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of events.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One event source produced `found` names.
    fn item_done(&mut self, _code: &str, _found: usize) {}

    /// One event source contributed nothing (unreadable, blocked, empty).
    fn item_failed(&mut self, _code: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
