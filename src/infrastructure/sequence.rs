use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide id source shared by users, jobs and session tokens.
///
/// Ids are rendered as eight lowercase hex digits and are unique for the
/// lifetime of one server instance.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let id = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{id:08x}")
    }
}
