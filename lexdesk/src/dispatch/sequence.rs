use std::sync::atomic::{AtomicU64, Ordering};

/// Tag handed out when a query is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Per-channel dispatch counter. Only the response to the most recently
/// issued ticket may be rendered.
#[derive(Debug, Default)]
pub struct QuerySequence {
    latest: AtomicU64,
}

impl QuerySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
