use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one admitted connection.
///
/// Issued from a monotonically increasing counter, so ids are never reused
/// within a process and sort in admission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Hands out fresh [`ConnectionId`]s. Lock-free; safe to share across tasks.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> ConnectionId {
        ConnectionId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_monotonic() {
        let alloc = IdAllocator::new();
        let a = alloc.issue();
        let b = alloc.issue();
        let c = alloc.issue();
        assert!(a < b && b < c);
        assert_eq!(a.as_u64(), 1);
    }

    #[test]
    fn display_format() {
        assert_eq!(ConnectionId::from_raw(42).to_string(), "conn-42");
    }

    #[test]
    fn concurrent_issue_never_duplicates() {
        let alloc = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                std::thread::spawn(move || (0..500).map(|_| alloc.issue()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
