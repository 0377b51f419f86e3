use std::sync::{Mutex, MutexGuard};

/// Point-in-time copy of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Bytes written to disk so far.
    pub bytes: u64,
    /// True while the transfer is still running.
    pub active: bool,
}

/// Byte count plus "transfer in progress" flag for one download, behind one mutex.
///
/// The count only grows; it is advanced after a chunk has been written, so it never
/// exceeds what is on disk.
#[derive(Debug)]
pub struct ProgressCounter {
    state: Mutex<ProgressSnapshot>,
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCounter {
    /// A fresh counter: zero bytes, active.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProgressSnapshot {
                bytes: 0,
                active: true,
            }),
        }
    }

    // A poisoned lock only means a holder panicked; the two plain fields are still valid.
    fn lock(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add `n` freshly written bytes. Saturates instead of wrapping.
    pub fn advance(&self, n: u64) {
        let mut state = self.lock();
        state.bytes = state.bytes.saturating_add(n);
    }

    pub fn bytes(&self) -> u64 {
        self.lock().bytes
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.lock()
    }

    /// Clear the active flag. Idempotent; the byte count is final afterwards.
    pub fn finish(&self) {
        self.lock().active = false;
    }
}
