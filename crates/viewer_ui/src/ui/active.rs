//! Active UI session marker
//!
//! At most one UI session may be between `begin_ui` and `end_ui` on a thread
//! at any time. The marker only catches protocol misuse (nested or
//! overlapping frames); it does not coordinate threads.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use super::UiError;

/// Identity of one UI session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// A fresh, never reused id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

thread_local! {
    static ACTIVE: Cell<Option<SessionId>> = const { Cell::new(None) };
}

/// Mark `id` as the active session
///
/// # Errors
/// [`UiError::SessionAlreadyActive`] if any session (including `id`) is
/// already marked.
pub fn mark(id: SessionId) -> Result<(), UiError> {
    ACTIVE.with(|active| {
        if active.get().is_some() {
            return Err(UiError::SessionAlreadyActive);
        }
        active.set(Some(id));
        Ok(())
    })
}

/// Clear the marker set by `id`
///
/// # Errors
/// [`UiError::NoActiveSession`] if `id` is not the marked session; the
/// marker is left untouched in that case.
pub fn clear(id: SessionId) -> Result<(), UiError> {
    ACTIVE.with(|active| {
        if active.get() != Some(id) {
            return Err(UiError::NoActiveSession);
        }
        active.set(None);
        Ok(())
    })
}

/// Currently marked session
pub fn current() -> Option<SessionId> {
    ACTIVE.with(Cell::get)
}
