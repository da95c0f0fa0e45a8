//! Native handle to owner lookup
//!
//! Every native event arrives tagged with a [`NativeHandle`]. The registry
//! turns that tag back into the owning object. Entries are weak: the registry
//! never keeps an owner alive, and an owner that went away without
//! unregistering resolves exactly like a missing entry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::{NativeHandle, Window, WindowError};

/// Association between native handles and their owners
pub struct Registry<T> {
    entries: RefCell<HashMap<NativeHandle, Weak<T>>>,
}

/// The registry used for [`Window`] dispatch
pub type WindowRegistry = Registry<RefCell<Window>>;

impl<T> Registry<T> {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Associate `handle` with `owner`
    ///
    /// # Errors
    /// [`WindowError::DuplicateHandle`] if a live owner is already registered
    /// under `handle`. A stale entry (owner already dropped) is replaced.
    pub fn register(&self, handle: NativeHandle, owner: &Rc<T>) -> Result<(), WindowError> {
        let mut entries = self.entries.borrow_mut();
        if entries
            .get(&handle)
            .is_some_and(|existing| existing.strong_count() > 0)
        {
            return Err(WindowError::DuplicateHandle(handle));
        }
        entries.insert(handle, Rc::downgrade(owner));
        log::trace!("Registered window {handle}");
        Ok(())
    }

    /// Owner registered under `handle`
    ///
    /// # Errors
    /// [`WindowError::UnknownHandle`] if nothing is registered, or the owner
    /// has already been dropped.
    pub fn resolve(&self, handle: NativeHandle) -> Result<Rc<T>, WindowError> {
        self.entries
            .borrow()
            .get(&handle)
            .and_then(Weak::upgrade)
            .ok_or(WindowError::UnknownHandle(handle))
    }

    /// Remove the association for `handle`; no-op if there is none
    pub fn unregister(&self, handle: NativeHandle) {
        if self.entries.borrow_mut().remove(&handle).is_some() {
            log::trace!("Unregistered window {handle}");
        }
    }

    /// Whether `handle` resolves to a live owner
    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Number of live owners
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|owner| owner.strong_count() > 0)
            .count()
    }

    /// Whether no live owner is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
