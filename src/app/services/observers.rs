//! Typed observer list with disposer handles.
//!
//! Callbacks are invoked synchronously, in registration order. Each callback
//! runs in its own panic boundary so one failing subscriber cannot stop the
//! rest of a notification round.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Entry<T> {
    id: u64,
    callback: Callback<T>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Registry<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|e| e.id != id);
    }
}

/// A list of callbacks receiving `&T`.
///
/// Cloning the list yields another handle to the same entries.
pub struct Observers<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: 'static> Observers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. The same closure logic registered twice is two
    /// independent entries.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        registry.entries.push(Entry { id, callback });

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().remove(id);
            }
        })
    }

    /// Deliver `value` to every entry registered when the round starts.
    ///
    /// Returns how many callbacks completed without panicking. Entries
    /// removed during the round are skipped; entries added during the round
    /// wait for the next one.
    pub fn notify(&self, value: &T) -> usize {
        let snapshot: Vec<(u64, Callback<T>)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            // Already running further up the stack (re-entrant notify).
            let Ok(mut guard) = callback.try_borrow_mut() else {
                tracing::warn!(
                    target: "roomledger::theme",
                    subscriber = id,
                    "Subscriber is already running, skipping nested notification"
                );
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| (&mut *guard)(value))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::error!(
                        target: "roomledger::theme",
                        subscriber = id,
                        error = %panic_message(payload.as_ref()),
                        "Theme subscriber failed"
                    );
                }
            }
        }
        delivered
    }
}

impl<T> Observers<T> {
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Disposer returned by `subscribe`.
///
/// Dropping a `Subscription` leaves the callback registered; removal only
/// happens through [`unsubscribe`](Subscription::unsubscribe).
#[must_use = "keep the Subscription to be able to unsubscribe later"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new<F: FnOnce() + 'static>(remove: F) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// A disposer with nothing to remove.
    pub fn empty() -> Self {
        Self { remove: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
