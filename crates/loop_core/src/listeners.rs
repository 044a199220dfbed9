use std::ptr;
use std::sync::{Arc, Mutex};

use crate::gate::lock;

/// Model-change subscriber. Identity for [`crate::Loop::off`] is the `Arc`
/// allocation, so keep the handle you registered.
pub type Listener<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
pub fn listener<M>(f: impl Fn(&M) + Send + Sync + 'static) -> Listener<M> {
    Arc::new(f)
}

pub(crate) struct Listeners<M> {
    entries: Mutex<Vec<Listener<M>>>,
}

impl<M> Listeners<M> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: Listener<M>) {
        lock(&self.entries).push(listener);
    }

    /// Removes the earliest registration of `listener`. Returns whether one was found.
    pub(crate) fn remove(&self, listener: &Listener<M>) -> bool {
        let mut entries = lock(&self.entries);
        match entries.iter().position(|entry| same_listener(entry, listener)) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy; later `add`/`remove` calls do not affect it.
    pub(crate) fn snapshot(&self) -> Vec<Listener<M>> {
        lock(&self.entries).clone()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

fn same_listener<M>(a: &Listener<M>, b: &Listener<M>) -> bool {
    ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
