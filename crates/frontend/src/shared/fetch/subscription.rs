//! Single-threaded event streams with explicit subscription handles
//!
//! A [`Subscription`] is a scoped resource: `unsubscribe()` may be called
//! any number of times, and dropping the handle unsubscribes as well.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Listeners<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Broadcast stream of notifications of type `T`
pub struct EventStream<T> {
    inner: Rc<RefCell<Listeners<T>>>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventStream<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<Listeners<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let removed = {
                    let mut inner = inner.borrow_mut();
                    inner
                        .entries
                        .iter()
                        .position(|(entry_id, _)| *entry_id == id)
                        .map(|pos| inner.entries.remove(pos))
                };
                drop(removed);
            }
        })
    }

    /// Delivers `value` to every current listener.
    ///
    /// Listeners may subscribe or unsubscribe from inside the callback; a
    /// listener removed during delivery is not called afterwards.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Listener<T>)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            if self.inner.borrow().contains(id) {
                listener(value);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Drops every listener; outstanding handles become no-ops.
    pub fn clear(&self) {
        // take the entries out first so listener destructors run unborrowed
        let entries = std::mem::take(&mut self.inner.borrow_mut().entries);
        drop(entries);
    }
}

/// Handle to a registered listener
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let stream = EventStream::<u32>::new();
        let sum = Rc::new(Cell::new(0));
        let a = {
            let sum = Rc::clone(&sum);
            stream.subscribe(move |v| sum.set(sum.get() + v))
        };
        let b = {
            let sum = Rc::clone(&sum);
            stream.subscribe(move |v| sum.set(sum.get() + v * 10))
        };
        stream.emit(&2);
        assert_eq!(sum.get(), 22);
        assert_eq!(stream.listener_count(), 2);
        drop((a, b));
        assert_eq!(stream.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let stream = EventStream::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let mut sub = {
            let hits = Rc::clone(&hits);
            stream.subscribe(move |_| hits.set(hits.get() + 1))
        };
        stream.emit(&());
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(sub.is_closed());
        stream.emit(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_handle_outlives_stream() {
        let stream = EventStream::<()>::new();
        let mut sub = stream.subscribe(|_| {});
        drop(stream);
        sub.unsubscribe();
        assert!(sub.is_closed());
    }

    #[test]
    fn test_listener_removed_during_emit_is_skipped() {
        let stream = EventStream::<()>::new();
        let second_hits = Rc::new(Cell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = {
            let second = Rc::clone(&second);
            stream.subscribe(move |_| {
                if let Some(mut sub) = second.borrow_mut().take() {
                    sub.unsubscribe();
                }
            })
        };
        let sub = {
            let hits = Rc::clone(&second_hits);
            stream.subscribe(move |_| hits.set(hits.get() + 1))
        };
        *second.borrow_mut() = Some(sub);

        stream.emit(&());
        assert_eq!(second_hits.get(), 0);
        assert_eq!(stream.listener_count(), 1);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let stream = EventStream::<u8>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            stream.subscribe(move |_| hits.set(hits.get() + 1))
        };
        stream.clear();
        stream.emit(&1);
        assert_eq!(hits.get(), 0);
        drop(sub);
    }
}
