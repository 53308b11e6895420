use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
mod done;

pub use done::DoneFlag;

#[derive(Debug)]
struct Inner<T> {
    items: Mutex<Vec<T>>,
    len: AtomicUsize,
    done: DoneFlag,
    condvar: Condvar,
}

impl<T> Inner<T> {
    // Every holder only ever pushes, so a poisoned guard still sees a valid
    // prefix of the sequence.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Append-only sequence shared between one producer and its consumers.
///
/// Cloning the handle is cheap and every clone sees the same items, the same
/// [`DoneFlag`] and the same wake-up signal.
#[derive(Debug)]
pub struct SharedBuffer<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SharedBuffer<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(Vec::new()),
                len: AtomicUsize::new(0),
                done: DoneFlag::new(),
                condvar: Condvar::new(),
            }),
        }
    }

    pub fn append(&self, item: T) {
        let mut items = self.inner.lock();
        items.push(item);
        self.inner.len.store(items.len(), Ordering::Release);
        drop(items);
        self.inner.condvar.notify_all();
    }

    /// Length as last published by [`append`](Self::append), read without the
    /// lock. May lag behind the real length.
    pub fn len(&self) -> usize {
        self.inner.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets the done flag and wakes every blocked consumer.
    ///
    /// The flag is flipped while the lock is held so a consumer between its
    /// predicate check and its wait cannot miss the notification.
    pub fn finish(&self) -> bool {
        let items = self.inner.lock();
        let first = self.inner.done.set();
        drop(items);
        self.inner.condvar.notify_all();
        first
    }

    pub fn is_done(&self) -> bool {
        self.inner.done.is_set()
    }

    pub fn done(&self) -> &DoneFlag {
        &self.inner.done
    }
}

impl<T: Clone> SharedBuffer<T> {
    /// Newest item and the length seen in the same critical section.
    pub fn read_last(&self) -> Option<(usize, T)> {
        let items = self.inner.lock();
        items.last().cloned().map(|item| (items.len(), item))
    }

    /// Blocks until the buffer holds more than `cursor` items or the done flag
    /// is set.
    ///
    /// Returns `None` once the flag is set, even if items past `cursor` are
    /// still unread.
    pub fn wait_past(&self, cursor: usize) -> Option<(usize, T)> {
        let items = self.inner.lock();
        let items = self
            .inner
            .condvar
            .wait_while(items, |items| {
                items.len() <= cursor && !self.inner.done.is_set()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.done.is_set() {
            return None;
        }
        items.last().cloned().map(|item| (items.len(), item))
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().clone()
    }
}
