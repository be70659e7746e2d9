//! Listener registry with synchronous, ordered broadcast.

use parking_lot::Mutex;
use std::sync::Arc;

/// Callback invoked with a borrowed payload on each broadcast.
pub type ListenerCallback<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Internal registry state.
///
/// Entries are `(id, callback)` pairs keyed by a monotonically increasing id,
/// so a broadcast can iterate a snapshot while removals edit the live list.
struct RegistryInner<P> {
    entries: Vec<(u64, ListenerCallback<P>)>,
    next_id: u64,
}

/// Handle for a registered listener.
///
/// Dropping the handle (or calling [`remove`](SubscriptionHandle::remove))
/// unsubscribes immediately: broadcasts already past the listener are
/// unaffected, but no future broadcast invokes it, including a broadcast
/// currently in flight that has not yet reached it.
pub struct SubscriptionHandle<P> {
    id: u64,
    inner: Arc<Mutex<RegistryInner<P>>>,
    detached: bool,
}

impl<P> SubscriptionHandle<P> {
    /// Unsubscribe the listener.
    ///
    /// Equivalent to dropping the handle; provided for call sites where the
    /// intent should be explicit.
    pub fn remove(mut self) {
        self.unsubscribe();
        self.detached = true;
    }

    /// Consume the handle, leaving the listener registered for the lifetime
    /// of the registry.
    pub fn detach(mut self) {
        self.detached = true;
    }

    fn unsubscribe(&self) {
        self.inner.lock().entries.retain(|(id, _)| *id != self.id);
    }
}

impl<P> Drop for SubscriptionHandle<P> {
    fn drop(&mut self) {
        if !self.detached {
            self.unsubscribe();
        }
    }
}

/// Ordered registry of listeners for a payload type `P`.
///
/// Listeners are invoked synchronously, in subscription order, within the
/// caller of [`notify`](ListenerRegistry::notify). The registry lock is never
/// held across a callback, so listeners may subscribe or unsubscribe from
/// within a broadcast.
///
/// # Examples
///
/// ```rust
/// use fillrate::notify::ListenerRegistry;
///
/// let registry: ListenerRegistry<String> = ListenerRegistry::new();
///
/// let handle = registry.subscribe(|msg: &String| {
///     println!("received: {msg}");
/// });
///
/// registry.notify(&"hello".to_string());
///
/// // Unsubscribe explicitly (dropping the handle works too).
/// handle.remove();
/// ```
pub struct ListenerRegistry<P> {
    inner: Arc<Mutex<RegistryInner<P>>>,
}

impl<P> ListenerRegistry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                entries: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a listener.
    ///
    /// Returns a handle that unsubscribes the listener when dropped or
    /// removed. Listeners registered during a broadcast are first invoked on
    /// the next broadcast.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle<P>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Arc::new(callback)));

        SubscriptionHandle {
            id,
            inner: Arc::clone(&self.inner),
            detached: false,
        }
    }

    /// Invoke every currently-registered listener with `payload`, in
    /// subscription order.
    ///
    /// Each snapshot entry is re-checked against the live list right before
    /// its callback runs, so a listener removed mid-broadcast is skipped if
    /// the broadcast has not yet reached it.
    pub fn notify(&self, payload: &P) {
        let snapshot: Vec<(u64, ListenerCallback<P>)> = self.inner.lock().entries.clone();
        for (id, callback) in snapshot {
            let registered = self
                .inner
                .lock()
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if registered {
                callback(payload);
            }
        }
    }

    /// Number of currently-registered listeners.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the registry has no listeners.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P> Default for ListenerRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for ListenerRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
