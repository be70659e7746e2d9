//! Active-scene tracking with synchronous change broadcast.

use crate::notify::{ListenerRegistry, SubscriptionHandle};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Tracks the currently-active scene and broadcasts changes to listeners.
///
/// Reads of the current scene are lock-free via `arc-swap`.
/// [`set_active_scene`](SceneTracker::set_active_scene) stores the new value
/// and then invokes every currently-registered listener synchronously, in
/// subscription order, before returning.
///
/// Clones share state: a listener registered through one clone observes
/// scenes set through another.
///
/// # Examples
///
/// ```rust
/// use fillrate::scene::SceneTracker;
///
/// let tracker = SceneTracker::new();
///
/// let subscription = tracker.on_scene_changed(|scene: &String| {
///     println!("now showing {scene}");
/// });
///
/// tracker.set_active_scene("home".to_string());
/// assert_eq!(tracker.active_scene().unwrap().as_str(), "home");
///
/// subscription.remove();
/// ```
pub struct SceneTracker<T> {
    current: Arc<ArcSwapOption<T>>,
    listeners: ListenerRegistry<T>,
}

impl<T> SceneTracker<T> {
    /// Create a tracker with no active scene.
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwapOption::empty()),
            listeners: ListenerRegistry::new(),
        }
    }

    /// The currently-active scene, or `None` before the first
    /// [`set_active_scene`](SceneTracker::set_active_scene) call.
    pub fn active_scene(&self) -> Option<Arc<T>> {
        self.current.load_full()
    }

    /// Store `scene` as the active scene and broadcast it to all listeners.
    ///
    /// Listener invocation is synchronous and blocking within this call.
    pub fn set_active_scene(&self, scene: T) {
        let scene = Arc::new(scene);
        self.current.store(Some(Arc::clone(&scene)));
        tracing::trace!(listeners = self.listeners.len(), "scene changed");
        self.listeners.notify(scene.as_ref());
    }

    /// Register a listener invoked with each newly-set scene.
    ///
    /// Returns a handle that unsubscribes the listener when dropped or
    /// removed; a removed listener never receives further notifications.
    pub fn on_scene_changed<F>(&self, callback: F) -> SubscriptionHandle<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Number of currently-registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for SceneTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SceneTracker<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            listeners: self.listeners.clone(),
        }
    }
}
