//! In-process change notification
//!
//! Observers register for a scope URI. Delivery is synchronous: every matching
//! callback runs on the mutating thread before the mutation call returns, so a
//! callback that blocks stalls the writer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned by [`ChangeNotifier::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A change at a URI, as delivered to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub uri: String,
}

type Callback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Observer {
    id: ObserverId,
    scope: String,
    notify_for_descendants: bool,
    callback: Callback,
}

impl Observer {
    /// A change at `changed` reaches this observer when it is the observed
    /// URI, an ancestor of it, or (with descendants enabled) below it.
    fn wants(&self, changed: &str) -> bool {
        changed == self.scope
            || is_ancestor(changed, &self.scope)
            || (self.notify_for_descendants && is_ancestor(&self.scope, changed))
    }
}

fn normalize(uri: &str) -> &str {
    uri.trim_end_matches('/')
}

/// `true` when `parent` is a strict path prefix of `child`
fn is_ancestor(parent: &str, child: &str) -> bool {
    let parent = normalize(parent);
    let child = normalize(child);
    child.len() > parent.len()
        && child.starts_with(parent)
        && child.as_bytes()[parent.len()] == b'/'
}

/// Publish/subscribe registry for URI change events
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<Vec<Observer>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for changes at `scope`
    pub fn register<F>(&self, scope: &str, notify_for_descendants: bool, callback: F) -> ObserverId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let observer = Observer {
            id,
            scope: normalize(scope).to_string(),
            notify_for_descendants,
            callback: Arc::new(callback),
        };
        self.lock().push(observer);
        tracing::debug!("Registered observer {:?} on {}", id, scope);
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    /// Deliver a change at `uri` to every interested observer.
    /// Returns the number of callbacks invoked.
    pub fn notify_change(&self, uri: &str) -> usize {
        // Callbacks run outside the lock so they may register or unregister
        let targets: Vec<Callback> = self
            .lock()
            .iter()
            .filter(|o| o.wants(normalize(uri)))
            .map(|o| Arc::clone(&o.callback))
            .collect();

        tracing::debug!("Change at {} -> {} observer(s)", uri, targets.len());
        let event = ChangeEvent { uri: uri.to_string() };
        for callback in &targets {
            (**callback)(&event);
        }
        targets.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Observer>> {
        // A panicking callback never holds this lock, so poisoning is recoverable
        self.observers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const ITEMS: &str = "content://shop/items";
    const ITEM_1: &str = "content://shop/items/1";
    const ITEM_2: &str = "content://shop/items/2";

    fn counter(notifier: &ChangeNotifier, scope: &str, descendants: bool) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        notifier.register(scope, descendants, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn test_exact_scope() {
        let notifier = ChangeNotifier::new();
        let hits = counter(&notifier, ITEM_1, false);

        notifier.notify_change(ITEM_1);
        notifier.notify_change(ITEM_2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_collection_change_reaches_items() {
        let notifier = ChangeNotifier::new();
        let item = counter(&notifier, ITEM_1, false);

        assert_eq!(notifier.notify_change(ITEMS), 1);
        assert_eq!(item.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_descendant_flag() {
        let notifier = ChangeNotifier::new();
        let shallow = counter(&notifier, ITEMS, false);
        let deep = counter(&notifier, ITEMS, true);

        notifier.notify_change(ITEM_2);
        assert_eq!(shallow.load(Ordering::SeqCst), 0);
        assert_eq!(deep.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sibling_prefix_is_not_ancestor() {
        assert!(!is_ancestor("content://shop/items/1", "content://shop/items/10"));
        assert!(is_ancestor("content://shop/items/", "content://shop/items/10"));
    }

    #[test]
    fn test_unregister() {
        let notifier = ChangeNotifier::new();
        let id = notifier.register(ITEMS, true, |_| {});
        assert_eq!(notifier.observer_count(), 1);
        assert!(notifier.unregister(id));
        assert!(!notifier.unregister(id));
        assert_eq!(notifier.notify_change(ITEMS), 0);
    }

    #[test]
    fn test_event_carries_uri() {
        let notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        notifier.register(ITEMS, true, move |event| {
            s.lock().unwrap().push(event.uri.clone());
        });

        notifier.notify_change(ITEM_1);
        assert_eq!(*seen.lock().unwrap(), vec![ITEM_1.to_string()]);
    }
}
