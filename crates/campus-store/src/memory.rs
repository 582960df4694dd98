//! In-memory implementation of [`TenantStore`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use campus_core::models::subscriber::{Subscriber, UpdateSubscriber};
use campus_core::store::{Observer, SubscriptionId, TenantStore};
use tracing::{debug, info, warn};

#[derive(Default)]
struct Inner {
    aggregate: RwLock<Option<Subscriber>>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
}

/// Holds the single tenant aggregate in process memory.
///
/// Cloning yields another handle to the same store. Observers run on
/// the writing thread after the write lock has been released, so they
/// may read the store, but must not subscribe or unsubscribe.
#[derive(Clone, Default)]
pub struct MemoryTenantStore {
    inner: Arc<Inner>,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `aggregate`.
    pub fn with_aggregate(aggregate: Subscriber) -> Self {
        let store = Self::new();
        store.load(aggregate);
        store
    }

    fn observers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, snapshot: Option<&Subscriber>) {
        for (_, observer) in self.observers().iter() {
            observer(snapshot);
        }
    }

    fn has_observers(&self) -> bool {
        !self.observers().is_empty()
    }
}

impl TenantStore for MemoryTenantStore {
    fn get(&self) -> Option<Subscriber> {
        self.inner
            .aggregate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self, aggregate: Subscriber) {
        info!(
            subscriber_id = %aggregate.id,
            institution = %aggregate.institution_name,
            "Loading tenant aggregate"
        );
        let snapshot = self.has_observers().then(|| aggregate.clone());
        *self
            .inner
            .aggregate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(aggregate);
        if let Some(snapshot) = snapshot {
            self.notify(Some(&snapshot));
        }
    }

    fn merge(&self, update: UpdateSubscriber) {
        let snapshot = {
            let mut guard = self
                .inner
                .aggregate
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(aggregate) = guard.as_mut() else {
                warn!("Merge ignored: no tenant loaded");
                return;
            };
            update.apply_to(aggregate);
            debug!(subscriber_id = %aggregate.id, "Merged tenant update");
            self.has_observers().then(|| aggregate.clone())
        };
        if let Some(snapshot) = snapshot {
            self.notify(Some(&snapshot));
        }
    }

    fn clear(&self) {
        let previous = self
            .inner
            .aggregate
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Cleared tenant aggregate");
        }
        self.notify(None);
    }

    fn subscribe(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.observers().push((id, observer));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers();
        let before = observers.len();
        observers.retain(|(sid, _)| *sid != id);
        observers.len() != before
    }
}

impl fmt::Debug for MemoryTenantStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTenantStore")
            .field("loaded", &self.is_loaded())
            .field("observers", &self.observers().len())
            .finish()
    }
}
