//! Tenant store contract.
//!
//! The store is a dumb holder: it performs no validation. Integrity is
//! the job of the mutation layer, which computes a complete
//! [`UpdateSubscriber`] and commits it with a single [`TenantStore::merge`].

use crate::models::subscriber::{Subscriber, UpdateSubscriber};

/// Callback invoked synchronously after every write. Receives `None`
/// once the store has been cleared.
pub type Observer = Box<dyn Fn(Option<&Subscriber>) + Send + Sync>;

/// Handle returned by [`TenantStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

pub trait TenantStore: Send + Sync {
    /// Snapshot of the current aggregate.
    fn get(&self) -> Option<Subscriber>;

    /// Replace the whole aggregate.
    fn load(&self, aggregate: Subscriber);

    /// Shallow-merge named collections into the current aggregate.
    /// A no-op when nothing is loaded.
    fn merge(&self, update: UpdateSubscriber);

    /// Drop the aggregate.
    fn clear(&self);

    fn subscribe(&self, observer: Observer) -> SubscriptionId;

    /// Returns `false` if the id was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn is_loaded(&self) -> bool {
        self.get().is_some()
    }
}
