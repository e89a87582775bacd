//! # Listener registry: per-emitter storage of registrations.
//!
//! Maps `(event, priority)` to an ordered sequence of entries. Each sequence is
//! stored type-erased; its concrete payload type is fixed by the event's `TypeId`.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─ slots: Mutex<HashMap<SlotKey, Box<dyn Slot>>>
//!        ├─ (Woof,  Before) ─► Tier<Bark> [e1, e4]
//!        ├─ (Woof,  Normal) ─► Tier<Bark> [e2]
//!        └─ (Death, After)  ─► Tier<()>   [e3]
//! ```
//!
//! ## Rules
//! - Insertion order is dispatch order inside a tier.
//! - The lock is **never** held while a listener runs: dispatch works on
//!   [`snapshot`](Registry::snapshot)s, so listeners may register, remove or emit.
//! - Removing an entry flips its `active` flag first, so snapshots taken earlier
//!   skip it.
//! - Removed entries and pruned tiers are dropped after the lock is released:
//!   a listener's captures may themselves call back into the registry on drop.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EmitterConfig;
use crate::events::{Event, Priority};
use crate::listeners::{Listener, ListenerHandle};
use crate::payload::Payload;

/// Registration id, unique per emitter.
pub type ListenerId = u64;

/// Registry key: event marker type plus tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub(crate) event: TypeId,
    pub(crate) priority: Priority,
}

impl SlotKey {
    pub(crate) fn of<E: Event>(priority: Priority) -> Self {
        Self {
            event: TypeId::of::<E>(),
            priority,
        }
    }
}

/// One registration.
pub(crate) struct Entry<P: Payload> {
    pub(crate) listener: Listener<P>,
    pub(crate) handle: ListenerHandle,
    pub(crate) once: bool,
}

impl<P: Payload> Entry<P> {
    /// Decides whether this entry may be invoked now.
    ///
    /// Once-entries detach here, before the invocation; only one caller wins.
    pub(crate) fn claim(&self) -> bool {
        if self.once {
            self.handle.off()
        } else {
            self.handle.is_active()
        }
    }
}

/// Type-erased tier storage.
trait Slot: Send + Sync {
    /// Detaches one entry; the caller drops it outside the lock.
    fn take(&mut self, id: ListenerId) -> Option<Box<dyn Any + Send>>;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Tier<P: Payload> {
    entries: Vec<Arc<Entry<P>>>,
}

impl<P: Payload> Slot for Tier<P> {
    fn take(&mut self, id: ListenerId) -> Option<Box<dyn Any + Send>> {
        let index = self.entries.iter().position(|e| e.handle.id() == id)?;
        let entry: Box<dyn Any + Send> = Box::new(self.entries.remove(index));
        Some(entry)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-emitter listener storage.
pub(crate) struct Registry {
    slots: Mutex<HashMap<SlotKey, Box<dyn Slot>>>,
    next_id: AtomicU64,
    config: EmitterConfig,
}

impl Registry {
    pub(crate) fn new(config: EmitterConfig) -> Arc<Self> {
        Arc::new(Self {
            slots: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config,
        })
    }

    pub(crate) fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Appends a listener to `(E, priority)`, creating the tier lazily.
    pub(crate) fn insert<E: Event>(
        self: &Arc<Self>,
        priority: Priority,
        listener: Listener<E::Payload>,
        once: bool,
    ) -> ListenerHandle {
        let key = SlotKey::of::<E>(priority);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = ListenerHandle::new(id, key, E::NAME, Arc::downgrade(self));

        tracing::trace!(
            emitter = %self.config.label,
            event = E::NAME,
            %priority,
            id,
            once,
            listener = listener.name(),
            "listener registered"
        );

        let entry = Arc::new(Entry {
            listener,
            handle: handle.clone(),
            once,
        });

        let mut slots = self.slots.lock();
        let slot = slots.entry(key).or_insert_with(|| {
            Box::new(Tier::<E::Payload> {
                entries: Vec::new(),
            })
        });
        match slot.as_any_mut().downcast_mut::<Tier<E::Payload>>() {
            Some(tier) => tier.entries.push(entry),
            None => unreachable!("tier type is fixed by the event's TypeId"),
        }
        handle
    }

    /// Structural copy of one tier, in registration order.
    pub(crate) fn snapshot<E: Event>(&self, priority: Priority) -> Vec<Arc<Entry<E::Payload>>> {
        let slots = self.slots.lock();
        slots
            .get(&SlotKey::of::<E>(priority))
            .and_then(|slot| slot.as_any().downcast_ref::<Tier<E::Payload>>())
            .map(|tier| tier.entries.clone())
            .unwrap_or_default()
    }

    /// Removes one registration by id. Returns `true` if it was present.
    pub(crate) fn remove(&self, key: SlotKey, id: ListenerId) -> bool {
        let (removed, pruned) = {
            let mut slots = self.slots.lock();
            let Some(slot) = slots.get_mut(&key) else {
                return false;
            };
            let removed = slot.take(id);
            let pruned = if self.config.prune_empty && slot.len() == 0 {
                slots.remove(&key)
            } else {
                None
            };
            (removed, pruned)
        };

        let found = removed.is_some();
        drop(removed);
        drop(pruned);
        found
    }

    /// Removes every registration of `listener` (by identity) from `(E, priority)`.
    pub(crate) fn remove_matching<E: Event>(
        &self,
        priority: Priority,
        listener: &Listener<E::Payload>,
    ) -> usize {
        let key = SlotKey::of::<E>(priority);
        let (removed, pruned) = {
            let mut slots = self.slots.lock();
            let Some(slot) = slots.get_mut(&key) else {
                return 0;
            };
            let Some(tier) = slot.as_any_mut().downcast_mut::<Tier<E::Payload>>() else {
                return 0;
            };

            let (removed, kept): (Vec<_>, Vec<_>) = tier
                .entries
                .drain(..)
                .partition(|entry| entry.listener.same_as(listener));
            tier.entries = kept;
            for entry in &removed {
                entry.handle.deactivate();
            }

            let pruned = if self.config.prune_empty && tier.entries.is_empty() {
                slots.remove(&key)
            } else {
                None
            };
            (removed, pruned)
        };

        let count = removed.len();
        drop(removed);
        drop(pruned);
        count
    }

    /// Number of live registrations on `(E, priority)`.
    pub(crate) fn len<E: Event>(&self, priority: Priority) -> usize {
        self.slots
            .lock()
            .get(&SlotKey::of::<E>(priority))
            .map_or(0, |slot| slot.len())
    }

    /// Number of `(event, priority)` tiers currently stored.
    pub(crate) fn tiers(&self) -> usize {
        self.slots.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Weak;

    use super::*;
    use crate::listeners::Flow;

    crate::event! {
        Ping => u32;
        Pong => String;
    }

    fn noop<P: Payload>() -> Listener<P> {
        Listener::sync(|_| Ok(Flow::Pass))
    }

    #[test]
    fn test_insert_keeps_order_per_tier() {
        let registry = Registry::new(EmitterConfig::default());
        let a = registry.insert::<Ping>(Priority::Normal, noop(), false);
        let b = registry.insert::<Ping>(Priority::Normal, noop(), false);
        registry.insert::<Ping>(Priority::After, noop(), false);

        let ids: Vec<_> = registry
            .snapshot::<Ping>(Priority::Normal)
            .iter()
            .map(|e| e.handle.id())
            .collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
        assert_eq!(registry.len::<Ping>(Priority::After), 1);
        assert_eq!(registry.len::<Pong>(Priority::Normal), 0);
    }

    #[test]
    fn test_events_with_same_tier_are_separate() {
        let registry = Registry::new(EmitterConfig::default());
        registry.insert::<Ping>(Priority::Normal, noop(), false);
        registry.insert::<Pong>(Priority::Normal, noop(), false);
        assert_eq!(registry.tiers(), 2);
        assert_eq!(registry.snapshot::<Pong>(Priority::Normal).len(), 1);
    }

    #[test]
    fn test_handle_off_is_idempotent_and_prunes() {
        let registry = Registry::new(EmitterConfig::default());
        let handle = registry.insert::<Ping>(Priority::Before, noop(), false);

        assert!(handle.off());
        assert!(!handle.off());
        assert!(!handle.is_active());
        assert_eq!(registry.tiers(), 0);
    }

    #[test]
    fn test_keep_empty_tiers_when_pruning_disabled() {
        let registry = Registry::new(EmitterConfig {
            prune_empty: false,
            ..EmitterConfig::default()
        });
        let handle = registry.insert::<Ping>(Priority::Normal, noop(), false);
        handle.off();
        assert_eq!(registry.tiers(), 1);
        assert_eq!(registry.len::<Ping>(Priority::Normal), 0);
    }

    #[test]
    fn test_remove_matching_uses_identity() {
        let registry = Registry::new(EmitterConfig::default());
        let shared: Listener<u32> = noop();
        let h1 = registry.insert::<Ping>(Priority::Normal, shared.clone(), false);
        let other = registry.insert::<Ping>(Priority::Normal, noop(), false);
        let h2 = registry.insert::<Ping>(Priority::Normal, shared.clone(), false);

        assert_eq!(registry.remove_matching::<Ping>(Priority::Normal, &shared), 2);
        assert!(!h1.is_active());
        assert!(!h2.is_active());
        assert!(other.is_active());
        assert_eq!(registry.remove_matching::<Ping>(Priority::Normal, &shared), 0);
        assert_eq!(registry.remove_matching::<Ping>(Priority::After, &shared), 0);
    }

    #[test]
    fn test_once_entry_claims_only_once() {
        let registry = Registry::new(EmitterConfig::default());
        registry.insert::<Ping>(Priority::Normal, noop(), true);
        let snapshot = registry.snapshot::<Ping>(Priority::Normal);

        assert!(snapshot[0].claim());
        assert!(!snapshot[0].claim());
        assert_eq!(registry.len::<Ping>(Priority::Normal), 0);
    }

    /// Calls back into the registry when dropped.
    struct Reentrant(Weak<Registry>);

    impl Drop for Reentrant {
        fn drop(&mut self) {
            if let Some(registry) = self.0.upgrade() {
                let _ = registry.tiers();
            }
        }
    }

    fn capturing(registry: &Arc<Registry>) -> Listener<u32> {
        let guard = Reentrant(Arc::downgrade(registry));
        Listener::sync(move |_| {
            let _ = &guard;
            Ok(Flow::Pass)
        })
    }

    #[test]
    fn test_removed_listener_dropped_outside_lock() {
        let registry = Registry::new(EmitterConfig::default());
        let handle = registry.insert::<Ping>(Priority::Normal, capturing(&registry), false);
        assert!(handle.off());
        assert_eq!(registry.tiers(), 0);

        let shared = capturing(&registry);
        registry.insert::<Ping>(Priority::After, shared.clone(), false);
        assert_eq!(registry.remove_matching::<Ping>(Priority::After, &shared), 1);
        drop(shared);
        assert_eq!(registry.tiers(), 0);
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = Registry::new(EmitterConfig::default());
        let handle = registry.insert::<Ping>(Priority::Normal, noop(), false);
        drop(registry);
        assert!(handle.off());
        assert!(!handle.off());
    }
}
