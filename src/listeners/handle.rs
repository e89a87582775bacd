//! # Cleanup handle for one registration.
//!
//! Every `on`/`once`/`attach` returns a [`ListenerHandle`]. Calling
//! [`off`](ListenerHandle::off) removes exactly that registration:
//!
//! ```text
//! handle.off()
//!   ├─ active.swap(false) == true  ─► remove entry from registry, return true
//!   └─ already inactive            ─► no-op, return false
//! ```
//!
//! The `active` flag is also what the dispatch loop checks right before invoking
//! a listener, so a registration removed mid-dispatch is never invoked again.
//! Dropping the handle does **not** remove the listener.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::events::Priority;
use crate::listeners::registry::{ListenerId, Registry, SlotKey};

struct HandleInner {
    id: ListenerId,
    key: SlotKey,
    event: &'static str,
    active: AtomicBool,
    registry: Weak<Registry>,
}

/// Removable registration. Clones refer to the same registration.
#[derive(Clone)]
pub struct ListenerHandle {
    inner: Arc<HandleInner>,
}

impl ListenerHandle {
    pub(crate) fn new(
        id: ListenerId,
        key: SlotKey,
        event: &'static str,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id,
                key,
                event,
                active: AtomicBool::new(true),
                registry,
            }),
        }
    }

    /// Removes this registration.
    ///
    /// Returns `true` on the call that actually removed it, `false` afterwards.
    pub fn off(&self) -> bool {
        if !self.deactivate() {
            return false;
        }
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.remove(self.inner.key, self.inner.id);
        }
        true
    }

    /// True until the registration is removed (by `off`, `Emitter::off`, or a fired `once`).
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Registration id, unique per emitter.
    pub fn id(&self) -> ListenerId {
        self.inner.id
    }

    /// Name of the event this listener is registered on.
    pub fn event(&self) -> &'static str {
        self.inner.event
    }

    /// Tier this listener is registered in.
    pub fn priority(&self) -> Priority {
        self.inner.key.priority
    }

    /// Flips the flag without touching the registry. Returns the previous state.
    pub(crate) fn deactivate(&self) -> bool {
        self.inner.active.swap(false, Ordering::AcqRel)
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.inner.id)
            .field("event", &self.inner.event)
            .field("priority", &self.inner.key.priority)
            .field("active", &self.is_active())
            .finish()
    }
}
