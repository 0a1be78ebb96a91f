//! Render notification fan-out.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::view::RenderFrame;

/// Token returned by [`RenderBus::subscribe`], used to revoke it.
pub type SubscriberId = u64;

type RenderCallback = Arc<dyn Fn(&RenderFrame) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: SubscriberId,
    callbacks: BTreeMap<SubscriberId, RenderCallback>,
}

/// Broadcast point between the collection store and its renderers.
///
/// Subscribers receive every published frame in subscription order.
/// Callbacks run outside the subscriber lock, so a callback may
/// subscribe or revoke, including itself, while a publish is running.
#[derive(Default)]
pub struct RenderBus {
    inner: Mutex<Subscribers>,
}

impl RenderBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer and returns its revocation token.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RenderFrame) + Send + Sync + 'static,
    ) -> SubscriberId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.callbacks.insert(id, Arc::new(callback));
        id
    }

    /// Drops a subscription; false when the token is unknown.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.lock().callbacks.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().callbacks.len()
    }

    /// Hands the frame to every subscriber.
    pub fn publish(&self, frame: &RenderFrame) {
        let callbacks: Vec<RenderCallback> = self.lock().callbacks.values().cloned().collect();
        debug!(
            "event=render_publish module=event status=ok subscribers={} books={}",
            callbacks.len(),
            frame.books.len()
        );
        for callback in callbacks {
            callback(frame);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
