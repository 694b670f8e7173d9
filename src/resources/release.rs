//! Release Operation
//!
//! Every disposable resource embeds a [`ReleaseState`]. Calling
//! [`Disposable::dispose`] frees the CPU-side copy of the data and notifies
//! the release listeners so that a GPU-side consumer can drop its mirror.
//!
//! # Design Principles
//! - Release is explicit and caller-triggered; dropping a handle releases nothing
//! - Dispose calls are counted so that double releases are observable
//! - Listeners are plain `flume` senders; disconnected ones are pruned lazily

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use uuid::Uuid;

/// What kind of resource a [`ReleaseEvent`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Node,
    Geometry,
    Material,
    Texture,
    External,
}

/// Notification sent to listeners when a resource is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvent {
    pub uuid: Uuid,
    pub kind: ResourceKind,
    pub label: String,
    /// CPU bytes freed by this release
    pub bytes: usize,
}

pub type ReleaseSender = flume::Sender<ReleaseEvent>;
pub type ReleaseReceiver = flume::Receiver<ReleaseEvent>;

/// Creates an unbounded release notification channel.
#[must_use]
pub fn release_channel() -> (ReleaseSender, ReleaseReceiver) {
    flume::unbounded()
}

/// Capability: the value exposes an explicit release operation.
pub trait Disposable: Send + Sync {
    /// Releases the underlying memory and notifies listeners.
    fn dispose(&self);

    /// Number of times [`dispose`](Self::dispose) has been invoked.
    fn dispose_count(&self) -> u32;

    /// Human readable label used in logs.
    fn label(&self) -> &str;

    #[inline]
    fn is_disposed(&self) -> bool {
        self.dispose_count() > 0
    }
}

/// Per-resource release bookkeeping.
#[derive(Debug, Default)]
pub struct ReleaseState {
    count: AtomicU32,
    listeners: Mutex<Vec<ReleaseSender>>,
}

impl ReleaseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener that receives an event on every release.
    pub fn subscribe(&self, sender: ReleaseSender) {
        self.listeners.lock().push(sender);
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Records a release and broadcasts `event`. Returns the new dispose count.
    pub fn release(&self, event: ReleaseEvent) -> u32 {
        let count = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        if count > 1 {
            log::warn!(
                "{:?} '{}' released {} times",
                event.kind,
                event.label,
                count
            );
        }

        let mut listeners = self.listeners.lock();
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
        count
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(label: &str) -> ReleaseEvent {
        ReleaseEvent {
            uuid: Uuid::new_v4(),
            kind: ResourceKind::Texture,
            label: label.to_string(),
            bytes: 16,
        }
    }

    #[test]
    fn release_counts_and_notifies() {
        let state = ReleaseState::new();
        let (tx, rx) = release_channel();
        state.subscribe(tx);

        assert_eq!(state.release(event("a")), 1);
        assert_eq!(state.count(), 1);
        assert_eq!(rx.try_recv().unwrap().label, "a");
    }

    #[test]
    fn disconnected_listeners_are_pruned() {
        let state = ReleaseState::new();
        let (tx, rx) = release_channel();
        state.subscribe(tx);
        drop(rx);

        state.release(event("b"));
        assert_eq!(state.listener_count(), 0);
    }
}
