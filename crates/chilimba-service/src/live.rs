//! Push-based live sequences of full result-set snapshots.
//!
//! A `Hub` is the fan-out point the store publishes into; a `Subscription` is
//! one consumer's end. Every emission carries the complete current result
//! set, never a diff, so consumers replace their whole view per emission.
//!
//! Listener lifecycle is the one real resource contract here: dropping a
//! `Subscription` synchronously deregisters its listener, so a hub never
//! keeps emitting into a consumer that stopped looking. An emission already
//! in the channel when the drop happens is discarded with the receiver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::mpsc;

use crate::error::RemoteError;

type Payload<T> = Result<Vec<T>, RemoteError>;

struct HubInner<T> {
    listeners: Mutex<HashMap<u64, mpsc::UnboundedSender<Payload<T>>>>,
    next_id: AtomicU64,
}

impl<T> HubInner<T> {
    fn listeners(&self) -> MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<Payload<T>>>> {
        self.listeners.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Fan-out point for one watched path of the store.
pub struct Hub<T> {
    inner: Arc<HubInner<T>>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Hub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Hub<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                listeners: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a listener and immediately delivers the current snapshot,
    /// matching attach semantics of a value-event listener.
    #[must_use]
    pub fn subscribe_with(&self, initial: Vec<T>) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        // The initial send cannot fail: we still hold the receiver.
        let _ = tx.send(Ok(initial));
        self.inner.listeners().insert(id, tx);

        Subscription {
            rx,
            _guard: ListenerGuard {
                hub: Arc::downgrade(&self.inner),
                id,
            },
        }
    }

    /// Terminates every subscription with an error signal. The error is the
    /// final emission; afterwards the sequence is closed. Re-subscribing
    /// starts a fresh sequence.
    pub fn fail(&self, error: &RemoteError) {
        let mut listeners = self.inner.listeners();
        for (_, tx) in listeners.drain() {
            let _ = tx.send(Err(error.clone()));
        }
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }
}

impl<T: Clone> Hub<T> {
    /// Delivers a fresh full snapshot to every registered listener.
    /// Listeners whose consumer has gone away are dropped on the spot.
    pub fn publish(&self, snapshot: &[T]) {
        self.inner
            .listeners()
            .retain(|_, tx| tx.send(Ok(snapshot.to_vec())).is_ok());
    }
}

/// One consumer's end of a live sequence.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<Payload<T>>,
    // Held for its Drop impl, which deregisters the listener.
    _guard: ListenerGuard<T>,
}

impl<T> Subscription<T> {
    /// ## Summary
    /// Waits for the next full snapshot.
    ///
    /// `Ok(Some(..))` is a snapshot, `Ok(None)` a cleanly closed sequence.
    ///
    /// ## Errors
    /// Returns the store-reported failure that terminated the sequence;
    /// nothing further will be delivered and the caller must re-subscribe.
    pub async fn recv(&mut self) -> Result<Option<Vec<T>>, RemoteError> {
        match self.rx.recv().await {
            Some(Ok(snapshot)) => Ok(Some(snapshot)),
            Some(Err(error)) => Err(error),
            None => Ok(None),
        }
    }
}

struct ListenerGuard<T> {
    hub: Weak<HubInner<T>>,
    id: u64,
}

impl<T> Drop for ListenerGuard<T> {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.listeners().remove(&self.id);
        }
    }
}
