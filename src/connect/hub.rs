//! One-shot connection-signal hub.
//!
//! Replaces the browser popup's `postMessage` handshake: the OAuth callback
//! endpoint fires [`ConnectHub::notify`] and the controller's pending
//! [`ConnectSubscription`] resolves. A subscription deregisters itself on
//! drop, so an abandoned handshake never leaks a listener.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::ConnectError;

/// Payload delivered when a business finishes the OAuth exchange.
#[derive(Debug, Clone)]
pub struct ConnectedSignal {
    pub business_id: String,
}

struct PendingEntry {
    token: Uuid,
    tx: oneshot::Sender<ConnectedSignal>,
}

/// Registry of pending connect handshakes, keyed by business id.
#[derive(Default)]
pub struct ConnectHub {
    pending: Mutex<HashMap<String, PendingEntry>>,
}

impl ConnectHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a one-shot listener for `business_id`.
    ///
    /// At most one listener per business: a second subscribe replaces the
    /// first, whose receiver then resolves to `ConnectError::Cancelled`.
    pub fn subscribe(self: &Arc<Self>, business_id: &str) -> ConnectSubscription {
        let (tx, rx) = oneshot::channel();
        let token = Uuid::new_v4();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending
            .insert(business_id.to_string(), PendingEntry { token, tx })
            .is_some()
        {
            tracing::debug!(business_id, "Replaced pending connect subscription");
        }
        ConnectSubscription {
            business_id: business_id.to_string(),
            token,
            hub: Arc::downgrade(self),
            rx: Some(rx),
        }
    }

    /// Deliver the connected signal. Returns false if nobody is listening.
    pub fn notify(&self, business_id: &str) -> bool {
        let entry = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.remove(business_id)
        };
        match entry {
            Some(entry) => entry
                .tx
                .send(ConnectedSignal {
                    business_id: business_id.to_string(),
                })
                .is_ok(),
            None => {
                tracing::warn!(business_id, "Connect signal with no pending handshake");
                false
            }
        }
    }

    /// Whether a listener is currently registered for `business_id`.
    pub fn has_pending(&self, business_id: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(business_id)
    }

    fn unsubscribe(&self, business_id: &str, token: Uuid) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // Only remove our own entry; a newer subscription may have replaced it.
        if pending.get(business_id).is_some_and(|e| e.token == token) {
            pending.remove(business_id);
        }
    }

    #[cfg(test)]
    fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

/// Cancellable handle on a pending connect handshake.
pub struct ConnectSubscription {
    business_id: String,
    token: Uuid,
    hub: Weak<ConnectHub>,
    rx: Option<oneshot::Receiver<ConnectedSignal>>,
}

impl ConnectSubscription {
    pub fn business_id(&self) -> &str {
        &self.business_id
    }

    /// Wait for the connected signal.
    ///
    /// Resolves to `ConnectError::Cancelled` if the subscription was
    /// cancelled or replaced. There is no timeout: the listener stays
    /// registered until the signal arrives or the handle is dropped.
    pub async fn connected(mut self) -> Result<ConnectedSignal, ConnectError> {
        let rx = self.rx.take().ok_or(ConnectError::Cancelled)?;
        rx.await.map_err(|_| ConnectError::Cancelled)
    }

    /// Explicit teardown. Dropping the handle has the same effect.
    pub fn cancel(self) {}
}

impl Drop for ConnectSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(&self.business_id, self.token);
        }
    }
}
