//! Ledger subscribers
//!
//! Callbacks registered against the ledger receive the full block
//! sequence, most-recent-first, on registration and after each append.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::ledger::block::Block;

type Callback = Box<dyn FnMut(&[Block]) + Send>;

struct Subscriber {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback,
}

/// Handle returned by `Ledger::subscribe`
///
/// Dropping the handle keeps the callback registered; call
/// [`Subscription::unsubscribe`] to stop deliveries.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop further deliveries. Repeated calls are no-ops.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            debug!("Subscriber {} unsubscribed", self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Registered callbacks in registration order
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<Subscriber>,
}

impl Subscribers {
    pub(crate) fn register(&mut self, callback: Callback) -> (Subscription, usize) {
        let id = self.next_id;
        self.next_id += 1;

        let active = Arc::new(AtomicBool::new(true));
        self.entries.push(Subscriber {
            id,
            active: active.clone(),
            callback,
        });

        (Subscription { id, active }, self.entries.len() - 1)
    }

    /// Deliver to a single subscriber by position (used right after register)
    pub(crate) fn deliver_to(&mut self, position: usize, blocks: &[Block]) {
        if let Some(subscriber) = self.entries.get_mut(position) {
            if subscriber.active.load(Ordering::SeqCst) {
                (subscriber.callback)(blocks);
            }
        }
    }

    /// Deliver to every active subscriber and drop the inactive ones
    pub(crate) fn notify(&mut self, blocks: &[Block]) {
        for subscriber in self.entries.iter_mut() {
            // A callback may unsubscribe itself or an earlier one mid-loop
            if subscriber.active.load(Ordering::SeqCst) {
                (subscriber.callback)(blocks);
            }
        }
        self.prune();
    }

    pub(crate) fn prune(&mut self) {
        self.entries
            .retain(|subscriber| subscriber.active.load(Ordering::SeqCst));
    }

    pub(crate) fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|subscriber| subscriber.active.load(Ordering::SeqCst))
            .count()
    }
}
