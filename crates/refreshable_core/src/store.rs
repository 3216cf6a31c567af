//! Observable refresh store
//!
//! `RefreshStore` wraps a [`RefreshState`] with a subscriber registry so the
//! presentation layer can react to changes without polling. Every mutation
//! recomputes the derived fields first and only then notifies subscribers,
//! and subscribers only hear about snapshots that actually changed.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use refreshable_core::{Rect, RectSource, RefreshConfig, RefreshStore};
//!
//! let mut store = RefreshStore::new(RefreshConfig::normal());
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! store.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.percentage));
//!
//! store.update(RectSource::Fixed, Rect::new(0.0, 0.0, 320.0, 480.0));
//! store.update(RectSource::Moving, Rect::new(0.0, 40.0, 320.0, 0.0));
//! assert_eq!(*seen.lock().unwrap(), vec![0.5]);
//! ```

use slotmap::{new_key_type, SlotMap};

use crate::config::RefreshConfig;
use crate::geometry::Rect;
use crate::state::{RectSource, RefreshSnapshot, RefreshState, RefreshTicket, UpdateOutcome};

new_key_type! {
    /// Handle returned by [`RefreshStore::subscribe`]
    pub struct SubscriptionId;
}

/// Callback invoked with every changed snapshot
pub type Subscriber = Box<dyn FnMut(&RefreshSnapshot) + Send>;

/// Refresh state plus the observers listening to it
pub struct RefreshStore {
    state: RefreshState,
    subscribers: SlotMap<SubscriptionId, Subscriber>,
    published: RefreshSnapshot,
}

impl RefreshStore {
    pub fn new(config: RefreshConfig) -> Self {
        let state = RefreshState::new(config);
        let published = state.snapshot();
        Self {
            state,
            subscribers: SlotMap::with_key(),
            published,
        }
    }

    /// Read-only access to the underlying machine
    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    pub fn config(&self) -> &RefreshConfig {
        self.state.config()
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> RefreshSnapshot {
        self.published
    }

    /// Register a subscriber
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RefreshSnapshot) + Send + 'static,
    {
        self.subscribers.insert(Box::new(callback))
    }

    /// Remove a subscriber, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Apply a geometry report and notify subscribers
    pub fn update(&mut self, source: RectSource, rect: Rect) -> UpdateOutcome {
        let outcome = self.state.update(source, rect);
        self.publish();
        outcome
    }

    /// Arm a refresh without a drag and notify subscribers
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        let ticket = self.state.begin_refresh();
        self.publish();
        ticket
    }

    /// Complete a refresh and notify subscribers
    pub fn finish_refresh(&mut self, ticket: RefreshTicket) -> bool {
        let finished = self.state.finish_refresh(ticket);
        self.publish();
        finished
    }

    fn publish(&mut self) {
        let snapshot = self.state.snapshot();
        if snapshot == self.published {
            return;
        }
        self.published = snapshot;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }
}

impl std::fmt::Debug for RefreshStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
