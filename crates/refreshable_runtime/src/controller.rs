//! Refresh controller
//!
//! The controller is the single update context for one mounted scroll
//! container. It owns the [`RefreshStore`], the current [`RefreshAction`] and
//! an unbounded message queue:
//!
//! - Geometry reports are applied synchronously, either directly through
//!   [`RefreshController::report`] or via a [`ControllerHandle`]
//! - When a report arms a refresh, the action is spawned as an independent
//!   tokio task and keeps running while further reports arrive
//! - The task posts [`ControllerMessage::RefreshFinished`] back onto the queue;
//!   `refreshing` clears when the controller processes that message
//!
//! There is no cancellation and no timeout: a refresh action that never
//! completes leaves the controller refreshing.

use refreshable_core::{
    Rect, RectSource, RefreshConfig, RefreshMode, RefreshSnapshot, RefreshStore, RefreshTicket,
    SubscriptionId, UpdateOutcome,
};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::action::RefreshAction;
use crate::error::{Result, RuntimeError};

/// Work queued for the controller's update context
#[derive(Debug)]
pub enum ControllerMessage {
    /// A measured rectangle from the geometry probe
    Report { source: RectSource, rect: Rect },
    /// Replace (or clear) the refresh action
    SetAction(Option<RefreshAction>),
    /// Start a refresh without a drag (platform refresh control)
    Trigger,
    /// A refresh task completed
    RefreshFinished { ticket: RefreshTicket, failed: bool },
}

/// What applying one message did
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// A geometry report was applied
    Geometry(UpdateOutcome),
    /// The refresh action was replaced
    ActionChanged { present: bool },
    /// A trigger was applied; `None` if a refresh was already running
    Triggered(Option<RefreshTicket>),
    /// A refresh task completed
    RefreshFinished {
        ticket: RefreshTicket,
        failed: bool,
        accepted: bool,
    },
}

impl ControllerEvent {
    /// The ticket of a refresh started by this event, if any
    pub fn started(&self) -> Option<RefreshTicket> {
        match self {
            ControllerEvent::Geometry(outcome) => outcome.armed(),
            ControllerEvent::Triggered(ticket) => *ticket,
            _ => None,
        }
    }
}

/// Cloneable sender into a controller's update queue
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    sender: mpsc::UnboundedSender<ControllerMessage>,
}

impl ControllerHandle {
    pub fn report(&self, source: RectSource, rect: Rect) -> Result<()> {
        self.send(ControllerMessage::Report { source, rect })
    }

    pub fn set_action(&self, action: Option<RefreshAction>) -> Result<()> {
        self.send(ControllerMessage::SetAction(action))
    }

    pub fn trigger(&self) -> Result<()> {
        self.send(ControllerMessage::Trigger)
    }

    /// Whether the controller has been dropped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn send(&self, message: ControllerMessage) -> Result<()> {
        self.sender.send(message).map_err(|_| RuntimeError::Closed)
    }
}

/// Single-owner host for one refresh state machine
pub struct RefreshController {
    store: RefreshStore,
    action: Option<RefreshAction>,
    sender: mpsc::UnboundedSender<ControllerMessage>,
    receiver: mpsc::UnboundedReceiver<ControllerMessage>,
    published: watch::Receiver<RefreshSnapshot>,
}

impl RefreshController {
    pub fn new(config: RefreshConfig) -> Self {
        let mut store = RefreshStore::new(config);
        let (watch_tx, published) = watch::channel(store.snapshot());
        store.subscribe(move |snapshot| {
            watch_tx.send_replace(*snapshot);
        });

        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            store,
            action: None,
            sender,
            receiver,
            published,
        }
    }

    /// Build a controller from a named or custom mode
    pub fn from_mode(mode: RefreshMode) -> Result<Self> {
        Ok(Self::new(RefreshConfig::from_mode(mode)?))
    }

    pub fn config(&self) -> &RefreshConfig {
        self.store.config()
    }

    pub fn store(&self) -> &RefreshStore {
        &self.store
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        self.store.snapshot()
    }

    /// Sender for probes and hosts that cannot borrow the controller
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            sender: self.sender.clone(),
        }
    }

    /// Watch channel carrying every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<RefreshSnapshot> {
        self.published.clone()
    }

    /// Register a synchronous observer on the underlying store
    pub fn subscribe_with<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RefreshSnapshot) + Send + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Replace the refresh action
    ///
    /// A refresh already running keeps the action it was started with.
    pub fn set_action(&mut self, action: Option<RefreshAction>) {
        self.action = action;
    }

    /// Apply a geometry report, launching the action if it arms a refresh
    pub fn report(&mut self, source: RectSource, rect: Rect) -> Result<UpdateOutcome> {
        let runtime = current_runtime()?;
        let outcome = self.store.update(source, rect);
        if let Some(ticket) = outcome.armed() {
            self.launch(&runtime, ticket);
        }
        Ok(outcome)
    }

    /// Start a refresh without a drag
    ///
    /// Returns `None` if a refresh is already running.
    pub fn trigger(&mut self) -> Result<Option<RefreshTicket>> {
        let runtime = current_runtime()?;
        let ticket = self.store.begin_refresh();
        match ticket {
            Some(ticket) => self.launch(&runtime, ticket),
            None => debug!("trigger ignored, refresh already running"),
        }
        Ok(ticket)
    }

    /// Apply every queued message without waiting
    pub fn process_pending(&mut self) -> Result<Vec<ControllerEvent>> {
        let mut events = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            events.push(self.apply(message)?);
        }
        Ok(events)
    }

    /// Wait for the next queued message and apply it
    pub async fn next_event(&mut self) -> Result<ControllerEvent> {
        let message = self.receiver.recv().await.ok_or(RuntimeError::Closed)?;
        self.apply(message)
    }

    /// Keep applying messages until no refresh is outstanding
    pub async fn wait_until_idle(&mut self) -> Result<Vec<ControllerEvent>> {
        let mut events = self.process_pending()?;
        while self.store.state().is_refreshing() {
            events.push(self.next_event().await?);
        }
        Ok(events)
    }

    fn apply(&mut self, message: ControllerMessage) -> Result<ControllerEvent> {
        match message {
            ControllerMessage::Report { source, rect } => {
                Ok(ControllerEvent::Geometry(self.report(source, rect)?))
            }
            ControllerMessage::SetAction(action) => {
                let present = action.is_some();
                self.set_action(action);
                Ok(ControllerEvent::ActionChanged { present })
            }
            ControllerMessage::Trigger => Ok(ControllerEvent::Triggered(self.trigger()?)),
            ControllerMessage::RefreshFinished { ticket, failed } => {
                let accepted = self.store.finish_refresh(ticket);
                Ok(ControllerEvent::RefreshFinished {
                    ticket,
                    failed,
                    accepted,
                })
            }
        }
    }

    fn launch(&self, runtime: &Handle, ticket: RefreshTicket) {
        let action = self.action.clone();
        let sender = self.sender.clone();
        debug!(
            ticket = ticket.id(),
            has_action = action.is_some(),
            "launching refresh action"
        );

        runtime.spawn(async move {
            let failed = match action {
                // Run on its own task so a panicking action still completes
                Some(action) => match tokio::spawn(action.call()).await {
                    Ok(Ok(())) => false,
                    Ok(Err(err)) => {
                        warn!(ticket = ticket.id(), error = %err, "refresh action failed");
                        true
                    }
                    Err(err) => {
                        warn!(ticket = ticket.id(), error = %err, "refresh action panicked");
                        true
                    }
                },
                None => false,
            };

            if sender
                .send(ControllerMessage::RefreshFinished { ticket, failed })
                .is_err()
            {
                debug!(ticket = ticket.id(), "controller dropped before refresh finished");
            }
        });
    }
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("store", &self.store)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|_| RuntimeError::NoRuntime)
}
