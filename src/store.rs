//! The selection store: one owner, one mutation entry point.
//!
//! The UI layer never reads or writes shared globals. It holds a
//! [`SelectionStore`], requests mutations through [`SelectionStore::apply`],
//! and subscribes to [`SelectionChange`] events delivered over bounded
//! channels. Every change carries the state snapshot plus its canonical
//! query string, ready for the caller to write back into the URL (replacing
//! it in place, no history entry).
//!
//! Mutations are serialized through `apply` on the owning thread, so no
//! locking is involved. Event delivery is non-blocking: a full subscriber
//! buffer drops the event for that subscriber, a disconnected subscriber is
//! pruned on the next notification.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use uuid::Uuid;

use crate::catalog::ProvisionId;
use crate::constituency::ConstituencyRef;
use crate::dataset::ImpactDataset;
use crate::error::{BudgetError, BudgetResult};
use crate::selection::{SelectionState, Year};

/// Identifies one change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    /// Select a constituency (or clear the selection with `None`).
    SelectConstituency(Option<ConstituencyRef>),
    /// Flip one provision toggle.
    ToggleProvision(ProvisionId),
    /// Replace the toggled provision set wholesale.
    SetProvisions(BTreeSet<ProvisionId>),
    /// Select every provision in the catalog.
    SelectAllProvisions,
    /// Deselect every provision.
    ClearProvisions,
    /// Change the projection year.
    SetYear(Year),
    /// Re-ingest a query string (e.g. after external URL navigation).
    /// The year is preserved; the URL does not carry it.
    ReplaceFromQuery(String),
}

/// A published state change.
#[derive(Debug, Clone)]
pub struct SelectionChange {
    /// Snapshot of the state after the mutation.
    pub state: SelectionState,
    /// The canonical query-string encoding of that state.
    pub query: String,
    /// When the mutation was applied.
    pub at: DateTime<Utc>,
}

/// A subscription handle paired with its event stream.
#[derive(Debug)]
pub struct SelectionWatch {
    id: SubscriptionId,
    rx: Receiver<SelectionChange>,
}

impl SelectionWatch {
    /// The id backing this subscription.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Receives the next change (blocking).
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Disconnected` once the store is gone.
    pub fn recv(&self) -> BudgetResult<SelectionChange> {
        self.rx.recv().map_err(|_| BudgetError::Disconnected {
            path: "selection_watch".to_string(),
        })
    }

    /// Receives the next change without blocking, if one is queued.
    #[must_use]
    pub fn try_recv(&self) -> Option<SelectionChange> {
        self.rx.try_recv().ok()
    }
}

const WATCH_CAPACITY: usize = 64;

/// Owns the selection state and publishes changes.
#[derive(Debug)]
pub struct SelectionStore {
    state: SelectionState,
    subscribers: Vec<(SubscriptionId, Sender<SelectionChange>)>,
}

impl SelectionStore {
    /// Creates a store holding the given initial state.
    #[must_use]
    pub fn new(state: SelectionState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
        }
    }

    /// Creates a store initialized from a URL query string.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::new(SelectionState::from_query(query))
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The canonical query string for the current state.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.state.to_query()
    }

    /// Registers a change subscriber.
    #[must_use]
    pub fn subscribe(&mut self) -> SelectionWatch {
        let (tx, rx) = bounded(WATCH_CAPACITY);
        let id = SubscriptionId::new();
        self.subscribers.push((id, tx));
        SelectionWatch { id, rx }
    }

    /// Removes a subscriber. Returns true if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Applies one mutation. Returns true if the state changed (and a
    /// change event was published).
    pub fn apply(&mut self, action: SelectionAction) -> bool {
        let next = self.next_state(action);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.notify();
        true
    }

    /// One-time constituency name resolution against a loaded dataset.
    ///
    /// Publishes a change event when the provisional ref is replaced.
    pub fn resolve_constituency(&mut self, dataset: &ImpactDataset) -> bool {
        if self.state.resolve_constituency(dataset) {
            self.notify();
            return true;
        }
        false
    }

    fn next_state(&self, action: SelectionAction) -> SelectionState {
        let mut next = self.state.clone();
        match action {
            SelectionAction::SelectConstituency(constituency) => {
                next.constituency = constituency;
            }
            SelectionAction::ToggleProvision(id) => {
                if !next.policies.remove(&id) {
                    next.policies.insert(id);
                }
            }
            SelectionAction::SetProvisions(policies) => {
                next.policies = policies;
            }
            SelectionAction::SelectAllProvisions => {
                next.policies = ProvisionId::ALL.into_iter().collect();
            }
            SelectionAction::ClearProvisions => {
                next.policies.clear();
            }
            SelectionAction::SetYear(year) => {
                next.year = year;
            }
            SelectionAction::ReplaceFromQuery(query) => {
                let year = next.year;
                next = SelectionState::from_query(&query);
                next.year = year;
            }
        }
        next
    }

    fn notify(&mut self) {
        let change = SelectionChange {
            state: self.state.clone(),
            query: self.state.to_query(),
            at: Utc::now(),
        };

        self.subscribers.retain(|(_, tx)| {
            match tx.try_send(change.clone()) {
                Ok(()) => true,
                // Slow consumer: drop this event for it, keep the stream.
                Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            }
        });
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(SelectionState::default())
    }
}
