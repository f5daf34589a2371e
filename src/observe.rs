//! Observability hook for builders.
//!
//! Builders report every type statement, type check, committed relationship
//! and queued update as a [`ProvEvent`]. Observers only watch: nothing they do
//! feeds back into a builder's result or its graph.

use std::sync::{Arc, Mutex};

use crate::registry::TypeViolation;
use crate::vocab::ProvKind;

/// One observable step of a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvEvent {
    /// A type statement was written (or queued).
    Created { uri: String, kind: ProvKind },
    /// The type registry was consulted.
    TypeChecked {
        uri: String,
        kind: ProvKind,
        satisfied: bool,
    },
    /// A relationship statement was committed to a graph.
    StatementAdded {
        subject: String,
        predicate: String,
        object: String,
    },
    /// A relationship was refused by the type checker.
    Rejected(TypeViolation),
    /// A serialized update was appended to an update log.
    UpdateQueued { update: String },
    /// An update log was emptied.
    Cleared { discarded: usize },
}

/// Receives builder events.
pub trait ProvObserver {
    fn on_event(&self, event: &ProvEvent);
}

/// Forwards events to `tracing`. This is the default observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProvObserver for TracingObserver {
    fn on_event(&self, event: &ProvEvent) {
        match event {
            ProvEvent::Created { uri, kind } => {
                tracing::debug!(%uri, %kind, "type statement added");
            }
            ProvEvent::TypeChecked {
                uri,
                kind,
                satisfied,
            } => {
                tracing::trace!(%uri, %kind, satisfied, "type checked");
            }
            ProvEvent::StatementAdded {
                subject,
                predicate,
                object,
            } => {
                tracing::debug!(%subject, %predicate, %object, "statement added");
            }
            ProvEvent::Rejected(violation) => {
                tracing::warn!(
                    relation = %violation.relation,
                    operand = %violation.operand,
                    uri = %violation.uri,
                    expected = %violation.expected,
                    "relationship rejected"
                );
            }
            ProvEvent::UpdateQueued { update } => {
                tracing::trace!(%update, "update queued");
            }
            ProvEvent::Cleared { discarded } => {
                tracing::debug!(discarded, "update log cleared");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProvObserver for NullObserver {
    fn on_event(&self, _event: &ProvEvent) {}
}

/// Keeps every event in memory. Clones share the same buffer, so a caller can
/// hand one clone to a builder and read events back through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ProvEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<ProvEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Only the rejections.
    pub fn violations(&self) -> Vec<TypeViolation> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProvEvent::Rejected(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}

impl ProvObserver for RecordingObserver {
    fn on_event(&self, event: &ProvEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
