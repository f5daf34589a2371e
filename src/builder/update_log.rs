//! Deferred backend: every call becomes a SPARQL `INSERT DATA` in an ordered
//! log, applied to an external store later.
//!
//! The builder holds no graph, so it cannot check kinds. Every create and
//! every relationship is appended and reported as recorded. Operands that no
//! store could accept (non-IRIs, unrenderable timestamps) are refused with an
//! error before anything is queued, as the immediate backend does.

use crate::error::ProvResult;
use crate::graph::{Object, named_node, validate_operands};
use crate::ident::UriGenerator;
use crate::observe::{ProvEvent, ProvObserver, TracingObserver};
use crate::query;
use crate::vocab::{ProvKind, Relation};

use super::{NonValidatingBuilder, ProvenanceBuilder};

/// Ordered buffer of serialized update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateLog {
    updates: Vec<String>,
}

impl UpdateLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, update: String) {
        self.updates.push(update);
    }

    /// Owned copy; later appends do not show up in it.
    pub fn snapshot(&self) -> Vec<String> {
        self.updates.clone()
    }

    /// Empty the log, returning how many updates were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.updates.len();
        self.updates.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.updates.iter().map(String::as_str)
    }
}

/// Non-validating builder over an [`UpdateLog`].
pub struct DeferredLogBuilder {
    log: UpdateLog,
    uris: UriGenerator,
    observer: Box<dyn ProvObserver>,
}

impl DeferredLogBuilder {
    pub fn new(namespace: &str) -> Self {
        Self {
            log: UpdateLog::new(),
            uris: UriGenerator::new(namespace),
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the observer (default: [`TracingObserver`]).
    pub fn with_observer(mut self, observer: impl ProvObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn namespace(&self) -> &str {
        self.uris.namespace()
    }

    pub fn log(&self) -> &UpdateLog {
        &self.log
    }

    fn queue(&mut self, update: String) {
        self.observer.on_event(&ProvEvent::UpdateQueued {
            update: update.clone(),
        });
        self.log.append(update);
    }
}

impl ProvenanceBuilder for DeferredLogBuilder {
    fn create(&mut self, kind: ProvKind, uri: &str) -> ProvResult<String> {
        named_node(uri)?;
        self.queue(query::insert_type(uri, kind));
        self.observer.on_event(&ProvEvent::Created {
            uri: uri.to_string(),
            kind,
        });
        Ok(uri.to_string())
    }

    fn assert_relation(
        &mut self,
        relation: Relation,
        subject: &str,
        object: Object<'_>,
    ) -> ProvResult<bool> {
        validate_operands(subject, object)?;
        let update = query::insert_assertion(relation, subject, object)?;
        self.queue(update);
        Ok(true)
    }

    fn generate_uri(&self) -> String {
        self.uris.generate()
    }

    fn validates(&self) -> bool {
        false
    }
}

impl NonValidatingBuilder for DeferredLogBuilder {
    fn pending_updates(&self) -> Vec<String> {
        self.log.snapshot()
    }

    fn clear_updates(&mut self) -> usize {
        let discarded = self.log.clear();
        self.observer.on_event(&ProvEvent::Cleared { discarded });
        discarded
    }
}

impl std::fmt::Debug for DeferredLogBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredLogBuilder")
            .field("namespace", &self.uris.namespace())
            .field("pending", &self.log.len())
            .finish_non_exhaustive()
    }
}
