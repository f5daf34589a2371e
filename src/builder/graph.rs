//! Immediate backend: every assertion lands in an in-memory oxigraph graph.
//!
//! The type checker reads the same graph the write path fills, so a resource
//! must be created before any relationship mentions it. The check and the
//! insert happen in one call with nothing in between; a refused assertion
//! leaves the graph exactly as it was.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::ProvResult;
use crate::export::StatementExport;
use crate::graph::sparql::SparqlStore;
use crate::graph::{GraphFormat, Object, named_node, validate_operands};
use crate::ident::UriGenerator;
use crate::observe::{ProvEvent, ProvObserver, TracingObserver};
use crate::registry::{TypeRegistry, check_signature};
use crate::temporal;
use crate::vocab::{PROV_NS, ProvKind, RDF_NS, RDF_TYPE, Relation, XSD_NS};

use super::{ProvenanceBuilder, ValidatingBuilder};

/// Validating builder over an owned graph.
pub struct ImmediateGraphBuilder {
    store: SparqlStore,
    uris: UriGenerator,
    prefixes: BTreeMap<String, String>,
    observer: Box<dyn ProvObserver>,
}

impl ImmediateGraphBuilder {
    /// Empty in-memory graph minting URIs under `namespace`.
    pub fn new(namespace: &str) -> ProvResult<Self> {
        Ok(Self::with_store(namespace, SparqlStore::in_memory()?))
    }

    /// Build on an existing store; statements already in it count for type
    /// checks.
    pub fn with_store(namespace: &str, store: SparqlStore) -> Self {
        let prefixes = [("prov", PROV_NS), ("rdf", RDF_NS), ("xsd", XSD_NS)]
            .into_iter()
            .map(|(p, iri)| (p.to_string(), iri.to_string()))
            .collect();
        Self {
            store,
            uris: UriGenerator::new(namespace),
            prefixes,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the observer (default: [`TracingObserver`]).
    pub fn with_observer(mut self, observer: impl ProvObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Declare a namespace prefix for serialized output.
    pub fn add_prefix(&mut self, prefix: &str, iri: &str) {
        self.prefixes.insert(prefix.to_string(), iri.to_string());
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    pub fn namespace(&self) -> &str {
        self.uris.namespace()
    }

    /// Number of distinct statements. Oxigraph stores identical statements
    /// once, so repeating an assertion does not change the count.
    pub fn statement_count(&self) -> ProvResult<usize> {
        self.store.len()
    }

    /// The backing store, e.g. for a [`QueryGetter`](crate::getter::QueryGetter).
    pub fn store(&self) -> &SparqlStore {
        &self.store
    }

    /// Serialize every statement with the prefix table.
    pub fn write_to<W: Write>(&self, sink: W, format: GraphFormat) -> ProvResult<()> {
        self.store.dump(sink, format, &self.prefixes)
    }

    /// Load statements, typically ones produced by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(&mut self, source: R, format: GraphFormat) -> ProvResult<()> {
        let before = self.store.len()?;
        self.store.load(source, format)?;
        tracing::debug!(
            loaded = self.store.len()?.saturating_sub(before),
            %format,
            "statements loaded"
        );
        Ok(())
    }

    pub fn statements(&self) -> ProvResult<Vec<StatementExport>> {
        self.store.statements()
    }
}

impl ProvenanceBuilder for ImmediateGraphBuilder {
    fn create(&mut self, kind: ProvKind, uri: &str) -> ProvResult<String> {
        let subject = named_node(uri)?;
        self.store.insert(subject.as_ref(), RDF_TYPE, kind.iri())?;
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
        if let Some(violation) =
            check_signature(&self.store, self.observer.as_ref(), relation, subject, object)?
        {
            self.observer.on_event(&ProvEvent::Rejected(violation));
            return Ok(false);
        }

        let s = named_node(subject)?;
        match object {
            Object::Resource(uri) => {
                let o = named_node(uri)?;
                self.store.insert(s.as_ref(), relation.iri(), o.as_ref())?;
            }
            Object::Timestamp(millis) => {
                let literal = temporal::date_time_literal(millis)?;
                self.store.insert(s.as_ref(), relation.iri(), literal.as_ref())?;
            }
        }

        self.observer.on_event(&ProvEvent::StatementAdded {
            subject: subject.to_string(),
            predicate: relation.iri().as_str().to_string(),
            object: object.to_string(),
        });
        Ok(true)
    }

    fn generate_uri(&self) -> String {
        self.uris.generate()
    }

    fn validates(&self) -> bool {
        true
    }
}

impl ValidatingBuilder for ImmediateGraphBuilder {
    fn registry(&self) -> &dyn TypeRegistry {
        &self.store
    }
}

impl std::fmt::Debug for ImmediateGraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmediateGraphBuilder")
            .field("namespace", &self.uris.namespace())
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}
