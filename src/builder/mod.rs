//! Write side: the provenance builder contract and its two backends.
//!
//! - [`ImmediateGraphBuilder`]: commits into an in-memory oxigraph graph and
//!   refuses any relationship whose operands lack the required kinds
//! - [`DeferredLogBuilder`]: serializes every call into a SPARQL update log
//!   for later application to an external store, with no checking at all
//!
//! The two differ in capability, and the difference is visible in the types:
//! the former implements [`ValidatingBuilder`], the latter
//! [`NonValidatingBuilder`]. Code that only needs to record provenance should
//! take `&mut dyn ProvenanceBuilder` (or a [`Backend`]).

pub mod graph;
pub mod update_log;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ProvConfig;
use crate::error::{ProvError, ProvResult};
use crate::graph::{Object, StoreExecutor};
use crate::observe::NullObserver;
use crate::registry::{TypeRegistry, TypeViolation, check_signature};
use crate::vocab::{ProvKind, Relation, TimeBound};

pub use graph::ImmediateGraphBuilder;
pub use update_log::{DeferredLogBuilder, UpdateLog};

/// Records typed resources and the relationships between them.
///
/// `add_*` methods return `Ok(true)` when the statement was recorded and
/// `Ok(false)` when a validating backend refused it. `Err` is reserved for
/// store failures and values that cannot be encoded at all.
///
/// Both backends share the same preconditions: `create` and `add_*` fail with
/// [`ProvError::InvalidIri`] for a URI that is not an IRI and with
/// [`ProvError::InvalidTimestamp`] for an instant outside years 0000 through
/// 9999, and nothing is recorded in either case. Kinds are never a
/// precondition of `create`.
pub trait ProvenanceBuilder {
    /// Assert `uri rdf:type prov:<kind>` and return `uri`.
    fn create(&mut self, kind: ProvKind, uri: &str) -> ProvResult<String>;

    /// Assert `subject relation object`.
    fn assert_relation(
        &mut self,
        relation: Relation,
        subject: &str,
        object: Object<'_>,
    ) -> ProvResult<bool>;

    /// A fresh URI under this builder's namespace.
    fn generate_uri(&self) -> String;

    /// Whether relationships are type-checked before they are recorded.
    fn validates(&self) -> bool;

    /// [`create`](Self::create) under a generated URI.
    fn create_new(&mut self, kind: ProvKind) -> ProvResult<String> {
        let uri = self.generate_uri();
        self.create(kind, &uri)
    }

    fn create_entity(&mut self, uri: &str) -> ProvResult<String> {
        self.create(ProvKind::Entity, uri)
    }

    fn create_activity(&mut self, uri: &str) -> ProvResult<String> {
        self.create(ProvKind::Activity, uri)
    }

    fn create_agent(&mut self, uri: &str) -> ProvResult<String> {
        self.create(ProvKind::Agent, uri)
    }

    fn new_entity(&mut self) -> ProvResult<String> {
        self.create_new(ProvKind::Entity)
    }

    fn new_activity(&mut self) -> ProvResult<String> {
        self.create_new(ProvKind::Activity)
    }

    fn new_agent(&mut self) -> ProvResult<String> {
        self.create_new(ProvKind::Agent)
    }

    fn add_acted_on_behalf_of(&mut self, agent: &str, principal: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::ActedOnBehalfOf, agent, Object::Resource(principal))
    }

    fn add_timestamp(&mut self, bound: TimeBound, activity: &str, millis: i64) -> ProvResult<bool> {
        self.assert_relation(bound.relation(), activity, Object::Timestamp(millis))
    }

    fn add_started_at_time(&mut self, activity: &str, millis: i64) -> ProvResult<bool> {
        self.add_timestamp(TimeBound::Started, activity, millis)
    }

    fn add_ended_at_time(&mut self, activity: &str, millis: i64) -> ProvResult<bool> {
        self.add_timestamp(TimeBound::Ended, activity, millis)
    }

    fn add_used(&mut self, activity: &str, entity: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::Used, activity, Object::Resource(entity))
    }

    fn add_was_associated_with(&mut self, activity: &str, agent: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::WasAssociatedWith, activity, Object::Resource(agent))
    }

    fn add_was_attributed_to(&mut self, entity: &str, agent: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::WasAttributedTo, entity, Object::Resource(agent))
    }

    fn add_was_derived_from(&mut self, derived: &str, source: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::WasDerivedFrom, derived, Object::Resource(source))
    }

    fn add_was_generated_by(&mut self, entity: &str, activity: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::WasGeneratedBy, entity, Object::Resource(activity))
    }

    fn add_was_informed_by(&mut self, informed: &str, informant: &str) -> ProvResult<bool> {
        self.assert_relation(Relation::WasInformedBy, informed, Object::Resource(informant))
    }
}

/// A builder that checks operand kinds against a [`TypeRegistry`] before
/// committing, and commits nothing when a check fails.
pub trait ValidatingBuilder: ProvenanceBuilder {
    fn registry(&self) -> &dyn TypeRegistry;

    /// Dry run: the violation `assert_relation` would report, if any.
    fn check(
        &self,
        relation: Relation,
        subject: &str,
        object: Object<'_>,
    ) -> ProvResult<Option<TypeViolation>> {
        check_signature(self.registry(), &NullObserver, relation, subject, object)
    }
}

/// A builder that records without checking and hands its buffered updates to
/// a [`StoreExecutor`] on request.
pub trait NonValidatingBuilder: ProvenanceBuilder {
    /// Copy of the buffered updates, oldest first.
    fn pending_updates(&self) -> Vec<String>;

    /// Drop every buffered update, returning how many there were.
    fn clear_updates(&mut self) -> usize;

    /// Apply the buffered updates. The buffer is read, not consumed.
    fn flush_to(&self, executor: &dyn StoreExecutor) -> ProvResult<bool> {
        executor.apply_updates(&self.pending_updates())
    }
}

/// Which backend a [`Backend`] is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Immediate,
    Deferred,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => write!(f, "immediate"),
            Self::Deferred => write!(f, "deferred"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ProvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "immediate" | "graph" => Ok(Self::Immediate),
            "deferred" | "update-log" | "log" => Ok(Self::Deferred),
            _ => Err(ProvError::UnknownName {
                kind: "backend",
                name: s.to_string(),
            }),
        }
    }
}

/// A builder whose backend is chosen at construction time.
#[derive(Debug)]
pub enum Backend {
    Immediate(ImmediateGraphBuilder),
    Deferred(DeferredLogBuilder),
}

impl Backend {
    pub fn new(kind: BackendKind, namespace: &str) -> ProvResult<Self> {
        Ok(match kind {
            BackendKind::Immediate => Self::Immediate(ImmediateGraphBuilder::new(namespace)?),
            BackendKind::Deferred => Self::Deferred(DeferredLogBuilder::new(namespace)),
        })
    }

    /// Build the configured backend, registering any extra prefixes.
    pub fn from_config(config: &ProvConfig) -> ProvResult<Self> {
        let mut backend = Self::new(config.backend, &config.namespace)?;
        if let Self::Immediate(builder) = &mut backend {
            for (prefix, iri) in &config.prefixes {
                builder.add_prefix(prefix, iri);
            }
        }
        tracing::info!(
            backend = %config.backend,
            namespace = %config.namespace,
            "provenance builder ready"
        );
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Immediate(_) => BackendKind::Immediate,
            Self::Deferred(_) => BackendKind::Deferred,
        }
    }

    fn inner(&self) -> &dyn ProvenanceBuilder {
        match self {
            Self::Immediate(b) => b,
            Self::Deferred(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ProvenanceBuilder {
        match self {
            Self::Immediate(b) => b,
            Self::Deferred(b) => b,
        }
    }
}

impl ProvenanceBuilder for Backend {
    fn create(&mut self, kind: ProvKind, uri: &str) -> ProvResult<String> {
        self.inner_mut().create(kind, uri)
    }

    fn assert_relation(
        &mut self,
        relation: Relation,
        subject: &str,
        object: Object<'_>,
    ) -> ProvResult<bool> {
        self.inner_mut().assert_relation(relation, subject, object)
    }

    fn generate_uri(&self) -> String {
        self.inner().generate_uri()
    }

    fn validates(&self) -> bool {
        self.inner().validates()
    }
}
