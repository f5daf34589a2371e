//! Fixed PROV-O vocabulary: type IRIs, relation IRIs, and the type signature
//! every relation imposes on its subject and object.
//!
//! The table is static and immutable. Both builder backends and the getter
//! resolve names through it, so it is the single place an IRI is spelled out.

use std::fmt;
use std::str::FromStr;

use oxigraph::model::NamedNodeRef;
use serde::{Deserialize, Serialize};

use crate::error::ProvError;

/// PROV-O namespace.
pub const PROV_NS: &str = "http://www.w3.org/ns/prov#";
/// RDF namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// XML Schema datatypes namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const XSD_DATE_TIME: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTime");

pub const ENTITY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#Entity");
pub const ACTIVITY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#Activity");
pub const AGENT: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#Agent");

pub const ACTED_ON_BEHALF_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#actedOnBehalfOf");
pub const ENDED_AT_TIME: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#endedAtTime");
pub const STARTED_AT_TIME: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#startedAtTime");
pub const USED: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#used");
pub const WAS_ASSOCIATED_WITH: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasAssociatedWith");
pub const WAS_ATTRIBUTED_TO: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasAttributedTo");
pub const WAS_DERIVED_FROM: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasDerivedFrom");
pub const WAS_GENERATED_BY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasGeneratedBy");
pub const WAS_INFORMED_BY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasInformedBy");

/// The three PROV-O resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvKind {
    Entity,
    Activity,
    Agent,
}

impl ProvKind {
    pub const ALL: [ProvKind; 3] = [Self::Entity, Self::Activity, Self::Agent];

    /// The `prov:` class IRI asserted by a type statement.
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Entity => ENTITY,
            Self::Activity => ACTIVITY,
            Self::Agent => AGENT,
        }
    }
}

impl fmt::Display for ProvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => write!(f, "Entity"),
            Self::Activity => write!(f, "Activity"),
            Self::Agent => write!(f, "Agent"),
        }
    }
}

impl FromStr for ProvKind {
    type Err = ProvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProvError::UnknownName {
                kind: "kind",
                name: s.to_string(),
            })
    }
}

/// What a relation accepts in object position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    /// A resource asserted as the given kind.
    Kind(ProvKind),
    /// An epoch-millisecond timestamp, stored as `xsd:dateTime`.
    Timestamp,
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Required subject kind and object range of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub subject: ProvKind,
    pub object: Range,
}

/// The PROV-O relations this crate can assert and query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    ActedOnBehalfOf,
    EndedAtTime,
    StartedAtTime,
    Used,
    WasAssociatedWith,
    WasAttributedTo,
    WasDerivedFrom,
    WasGeneratedBy,
    WasInformedBy,
}

impl Relation {
    pub const ALL: [Relation; 9] = [
        Self::ActedOnBehalfOf,
        Self::EndedAtTime,
        Self::StartedAtTime,
        Self::Used,
        Self::WasAssociatedWith,
        Self::WasAttributedTo,
        Self::WasDerivedFrom,
        Self::WasGeneratedBy,
        Self::WasInformedBy,
    ];

    /// The predicate IRI, `prov:` + [`local_name`](Self::local_name).
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::ActedOnBehalfOf => ACTED_ON_BEHALF_OF,
            Self::EndedAtTime => ENDED_AT_TIME,
            Self::StartedAtTime => STARTED_AT_TIME,
            Self::Used => USED,
            Self::WasAssociatedWith => WAS_ASSOCIATED_WITH,
            Self::WasAttributedTo => WAS_ATTRIBUTED_TO,
            Self::WasDerivedFrom => WAS_DERIVED_FROM,
            Self::WasGeneratedBy => WAS_GENERATED_BY,
            Self::WasInformedBy => WAS_INFORMED_BY,
        }
    }

    pub fn local_name(self) -> &'static str {
        match self {
            Self::ActedOnBehalfOf => "actedOnBehalfOf",
            Self::EndedAtTime => "endedAtTime",
            Self::StartedAtTime => "startedAtTime",
            Self::Used => "used",
            Self::WasAssociatedWith => "wasAssociatedWith",
            Self::WasAttributedTo => "wasAttributedTo",
            Self::WasDerivedFrom => "wasDerivedFrom",
            Self::WasGeneratedBy => "wasGeneratedBy",
            Self::WasInformedBy => "wasInformedBy",
        }
    }

    pub fn signature(self) -> Signature {
        use ProvKind::{Activity, Agent, Entity};

        let (subject, object) = match self {
            Self::ActedOnBehalfOf => (Agent, Range::Kind(Agent)),
            Self::EndedAtTime => (Activity, Range::Timestamp),
            Self::StartedAtTime => (Activity, Range::Timestamp),
            Self::Used => (Activity, Range::Kind(Entity)),
            Self::WasAssociatedWith => (Activity, Range::Kind(Agent)),
            Self::WasAttributedTo => (Entity, Range::Kind(Agent)),
            Self::WasDerivedFrom => (Entity, Range::Kind(Entity)),
            Self::WasGeneratedBy => (Entity, Range::Kind(Activity)),
            Self::WasInformedBy => (Activity, Range::Kind(Activity)),
        };
        Signature { subject, object }
    }

    /// Whether the object of this relation is a timestamp literal.
    pub fn is_temporal(self) -> bool {
        self.signature().object == Range::Timestamp
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

impl FromStr for Relation {
    type Err = ProvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let local = s.strip_prefix(PROV_NS).or_else(|| s.strip_prefix("prov:")).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|r| r.local_name().eq_ignore_ascii_case(local))
            .ok_or_else(|| ProvError::UnknownName {
                kind: "relation",
                name: s.to_string(),
            })
    }
}

/// The two temporal bounds of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBound {
    Started,
    Ended,
}

impl TimeBound {
    pub fn relation(self) -> Relation {
        match self {
            Self::Started => Relation::StartedAtTime,
            Self::Ended => Relation::EndedAtTime,
        }
    }
}
