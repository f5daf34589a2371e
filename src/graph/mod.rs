//! Provenance graph plumbing shared by both backends and the getter.
//!
//! - [`Object`]: the object position of an assertion (resource or timestamp)
//! - [`StoreExecutor`]: the contract a SPARQL-capable store fulfils
//! - [`SparqlStore`](sparql::SparqlStore): the oxigraph implementation
//! - [`GraphFormat`]: serialization formats offered for graph output

pub mod sparql;

use std::fmt;
use std::str::FromStr;

use oxigraph::io::RdfFormat;
use oxigraph::model::{NamedNode, Term};
use serde::{Deserialize, Serialize};

use crate::error::{ProvError, ProvResult};
use crate::temporal;

/// Object position of a relationship assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object<'a> {
    /// Another resource, by URI.
    Resource(&'a str),
    /// Epoch milliseconds, stored as `xsd:dateTime`.
    Timestamp(i64),
}

impl fmt::Display for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(uri) => f.write_str(uri),
            Self::Timestamp(millis) => write!(f, "{millis}"),
        }
    }
}

/// Executes buffered updates and single-variable selections against a store.
///
/// Calls are synchronous. A batch passed to [`apply_updates`](Self::apply_updates)
/// either applies as a whole or the call fails.
pub trait StoreExecutor {
    /// Apply SPARQL Update operations in order.
    fn apply_updates(&self, updates: &[String]) -> ProvResult<bool>;

    /// Run a SELECT projecting exactly one variable and return its bound
    /// values, decoded with [`decode_term`]. Any other projection is
    /// [`ProvError::MalformedQuery`].
    fn select_values(&self, query: &str) -> ProvResult<Vec<String>>;

    /// Same restriction as [`select_values`](Self::select_values); returns the
    /// last bound literal that decodes as a long, if any.
    fn select_long(&self, query: &str) -> ProvResult<Option<i64>>;
}

impl<E: StoreExecutor + ?Sized> StoreExecutor for &E {
    fn apply_updates(&self, updates: &[String]) -> ProvResult<bool> {
        (**self).apply_updates(updates)
    }

    fn select_values(&self, query: &str) -> ProvResult<Vec<String>> {
        (**self).select_values(query)
    }

    fn select_long(&self, query: &str) -> ProvResult<Option<i64>> {
        (**self).select_long(query)
    }
}

/// Caller-facing string for a bound term: the IRI of a named node, the
/// lexical value of a literal, the label of a blank node.
pub fn decode_term(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        Term::BlankNode(node) => node.as_str().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Parse a resource URI, mapping failures to [`ProvError::InvalidIri`].
pub fn named_node(uri: &str) -> ProvResult<NamedNode> {
    NamedNode::new(uri).map_err(|e| ProvError::InvalidIri {
        iri: uri.to_string(),
        message: e.to_string(),
    })
}

/// Reject operands no graph could hold: a subject or resource object that is
/// not an IRI, or a timestamp outside the renderable range.
pub fn validate_operands(subject: &str, object: Object<'_>) -> ProvResult<()> {
    named_node(subject)?;
    match object {
        Object::Resource(uri) => {
            named_node(uri)?;
        }
        Object::Timestamp(millis) => {
            temporal::to_xsd_date_time(millis)?;
        }
    }
    Ok(())
}

/// RDF syntaxes the immediate backend can write and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Turtle,
    NTriples,
    RdfXml,
}

impl GraphFormat {
    pub fn rdf_format(self) -> RdfFormat {
        match self {
            Self::Turtle => RdfFormat::Turtle,
            Self::NTriples => RdfFormat::NTriples,
            Self::RdfXml => RdfFormat::RdfXml,
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turtle => write!(f, "turtle"),
            Self::NTriples => write!(f, "ntriples"),
            Self::RdfXml => write!(f, "rdfxml"),
        }
    }
}

impl FromStr for GraphFormat {
    type Err = ProvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "nt" => Ok(Self::NTriples),
            "rdfxml" | "rdf" | "xml" => Ok(Self::RdfXml),
            _ => Err(ProvError::UnknownName {
                kind: "format",
                name: s.to_string(),
            }),
        }
    }
}
