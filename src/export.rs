//! Export types for serializing a provenance graph as JSON.
//!
//! These give a plain, label-free view of every statement, independent of the
//! RDF syntax chosen for graph output.

use oxigraph::model::Term;
use serde::{Deserialize, Serialize};

/// Object position of an exported statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ObjectExport {
    /// A resource IRI.
    Resource(String),
    /// A literal's lexical form and datatype IRI.
    Literal { lexical: String, datatype: String },
    /// A blank node label.
    Blank(String),
}

impl From<&Term> for ObjectExport {
    fn from(term: &Term) -> Self {
        match term {
            Term::NamedNode(node) => Self::Resource(node.as_str().to_string()),
            Term::Literal(literal) => Self::Literal {
                lexical: literal.value().to_string(),
                datatype: literal.datatype().as_str().to_string(),
            },
            Term::BlankNode(node) => Self::Blank(node.as_str().to_string()),
            #[allow(unreachable_patterns)]
            other => Self::Blank(other.to_string()),
        }
    }
}

/// One exported statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementExport {
    /// Subject IRI.
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: ObjectExport,
}
