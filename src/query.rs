//! SPARQL text produced by the deferred builder and the getter.
//!
//! Update grammar:
//!
//! ```text
//! INSERT DATA { <S> <P> <O> . }
//! INSERT DATA { <S> <P> "2013-01-01T00:00:00Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> . }
//! INSERT DATA { <URI> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <PROV_TYPE> . }
//! ```
//!
//! Selection grammar: `SELECT ?var WHERE { <S> <P> ?var . }`

use crate::error::ProvResult;
use crate::graph::Object;
use crate::temporal;
use crate::vocab::{ProvKind, RDF_TYPE, Relation};

/// Name of the single projected variable.
pub const SELECT_VAR: &str = "var";

/// `INSERT DATA` for a resource-to-resource statement.
pub fn insert_resource(subject: &str, predicate: &str, object: &str) -> String {
    format!("INSERT DATA {{ <{subject}> <{predicate}> <{object}> . }}")
}

/// `INSERT DATA` for a statement whose object is already rendered as a
/// SPARQL literal.
pub fn insert_literal(subject: &str, predicate: &str, literal: &str) -> String {
    format!("INSERT DATA {{ <{subject}> <{predicate}> {literal} . }}")
}

/// `INSERT DATA` for an `rdf:type` statement.
pub fn insert_type(uri: &str, kind: ProvKind) -> String {
    insert_resource(uri, RDF_TYPE.as_str(), kind.iri().as_str())
}

/// `INSERT DATA` for a relationship assertion. Only timestamp rendering can
/// fail.
pub fn insert_assertion(relation: Relation, subject: &str, object: Object<'_>) -> ProvResult<String> {
    let predicate = relation.iri().as_str();
    Ok(match object {
        Object::Resource(uri) => insert_resource(subject, predicate, uri),
        Object::Timestamp(millis) => {
            insert_literal(subject, predicate, &temporal::sparql_date_time(millis)?)
        }
    })
}

/// Select every object bound to `subject relation ?var`.
pub fn select_objects(subject: &str, relation: Relation) -> String {
    format!(
        "SELECT ?{SELECT_VAR} WHERE {{ <{subject}> <{}> ?{SELECT_VAR} . }}",
        relation.iri().as_str()
    )
}
