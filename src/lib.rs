// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # provo
//!
//! Record and query PROV-O provenance: declare resources as Entities,
//! Activities or Agents, assert the relationships between them, and read
//! them back. A relationship is never recorded between resources of the
//! wrong kind by the validating backend.
//!
//! ## Architecture
//!
//! - **Vocabulary** (`vocab`): PROV-O IRIs and relation type signatures
//! - **Builders** (`builder`): immediate oxigraph graph (validating) and
//!   deferred SPARQL update log (non-validating) behind one trait
//! - **Getter** (`getter`): lookups as single-variable SPARQL selections
//! - **Store** (`graph`): the oxigraph-backed store executor and type registry
//! - **Encoding** (`ident`, `temporal`, `query`): URIs, `xsd:dateTime`, SPARQL text
//!
//! ## Library usage
//!
//! ```
//! use provo::builder::{ImmediateGraphBuilder, ProvenanceBuilder};
//! use provo::getter::{ProvenanceGetter, QueryGetter};
//!
//! let mut prov = ImmediateGraphBuilder::new("http://example.org/").unwrap();
//! let report = prov.create_entity("http://example.org/report").unwrap();
//! let writing = prov.create_activity("http://example.org/writing").unwrap();
//! assert!(prov.add_was_generated_by(&report, &writing).unwrap());
//! assert!(!prov.add_was_generated_by(&writing, &report).unwrap());
//!
//! let getter = QueryGetter::new(prov.store());
//! assert_eq!(getter.was_generated_by(&report).unwrap(), vec![writing]);
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod getter;
pub mod graph;
pub mod ident;
pub mod observe;
pub mod query;
pub mod registry;
pub mod temporal;
pub mod vocab;
