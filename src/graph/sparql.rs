//! SPARQL-capable RDF store backed by oxigraph.
//!
//! Serves three roles: the statement graph of the immediate builder, the
//! [`TypeRegistry`] that builder checks against, and the [`StoreExecutor`]
//! deferred update logs are flushed into and the getter queries.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use oxigraph::io::{RdfParser, RdfSerializer};
use oxigraph::model::{GraphNameRef, NamedNodeRef, QuadRef, Term, TermRef};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{ProvError, ProvResult};
use crate::export::{ObjectExport, StatementExport};
use crate::registry::TypeRegistry;
use crate::temporal;
use crate::vocab::{ProvKind, RDF_TYPE};

use super::{GraphFormat, StoreExecutor, decode_term};

fn sparql_err(context: &str, e: impl std::fmt::Display) -> ProvError {
    ProvError::Sparql {
        message: format!("{context}: {e}"),
    }
}

/// Oxigraph store holding statements in its default graph.
pub struct SparqlStore {
    store: Store,
}

impl SparqlStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> ProvResult<Self> {
        let store = Store::new().map_err(|e| sparql_err("failed to create oxigraph store", e))?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &std::path::Path) -> ProvResult<Self> {
        std::fs::create_dir_all(path)?;
        let store = Store::open(path).map_err(|e| ProvError::Sparql {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    /// Insert one statement into the default graph. Identical statements are
    /// stored once.
    pub fn insert<'a>(
        &self,
        subject: NamedNodeRef<'a>,
        predicate: NamedNodeRef<'a>,
        object: impl Into<TermRef<'a>>,
    ) -> ProvResult<()> {
        let quad = QuadRef::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store
            .insert(quad)
            .map_err(|e| sparql_err("insert failed", e))?;
        Ok(())
    }

    /// Whether the default graph holds the statement.
    pub fn contains<'a>(
        &self,
        subject: NamedNodeRef<'a>,
        predicate: NamedNodeRef<'a>,
        object: impl Into<TermRef<'a>>,
    ) -> ProvResult<bool> {
        let quad = QuadRef::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store
            .contains(quad)
            .map_err(|e| sparql_err("containment check failed", e))
    }

    /// Number of distinct statements.
    pub fn len(&self) -> ProvResult<usize> {
        self.store
            .len()
            .map_err(|e| sparql_err("failed to count statements", e))
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> ProvResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Serialize the default graph, declaring the given prefixes where the
    /// format supports them.
    pub fn dump<W: Write>(
        &self,
        writer: W,
        format: GraphFormat,
        prefixes: &BTreeMap<String, String>,
    ) -> ProvResult<()> {
        let mut serializer = RdfSerializer::from_format(format.rdf_format());
        for (prefix, iri) in prefixes {
            serializer = serializer
                .with_prefix(prefix.as_str(), iri.as_str())
                .map_err(|e| ProvError::InvalidIri {
                    iri: iri.clone(),
                    message: e.to_string(),
                })?;
        }
        self.store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, writer)
            .map_err(|e| ProvError::Serialization {
                message: format!("failed to write {format}: {e}"),
            })?;
        Ok(())
    }

    /// Parse RDF into the default graph.
    pub fn load<R: Read>(&self, reader: R, format: GraphFormat) -> ProvResult<()> {
        self.store
            .load_from_reader(RdfParser::from_format(format.rdf_format()), reader)
            .map_err(|e| ProvError::Serialization {
                message: format!("failed to read {format}: {e}"),
            })
    }

    /// Every statement of the default graph in export form.
    pub fn statements(&self) -> ProvResult<Vec<StatementExport>> {
        let mut out = Vec::new();
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        {
            let quad = quad.map_err(|e| sparql_err("statement scan failed", e))?;
            let subject = quad.subject.to_string();
            out.push(StatementExport {
                subject: subject.trim_start_matches('<').trim_end_matches('>').to_string(),
                predicate: quad.predicate.as_str().to_string(),
                object: ObjectExport::from(&quad.object),
            });
        }
        Ok(out)
    }

    /// Bindings of the single projected variable, in store order.
    #[allow(deprecated)]
    fn select_terms(&self, query: &str) -> ProvResult<Vec<Term>> {
        let results = self
            .store
            .query(query)
            .map_err(|e| sparql_err("SPARQL query failed", e))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let variables = solutions.variables();
                if variables.len() != 1 {
                    return Err(ProvError::MalformedQuery {
                        variables: variables.len(),
                        query: query.to_string(),
                    });
                }
                let var = variables[0].as_str().to_string();

                let mut terms = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| sparql_err("solution error", e))?;
                    if let Some(term) = solution.get(var.as_str()) {
                        terms.push(term.clone());
                    }
                }
                Ok(terms)
            }
            _ => Err(ProvError::MalformedQuery {
                variables: 0,
                query: query.to_string(),
            }),
        }
    }

}

impl StoreExecutor for SparqlStore {
    #[allow(deprecated)]
    fn apply_updates(&self, updates: &[String]) -> ProvResult<bool> {
        if updates.is_empty() {
            return Ok(true);
        }
        let request = updates.join(" ;\n");
        self.store
            .update(request.as_str())
            .map_err(|e| sparql_err("SPARQL update failed", e))?;
        tracing::debug!(count = updates.len(), "applied updates");
        Ok(true)
    }

    fn select_values(&self, query: &str) -> ProvResult<Vec<String>> {
        Ok(self.select_terms(query)?.iter().map(decode_term).collect())
    }

    /// `xsd:dateTime` literals decode to epoch milliseconds. Plain integer
    /// literals are read as-is; the builders never write one, but stores
    /// filled by other tools may carry them. Anything else is skipped with a
    /// warning.
    fn select_long(&self, query: &str) -> ProvResult<Option<i64>> {
        let mut value = None;
        for term in self.select_terms(query)? {
            let Term::Literal(literal) = term else {
                continue;
            };
            let decoded = if temporal::is_date_time(&literal) {
                temporal::from_xsd_date_time(literal.value()).map_err(|e| e.to_string())
            } else {
                literal.value().parse::<i64>().map_err(|e| e.to_string())
            };
            match decoded {
                Ok(v) => value = Some(v),
                Err(reason) => {
                    tracing::warn!(literal = literal.value(), %reason, "skipping undecodable value")
                }
            }
        }
        Ok(value)
    }
}

impl TypeRegistry for SparqlStore {
    fn has_kind(&self, uri: &str, kind: ProvKind) -> ProvResult<bool> {
        // A string that is not an IRI can never have been typed.
        let Ok(subject) = NamedNodeRef::new(uri) else {
            return Ok(false);
        };
        self.contains(subject, RDF_TYPE, kind.iri())
    }
}

impl std::fmt::Debug for SparqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlStore").finish()
    }
}
