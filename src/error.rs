//! Rich diagnostic error types for provo.
//!
//! Only conditions that indicate a broken contract or a failing store are
//! errors. A relationship rejected by the type checker is reported through the
//! builder's boolean result, and a lookup that finds nothing returns an empty
//! value, so neither appears here.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for provo.
#[derive(Debug, Error, Diagnostic)]
pub enum ProvError {
    #[error("selection query must project exactly one variable, found {variables}: {query}")]
    #[diagnostic(
        code(provo::query::malformed),
        help(
            "The store executor only returns the bindings of a single variable. \
             This indicates a defect in query construction, not a data problem."
        )
    )]
    MalformedQuery { variables: usize, query: String },

    #[error("SPARQL store error: {message}")]
    #[diagnostic(
        code(provo::store::sparql),
        help(
            "The oxigraph store rejected the operation. Check the update or query \
             syntax and that the store directory is readable and writable."
        )
    )]
    Sparql { message: String },

    #[error("invalid IRI <{iri}>: {message}")]
    #[diagnostic(
        code(provo::iri::invalid),
        help("Resource identifiers must be absolute IRIs, e.g. `http://example.org/e1`.")
    )]
    InvalidIri { iri: String, message: String },

    #[error("invalid timestamp {value}: {message}")]
    #[diagnostic(
        code(provo::temporal::invalid),
        help(
            "Timestamps are epoch milliseconds and are stored as xsd:dateTime \
             values without a sub-second part."
        )
    )]
    InvalidTimestamp { value: String, message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(provo::io::serialization),
        help("Failed to read or write RDF. Check that the chosen format matches the input.")
    )]
    Serialization { message: String },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(provo::io),
        help("A filesystem operation failed. Check paths and permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration at {path}: {message}")]
    #[diagnostic(
        code(provo::config::invalid),
        help("The file must be valid TOML. Every field is optional and has a default.")
    )]
    Config { path: String, message: String },

    #[error("unknown {kind} name: \"{name}\"")]
    #[diagnostic(
        code(provo::vocab::unknown_name),
        help("Run `provo vocab` to list the supported relation and kind names.")
    )]
    UnknownName { kind: &'static str, name: String },
}

impl From<std::io::Error> for ProvError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

/// Convenience result type.
pub type ProvResult<T> = Result<T, ProvError>;
