//! Batch files: resources and assertions described in TOML, replayed through
//! any builder.
//!
//! ```toml
//! [[resource]]
//! kind = "entity"
//! uri = "http://example.org/report"
//!
//! [[resource]]
//! kind = "activity"
//! uri = "http://example.org/writing"
//!
//! [[assertion]]
//! relation = "wasGeneratedBy"
//! subject = "http://example.org/report"
//! object = "http://example.org/writing"
//!
//! [[assertion]]
//! relation = "startedAtTime"
//! subject = "http://example.org/writing"
//! timestamp = 1356998400000
//! ```
//!
//! A resource without `uri` gets a generated one. Resources are created first,
//! in file order, then assertions are applied in file order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::ProvenanceBuilder;
use crate::error::{ProvError, ProvResult};
use crate::graph::Object;
use crate::vocab::{ProvKind, Relation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub kind: ProvKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSpec {
    pub relation: Relation,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl AssertionSpec {
    fn object(&self) -> ProvResult<Object<'_>> {
        match (&self.object, self.timestamp) {
            (Some(uri), None) => Ok(Object::Resource(uri)),
            (None, Some(millis)) => Ok(Object::Timestamp(millis)),
            _ => Err(ProvError::Config {
                path: "<batch>".into(),
                message: format!(
                    "assertion {} on {} needs exactly one of `object` or `timestamp`",
                    self.relation, self.subject
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceSpec>,
    #[serde(default, rename = "assertion")]
    pub assertions: Vec<AssertionSpec>,
}

/// Outcome of [`Batch::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// URIs of created resources, in order.
    pub created: Vec<String>,
    pub accepted: usize,
    pub rejected: usize,
}

impl Batch {
    pub fn from_toml_str(text: &str) -> ProvResult<Self> {
        toml::from_str(text).map_err(|e| ProvError::Config {
            path: "<batch>".into(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> ProvResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ProvError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Replay the batch. A malformed assertion aborts; a refused one is
    /// counted and skipped.
    pub fn apply(&self, builder: &mut dyn ProvenanceBuilder) -> ProvResult<BatchReport> {
        let mut report = BatchReport::default();
        for resource in &self.resources {
            let uri = match &resource.uri {
                Some(uri) => builder.create(resource.kind, uri)?,
                None => builder.create_new(resource.kind)?,
            };
            report.created.push(uri);
        }
        for assertion in &self.assertions {
            let object = assertion.object()?;
            if builder.assert_relation(assertion.relation, &assertion.subject, object)? {
                report.accepted += 1;
            } else {
                report.rejected += 1;
            }
        }
        tracing::info!(
            created = report.created.len(),
            accepted = report.accepted,
            rejected = report.rejected,
            "batch applied"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DeferredLogBuilder, ImmediateGraphBuilder};

    const BATCH: &str = r#"
        [[resource]]
        kind = "entity"
        uri = "http://example.org/report"

        [[resource]]
        kind = "activity"
        uri = "http://example.org/writing"

        [[resource]]
        kind = "agent"

        [[assertion]]
        relation = "wasGeneratedBy"
        subject = "http://example.org/report"
        object = "http://example.org/writing"

        [[assertion]]
        relation = "startedAtTime"
        subject = "http://example.org/writing"
        timestamp = 1356998400000

        [[assertion]]
        relation = "used"
        subject = "http://example.org/report"
        object = "http://example.org/writing"
    "#;

    #[test]
    fn parse() {
        let batch = Batch::from_toml_str(BATCH).unwrap();
        assert_eq!(batch.resources.len(), 3);
        assert_eq!(batch.resources[2].uri, None);
        assert_eq!(batch.assertions[1].relation, Relation::StartedAtTime);
        assert_eq!(batch.assertions[1].timestamp, Some(1_356_998_400_000));
    }

    #[test]
    fn immediate_counts_rejections() {
        let batch = Batch::from_toml_str(BATCH).unwrap();
        let mut builder = ImmediateGraphBuilder::new("http://example.org/").unwrap();
        let report = batch.apply(&mut builder).unwrap();
        assert_eq!(report.created.len(), 3);
        assert!(report.created[2].starts_with("http://example.org/"));
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn deferred_accepts_everything() {
        let batch = Batch::from_toml_str(BATCH).unwrap();
        let mut builder = DeferredLogBuilder::new("http://example.org/");
        let report = batch.apply(&mut builder).unwrap();
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 0);
        assert_eq!(builder.log().len(), 6);
    }

    #[test]
    fn object_and_timestamp_are_exclusive() {
        let batch = Batch::from_toml_str(
            r#"
            [[assertion]]
            relation = "used"
            subject = "ex:a"
            "#,
        )
        .unwrap();
        let mut builder = DeferredLogBuilder::new("ex:");
        assert!(matches!(
            batch.apply(&mut builder),
            Err(ProvError::Config { .. })
        ));
    }

    #[test]
    fn unknown_relation_fails_to_parse() {
        assert!(Batch::from_toml_str(
            r#"
            [[assertion]]
            relation = "hadPlan"
            subject = "ex:a"
            object = "ex:b"
            "#
        )
        .is_err());
    }
}
