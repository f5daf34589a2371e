//! Read side: relationship and timestamp lookups translated into
//! single-variable SPARQL selections.
//!
//! Nothing found is never an error. Relational lookups return an empty list
//! and timestamp lookups return [`ABSENT_TIMESTAMP`]. A malformed selection
//! is a defect and propagates as [`ProvError::MalformedQuery`](crate::error::ProvError::MalformedQuery).

use crate::error::ProvResult;
use crate::graph::StoreExecutor;
use crate::query;
use crate::temporal::ABSENT_TIMESTAMP;
use crate::vocab::{Relation, TimeBound};

/// Resolves provenance relationships for a resource.
pub trait ProvenanceGetter {
    /// Every object of `subject relation ?o`, in store order.
    fn related(&self, relation: Relation, subject: &str) -> ProvResult<Vec<String>>;

    /// Epoch milliseconds of the activity's bound, truncated to the second,
    /// or [`ABSENT_TIMESTAMP`]. With several values stored the one returned
    /// depends on store order.
    fn timestamp(&self, bound: TimeBound, activity: &str) -> ProvResult<i64>;

    fn acted_on_behalf_of(&self, agent: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::ActedOnBehalfOf, agent)
    }

    fn used(&self, activity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::Used, activity)
    }

    fn was_associated_with(&self, activity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::WasAssociatedWith, activity)
    }

    fn was_attributed_to(&self, entity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::WasAttributedTo, entity)
    }

    fn was_derived_from(&self, entity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::WasDerivedFrom, entity)
    }

    fn was_generated_by(&self, entity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::WasGeneratedBy, entity)
    }

    fn was_informed_by(&self, activity: &str) -> ProvResult<Vec<String>> {
        self.related(Relation::WasInformedBy, activity)
    }

    fn started_at_time(&self, activity: &str) -> ProvResult<i64> {
        self.timestamp(TimeBound::Started, activity)
    }

    fn ended_at_time(&self, activity: &str) -> ProvResult<i64> {
        self.timestamp(TimeBound::Ended, activity)
    }
}

/// Getter over any [`StoreExecutor`], owned or borrowed.
#[derive(Debug, Clone)]
pub struct QueryGetter<E> {
    executor: E,
}

impl<E: StoreExecutor> QueryGetter<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: StoreExecutor> ProvenanceGetter for QueryGetter<E> {
    fn related(&self, relation: Relation, subject: &str) -> ProvResult<Vec<String>> {
        let sparql = query::select_objects(subject, relation);
        tracing::trace!(%relation, %subject, "select");
        self.executor.select_values(&sparql)
    }

    fn timestamp(&self, bound: TimeBound, activity: &str) -> ProvResult<i64> {
        let sparql = query::select_objects(activity, bound.relation());
        Ok(self
            .executor
            .select_long(&sparql)?
            .unwrap_or(ABSENT_TIMESTAMP))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::builder::{DeferredLogBuilder, NonValidatingBuilder, ProvenanceBuilder};
    use crate::error::ProvError;
    use crate::graph::sparql::SparqlStore;

    const NS: &str = "http://www.example.com/";

    fn flushed(build: impl FnOnce(&mut DeferredLogBuilder)) -> SparqlStore {
        let store = SparqlStore::in_memory().unwrap();
        let mut builder = DeferredLogBuilder::new(NS);
        build(&mut builder);
        builder.flush_to(&store).unwrap();
        store
    }

    #[test]
    fn acted_on_behalf_of() {
        let store = flushed(|b| {
            b.add_acted_on_behalf_of(
                "http://www.example.com/agent/jamesBond",
                "http://www.example.com/agent/britishGov",
            )
            .unwrap();
        });
        let getter = QueryGetter::new(&store);
        assert_eq!(
            getter
                .acted_on_behalf_of("http://www.example.com/agent/jamesBond")
                .unwrap(),
            vec!["http://www.example.com/agent/britishGov"]
        );
    }

    #[test]
    fn each_relational_lookup() {
        let act = "http://www.example.com/activity/snooping";
        let act2 = "http://www.example.com/activity/interrogation";
        let ent = "http://www.example.com/entity/coolGadget";
        let ent2 = "http://www.example.com/entity/gadget";
        let agent = "http://www.example.com/agent/jamesBond";
        let store = flushed(|b| {
            b.add_used(act, ent).unwrap();
            b.add_was_associated_with(act, agent).unwrap();
            b.add_was_attributed_to(ent, agent).unwrap();
            b.add_was_derived_from(ent, ent2).unwrap();
            b.add_was_generated_by(ent2, act).unwrap();
            b.add_was_informed_by(act2, act).unwrap();
        });
        let g = QueryGetter::new(&store);
        assert_eq!(g.used(act).unwrap(), vec![ent]);
        assert_eq!(g.was_associated_with(act).unwrap(), vec![agent]);
        assert_eq!(g.was_attributed_to(ent).unwrap(), vec![agent]);
        assert_eq!(g.was_derived_from(ent).unwrap(), vec![ent2]);
        assert_eq!(g.was_generated_by(ent2).unwrap(), vec![act]);
        assert_eq!(g.was_informed_by(act2).unwrap(), vec![act]);
    }

    #[test]
    fn several_objects_are_all_returned() {
        let store = flushed(|b| {
            b.add_used("ex:a", "ex:e1").unwrap();
            b.add_used("ex:a", "ex:e2").unwrap();
        });
        let mut used = QueryGetter::new(&store).used("ex:a").unwrap();
        used.sort();
        assert_eq!(used, vec!["ex:e1", "ex:e2"]);
    }

    #[test]
    fn timestamps_truncate_to_second() {
        let start = 1_700_000_123_456;
        let end = start + 60_000;
        let store = flushed(|b| {
            b.add_started_at_time("ex:a", start).unwrap();
            b.add_ended_at_time("ex:a", end).unwrap();
        });
        let g = QueryGetter::new(&store);
        assert_eq!(g.started_at_time("ex:a").unwrap(), start - start % 1000);
        assert_eq!(g.ended_at_time("ex:a").unwrap(), end - end % 1000);
    }

    #[test]
    fn absence_is_not_an_error() {
        let store = flushed(|b| {
            b.create_entity("ex:e").unwrap();
        });
        let g = QueryGetter::new(&store);
        assert!(g.used("ex:e").unwrap().is_empty());
        assert!(g.was_generated_by("ex:e").unwrap().is_empty());
        assert_eq!(g.started_at_time("ex:e").unwrap(), ABSENT_TIMESTAMP);
        assert_eq!(g.ended_at_time("ex:nowhere").unwrap(), ABSENT_TIMESTAMP);
    }

    /// Executor that answers with a canned multi-variable failure, to check
    /// the getter does not swallow it.
    struct BrokenExecutor {
        seen: RefCell<Vec<String>>,
    }

    impl StoreExecutor for BrokenExecutor {
        fn apply_updates(&self, _updates: &[String]) -> ProvResult<bool> {
            Ok(true)
        }

        fn select_values(&self, query: &str) -> ProvResult<Vec<String>> {
            self.seen.borrow_mut().push(query.to_string());
            Err(ProvError::MalformedQuery {
                variables: 2,
                query: query.to_string(),
            })
        }

        fn select_long(&self, query: &str) -> ProvResult<Option<i64>> {
            self.select_values(query).map(|_| None)
        }
    }

    #[test]
    fn malformed_query_propagates() {
        let exec = BrokenExecutor {
            seen: RefCell::new(Vec::new()),
        };
        let g = QueryGetter::new(&exec);
        assert!(matches!(
            g.used("ex:a"),
            Err(ProvError::MalformedQuery { .. })
        ));
        assert!(matches!(
            g.started_at_time("ex:a"),
            Err(ProvError::MalformedQuery { .. })
        ));
        assert_eq!(
            exec.seen.borrow()[0],
            "SELECT ?var WHERE { <ex:a> <http://www.w3.org/ns/prov#used> ?var . }"
        );
    }
}
