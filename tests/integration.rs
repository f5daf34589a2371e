//! End-to-end tests for provo.
//!
//! These exercise both builders through the shared contract, the getter over
//! both resulting stores, and the observability hook.

use provo::builder::{
    Backend, BackendKind, DeferredLogBuilder, ImmediateGraphBuilder, NonValidatingBuilder,
    ProvenanceBuilder, ValidatingBuilder,
};
use provo::error::ProvError;
use provo::getter::{ProvenanceGetter, QueryGetter};
use provo::graph::sparql::SparqlStore;
use provo::graph::{GraphFormat, Object};
use provo::observe::{ProvEvent, RecordingObserver};
use provo::registry::{Operand, TypeRegistry};
use provo::temporal::ABSENT_TIMESTAMP;
use provo::vocab::{ProvKind, Range, Relation};

const NS: &str = "http://example.org/";

fn uri(local: &str) -> String {
    format!("{NS}{local}")
}

#[test]
fn end_to_end_scenario() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    let e1 = prov.create_entity(&uri("e1")).unwrap();
    let a1 = prov.create_activity(&uri("a1")).unwrap();
    let ag1 = prov.create_agent(&uri("ag1")).unwrap();

    assert!(prov.add_was_generated_by(&e1, &a1).unwrap());
    assert!(prov.add_was_attributed_to(&e1, &ag1).unwrap());
    let before = prov.statement_count().unwrap();

    assert!(!prov.add_was_generated_by(&ag1, &a1).unwrap());
    assert_eq!(prov.statement_count().unwrap(), before);
}

#[test]
fn failed_check_leaves_serialization_unchanged() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    prov.create_entity(&uri("e")).unwrap();
    prov.create_agent(&uri("g")).unwrap();

    let mut before = Vec::new();
    prov.write_to(&mut before, GraphFormat::NTriples).unwrap();

    assert!(!prov.add_used(&uri("e"), &uri("g")).unwrap());
    assert!(!prov.add_acted_on_behalf_of(&uri("g"), &uri("e")).unwrap());
    assert!(!prov.add_ended_at_time(&uri("g"), 0).unwrap());

    let mut after = Vec::new();
    prov.write_to(&mut after, GraphFormat::NTriples).unwrap();
    assert_eq!(before, after);
}

#[test]
fn temporal_round_trip_on_immediate_store() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    let a = prov.new_activity().unwrap();
    let t = 1_356_998_400_789;
    assert!(prov.add_started_at_time(&a, t).unwrap());

    let getter = QueryGetter::new(prov.store());
    assert_eq!(getter.started_at_time(&a).unwrap(), t - (t % 1000));
    assert_eq!(getter.ended_at_time(&a).unwrap(), ABSENT_TIMESTAMP);
}

#[test]
fn absence_on_fresh_entity() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    let e = prov.new_entity().unwrap();
    let getter = QueryGetter::new(prov.store());
    for relation in Relation::ALL.into_iter().filter(|r| !r.is_temporal()) {
        assert!(getter.related(relation, &e).unwrap().is_empty(), "{relation}");
    }
    assert_eq!(getter.started_at_time(&e).unwrap(), ABSENT_TIMESTAMP);
}

#[test]
fn both_backends_answer_the_same_queries() {
    let script = |b: &mut dyn ProvenanceBuilder| {
        let report = b.create_entity(&uri("report")).unwrap();
        let draft = b.create_entity(&uri("draft")).unwrap();
        let writing = b.create_activity(&uri("writing")).unwrap();
        let alice = b.create_agent(&uri("alice")).unwrap();
        assert!(b.add_was_derived_from(&report, &draft).unwrap());
        assert!(b.add_was_generated_by(&report, &writing).unwrap());
        assert!(b.add_used(&writing, &draft).unwrap());
        assert!(b.add_was_associated_with(&writing, &alice).unwrap());
        assert!(b.add_started_at_time(&writing, 1_000_500).unwrap());
    };

    let mut immediate = ImmediateGraphBuilder::new(NS).unwrap();
    script(&mut immediate);

    let deferred_store = SparqlStore::in_memory().unwrap();
    let mut deferred = DeferredLogBuilder::new(NS);
    script(&mut deferred);
    assert!(deferred.flush_to(&deferred_store).unwrap());

    let g1 = QueryGetter::new(immediate.store());
    let g2 = QueryGetter::new(&deferred_store);
    for (relation, subject) in [
        (Relation::WasDerivedFrom, "report"),
        (Relation::WasGeneratedBy, "report"),
        (Relation::Used, "writing"),
        (Relation::WasAssociatedWith, "writing"),
    ] {
        assert_eq!(
            g1.related(relation, &uri(subject)).unwrap(),
            g2.related(relation, &uri(subject)).unwrap(),
            "{relation}"
        );
    }
    assert_eq!(g1.started_at_time(&uri("writing")).unwrap(), 1_000_000);
    assert_eq!(g2.started_at_time(&uri("writing")).unwrap(), 1_000_000);
    assert_eq!(
        immediate.statement_count().unwrap(),
        deferred_store.len().unwrap()
    );
}

#[test]
fn backends_refuse_unwritable_operands_alike() {
    let mut immediate = ImmediateGraphBuilder::new(NS).unwrap();
    let mut deferred = DeferredLogBuilder::new(NS);
    let builders: [&mut dyn ProvenanceBuilder; 2] = [&mut immediate, &mut deferred];
    for b in builders {
        let e = b.create_entity(&uri("e")).unwrap();
        let a = b.create_activity(&uri("a")).unwrap();
        assert!(matches!(
            b.create_entity("not an iri"),
            Err(ProvError::InvalidIri { .. })
        ));
        assert!(matches!(
            b.add_was_generated_by("not an iri", &a),
            Err(ProvError::InvalidIri { .. })
        ));
        assert!(matches!(
            b.add_was_generated_by(&e, "not an iri"),
            Err(ProvError::InvalidIri { .. })
        ));
        assert!(matches!(
            b.add_started_at_time(&a, 253_402_300_800_000),
            Err(ProvError::InvalidTimestamp { .. })
        ));
    }

    // Neither backend recorded anything past the two creates.
    assert_eq!(immediate.statement_count().unwrap(), 2);
    let store = SparqlStore::in_memory().unwrap();
    assert!(deferred.flush_to(&store).unwrap());
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn last_renderable_second_reads_back() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    let a = prov.new_activity().unwrap();
    let t = 253_402_300_799_000;
    assert!(prov.add_ended_at_time(&a, t).unwrap());
    let getter = QueryGetter::new(prov.store());
    assert_eq!(getter.ended_at_time(&a).unwrap(), t);
}

#[test]
fn deferred_buffers_invalid_assertions() {
    let mut log = DeferredLogBuilder::new(NS);
    log.create_entity("ex:e1").unwrap();
    log.create_activity("ex:a1").unwrap();
    log.add_was_generated_by("ex:e1", "ex:a1").unwrap();
    // Backwards, and still recorded.
    assert!(log.add_was_generated_by("ex:a1", "ex:e1").unwrap());

    let updates = log.pending_updates();
    assert_eq!(updates.len(), 4);
    for update in &updates {
        assert!(update.starts_with("INSERT DATA { <"));
        assert!(update.ends_with(" . }"));
    }
}

#[test]
fn rejections_name_operand_and_kind() {
    let recorder = RecordingObserver::new();
    let mut prov = ImmediateGraphBuilder::new(NS)
        .unwrap()
        .with_observer(recorder.clone());
    let a = prov.create_activity(&uri("a")).unwrap();
    let g = prov.create_agent(&uri("g")).unwrap();

    assert!(!prov.add_was_informed_by(&a, &g).unwrap());
    let violation = recorder.violations().pop().unwrap();
    assert_eq!(violation.relation, Relation::WasInformedBy);
    assert_eq!(violation.operand, Operand::Object);
    assert_eq!(violation.uri, g);
    assert_eq!(violation.expected, Range::Kind(ProvKind::Activity));

    assert!(
        recorder
            .events()
            .iter()
            .any(|e| matches!(e, ProvEvent::TypeChecked { satisfied: false, .. }))
    );
}

#[test]
fn observer_does_not_change_results() {
    let mut quiet = ImmediateGraphBuilder::new(NS).unwrap();
    let mut loud = ImmediateGraphBuilder::new(NS)
        .unwrap()
        .with_observer(RecordingObserver::new());
    for b in [&mut quiet, &mut loud] {
        b.create_entity(&uri("e")).unwrap();
        assert!(!b.add_was_generated_by(&uri("e"), &uri("a")).unwrap());
    }
    assert_eq!(
        quiet.statement_count().unwrap(),
        loud.statement_count().unwrap()
    );
}

#[test]
fn multiple_kinds_satisfy_multiple_checks() {
    let mut prov = ImmediateGraphBuilder::new(NS).unwrap();
    let x = prov.create_entity(&uri("x")).unwrap();
    prov.create_agent(&x).unwrap();
    assert!(prov.registry().has_kind(&x, ProvKind::Entity).unwrap());
    assert!(prov.registry().has_kind(&x, ProvKind::Agent).unwrap());
    assert!(prov.add_was_attributed_to(&x, &x).unwrap());
}

#[test]
fn backend_enum_dispatches() {
    let mut backend = Backend::new(BackendKind::Immediate, NS).unwrap();
    let e = backend.new_entity().unwrap();
    assert!(
        !backend
            .assert_relation(Relation::WasDerivedFrom, &e, Object::Resource("ex:unknown"))
            .unwrap()
    );
    let Backend::Immediate(graph) = backend else {
        panic!("expected immediate backend");
    };
    assert_eq!(graph.statement_count().unwrap(), 1);
}
