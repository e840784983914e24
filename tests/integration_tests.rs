//! Integration tests for the complete rewriting pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - query + classified TBox → tree witnesses → rewritten UCQ
//! - metadata provider → caching lookup → immutable snapshot
//! - driver milestones → query-event log
//!
//! Run with: cargo test --test integration_tests

use std::collections::BTreeSet;
use std::sync::Arc;

use ontorew_model::{Atom, Concept, ConjunctiveQuery, ExistentialGenerator, Role, Term};
use ontorew_rewriter::{
    rewrite, ClassifiedTbox, FormulaAssembler, MergeEngine, RewriterSettings, RootConceptSet,
    TermCover, TreeWitness, TreeWitnessBuilder,
};

fn gen(role: &str, filler: &str) -> ExistentialGenerator {
    ExistentialGenerator::new(Role::new(role), Concept::new(filler))
}

fn vars(names: &[&str]) -> BTreeSet<Term> {
    names.iter().map(|n| Term::var(*n)).collect()
}

// ============================================================================
// Tree-witness construction (builder against a classified TBox)
// ============================================================================

/// Person(x) ∧ hasChild(x,y) with no data match for y and one generator
/// ∃hasChild.Person at (hasChild, x).
#[test]
fn test_single_witness_shape() {
    let x = Term::var("x");
    let y = Term::var("y");
    let cluster = vec![
        Atom::class("Person", x.clone()),
        Atom::role("hasChild", x.clone(), y.clone()),
    ];
    let mut tbox = ClassifiedTbox::new();
    tbox.add_generator(Role::new("hasChild"), x.clone(), gen("hasChild", "Person"));

    let builder = TreeWitnessBuilder::new(&tbox);
    let tw = builder
        .build(&cluster, &vars(&["x"]))
        .expect("consistent tbox")
        .expect("the generator discharges the cluster");

    assert_eq!(tw.cover().domain(), &vars(&["x", "y"]));
    assert_eq!(tw.cover().roots(), &vars(&["x"]));
    assert_eq!(tw.root_atoms(), &[Atom::class("Person", x.clone())].into());
    assert_eq!(tw.generators(), &[gen("hasChild", "Person")].into());

    // Its formula is a disjunction of exactly one conjunction, built from the
    // single generator.
    let query = ConjunctiveQuery::new(vec![x], cluster);
    let scope = query.terms();
    let mut vargen = ontorew_model::VariableGenerator::new(&scope);
    let mut selected = vec![tw];
    let assembled = FormulaAssembler::assemble(&mut selected, &query, &mut vargen);
    assert_eq!(assembled.formula.conjunctions.len(), 1);
    assert!(selected[0].formula().is_some());
}

/// Two witnesses share term z; z is a root of A but interior to B.
#[test]
fn test_shared_interior_term_is_incompatible() {
    let mk = |domain: &[&str], roots: &[&str]| {
        TreeWitness::new(
            [gen("r", "B")].into(),
            TermCover::new(vars(domain), vars(roots)),
            BTreeSet::new(),
            RootConceptSet::empty(),
        )
    };
    let a = mk(&["z", "y"], &["z"]);
    let b = mk(&["z", "v"], &["v"]);
    assert!(!a.is_compatible_with(&b));
    assert!(!b.is_compatible_with(&a));
}

/// Witnesses with identical covers and a shared root concept collapse into
/// one witness carrying the union of the generators.
#[test]
fn test_merge_collapses_identical_covers() {
    let cover = TermCover::new(vars(&["x", "y"]), vars(&["x"]));
    let mk = |g: ExistentialGenerator| {
        TreeWitness::new(
            [g].into(),
            cover.clone(),
            BTreeSet::new(),
            RootConceptSet::new([Concept::new("C")].into()),
        )
    };
    let merged = MergeEngine::merge_candidates(vec![mk(gen("r", "B")), mk(gen("s", "D"))]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].generators(), &[gen("r", "B"), gen("s", "D")].into());
    assert_eq!(merged[0].cover(), &cover);
}

// ============================================================================
// Whole-pass rewriting
// ============================================================================

#[test]
fn test_rewrite_produces_witness_disjunct() {
    let x = Term::var("x");
    let y = Term::var("y");
    let query = ConjunctiveQuery::new(
        vec![x.clone()],
        vec![
            Atom::class("Person", x.clone()),
            Atom::role("hasChild", x.clone(), y.clone()),
        ],
    );
    let mut tbox = ClassifiedTbox::new();
    tbox.add_generator(Role::new("hasChild"), x.clone(), gen("hasChild", "Person"));

    let ucq = rewrite(&query, &[x.clone()].into(), &tbox, &RewriterSettings::default())
        .expect("consistent tbox");

    assert_eq!(ucq.len(), 2);
    // First disjunct: the pure data-matching attempt, untouched.
    assert_eq!(ucq.disjuncts[0], query);
    // Second disjunct: hasChild(x, y) is represented through the formula, not
    // as a literal over y.
    let rewritten = &ucq.disjuncts[1];
    assert!(!rewritten.atoms.iter().any(|a| a.terms().contains(&y)));
    assert!(rewritten.atoms.contains(&Atom::class("Person", x)));
}

#[test]
fn test_inconsistent_ontology_means_no_rewriting() {
    let x = Term::var("x");
    let query = ConjunctiveQuery::new(
        vec![x.clone()],
        vec![Atom::role("hasChild", x.clone(), Term::var("y"))],
    );
    let mut tbox = ClassifiedTbox::new();
    tbox.mark_inconsistent();

    assert!(rewrite(&query, &[x].into(), &tbox, &RewriterSettings::default()).is_err());
}

// ============================================================================
// Metadata lookup (idempotence, aliasing, clash)
// ============================================================================

mod metadata {
    use super::*;
    use ontorew_metadata::{
        CachingMetadataLookup, ImmutableMetadata, MetadataError, MetadataProvider,
        RelationDefinition, RelationId,
    };

    struct TableProvider {
        relations: Vec<Arc<RelationDefinition>>,
    }

    impl MetadataProvider for TableProvider {
        fn fetch_relation(
            &self,
            id: &RelationId,
        ) -> Result<Arc<RelationDefinition>, MetadataError> {
            self.relations
                .iter()
                .find(|r| r.all_ids().contains(id))
                .map(Arc::clone)
                .ok_or_else(|| MetadataError::RelationNotFound(id.clone()))
        }

        fn insert_integrity_constraints(
            &self,
            _relation: &RelationDefinition,
            _lookup: &ImmutableMetadata,
        ) -> Result<(), MetadataError> {
            Ok(())
        }
    }

    fn relation(canonical: &str, aliases: &[&str]) -> Arc<RelationDefinition> {
        let mut all_ids: Vec<RelationId> = vec![RelationId::new(canonical)];
        all_ids.extend(aliases.iter().map(|a| RelationId::new(*a)));
        Arc::new(RelationDefinition::new(RelationId::new(canonical), all_ids, vec![]))
    }

    #[test]
    fn test_alias_and_canonical_resolve_to_one_object() {
        let provider =
            TableProvider { relations: vec![relation("public.person", &["person"])] };
        let mut lookup = CachingMetadataLookup::new(provider);

        let a = lookup.get_relation(&"public.person".into()).unwrap();
        let b = lookup.get_relation(&"person".into()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let snapshot = lookup.extract_immutable_metadata().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.relations().len(), 1);
    }

    #[test]
    fn test_alias_clash_is_fatal_and_names_the_alias() {
        let provider = TableProvider {
            relations: vec![relation("r1", &["x"]), relation("r2", &["x"])],
        };
        let mut lookup = CachingMetadataLookup::new(provider);
        lookup.get_relation(&"r1".into()).unwrap();

        match lookup.get_relation(&"r2".into()) {
            Err(MetadataError::NamingClash { alias, .. }) => {
                assert_eq!(alias, "x".into());
            }
            other => panic!("expected a naming clash, got {other:?}"),
        }
    }
}

// ============================================================================
// Query-event logging around a rewriting pass
// ============================================================================

mod logging {
    use super::*;
    use ontorew_logging::{Phase, QueryLogSettings, QueryLogger};
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_driver_logs_around_rewriting() {
        let x = Term::var("x");
        let query = ConjunctiveQuery::new(
            vec![x.clone()],
            vec![Atom::role("hasChild", x.clone(), Term::var("y"))],
        );
        let mut tbox = ClassifiedTbox::new();
        tbox.add_generator(Role::new("hasChild"), x.clone(), gen("hasChild", "Person"));

        let buf = SharedBuf::default();
        let mut logger = QueryLogger::new(QueryLogSettings::default(), Box::new(buf.clone()));

        let ucq = rewrite(&query, &[x].into(), &tbox, &RewriterSettings::default()).unwrap();
        logger.reformulation_finished(false).unwrap();
        logger.result_set_unblocked().unwrap();
        logger.last_result_fetched(ucq.len() as u64).unwrap();
        assert_eq!(logger.phase(), Phase::Completed);

        let bytes = buf.0.lock().unwrap();
        let events: Vec<serde_json::Value> = String::from_utf8(bytes.clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2]["payload"]["resultCount"], ucq.len() as u64);
    }

    #[test]
    fn test_failed_rewriting_logs_an_exception() {
        let x = Term::var("x");
        let query = ConjunctiveQuery::new(
            vec![x.clone()],
            vec![Atom::role("hasChild", x.clone(), Term::var("y"))],
        );
        let mut tbox = ClassifiedTbox::new();
        tbox.mark_inconsistent();

        let buf = SharedBuf::default();
        let mut logger = QueryLogger::new(QueryLogSettings::default(), Box::new(buf.clone()));

        let result = rewrite(&query, &[x].into(), &tbox, &RewriterSettings::default());
        assert!(result.is_err());
        logger.exception("reformulation").unwrap();
        assert_eq!(logger.phase(), Phase::Errored);
    }
}
