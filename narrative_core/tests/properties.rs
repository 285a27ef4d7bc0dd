use std::collections::HashSet;

use narrative_core::{build_events, derive_facts, derive_facts_traced, SourceRef, Timeline};
use proptest::prelude::*;
use story_model::AssertionId;

use fixtures::corpus;

#[test]
fn test_rebuild_is_identical() {
    let corpus = corpus();
    let first = build_events(&corpus.assertions, &corpus.entities, &corpus.documents);
    let second = build_events(&corpus.assertions, &corpus.entities, &corpus.documents);

    assert_eq!(first, second);
    assert_eq!(derive_facts(&first), derive_facts(&second));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_provenance_resolves() {
    let corpus = corpus();
    let events = build_events(&corpus.assertions, &corpus.entities, &corpus.documents);
    let assertion_ids: HashSet<&AssertionId> = corpus.assertions.iter().map(|a| &a.id).collect();
    let event_ids: HashSet<_> = events.iter().map(|e| e.id).collect();

    for event in &events {
        assert!(!event.derived_from.is_empty());
        assert!(event.derived_from.iter().all(|id| assertion_ids.contains(id)));
    }

    for fact in derive_facts_traced(&events, &corpus.assertions) {
        assert!(!fact.derived_from.is_empty());
        for source in &fact.derived_from {
            match source {
                SourceRef::Event(id) => assert!(event_ids.contains(id)),
                SourceRef::Assertion(id) => assert!(assertion_ids.contains(id)),
            }
        }
    }
}

#[test]
fn test_removed_assertion_leaves_no_orphans() {
    let corpus = corpus();
    let before = build_events(&corpus.assertions, &corpus.entities, &corpus.documents);

    for removed in &corpus.assertions {
        let remaining: Vec<_> = corpus
            .assertions
            .iter()
            .filter(|a| a.id != removed.id)
            .cloned()
            .collect();
        let events = build_events(&remaining, &corpus.entities, &corpus.documents);
        let facts = derive_facts_traced(&events, &remaining);

        assert!(events.len() <= before.len());
        assert!(events.iter().all(|e| !e.derived_from.contains(&removed.id)));
        assert!(facts
            .iter()
            .all(|f| !f.derived_from.contains(&SourceRef::Assertion(removed.id.clone()))));

        let sole: Vec<_> = before
            .iter()
            .filter(|e| e.derived_from == vec![removed.id.clone()])
            .collect();
        for gone in sole {
            assert!(events.iter().all(|e| e.id != gone.id));
            assert!(facts
                .iter()
                .all(|f| !f.derived_from.contains(&SourceRef::Event(gone.id))));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_shuffled_input_gives_identical_output(
        shuffled in Just(corpus().assertions).prop_shuffle()
    ) {
        let corpus = corpus();
        let expected = build_events(&corpus.assertions, &corpus.entities, &corpus.documents);
        let actual = build_events(&shuffled, &corpus.entities, &corpus.documents);

        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(derive_facts(&actual), derive_facts(&expected));

        let timeline = Timeline::with_defaults();
        prop_assert_eq!(timeline.enrich(actual), timeline.enrich(expected));
    }

    #[test]
    fn test_any_subset_keeps_provenance(mask in proptest::collection::vec(any::<bool>(), 18)) {
        let corpus = corpus();
        let subset: Vec<_> = corpus
            .assertions
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(a, _)| a.clone())
            .collect();
        let ids: HashSet<&AssertionId> = subset.iter().map(|a| &a.id).collect();

        let events = build_events(&subset, &corpus.entities, &corpus.documents);
        prop_assert!(events.len() <= subset.len());
        for event in &events {
            prop_assert!(!event.derived_from.is_empty());
            prop_assert!(event.derived_from.iter().all(|id| ids.contains(id)));
        }
        for fact in derive_facts(&events) {
            prop_assert!(!fact.derived_from.is_empty());
        }
    }
}
