use narrative_core::{
    build_events, derive_facts, BlockReason, CurrentHolder, EventCompiler, EventDraft, EventType, FactIndex,
    FactObject, FactPredicate, InferenceTag, ParticipantRole, TimeAnchor, Timeline,
};
use story_model::{Assertion, EntityId, EvidenceSpan, Mention, ObjectValue};

use fixtures::{corpus, documents, entities, span};

fn roles(event: &narrative_core::StoryEvent) -> Vec<(ParticipantRole, &str, bool)> {
    event
        .participants
        .iter()
        .map(|p| (p.role, p.entity.as_str(), p.required))
        .collect()
}

#[test]
fn test_move_yields_location_fact() {
    let assertions = vec![Assertion::new("a1", Mention::resolved("harry"), "went")
        .with_object(ObjectValue::entity("hogwarts"))
        .with_evidence(span("ch1", 0, 1, "Harry went to Hogwarts."))];
    let events = build_events(&assertions, &entities(), &documents());

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Move);
    assert_eq!(
        roles(&events[0]),
        vec![
            (ParticipantRole::Destination, "hogwarts", true),
            (ParticipantRole::Mover, "harry", true)
        ]
    );

    let facts = FactIndex::new(derive_facts(&events));
    assert_eq!(facts.len(), 1);
    assert_eq!(facts.facts()[0].predicate, FactPredicate::LocatedIn);
    assert_eq!(facts.current_location(&EntityId::from("harry")), Some(&EntityId::from("hogwarts")));
}

#[test]
fn test_killing_yields_death_fact() {
    let assertions = vec![Assertion::new("a1", Mention::resolved("voldemort"), "killed")
        .with_object(ObjectValue::entity("cedric"))
        .with_evidence(span("ch1", 0, 4, "Voldemort killed Cedric."))];
    let events = build_events(&assertions, &entities(), &documents());

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Death);
    assert_eq!(
        roles(&events[0]),
        vec![
            (ParticipantRole::Decedent, "cedric", true),
            (ParticipantRole::Killer, "voldemort", false)
        ]
    );

    let facts = FactIndex::new(derive_facts(&events));
    let alive = facts.facts_about(&EntityId::from("cedric"));
    assert_eq!(alive.len(), 1);
    assert_eq!(alive[0].object, FactObject::Boolean(false));
    assert!(!facts.is_alive(&EntityId::from("cedric")));
    assert!(facts.is_alive(&EntityId::from("voldemort")));
}

#[test]
fn test_same_paragraph_moves_merge() {
    let assertions = vec![
        Assertion::new("a1", Mention::resolved("harry"), "went")
            .with_object(ObjectValue::entity("hogwarts"))
            .with_evidence(span("ch1", 0, 2, "Harry went to Hogwarts.")),
        Assertion::new("a2", Mention::resolved("harry"), "travelled")
            .with_object(ObjectValue::entity("hogwarts"))
            .with_evidence(span("ch1", 40, 2, "Harry travelled to the castle.")),
    ];
    let events = build_events(&assertions, &entities(), &documents());

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].evidence.len(), 2);
    let sources: Vec<_> = events[0].derived_from.iter().map(|id| id.as_str()).collect();
    assert_eq!(sources, vec!["a1", "a2"]);
    assert_eq!(events[0].metadata.merged_sources, 2);
}

#[test]
fn test_unlisted_document_is_latest() {
    let assertions = vec![
        Assertion::new("a1", Mention::resolved("harry"), "went")
            .with_object(ObjectValue::entity("hogwarts"))
            .with_evidence(span("ch1", 0, 5, "Harry went to Hogwarts.")),
        Assertion::new("a2", Mention::resolved("harry"), "went")
            .with_object(ObjectValue::entity("graveyard"))
            .with_evidence(span("epilogue", 0, 1, "Harry went to the graveyard.")),
    ];
    let events = build_events(&assertions, &entities(), &documents());

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].time, TimeAnchor::discourse(Some(1), 5, None));
    assert_eq!(events[1].time, TimeAnchor::discourse(Some(3), 1, None));

    let facts = FactIndex::new(derive_facts(&events));
    assert_eq!(facts.current_location(&EntityId::from("harry")), Some(&EntityId::from("graveyard")));
}

#[test]
fn test_unresolved_pronoun_yields_nothing() {
    let assertions = vec![Assertion::new("a1", Mention::unresolved("he"), "went")
        .with_object(ObjectValue::entity("hogwarts"))
        .with_evidence(span("ch1", 0, 1, "He went to Hogwarts."))];
    let output = EventCompiler::with_defaults().compile(&assertions, &entities(), &documents());

    assert!(output.events.is_empty());
    let counters = output.eligibility.unwrap();
    assert_eq!(counters.count(BlockReason::UnresolvedPronoun), 1);
    assert_eq!(counters.total_blocked(), 1);
    assert_eq!(counters.admitted, 0);
}

#[test]
fn test_transfer_gain_and_implied_loss() {
    let assertions = vec![Assertion::new("a1", Mention::resolved("bilbo"), "gave")
        .with_object(ObjectValue::entity("ring"))
        .with_indirect_object("frodo")
        .with_evidence(span("ch1", 0, 5, "Bilbo gave Frodo the ring."))];
    let events = build_events(&assertions, &entities(), &documents());
    let t5 = TimeAnchor::discourse(Some(1), 5, None);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, t5);

    let facts = derive_facts(&events);
    assert_eq!(facts.len(), 2);

    let gain = facts.iter().find(|f| f.subject.as_str() == "frodo").unwrap();
    assert_eq!(gain.predicate, FactPredicate::Possesses);
    assert_eq!(gain.valid_from, t5);
    assert!(gain.valid_until.is_none());
    assert_eq!(gain.inference, Some(InferenceTag::Explicit));

    let loss = facts.iter().find(|f| f.subject.as_str() == "bilbo").unwrap();
    assert!(loss.valid_from.is_unknown());
    assert_eq!(loss.valid_until, Some(t5));
    assert!((loss.confidence - 0.9).abs() < 1e-9);
    assert_eq!(loss.inference, Some(InferenceTag::ImpliedLoss));

    let index = FactIndex::new(facts);
    assert_eq!(index.current_holder(&EntityId::from("ring")), CurrentHolder::Holder(EntityId::from("frodo")));
    assert!(index.current_possessions(&EntityId::from("bilbo")).is_empty());
}

#[test]
fn test_unknown_event_interpolates_between_neighbours() {
    let positioned = |start: usize, paragraph: u32, text: &str| {
        EvidenceSpan::new("ch2", start, start + text.len(), text)
            .at(story_model::DiscoursePosition::new(paragraph).with_chapter(2))
    };
    let assertions = vec![
        Assertion::new("a1", Mention::resolved("harry"), "met")
            .with_object(ObjectValue::entity("ron"))
            .with_evidence(positioned(0, 4, "Harry met Ron.")),
        Assertion::new("a2", Mention::resolved("ron"), "attacked")
            .with_object(ObjectValue::entity("troll"))
            .with_evidence(EvidenceSpan::new("ch2", 100, 120, "Ron attacked the troll.")),
        Assertion::new("a3", Mention::resolved("harry"), "met")
            .with_object(ObjectValue::entity("dumbledore"))
            .with_evidence(positioned(200, 8, "Harry met Dumbledore.")),
    ];
    let events = build_events(&assertions, &entities(), &documents());
    assert!(events.last().unwrap().time.is_unknown());

    let enriched = Timeline::with_defaults().enrich(events);
    let attack = enriched
        .events
        .iter()
        .find(|e| e.event_type == EventType::Attack)
        .unwrap();

    assert_eq!(attack.time.chapter(), Some(2));
    assert_eq!(attack.time.paragraph(), Some(6));
    assert_eq!(enriched.events[1].id, attack.id);
}

#[test]
fn test_contested_holder() {
    let t4 = TimeAnchor::discourse(Some(1), 4, None);
    let grant = |source: &str, receiver: &str| {
        let mut event = EventDraft::new(EventType::Transfer)
            .with_participant(ParticipantRole::Receiver, receiver, true)
            .with_participant(ParticipantRole::Item, "ring", true)
            .with_source(source)
            .seal()
            .unwrap();
        event.time = t4.clone();
        event
    };
    let facts = FactIndex::new(derive_facts(&[grant("a2", "sam"), grant("a1", "frodo")]));

    assert_eq!(
        facts.current_holder(&EntityId::from("ring")),
        CurrentHolder::Contested(vec![EntityId::from("frodo"), EntityId::from("sam")])
    );
}

#[test]
fn test_full_story() {
    let corpus = corpus();
    let output = EventCompiler::with_defaults().compile(&corpus.assertions, &corpus.entities, &corpus.documents);
    let counters = output.eligibility.clone().unwrap();

    assert_eq!(counters.admitted, 13);
    assert_eq!(counters.count(BlockReason::UnresolvedPronoun), 1);
    assert_eq!(counters.count(BlockReason::GroupPlaceholder), 1);
    assert_eq!(counters.count(BlockReason::Negated), 1);
    assert_eq!(counters.count(BlockReason::MissingObject), 1);
    assert_eq!(output.events.len(), 10);

    let arrival = &output.events[0];
    assert_eq!(arrival.event_type, EventType::Move);
    assert_eq!(arrival.derived_from.len(), 4);
    assert_eq!(arrival.evidence.len(), 3);
    assert_eq!(arrival.modality, story_model::Modality::Rumor);

    let enriched = Timeline::with_defaults().enrich(output.events);
    assert_eq!(enriched.embedded.len(), 1);
    assert_eq!(enriched.embedded[0].narrator, Some(EntityId::from("dumbledore")));
    assert_eq!(enriched.embedded[0].embedded_events.len(), 1);
    assert!(enriched.events.iter().all(|e| !e.time.is_unknown()));

    let facts = FactIndex::new(derive_facts(&enriched.events));
    assert!(!facts.is_alive(&EntityId::from("cedric")));
    assert_eq!(facts.current_location(&EntityId::from("harry")), Some(&EntityId::from("hogwarts")));
    assert_eq!(facts.current_possessions(&EntityId::from("frodo")), vec![EntityId::from("ring")]);
}
