//! Predicate normalization and event-type classification.

use crate::events::EventType;

const MOVE_LEMMAS: &[&str] = &[
    "went", "traveled", "arrived", "returned", "moved", "fled", "entered", "left", "journeyed",
    "walked", "rode", "sailed", "came", "reached", "departed", "escaped", "ran",
];

const DEATH_LEMMAS: &[&str] = &[
    "died", "killed", "murdered", "slew", "perished", "executed", "drowned", "assassinated",
];

/// DEATH lemmas where the subject is the killer, not the decedent.
const KILLING_LEMMAS: &[&str] = &["killed", "murdered", "slew", "executed", "assassinated"];

const TELL_LEMMAS: &[&str] = &[
    "said", "told", "asked", "replied", "shouted", "whispered", "announced", "explained", "warned",
    "informed",
];

const LEARN_LEMMAS: &[&str] = &[
    "learned", "discovered", "realized", "found out", "heard", "noticed", "understood",
];

const PROMISE_LEMMAS: &[&str] = &["promised", "swore", "vowed", "pledged"];

const ATTACK_LEMMAS: &[&str] = &[
    "attacked", "struck", "stabbed", "hit", "ambushed", "assaulted", "fought",
];

const MEET_LEMMAS: &[&str] = &["met", "encountered", "visited", "greeted"];

const GIVE_LEMMAS: &[&str] = &["gave", "handed", "passed", "bequeathed", "sold", "lent"];
const TAKE_LEMMAS: &[&str] = &["took", "stole", "seized", "grabbed"];
const RECEIVE_LEMMAS: &[&str] = &["received", "inherited", "obtained", "got", "bought"];

/// Which side of a transfer the subject is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Give,
    Take,
    Receive,
}

/// Canonical lemma for a surface predicate.
///
/// Lookup is case-insensitive with collapsed whitespace. Forms not in the
/// table pass through in that cleaned-up shape.
pub fn normalize_predicate(predicate: &str) -> String {
    let cleaned = predicate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    canonical_lemma(&cleaned)
        .map(str::to_string)
        .unwrap_or(cleaned)
}

fn canonical_lemma(surface: &str) -> Option<&'static str> {
    let lemma = match surface {
        // MOVE
        "go" | "goes" | "going" | "gone" | "went" => "went",
        "travel" | "travels" | "traveling" | "travelling" | "travelled" | "traveled" => "traveled",
        "arrive" | "arrives" | "arriving" | "arrived" => "arrived",
        "return" | "returns" | "returning" | "returned" => "returned",
        "move" | "moves" | "moving" | "moved" => "moved",
        "flee" | "flees" | "fleeing" | "fled" => "fled",
        "enter" | "enters" | "entering" | "entered" => "entered",
        "leave" | "leaves" | "leaving" | "left" => "left",
        "journey" | "journeys" | "journeying" | "journeyed" => "journeyed",
        "walk" | "walks" | "walking" | "walked" => "walked",
        "ride" | "rides" | "riding" | "ridden" | "rode" => "rode",
        "sail" | "sails" | "sailing" | "sailed" => "sailed",
        "come" | "comes" | "coming" | "came" => "came",
        "reach" | "reaches" | "reaching" | "reached" => "reached",
        "depart" | "departs" | "departing" | "departed" => "departed",
        "escape" | "escapes" | "escaping" | "escaped" => "escaped",
        "run" | "runs" | "running" | "ran" => "ran",

        // DEATH
        "die" | "dies" | "dying" | "died" => "died",
        "kill" | "kills" | "killing" | "killed" => "killed",
        "murder" | "murders" | "murdering" | "murdered" => "murdered",
        "slay" | "slays" | "slaying" | "slain" | "slew" => "slew",
        "perish" | "perishes" | "perishing" | "perished" => "perished",
        "execute" | "executes" | "executing" | "executed" => "executed",
        "drown" | "drowns" | "drowning" | "drowned" => "drowned",
        "assassinate" | "assassinates" | "assassinating" | "assassinated" => "assassinated",

        // TELL
        "say" | "says" | "saying" | "said" => "said",
        "tell" | "tells" | "telling" | "told" => "told",
        "ask" | "asks" | "asking" | "asked" => "asked",
        "reply" | "replies" | "replying" | "replied" => "replied",
        "shout" | "shouts" | "shouting" | "shouted" => "shouted",
        "whisper" | "whispers" | "whispering" | "whispered" => "whispered",
        "announce" | "announces" | "announcing" | "announced" => "announced",
        "explain" | "explains" | "explaining" | "explained" => "explained",
        "warn" | "warns" | "warning" | "warned" => "warned",
        "inform" | "informs" | "informing" | "informed" => "informed",

        // LEARN
        "learn" | "learns" | "learning" | "learnt" | "learned" => "learned",
        "discover" | "discovers" | "discovering" | "discovered" => "discovered",
        "realize" | "realizes" | "realizing" | "realized" | "realise" | "realised" => "realized",
        "find out" | "finds out" | "finding out" | "found out" => "found out",
        "hear" | "hears" | "hearing" | "heard" => "heard",
        "notice" | "notices" | "noticing" | "noticed" => "noticed",
        "understand" | "understands" | "understanding" | "understood" => "understood",

        // PROMISE
        "promise" | "promises" | "promising" | "promised" => "promised",
        "swear" | "swears" | "swearing" | "sworn" | "swore" => "swore",
        "vow" | "vows" | "vowing" | "vowed" => "vowed",
        "pledge" | "pledges" | "pledging" | "pledged" => "pledged",

        // ATTACK
        "attack" | "attacks" | "attacking" | "attacked" => "attacked",
        "strike" | "strikes" | "striking" | "struck" => "struck",
        "stab" | "stabs" | "stabbing" | "stabbed" => "stabbed",
        "hit" | "hits" | "hitting" => "hit",
        "ambush" | "ambushes" | "ambushing" | "ambushed" => "ambushed",
        "assault" | "assaults" | "assaulting" | "assaulted" => "assaulted",
        "fight" | "fights" | "fighting" | "fought" => "fought",

        // MEET
        "meet" | "meets" | "meeting" | "met" => "met",
        "encounter" | "encounters" | "encountering" | "encountered" => "encountered",
        "visit" | "visits" | "visiting" | "visited" => "visited",
        "greet" | "greets" | "greeting" | "greeted" => "greeted",

        // TRANSFER
        "give" | "gives" | "giving" | "given" | "gave" => "gave",
        "hand" | "hands" | "handing" | "handed" => "handed",
        "pass" | "passes" | "passing" | "passed" => "passed",
        "bequeath" | "bequeaths" | "bequeathing" | "bequeathed" => "bequeathed",
        "sell" | "sells" | "selling" | "sold" => "sold",
        "lend" | "lends" | "lending" | "lent" => "lent",
        "take" | "takes" | "taking" | "taken" | "took" => "took",
        "steal" | "steals" | "stealing" | "stolen" | "stole" => "stole",
        "seize" | "seizes" | "seizing" | "seized" => "seized",
        "grab" | "grabs" | "grabbing" | "grabbed" => "grabbed",
        "receive" | "receives" | "receiving" | "received" => "received",
        "inherit" | "inherits" | "inheriting" | "inherited" => "inherited",
        "obtain" | "obtains" | "obtaining" | "obtained" => "obtained",
        "get" | "gets" | "getting" | "gotten" | "got" => "got",
        "buy" | "buys" | "buying" | "bought" => "bought",

        _ => return None,
    };
    Some(lemma)
}

/// Event type for a normalized lemma. The lemma sets are disjoint, so at
/// most one matches.
pub fn classify(lemma: &str) -> Option<EventType> {
    if transfer_direction(lemma).is_some() {
        return Some(EventType::Transfer);
    }
    let sets: [(EventType, &[&str]); 7] = [
        (EventType::Move, MOVE_LEMMAS),
        (EventType::Death, DEATH_LEMMAS),
        (EventType::Tell, TELL_LEMMAS),
        (EventType::Learn, LEARN_LEMMAS),
        (EventType::Promise, PROMISE_LEMMAS),
        (EventType::Attack, ATTACK_LEMMAS),
        (EventType::Meet, MEET_LEMMAS),
    ];
    sets.iter()
        .find(|(_, lemmas)| lemmas.contains(&lemma))
        .map(|(event_type, _)| *event_type)
}

/// Death verbs whose subject is the killer.
pub fn is_killing(lemma: &str) -> bool {
    KILLING_LEMMAS.contains(&lemma)
}

/// Which way a transfer verb moves the item.
pub fn transfer_direction(lemma: &str) -> Option<TransferDirection> {
    if GIVE_LEMMAS.contains(&lemma) {
        Some(TransferDirection::Give)
    } else if TAKE_LEMMAS.contains(&lemma) {
        Some(TransferDirection::Take)
    } else if RECEIVE_LEMMAS.contains(&lemma) {
        Some(TransferDirection::Receive)
    } else {
        None
    }
}
