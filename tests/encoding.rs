use allen_intervals::error::AllenError;
use allen_intervals::relation::{Relation, RelSet, ALL_RELATIONS};

#[test]
fn canonical_bit_positions() {
    for (position, relation) in ALL_RELATIONS.into_iter().enumerate() {
        assert_eq!(relation.index(), position);
        assert_eq!(relation.bit(), 1 << position);
    }
    assert_eq!(RelSet::ALL.bits(), 0x1fff);
    assert_eq!(RelSet::EMPTY.bits(), 0);
    assert_eq!(RelSet::EQUALS.bits(), 0x1000);
}

#[test]
fn names_follow_the_canonical_order() {
    assert_eq!(
        RelSet::ALL.names(),
        vec![
            "before",
            "after",
            "during",
            "contains",
            "overlaps",
            "overlapped by",
            "meets",
            "met by",
            "starts",
            "started by",
            "finishes",
            "finished by",
            "equals",
        ]
    );
    assert_eq!(
        (RelSet::MET_BY | RelSet::BEFORE).names(),
        vec!["before", "met by"]
    );
    assert!(RelSet::EMPTY.names().is_empty());
}

#[test]
fn relation_names_round_trip() {
    for relation in ALL_RELATIONS {
        assert_eq!(relation.name().parse::<Relation>().unwrap(), relation);
        assert_eq!(format!("{}", relation), relation.name());
    }
}

#[test]
fn unknown_names_are_parse_errors() {
    match "sometime after lunch".parse::<Relation>() {
        Err(AllenError::Parse { name }) => assert_eq!(name, "sometime after lunch"),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn stray_bits_are_rejected() {
    assert!(RelSet::try_from(0x1fff).is_ok());
    match RelSet::try_from(0x2000) {
        Err(AllenError::StrayBits { bits }) => assert_eq!(bits, 0x2000),
        other => panic!("expected stray bits to be rejected, got {:?}", other),
    }
    assert!(RelSet::try_from(0xffff).is_err());
}

#[test]
fn bit_round_trip() {
    for bits in 0u16..=0x1fff {
        let set = RelSet::try_from(bits).unwrap();
        assert_eq!(u16::from(set), bits);
    }
}

#[test]
fn display_lists_member_names() {
    assert_eq!(
        format!("{}", RelSet::BEFORE | RelSet::MEETS),
        "{before, meets}"
    );
    assert_eq!(format!("{}", RelSet::EMPTY), "{}");
    assert_eq!(format!("{}", RelSet::OVERLAPPED_BY), "{overlapped by}");
}

#[test]
fn relset_serializes_as_its_bit_pattern() {
    assert_eq!(serde_json::to_string(&RelSet::ALL).unwrap(), "8191");
    assert_eq!(serde_json::to_string(&RelSet::EMPTY).unwrap(), "0");
    let round: RelSet = serde_json::from_str("8191").unwrap();
    assert_eq!(round, RelSet::ALL);
    // stray high bits must not deserialize
    assert!(serde_json::from_str::<RelSet>("8192").is_err());
}

#[test]
fn relation_serializes_by_name() {
    assert_eq!(
        serde_json::to_string(&Relation::OverlappedBy).unwrap(),
        "\"overlapped by\""
    );
    for relation in ALL_RELATIONS {
        let json = serde_json::to_string(&relation).unwrap();
        assert_eq!(json, format!("\"{}\"", relation.name()));
        let round: Relation = serde_json::from_str(&json).unwrap();
        assert_eq!(round, relation);
    }
}

#[test]
fn relsets_collect_from_relations() {
    let set: RelSet = [Relation::Starts, Relation::Finishes].into_iter().collect();
    assert!(set.contains(Relation::Starts));
    assert!(set.contains(Relation::Finishes));
    assert!(!set.contains(Relation::Equals));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![Relation::Starts, Relation::Finishes]);
    assert_eq!(RelSet::from(Relation::During), RelSet::DURING);
}
