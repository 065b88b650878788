//! Tests for perception expression trees.
use sekkei::prelude::*;

#[test]
fn test_composite_perceptions_start_with_push_children() {
    let perception = Perception::new(PerceptionKind::And);
    let PerceptionData::And { left, right } = perception.data() else {
        panic!("expected an And perception");
    };
    assert_eq!(left.kind(), PerceptionKind::Push);
    assert_eq!(right.kind(), PerceptionKind::Push);
}

#[test]
fn test_and_or_change_keeps_children() {
    let mut perception = Perception::new(PerceptionKind::And);
    let child_id = match perception.data() {
        PerceptionData::And { left, .. } => left.id().clone(),
        _ => panic!("expected an And perception"),
    };

    let target = perception.id().clone();
    assert!(perception.change_kind(&target, PerceptionKind::Or));
    assert_eq!(perception.kind(), PerceptionKind::Or);

    // Same children, same identifiers.
    let PerceptionData::Or { left, .. } = perception.data() else {
        panic!("expected an Or perception");
    };
    assert_eq!(left.id(), &child_id);
}

#[test]
fn test_other_kind_changes_reset_the_node() {
    let mut perception = Perception::new(PerceptionKind::Timer);
    let target = perception.id().clone();
    assert!(perception.change_kind(&target, PerceptionKind::Custom));

    assert!(matches!(
        perception.data(),
        PerceptionData::Custom { name } if name.is_empty()
    ));
}

#[test]
fn test_change_kind_reaches_nested_children() {
    let mut perception = Perception::new(PerceptionKind::And);
    let child_id = match perception.data() {
        PerceptionData::And { right, .. } => right.id().clone(),
        _ => panic!("expected an And perception"),
    };

    assert!(perception.change_kind(&child_id, PerceptionKind::Timer));
    let found = perception.find(&child_id).expect("child still present");
    assert_eq!(found.kind(), PerceptionKind::Timer);
}

#[test]
fn test_find_misses_unknown_ids() {
    let perception = Perception::new(PerceptionKind::Or);
    assert!(perception.find(&ElementId::fresh()).is_none());
}

#[test]
fn test_same_kind_change_is_a_no_op() {
    let mut perception = Perception::new(PerceptionKind::Timer);
    if let PerceptionData::Timer { seconds } = perception.data_mut() {
        *seconds = 7.5;
    }

    let target = perception.id().clone();
    assert!(perception.change_kind(&target, PerceptionKind::Timer));
    assert!(matches!(
        perception.data(),
        PerceptionData::Timer { seconds } if *seconds == 7.5
    ));
}
