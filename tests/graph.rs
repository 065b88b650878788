//! Tests for graph container mutations, connectivity checks and validation.
mod common;
use common::*;
use sekkei::prelude::*;

#[test]
fn test_first_state_becomes_entry() {
    let (fsm, idle, patrol, _) = create_patrol_fsm();
    assert!(fsm.is_entry_state(&idle));
    assert!(!fsm.is_entry_state(&patrol));
    assert_eq!(fsm.entry_state().map(|s| s.name()), Some("Idle"));
}

#[test]
fn test_set_entry_demotes_previous_entry() {
    let (mut fsm, idle, patrol, _) = create_patrol_fsm();
    assert!(fsm.set_entry(&patrol));
    assert!(fsm.is_entry_state(&patrol));
    assert!(!fsm.is_entry_state(&idle));

    // The demoted state keeps a connectivity-derived kind.
    assert_eq!(fsm.state(&idle).map(|s| s.kind), Some(StateKind::Default));
}

#[test]
fn test_transition_to_unknown_state_is_rejected() {
    let (mut fsm, idle, _, _) = create_patrol_fsm();
    let result = fsm.add_transition(&idle, &ElementId::fresh());
    assert!(matches!(result, Err(GraphError::UnknownNode(_))));
}

#[test]
fn test_delete_state_cascades_and_frees_name() {
    let (mut fsm, idle, patrol, tired) = create_patrol_fsm();
    assert!(fsm.delete_state(&patrol, true));

    assert!(fsm.state(&patrol).is_none());
    assert!(fsm.transition(&tired).is_none());
    assert_eq!(fsm.transitions().len(), 0);

    // Both the state name and the cascaded transition name are free again.
    assert_eq!(fsm.namer().len(), 1);
    let reborn = fsm.add_state("Patrol", Rect::at(0.0, 0.0));
    assert_eq!(fsm.state(&reborn).map(|s| s.name()), Some("Patrol"));

    // The survivor keeps its entry kind.
    assert_eq!(fsm.state(&idle).map(|s| s.kind), Some(StateKind::Entry));
}

#[test]
fn test_delete_transition_marks_states_unconnected() {
    let (mut fsm, idle, patrol, tired) = create_patrol_fsm();
    assert!(fsm.delete_transition(&tired));

    assert_eq!(fsm.state(&idle).map(|s| s.kind), Some(StateKind::Entry));
    assert_eq!(
        fsm.state(&patrol).map(|s| s.kind),
        Some(StateKind::Unconnected)
    );
}

#[test]
fn test_rename_state_resolves_collisions() {
    let (mut fsm, idle, _, _) = create_patrol_fsm();
    assert_eq!(fsm.rename_state(&idle, "Patrol").as_deref(), Some("Patrol 2"));
    assert_eq!(fsm.state(&idle).map(|s| s.name()), Some("Patrol 2"));
}

#[test]
fn test_connected_check_follows_directed_paths_only() {
    let (fsm, [a, b, _, d, e]) = create_diamond_fsm();

    // d is reachable from a, so an edge a -> d would be redundant.
    assert!(fsm.connected_check(&d, &a));
    // No path leads back up the diamond.
    assert!(!fsm.connected_check(&a, &d));
    assert!(!fsm.connected_check(&a, &b));
    // e is detached entirely.
    assert!(!fsm.connected_check(&a, &e));
    assert!(!fsm.connected_check(&e, &a));
}

#[test]
fn test_fsm_without_entry_reports_issue() {
    let mut fsm = Fsm::new("Empty", Rect::default());
    let element = Element::Fsm(fsm.clone());
    assert!(matches!(
        element.issues().as_slice(),
        [Issue::NoEntryState { .. }]
    ));

    fsm.add_state("Idle", Rect::at(0.0, 0.0));
    assert!(Element::Fsm(fsm).issues().is_empty());
}

#[test]
fn test_first_bt_node_becomes_root() {
    let (tree, [root, ..]) = create_forager_bt();
    assert!(tree.has_root());
    assert_eq!(tree.root_node().map(|n| n.id()), Some(&root));
}

#[test]
fn test_bt_connection_clears_child_root_flag() {
    let mut tree = BehaviourTree::new("T", Rect::default());
    let a = tree.add_node(BehaviourKind::Selector, "A", Rect::at(0.0, 0.0));
    let b = tree.add_node(BehaviourKind::Selector, "B", Rect::at(0.0, 200.0));

    tree.set_root(&b);
    tree.add_connection(&a, &b).expect("nodes exist");
    assert!(!tree.node(&b).map(|n| n.is_root).unwrap_or(true));
}

#[test]
fn test_bt_connection_rules() {
    let (mut tree, [root, eat, walk_seq, walk]) = create_forager_bt();

    // Self loops and cycles are rejected.
    assert!(!tree.connection_allowed(&root, &root));
    assert!(!tree.connection_allowed(&walk, &root));

    // Leaves cannot be parents.
    assert!(!tree.connection_allowed(&eat, &walk));

    // Decorators take exactly one child.
    let inverter = tree.add_node(BehaviourKind::Inverter, "Not", Rect::at(300.0, 200.0));
    assert!(tree.connection_allowed(&inverter, &walk_seq));
    tree.add_connection(&inverter, &walk_seq).expect("nodes exist");
    assert!(!tree.connection_allowed(&inverter, &eat));
}

#[test]
fn test_bt_with_two_roots_reports_issue() {
    let mut tree = BehaviourTree::new("T", Rect::default());
    let a = tree.add_node(BehaviourKind::Selector, "A", Rect::at(0.0, 0.0));
    let b = tree.add_node(BehaviourKind::Selector, "B", Rect::at(200.0, 0.0));
    tree.node_mut(&b).expect("node exists").is_root = true;

    let element = Element::BehaviourTree(tree.clone());
    assert!(matches!(
        element.issues().as_slice(),
        [Issue::MoreThanOneRoot { .. }]
    ));

    tree.set_root(&a);
    assert!(Element::BehaviourTree(tree).issues().is_empty());
}

#[test]
fn test_us_connection_rules() {
    let (mut system, ..) = create_weighted_us();
    let variable = system.add_node(UtilityKind::Variable, "Thirst", Rect::at(0.0, 400.0));
    let curve = system.add_node(UtilityKind::Curve, "Ramp", Rect::at(200.0, 400.0));

    // Variables never take factors.
    assert!(!system.connection_allowed(&curve, &variable));

    // Curves take exactly one factor.
    assert!(system.connection_allowed(&variable, &curve));
    system.add_connection(&variable, &curve).expect("nodes exist");
    let other = system.add_node(UtilityKind::Variable, "Cold", Rect::at(0.0, 600.0));
    assert!(!system.connection_allowed(&other, &curve));
}

#[test]
fn test_action_without_factors_reports_issue() {
    let mut system = UtilitySystem::new("Brain", Rect::default());
    system.add_node(UtilityKind::Action, "Flee", Rect::at(0.0, 0.0));

    let issues = Element::UtilitySystem(system).issues();
    assert!(matches!(issues.as_slice(), [Issue::NoFactors { .. }]));
}

#[test]
fn test_issues_recurse_into_sub_elements() {
    let mut fsm = Fsm::new("Outer", Rect::default());
    fsm.add_state("Idle", Rect::at(0.0, 0.0));

    // A nested FSM with no states, hence no entry state.
    let inner = Fsm::new("Inner", Rect::default());
    fsm.add_sub_state(Element::Fsm(inner), Rect::at(200.0, 0.0));

    let element = Element::Fsm(fsm);
    assert!(matches!(
        element.issues().as_slice(),
        [Issue::NoEntryState { element }] if element.as_str() == "Inner"
    ));
}
