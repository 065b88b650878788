//! Tests for XML round-trips and clipboard copy/paste.
mod common;
use common::*;
use sekkei::prelude::*;

#[test]
fn test_fsm_round_trips_through_records() {
    let (fsm, idle, patrol, tired) = create_patrol_fsm();
    let record = fsm.to_xml();

    let Element::Fsm(reloaded) = record.to_element(IdPolicy::Preserve).expect("valid record")
    else {
        panic!("expected an FSM back");
    };

    assert_eq!(reloaded.name(), "Guard");
    assert_eq!(reloaded.states().len(), 2);
    assert_eq!(reloaded.transitions().len(), 1);

    // Identifiers, names and kinds survive.
    assert_eq!(reloaded.state(&idle).map(|s| s.name()), Some("Idle"));
    assert!(reloaded.is_entry_state(&idle));
    assert_eq!(reloaded.state(&patrol).map(|s| s.name()), Some("Patrol"));

    let transition = reloaded.transition(&tired).expect("transition survives");
    assert_eq!(transition.name(), "Tired");
    assert_eq!(transition.from(), &idle);
    assert_eq!(transition.to(), &patrol);
    assert!(matches!(
        transition.perception.as_ref().map(|p| p.data()),
        Some(PerceptionData::Timer { seconds }) if *seconds == 5.0
    ));

    // Names are re-registered with the namer, not just copied.
    assert_eq!(reloaded.namer().len(), 3);
}

#[test]
fn test_reissue_remaps_edges_onto_fresh_ids() {
    let (fsm, idle, _, _) = create_patrol_fsm();
    let record = fsm.to_xml();

    let Element::Fsm(copy) = record.to_element(IdPolicy::Reissue).expect("valid record")
    else {
        panic!("expected an FSM back");
    };

    assert!(copy.state(&idle).is_none());
    let transition = &copy.transitions()[0];
    assert!(copy.state(transition.from()).is_some());
    assert!(copy.state(transition.to()).is_some());
}

#[test]
fn test_nested_sub_elements_round_trip() {
    let mut fsm = Fsm::new("Outer", Rect::default());
    fsm.add_state("Idle", Rect::at(0.0, 0.0));
    let (inner_bt, _) = create_forager_bt();
    fsm.add_sub_state(Element::BehaviourTree(inner_bt), Rect::at(200.0, 0.0));

    let reloaded = fsm
        .to_xml()
        .to_element(IdPolicy::Preserve)
        .expect("valid record");

    let subs = reloaded.sub_elems();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].name(), "Forager");
    let Element::BehaviourTree(tree) = subs[0] else {
        panic!("expected a behaviour tree portal");
    };
    assert_eq!(tree.nodes().len(), 4);
    assert!(tree.has_root());
}

#[test]
fn test_utility_payloads_round_trip() {
    let mut system = UtilitySystem::new("Brain", Rect::default());
    let hunger = system.add_node(UtilityKind::Variable, "Hunger", Rect::at(0.0, 0.0));
    let ramp = system.add_node(UtilityKind::Curve, "Ramp", Rect::at(200.0, 0.0));
    let mood = system.add_node(UtilityKind::Fusion, "Mood", Rect::at(400.0, 0.0));
    let flee = system.add_node(UtilityKind::Action, "Flee", Rect::at(600.0, 0.0));

    let variable = system.node_mut(&hunger).expect("node exists");
    variable.variable_min = 10.0;
    variable.variable_max = 90.0;
    let curve = system.node_mut(&ramp).expect("node exists");
    curve.curve = CurveKind::Exponential;
    curve.slope = 2.5;
    curve.exp = 3.0;
    curve.displ_x = 0.25;
    curve.displ_y = -0.5;
    system.node_mut(&mood).expect("node exists").fusion = FusionKind::GetMin;

    system.add_connection(&hunger, &ramp).expect("nodes exist");
    let factor = system.add_connection(&ramp, &mood).expect("nodes exist");
    system.add_connection(&mood, &flee).expect("nodes exist");
    assert!(system.set_weight(&factor, 0.4));

    let Element::UtilitySystem(reloaded) = system
        .to_xml()
        .to_element(IdPolicy::Preserve)
        .expect("valid record")
    else {
        panic!("expected a utility system back");
    };

    let variable = reloaded.node(&hunger).expect("variable survives");
    assert_eq!(variable.variable_min, 10.0);
    assert_eq!(variable.variable_max, 90.0);
    let curve = reloaded.node(&ramp).expect("curve survives");
    assert_eq!(curve.curve, CurveKind::Exponential);
    assert_eq!(curve.slope, 2.5);
    assert_eq!(curve.exp, 3.0);
    assert_eq!(curve.displ_x, 0.25);
    assert_eq!(curve.displ_y, -0.5);
    assert_eq!(reloaded.node(&mood).map(|n| n.fusion), Some(FusionKind::GetMin));
    assert_eq!(reloaded.connection(&factor).map(|t| t.weight), Some(0.4));
}

#[test]
fn test_bt_node_flags_round_trip() {
    let (mut tree, [_, _, walk_seq, walk]) = create_forager_bt();
    tree.node_mut(&walk_seq).expect("node exists").is_random = true;
    let loop_n = tree.add_node(BehaviourKind::LoopN, "Loop", Rect::at(300.0, 200.0));
    tree.node_mut(&loop_n).expect("node exists").n_property = 3.0;

    let Element::BehaviourTree(reloaded) = tree
        .to_xml()
        .to_element(IdPolicy::Preserve)
        .expect("valid record")
    else {
        panic!("expected a behaviour tree back");
    };

    assert!(reloaded.node(&walk_seq).expect("sequence survives").is_random);
    assert!(!reloaded.node(&walk).expect("leaf survives").is_random);
    let loop_node = reloaded.node(&loop_n).expect("loop node survives");
    assert_eq!(loop_node.kind, BehaviourKind::LoopN);
    assert_eq!(loop_node.n_property, 3.0);
}

#[test]
fn test_documents_survive_a_file_round_trip() {
    let (fsm, _, _, _) = create_patrol_fsm();
    let element = Element::Fsm(fsm);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Guard_savedData.xml");
    element.save_xml(&path).expect("save succeeds");

    let reloaded = Element::load_xml(&path).expect("load succeeds");
    assert_eq!(reloaded.name(), "Guard");
    assert_eq!(reloaded.id(), element.id());
    assert!(reloaded.issues().is_empty());
}

#[test]
fn test_dangling_endpoint_is_reported() {
    let (fsm, _, _, _) = create_patrol_fsm();
    let mut record = fsm.to_xml();
    record.transitions[0].to_id = Some("bogus".to_string());

    let result = record.to_element(IdPolicy::Preserve);
    assert!(matches!(
        result,
        Err(XmlError::MissingEndpoint { endpoint, .. }) if endpoint == "bogus"
    ));
}

#[test]
fn test_paste_reissues_ids_and_names() {
    let (fsm, idle, patrol, _) = create_patrol_fsm();
    let element = Element::Fsm(fsm.clone());
    let fragment = copy_fragment(&element, &[idle.clone(), patrol.clone()]);

    let mut target = Element::Fsm(fsm.clone());
    let first = paste_into(&mut target, &fragment).expect("paste succeeds");
    let second = paste_into(&mut target, &fragment).expect("paste succeeds");
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert!(first.iter().all(|id| !second.contains(id)));

    let Element::Fsm(fsm) = target else {
        panic!("expected an FSM");
    };
    assert_eq!(fsm.states().len(), 6);
    // Internal edges came along, once per paste.
    assert_eq!(fsm.transitions().len(), 3);

    // Pasted names picked up suffixes instead of clashing.
    let mut names: Vec<&str> = fsm.states().iter().map(|s| s.name()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        ["Idle", "Idle 2", "Idle 3", "Patrol", "Patrol 2", "Patrol 3"]
    );

    // Only one entry state remains.
    let entries = fsm
        .states()
        .iter()
        .filter(|s| s.kind == StateKind::Entry)
        .count();
    assert_eq!(entries, 1);
}

#[test]
fn test_partial_selection_drops_crossing_edges() {
    let (fsm, [a, b, _, _, _]) = create_diamond_fsm();
    let element = Element::Fsm(fsm);

    // b's outgoing edge leads outside the selection and must not be copied.
    let fragment = copy_fragment(&element, &[a.clone(), b.clone()]);
    assert_eq!(fragment.nodes.len(), 2);
    assert_eq!(fragment.transitions.len(), 1);
}

#[test]
fn test_paste_rejects_mismatched_fragment_kinds() {
    let (fsm, idle, _, _) = create_patrol_fsm();
    let fragment = copy_fragment(&Element::Fsm(fsm), &[idle]);

    let (tree, _) = create_forager_bt();
    let mut target = Element::BehaviourTree(tree);
    assert!(matches!(
        paste_into(&mut target, &fragment),
        Err(XmlError::FragmentMismatch { .. })
    ));
}
