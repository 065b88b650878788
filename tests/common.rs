//! Common test utilities for building graph containers.
use sekkei::prelude::*;

/// A small valid FSM: `Idle` (entry) -> `Patrol`, guarded by a 5 second timer.
#[allow(dead_code)]
pub fn create_patrol_fsm() -> (Fsm, ElementId, ElementId, ElementId) {
    let mut fsm = Fsm::new("Guard", Rect::default());
    let idle = fsm.add_state("Idle", Rect::at(100.0, 100.0));
    let patrol = fsm.add_state("Patrol", Rect::at(400.0, 100.0));

    let tired = fsm.add_transition(&idle, &patrol).expect("states exist");
    fsm.rename_transition(&tired, "Tired").expect("transition exists");
    let mut perception = Perception::new(PerceptionKind::Timer);
    if let PerceptionData::Timer { seconds } = perception.data_mut() {
        *seconds = 5.0;
    }
    fsm.transition_mut(&tired).expect("transition exists").perception = Some(perception);

    (fsm, idle, patrol, tired)
}

/// A diamond-shaped FSM: A -> B -> D and A -> C -> D, plus a detached state E.
#[allow(dead_code)]
pub fn create_diamond_fsm() -> (Fsm, [ElementId; 5]) {
    let mut fsm = Fsm::new("Diamond", Rect::default());
    let a = fsm.add_state("A", Rect::at(0.0, 0.0));
    let b = fsm.add_state("B", Rect::at(200.0, -100.0));
    let c = fsm.add_state("C", Rect::at(200.0, 100.0));
    let d = fsm.add_state("D", Rect::at(400.0, 0.0));
    let e = fsm.add_state("E", Rect::at(600.0, 0.0));

    fsm.add_transition(&a, &b).expect("states exist");
    fsm.add_transition(&a, &c).expect("states exist");
    fsm.add_transition(&b, &d).expect("states exist");
    fsm.add_transition(&c, &d).expect("states exist");

    (fsm, [a, b, c, d, e])
}

/// A behaviour tree: root selector with an `Eat` leaf and a sequence holding
/// a `Walk` leaf.
#[allow(dead_code)]
pub fn create_forager_bt() -> (BehaviourTree, [ElementId; 4]) {
    let mut tree = BehaviourTree::new("Forager", Rect::default());
    let root = tree.add_node(BehaviourKind::Selector, "Root", Rect::at(0.0, 0.0));
    let eat = tree.add_node(BehaviourKind::Leaf, "Eat", Rect::at(-100.0, 200.0));
    let walk_seq = tree.add_node(BehaviourKind::Sequence, "WalkSeq", Rect::at(100.0, 200.0));
    let walk = tree.add_node(BehaviourKind::Leaf, "Walk", Rect::at(100.0, 400.0));

    tree.add_connection(&root, &eat).expect("nodes exist");
    tree.add_connection(&root, &walk_seq).expect("nodes exist");
    tree.add_connection(&walk_seq, &walk).expect("nodes exist");

    (tree, [root, eat, walk_seq, walk])
}

/// A utility system: one weighted fusion fed by two variables, feeding an
/// action. Returns the connection ids of the two factor edges.
#[allow(dead_code)]
pub fn create_weighted_us() -> (UtilitySystem, ElementId, ElementId, ElementId) {
    let mut system = UtilitySystem::new("Brain", Rect::default());
    let hunger = system.add_node(UtilityKind::Variable, "Hunger", Rect::at(0.0, 0.0));
    let fear = system.add_node(UtilityKind::Variable, "Fear", Rect::at(0.0, 200.0));
    let fusion = system.add_node(UtilityKind::Fusion, "Mood", Rect::at(200.0, 100.0));
    let action = system.add_node(UtilityKind::Action, "Flee", Rect::at(400.0, 100.0));

    let c1 = system.add_connection(&hunger, &fusion).expect("nodes exist");
    let c2 = system.add_connection(&fear, &fusion).expect("nodes exist");
    system.add_connection(&fusion, &action).expect("nodes exist");

    (system, c1, c2, fusion)
}
