//! Tests for C# script generation.
mod common;
use common::*;
use sekkei::codegen::{DirTemplates, Generator};
use sekkei::prelude::*;

#[test]
fn test_generation_refuses_unresolved_issues() {
    let fsm = Fsm::new("Empty", Rect::default());
    let result = Generator::builtin().generate(&Element::Fsm(fsm));
    assert!(matches!(
        result,
        Err(GenerateError::UnresolvedIssues { element, count: 1 }) if element == "Empty"
    ));
}

#[test]
fn test_fsm_script_contains_states_transitions_and_perceptions() {
    let (fsm, ..) = create_patrol_fsm();
    let script = Generator::builtin()
        .generate(&Element::Fsm(fsm))
        .expect("generation succeeds");

    assert_eq!(script.files.len(), 1);
    assert_eq!(script.main().name, "Guard.cs");

    let code = &script.main().contents;
    assert!(code.contains("public class Guard : MonoBehaviour"));
    assert!(code.contains("private StateMachineEngine Guard_FSM;"));
    assert!(code.contains("Guard_FSM = new StateMachineEngine(false);"));
    assert!(code.contains(
        "Perception Tired_TimerPerception = Guard_FSM.CreatePerception<TimerPerception>(5);"
    ));
    assert!(code.contains("State Idle = Guard_FSM.CreateEntryState(\"Idle\", IdleAction);"));
    assert!(code.contains("State Patrol = Guard_FSM.CreateState(\"Patrol\", PatrolAction);"));
    assert!(code.contains(
        "Guard_FSM.CreateTransition(\"Tired\", Idle, Tired_TimerPerception, Patrol);"
    ));
    assert!(code.contains("private void IdleAction()"));
    assert!(code.contains("private void PatrolAction()"));

    // The placeholder chain was fully consumed.
    assert!(!code.contains('#'));
}

#[test]
fn test_composite_perceptions_emit_children_first() {
    let (mut fsm, _, _, tired) = create_patrol_fsm();
    let mut or = Perception::new(PerceptionKind::Or);
    if let PerceptionData::Or { left, .. } = or.data_mut() {
        let left_id = left.id().clone();
        left.change_kind(&left_id, PerceptionKind::Timer);
    }
    fsm.transition_mut(&tired).expect("transition exists").perception = Some(or);

    let script = Generator::builtin()
        .generate(&Element::Fsm(fsm))
        .expect("generation succeeds");
    let code = &script.main().contents;

    let timer_pos = code
        .find("Perception Tired_TimerPerception")
        .expect("timer child emitted");
    let or_pos = code.find("Perception Tired_OrPerception").expect("or emitted");
    assert!(timer_pos < or_pos);
    assert!(code.contains(
        "Tired_OrPerception = Guard_FSM.CreateOrPerception<OrPerception>(Tired_TimerPerception, Tired_PushPerception);"
    ));
}

#[test]
fn test_custom_perceptions_get_their_own_script() {
    let (mut fsm, _, _, tired) = create_patrol_fsm();
    let mut custom = Perception::new(PerceptionKind::Custom);
    if let PerceptionData::Custom { name } = custom.data_mut() {
        *name = "Sees Player".to_string();
    }
    fsm.transition_mut(&tired).expect("transition exists").perception = Some(custom);

    let script = Generator::builtin()
        .generate(&Element::Fsm(fsm))
        .expect("generation succeeds");

    assert_eq!(script.files.len(), 2);
    let stub = &script.files[1];
    assert_eq!(stub.name, "SeesPlayerPerception.cs");
    assert!(stub.contents.contains("public class SeesPlayerPerception"));

    let code = &script.main().contents;
    assert!(code.contains(
        "Perception Tired_SeesPlayerPerception = Guard_FSM.CreatePerception<SeesPlayerPerception>(new Tired_SeesPlayerPerception());"
    ));
}

#[test]
fn test_bt_script_contains_nodes_children_and_root() {
    let (tree, ..) = create_forager_bt();
    let script = Generator::builtin()
        .generate(&Element::BehaviourTree(tree))
        .expect("generation succeeds");
    let code = &script.main().contents;

    assert!(code.contains("private BehaviourTreeEngine Forager_BT;"));
    assert!(code.contains("SelectorNode Root = Forager_BT.CreateSelectorNode(\"Root\");"));
    assert!(code.contains(
        "SequenceNode WalkSeq = Forager_BT.CreateSequenceNode(\"WalkSeq\", false);"
    ));
    assert!(code.contains(
        "LeafNode Eat = Forager_BT.CreateLeafNode(\"Eat\", EatAction, EatSuccessCheck);"
    ));
    assert!(code.contains("Root.AddChild(Eat);"));
    assert!(code.contains("Root.AddChild(WalkSeq);"));
    assert!(code.contains("WalkSeq.AddChild(Walk);"));
    assert!(code.contains("Forager_BT.SetRootNode(Root);"));
    assert!(code.contains("private ReturnValues EatSuccessCheck()"));
    assert!(!code.contains('#'));
}

#[test]
fn test_decorator_variables_are_derived_from_their_chain() {
    let (mut tree, [root, ..]) = create_forager_bt();
    let inverter = tree.add_node(BehaviourKind::Inverter, "Inv", Rect::at(300.0, 200.0));
    let rest = tree.add_node(BehaviourKind::Leaf, "Rest", Rect::at(300.0, 400.0));
    tree.add_connection(&root, &inverter).expect("nodes exist");
    tree.add_connection(&inverter, &rest).expect("nodes exist");

    let script = Generator::builtin()
        .generate(&Element::BehaviourTree(tree))
        .expect("generation succeeds");
    let code = &script.main().contents;

    assert!(code.contains(
        "InverterDecoratorNode Inverter_Rest = Forager_BT.CreateInverterNode(\"Inverter_Rest\", Rest);"
    ));
    assert!(code.contains("Root.AddChild(Inverter_Rest);"));
}

#[test]
fn test_sub_machines_chain_into_the_same_script() {
    let (mut fsm, _, _, _) = create_patrol_fsm();
    let (inner_bt, _) = create_forager_bt();
    fsm.add_sub_state(Element::BehaviourTree(inner_bt), Rect::at(700.0, 100.0));

    let script = Generator::builtin()
        .generate(&Element::Fsm(fsm))
        .expect("generation succeeds");
    let code = &script.main().contents;

    assert!(code.contains(
        "State Forager = Guard_FSM.CreateSubStateMachine(\"Forager\", Forager_SubBT);"
    ));
    assert!(code.contains("private BehaviourTreeEngine Forager_SubBT;"));
    assert!(code.contains("private void CreateForager_SubBT()"));
    assert!(code.contains("CreateForager_SubBT();"));
    assert!(code.contains("Forager_SubBT.Update();"));
    assert!(!code.contains("#SUBELEMCREATE#"));
}

#[test]
fn test_utility_systems_are_not_generatable() {
    let (system, ..) = create_weighted_us();
    let result = Generator::builtin().generate(&Element::UtilitySystem(system));
    assert!(matches!(result, Err(GenerateError::Unsupported(_))));
}

#[test]
fn test_missing_template_directory_entry_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let generator = Generator::new(Box::new(DirTemplates::new(dir.path())));

    let (fsm, ..) = create_patrol_fsm();
    let result = generator.generate(&Element::Fsm(fsm));
    assert!(matches!(
        result,
        Err(GenerateError::TemplateNotFound(name)) if name == "FSM_Template"
    ));
}
