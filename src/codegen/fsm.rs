//! FSM fragments: the `Create*` method body for one state machine.

use crate::error::GenerateError;
use crate::model::{Element, Fsm, Perception, PerceptionData, PerceptionKind, StateKind};

use super::{
    clean_name, fmt_num, RunContext, SubRef, ACTION_ENDING, SUB_BT_ENDING, SUB_FSM_ENDING, TAB,
};

/// Builds the `private void Create...()` method for `machine`. Sub-machine
/// fragments end with the `#SUBELEMCREATE#` placeholder so the next fragment
/// can chain onto them.
pub(super) fn create_fragment<'a>(
    machine: &'a Fsm,
    ending: &str,
    is_sub: bool,
    hosted_by_bt: bool,
    subs: &mut Vec<SubRef<'a>>,
    run: &mut RunContext<'_>,
) -> Result<String, GenerateError> {
    let machine_name = format!("{}{ending}", clean_name(machine.name()));
    let created_name = if is_sub {
        machine_name.clone()
    } else {
        "StateMachine".to_string()
    };
    let is_sub_str = if is_sub { "true" } else { "false" };

    let perceptions = perceptions_code(machine, &machine_name, run)?;
    let states = states_code(machine, &machine_name, subs);
    let transitions = transitions_code(machine, &machine_name, hosted_by_bt, run);

    let mut fragment = format!(
        "\n{TAB}private void Create{created_name}()\n\
         {TAB}{{\n\
         {TAB}{TAB}{machine_name} = new StateMachineEngine({is_sub_str});\n\
         {TAB}{TAB}\n\
         {TAB}{TAB}// Perceptions\n\
         {TAB}{TAB}// Modify or add new Perceptions, see the guide for more\n\
         {TAB}{TAB}{perceptions}\n\
         {TAB}{TAB}// States\n\
         {TAB}{TAB}{states}\n\
         {TAB}{TAB}// Transitions{transitions}\n\
         {TAB}}}"
    );
    if is_sub {
        fragment.push_str("#SUBELEMCREATE#");
    }
    Ok(fragment)
}

fn perceptions_code(
    machine: &Fsm,
    machine_name: &str,
    run: &mut RunContext<'_>,
) -> Result<String, GenerateError> {
    let mut out = String::new();
    for transition in machine.transitions() {
        if let Some(perception) = &transition.perception {
            out.push_str(&perception_code(
                perception,
                &clean_name(transition.name()),
                machine_name,
                run,
            )?);
        }
    }
    Ok(out)
}

/// One `Perception <var> = <machine>.Create...Perception<...>(...)` line per
/// subtree node, children before their composing parent so the parent's
/// parameters can name them.
fn perception_code(
    perception: &Perception,
    transition_name: &str,
    machine_name: &str,
    run: &mut RunContext<'_>,
) -> Result<String, GenerateError> {
    let mut out = String::new();
    let mut and_or = "";
    if let PerceptionData::And { left, right } | PerceptionData::Or { left, right } =
        perception.data()
    {
        and_or = if perception.kind() == PerceptionKind::And {
            "And"
        } else {
            "Or"
        };
        out.push_str(&perception_code(left, transition_name, machine_name, run)?);
        out.push_str(&perception_code(right, transition_name, machine_name, run)?);
    }

    let type_name = match perception.data() {
        PerceptionData::Custom { name } => {
            let type_name = clean_name(name);
            run.custom_script(&type_name)?;
            type_name
        }
        _ => perception.kind().as_str().to_string(),
    };

    let var = run.perception_names.add_name(
        perception.id().clone(),
        &format!("{transition_name}_{type_name}Perception"),
    );
    let params = perception_params(perception, &var, run);
    out.push_str(&format!(
        "Perception {var} = {machine_name}.Create{and_or}Perception<{type_name}Perception>({params});\n{TAB}{TAB}"
    ));
    Ok(out)
}

fn perception_params(perception: &Perception, var: &str, run: &RunContext<'_>) -> String {
    match perception.data() {
        PerceptionData::Push | PerceptionData::Value => String::new(),
        PerceptionData::Timer { seconds } => fmt_num(*seconds),
        PerceptionData::IsInState { fsm, state } => {
            format!("{}{SUB_FSM_ENDING}, \"{state}\"", clean_name(fsm))
        }
        PerceptionData::BehaviourTreeStatus { tree, status } => {
            format!("{}{SUB_BT_ENDING}, ReturnValues.{}", clean_name(tree), status.as_str())
        }
        PerceptionData::And { left, right } | PerceptionData::Or { left, right } => format!(
            "{}, {}",
            run.perception_names.get(left.id()).unwrap_or_default(),
            run.perception_names.get(right.id()).unwrap_or_default()
        ),
        PerceptionData::Custom { .. } => format!("new {var}()"),
    }
}

fn states_code<'a>(machine: &'a Fsm, machine_name: &str, subs: &mut Vec<SubRef<'a>>) -> String {
    let mut out = String::new();
    for node in machine.states() {
        let node_name = clean_name(node.name());
        match node.sub_element.as_deref() {
            Some(sub @ (Element::Fsm(_) | Element::BehaviourTree(_))) => {
                let (_, ending) = super::sub_engine_parts(sub);
                out.push_str(&format!(
                    "State {node_name} = {machine_name}.CreateSubStateMachine(\"{}\", {node_name}{ending});\n{TAB}{TAB}",
                    node.name()
                ));
                subs.push(SubRef {
                    element: sub,
                    hosted_by_bt: false,
                });
            }
            _ if node.kind == StateKind::Entry => {
                out.push_str(&format!(
                    "State {node_name} = {machine_name}.CreateEntryState(\"{}\", {node_name}{ACTION_ENDING});\n{TAB}{TAB}",
                    node.name()
                ));
            }
            _ => {
                out.push_str(&format!(
                    "State {node_name} = {machine_name}.CreateState(\"{}\", {node_name}{ACTION_ENDING});\n{TAB}{TAB}",
                    node.name()
                ));
            }
        }
    }
    out
}

fn transitions_code(
    machine: &Fsm,
    machine_name: &str,
    hosted_by_bt: bool,
    run: &RunContext<'_>,
) -> String {
    let mut out = String::new();
    for transition in machine.transitions() {
        let (Some(from), Some(to)) = (
            machine.state(transition.from()),
            machine.state(transition.to()),
        ) else {
            continue;
        };
        let from_name = clean_name(from.name());
        let to_name = clean_name(to.name());
        let guard = transition
            .perception
            .as_ref()
            .and_then(|p| run.perception_names.get(p.id()))
            .unwrap_or_default();

        match from.sub_element.as_deref() {
            Some(sub @ (Element::Fsm(_) | Element::BehaviourTree(_))) => {
                // Leaving a portal state exits the nested machine, so the
                // transition belongs to that machine, not this one.
                let (_, ending) = super::sub_engine_parts(sub);
                out.push_str(&format!(
                    "\n{TAB}{TAB}{}{ending}.CreateExitTransition(\"{}\", {from_name}, {guard}, {to_name});",
                    clean_name(sub.name()),
                    transition.name()
                ));
            }
            _ => {
                out.push_str(&format!(
                    "\n{TAB}{TAB}{machine_name}.CreateTransition(\"{}\", {from_name}, {guard}, {to_name});",
                    transition.name()
                ));
            }
        }
    }
    if hosted_by_bt {
        out.push_str(&format!(
            "\n{TAB}{TAB}{machine_name}.CreateExitTransition(\"{machine_name} Exit\", null /*Change this for a node*/, null /*Change this for a perception*/, ReturnValues.Succeed);"
        ));
    }
    out
}
