//! Behaviour tree fragments: the `Create*` method body for one tree.

use crate::error::GenerateError;
use crate::model::{BehaviourKind, BehaviourNode, BehaviourTree, Element};

use super::{clean_name, fmt_num, RunContext, SubRef, ACTION_ENDING, CHECK_ENDING, TAB};

pub(super) fn create_fragment<'a>(
    tree: &'a BehaviourTree,
    ending: &str,
    is_sub: bool,
    subs: &mut Vec<SubRef<'a>>,
    _run: &mut RunContext<'_>,
) -> Result<String, GenerateError> {
    let machine_name = format!("{}{ending}", clean_name(tree.name()));
    let created_name = if is_sub {
        machine_name.clone()
    } else {
        "BehaviourTree".to_string()
    };
    let is_sub_str = if is_sub { "true" } else { "false" };

    let nodes = nodes_code(tree, &machine_name, subs);
    let childs = childs_code(tree);
    let set_root = set_root_code(tree, &machine_name);

    let mut fragment = format!(
        "\n{TAB}private void Create{created_name}()\n\
         {TAB}{{\n\
         {TAB}{TAB}{machine_name} = new BehaviourTreeEngine({is_sub_str});\n\
         {TAB}{TAB}\n\
         {TAB}{TAB}// Nodes\n\
         {TAB}{TAB}{nodes}\n\
         {TAB}{TAB}// Child adding{childs}\n\
         {TAB}{TAB}// SetRoot\n\
         {TAB}{TAB}{set_root}\n\
         {TAB}}}"
    );
    if is_sub {
        fragment.push_str("#SUBELEMCREATE#");
    }
    Ok(fragment)
}

/// The variable a node is bound to in generated code. Decorators are unnamed
/// in the editor, so their variables are derived from the decorated chain:
/// `LoopN_Inverter_Walk` and the like.
fn var_name(tree: &BehaviourTree, node: &BehaviourNode) -> String {
    match node.kind.decorator_prefix() {
        Some(prefix) => match tree.children(node.id()).first().copied() {
            Some(child) => format!("{prefix}_{}", var_name(tree, child)),
            None => clean_name(node.name()),
        },
        None => clean_name(node.name()),
    }
}

fn nodes_code<'a>(
    tree: &'a BehaviourTree,
    machine_name: &str,
    subs: &mut Vec<SubRef<'a>>,
) -> String {
    let mut out = String::new();
    for node in tree.nodes() {
        let node_name = clean_name(node.name());
        match node.kind {
            BehaviourKind::Selector => {
                out.push_str(&format!(
                    "SelectorNode {node_name} = {machine_name}.CreateSelectorNode(\"{}\");\n{TAB}{TAB}",
                    node.name()
                ));
            }
            BehaviourKind::Sequence => {
                out.push_str(&format!(
                    "SequenceNode {node_name} = {machine_name}.CreateSequenceNode(\"{}\", {});\n{TAB}{TAB}",
                    node.name(),
                    if node.is_random { "true" } else { "false" }
                ));
            }
            BehaviourKind::Leaf => match node.sub_element.as_deref() {
                Some(sub @ (Element::Fsm(_) | Element::BehaviourTree(_))) => {
                    let (_, ending) = super::sub_engine_parts(sub);
                    out.push_str(&format!(
                        "LeafNode {node_name} = {machine_name}.CreateSubBehaviour(\"{}\", {node_name}{ending});\n{TAB}{TAB}",
                        node.name()
                    ));
                    subs.push(SubRef {
                        element: sub,
                        hosted_by_bt: true,
                    });
                }
                _ => {
                    out.push_str(&format!(
                        "LeafNode {node_name} = {machine_name}.CreateLeafNode(\"{}\", {node_name}{ACTION_ENDING}, {node_name}{CHECK_ENDING});\n{TAB}{TAB}",
                        node.name()
                    ));
                }
            },
            _ => {}
        }
    }

    // Decorators are written child-first so every referenced variable already
    // exists by the time its wrapper is declared.
    for node in tree.nodes().iter().filter(|n| n.is_root) {
        decorators_code(tree, machine_name, node, &mut out);
    }
    out
}

fn decorators_code(
    tree: &BehaviourTree,
    machine_name: &str,
    node: &BehaviourNode,
    out: &mut String,
) {
    for child in tree.children(node.id()) {
        decorators_code(tree, machine_name, child, out);
    }
    if !node.kind.is_decorator() {
        return;
    }
    let Some(child) = tree.children(node.id()).first().copied() else {
        return;
    };
    let child_name = var_name(tree, child);
    let own_name = var_name(tree, node);
    let line = match node.kind {
        BehaviourKind::LoopN => format!(
            "LoopDecoratorNode {own_name} = {machine_name}.CreateLoopNode(\"{own_name}\", {child_name}, {});\n{TAB}{TAB}",
            fmt_num(node.n_property)
        ),
        BehaviourKind::LoopUntilFail => format!(
            "LoopUntilFailDecoratorNode {own_name} = {machine_name}.CreateLoopUntilFailNode(\"{own_name}\", {child_name});\n{TAB}{TAB}"
        ),
        BehaviourKind::Inverter => format!(
            "InverterDecoratorNode {own_name} = {machine_name}.CreateInverterNode(\"{own_name}\", {child_name});\n{TAB}{TAB}"
        ),
        BehaviourKind::DelayTimer => format!(
            "TimerDecoratorNode {own_name} = {machine_name}.CreateTimerNode(\"{own_name}\", {child_name}, {});\n{TAB}{TAB}",
            fmt_num(node.n_property)
        ),
        BehaviourKind::Succeeder => format!(
            "SucceederDecoratorNode {own_name} = {machine_name}.CreateSucceederNode(\"{own_name}\", {child_name});\n{TAB}{TAB}"
        ),
        BehaviourKind::Conditional => format!(
            "ConditionalDecoratorNode {own_name} = {machine_name}.CreateConditionalNode(\"{own_name}\", {child_name}, null /*Change this for a perception*/);\n{TAB}{TAB}"
        ),
        _ => unreachable!("composite and leaf kinds handled above"),
    };
    out.push_str(&line);
}

fn childs_code(tree: &BehaviourTree) -> String {
    let mut out = String::new();
    for node in tree
        .nodes()
        .iter()
        .filter(|n| n.kind.is_composite() && tree.children_count(n.id()) > 0)
    {
        let node_name = clean_name(node.name());
        out.push_str(&format!("\n{TAB}{TAB}"));
        for child in tree.children(node.id()) {
            out.push_str(&format!(
                "{node_name}.AddChild({});\n{TAB}{TAB}",
                var_name(tree, child)
            ));
        }
    }
    out
}

fn set_root_code(tree: &BehaviourTree, machine_name: &str) -> String {
    match tree.root_node() {
        Some(root) => format!("{machine_name}.SetRootNode({});", var_name(tree, root)),
        None => String::new(),
    }
}
