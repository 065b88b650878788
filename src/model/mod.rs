pub mod bt;
pub mod element;
pub mod fsm;
pub mod node;
pub mod perception;
pub mod transition;
pub mod us;
pub mod validate;

pub use bt::*;
pub use element::*;
pub use fsm::*;
pub use node::*;
pub use perception::*;
pub use transition::*;
pub use us::*;
pub use validate::Issue;

/// Reverse-edge depth-first search shared by every container kind.
///
/// Returns true when a directed path of connections leads from `end` back to
/// `start`, i.e. adding an edge `start -> end` would be redundant or close a
/// cycle.
pub(crate) fn connected_check(
    connections: &[Transition],
    start: &ElementId,
    end: &ElementId,
) -> bool {
    let mut visited: Vec<&ElementId> = Vec::new();
    let mut stack: Vec<&ElementId> = vec![start];
    while let Some(current) = stack.pop() {
        for transition in connections.iter().filter(|t| t.to() == current) {
            let from = transition.from();
            if from == end {
                return true;
            }
            if !visited.contains(&from) {
                visited.push(from);
                stack.push(from);
            }
        }
    }
    false
}
