use crate::error::GraphError;
use crate::model::validate::{self, Issue};
use crate::model::{
    connected_check, Element, ElementId, Rect, StateKind, StateNode, Transition,
};
use crate::naming::UniqueNamer;

/// A finite-state machine graph: states wired by perception-guarded
/// transitions.
///
/// The machine owns its states and transitions exclusively. Display names are
/// assigned through the machine's own [`UniqueNamer`], so siblings never
/// clash.
#[derive(Debug, Clone)]
pub struct Fsm {
    id: ElementId,
    name: String,
    pub rect: Rect,
    namer: UniqueNamer,
    states: Vec<StateNode>,
    transitions: Vec<Transition>,
}

impl Fsm {
    pub fn new(name: &str, rect: Rect) -> Self {
        Self {
            id: ElementId::fresh(),
            name: name.to_string(),
            rect,
            namer: UniqueNamer::new(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub(crate) fn from_parts(id: ElementId, name: String, rect: Rect) -> Self {
        Self {
            id,
            name,
            rect,
            namer: UniqueNamer::new(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn namer(&self) -> &UniqueNamer {
        &self.namer
    }

    pub(crate) fn namer_mut(&mut self) -> &mut UniqueNamer {
        &mut self.namer
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state(&self, id: &ElementId) -> Option<&StateNode> {
        self.states.iter().find(|s| s.id() == id)
    }

    pub fn state_mut(&mut self, id: &ElementId) -> Option<&mut StateNode> {
        self.states.iter_mut().find(|s| s.id() == id)
    }

    pub fn transition(&self, id: &ElementId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id() == id)
    }

    pub fn transition_mut(&mut self, id: &ElementId) -> Option<&mut Transition> {
        self.transitions.iter_mut().find(|t| t.id() == id)
    }

    /// Adds a state and returns its identifier. The first state of a machine
    /// becomes its entry state.
    pub fn add_state(&mut self, base_name: &str, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(id.clone(), base_name);
        let mut node = StateNode::new(id.clone(), name, rect);
        if !self.has_entry_state() {
            node.kind = StateKind::Entry;
        }
        self.states.push(node);
        id
    }

    /// Adds a state that is a portal into a nested container. The node shares
    /// the sub-element's display name, which is registered under the
    /// sub-element's identifier.
    pub fn add_sub_state(&mut self, mut sub: Element, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(sub.id().clone(), sub.name());
        sub.set_name(name);
        let mut node = StateNode::with_sub_element(id.clone(), sub, rect);
        if !self.has_entry_state() {
            node.kind = StateKind::Entry;
        }
        self.states.push(node);
        id
    }

    /// Inserts an already-built state whose name has been registered with this
    /// machine's namer. Used by the deserialization and paste paths.
    pub(crate) fn insert_state(&mut self, node: StateNode) {
        self.states.push(node);
    }

    pub(crate) fn insert_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
        self.refresh_state_kinds();
    }

    /// Connects two states with a fresh transition guarded by a `Push`
    /// perception.
    pub fn add_transition(
        &mut self,
        from: &ElementId,
        to: &ElementId,
    ) -> Result<ElementId, GraphError> {
        for endpoint in [from, to] {
            if self.state(endpoint).is_none() {
                return Err(GraphError::UnknownNode(endpoint.to_string()));
            }
        }
        let id = ElementId::fresh();
        let name = self.namer.add_name(id.clone(), "New Transition");
        self.transitions
            .push(Transition::with_perception(id.clone(), name, from.clone(), to.clone()));
        self.refresh_state_kinds();
        Ok(id)
    }

    /// Deletes a state. With `cascade` set, every transition touching it is
    /// deleted too; either way the state's registered name is freed.
    pub fn delete_state(&mut self, id: &ElementId, cascade: bool) -> bool {
        let Some(index) = self.states.iter().position(|s| s.id() == id) else {
            return false;
        };
        let node = self.states.remove(index);
        self.namer.remove_name(node.name_key());
        if cascade {
            let dangling: Vec<ElementId> = self
                .transitions
                .iter()
                .filter(|t| t.is_incident_to(id))
                .map(|t| t.id().clone())
                .collect();
            for transition in dangling {
                self.delete_transition(&transition);
            }
        }
        self.refresh_state_kinds();
        true
    }

    pub fn delete_transition(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.transitions.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.transitions.remove(index);
        self.namer.remove_name(id);
        self.refresh_state_kinds();
        true
    }

    /// Renames a state through the registry; the assigned name may carry a
    /// suffix when the wanted one is taken. Portal nodes rename their
    /// sub-element along with themselves.
    pub fn rename_state(&mut self, id: &ElementId, wanted: &str) -> Option<String> {
        let key = self.state(id)?.name_key().clone();
        let assigned = self.namer.rename(&key, wanted)?;
        self.state_mut(id)
            .expect("state existed above")
            .set_name(assigned.clone());
        Some(assigned)
    }

    pub fn rename_transition(&mut self, id: &ElementId, wanted: &str) -> Option<String> {
        self.transition(id)?;
        let assigned = self.namer.rename(id, wanted)?;
        self.transition_mut(id)
            .expect("transition existed above")
            .set_name(assigned.clone());
        Some(assigned)
    }

    /// Reverse-reachability query: can execution ever reach `end` on an
    /// incoming path toward `start`? Used to detect cycles and redundant
    /// connections before allowing a new edge.
    pub fn connected_check(&self, start: &ElementId, end: &ElementId) -> bool {
        connected_check(&self.transitions, start, end)
    }

    pub fn has_entry_state(&self) -> bool {
        self.states.iter().any(|s| s.kind == StateKind::Entry)
    }

    pub fn entry_state(&self) -> Option<&StateNode> {
        self.states.iter().find(|s| s.kind == StateKind::Entry)
    }

    pub fn is_entry_state(&self, id: &ElementId) -> bool {
        self.state(id).is_some_and(|s| s.kind == StateKind::Entry)
    }

    /// Promotes a state to entry, demoting the previous one to its
    /// connectivity-derived kind.
    pub fn set_entry(&mut self, id: &ElementId) -> bool {
        if self.state(id).is_none() {
            return false;
        }
        for state in &mut self.states {
            if state.kind == StateKind::Entry {
                state.kind = StateKind::Default;
            }
        }
        self.state_mut(id).expect("state existed above").kind = StateKind::Entry;
        self.refresh_state_kinds();
        true
    }

    /// Consumes the machine, handing its nodes and transitions to a paste
    /// operation.
    pub(crate) fn into_parts(self) -> (Vec<StateNode>, Vec<Transition>) {
        (self.states, self.transitions)
    }

    /// Recursive flatten of every nested container, deepest first.
    pub fn sub_elems(&self) -> Vec<&Element> {
        let mut result = Vec::new();
        for node in &self.states {
            if let Some(sub) = &node.sub_element {
                result.extend(sub.sub_elems());
                result.push(sub.as_ref());
            }
        }
        result
    }

    /// Structural issues of this machine, recomputed from scratch.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if !self.has_entry_state() {
            issues.push(Issue::NoEntryState {
                element: self.name.clone(),
            });
        }
        issues.extend(validate::repeated_names(
            &self.name,
            self.states
                .iter()
                .map(StateNode::name)
                .chain(self.transitions.iter().map(Transition::name)),
        ));
        issues
    }

    /// Non-entry states keep `Default` while connected and fall back to
    /// `Unconnected` when no transition touches them.
    fn refresh_state_kinds(&mut self) {
        let incident: Vec<ElementId> = self
            .transitions
            .iter()
            .flat_map(|t| [t.from().clone(), t.to().clone()])
            .collect();
        for state in &mut self.states {
            if state.kind == StateKind::Entry {
                continue;
            }
            state.kind = if incident.contains(state.id()) {
                StateKind::Default
            } else {
                StateKind::Unconnected
            };
        }
    }
}
