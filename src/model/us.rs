use crate::error::GraphError;
use crate::model::validate::{self, Issue};
use crate::model::{
    connected_check, Element, ElementId, FusionKind, Rect, Transition, UtilityKind, UtilityNode,
};
use crate::naming::UniqueNamer;

/// A utility system graph: variables feeding curves and fusion nodes that
/// score action choices.
#[derive(Debug, Clone)]
pub struct UtilitySystem {
    id: ElementId,
    name: String,
    pub rect: Rect,
    namer: UniqueNamer,
    nodes: Vec<UtilityNode>,
    connections: Vec<Transition>,
}

impl UtilitySystem {
    pub fn new(name: &str, rect: Rect) -> Self {
        Self {
            id: ElementId::fresh(),
            name: name.to_string(),
            rect,
            namer: UniqueNamer::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub(crate) fn from_parts(id: ElementId, name: String, rect: Rect) -> Self {
        Self {
            id,
            name,
            rect,
            namer: UniqueNamer::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
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

    pub fn nodes(&self) -> &[UtilityNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Transition] {
        &self.connections
    }

    pub fn node(&self, id: &ElementId) -> Option<&UtilityNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &ElementId) -> Option<&mut UtilityNode> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn connection(&self, id: &ElementId) -> Option<&Transition> {
        self.connections.iter().find(|t| t.id() == id)
    }

    pub fn add_node(&mut self, kind: UtilityKind, base_name: &str, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(id.clone(), base_name);
        self.nodes
            .push(UtilityNode::new(id.clone(), name, kind, rect));
        id
    }

    /// Adds an action node that is a portal into a nested container.
    pub fn add_sub_node(&mut self, mut sub: Element, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(sub.id().clone(), sub.name());
        sub.set_name(name);
        self.nodes
            .push(UtilityNode::with_sub_element(id.clone(), sub, rect));
        id
    }

    pub(crate) fn insert_node(&mut self, node: UtilityNode) {
        self.nodes.push(node);
    }

    pub(crate) fn insert_connection(&mut self, connection: Transition) {
        self.connections.push(connection);
    }

    /// Whether wiring the factor `from` into `to` would be accepted by the
    /// editor: rejects self-loops, cycle-closing edges, variable targets, and
    /// a second factor under an action or curve node. `add_connection` itself
    /// does not enforce this.
    pub fn connection_allowed(&self, from: &ElementId, to: &ElementId) -> bool {
        if from == to {
            return false;
        }
        let (Some(_factor), Some(target)) = (self.node(from), self.node(to)) else {
            return false;
        };
        if target.kind == UtilityKind::Variable {
            return false;
        }
        let single_factor =
            matches!(target.kind, UtilityKind::Action | UtilityKind::Curve);
        if single_factor && self.factors_count(to) > 0 {
            return false;
        }
        !self.connected_check(from, to)
    }

    /// Connects a factor node into a consumer node.
    pub fn add_connection(
        &mut self,
        from: &ElementId,
        to: &ElementId,
    ) -> Result<ElementId, GraphError> {
        for endpoint in [from, to] {
            if self.node(endpoint).is_none() {
                return Err(GraphError::UnknownNode(endpoint.to_string()));
            }
        }
        let id = ElementId::fresh();
        let name = self.namer.add_name(id.clone(), "New Transition");
        self.connections
            .push(Transition::new(id.clone(), name, from.clone(), to.clone()));
        Ok(id)
    }

    pub fn delete_node(&mut self, id: &ElementId, cascade: bool) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n.id() == id) else {
            return false;
        };
        let node = self.nodes.remove(index);
        self.namer.remove_name(node.name_key());
        if cascade {
            let dangling: Vec<ElementId> = self
                .connections
                .iter()
                .filter(|t| t.is_incident_to(id))
                .map(|t| t.id().clone())
                .collect();
            for connection in dangling {
                self.delete_connection(&connection);
            }
        }
        true
    }

    pub fn delete_connection(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.connections.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.connections.remove(index);
        self.namer.remove_name(id);
        true
    }

    pub fn rename_node(&mut self, id: &ElementId, wanted: &str) -> Option<String> {
        let key = self.node(id)?.name_key().clone();
        let assigned = self.namer.rename(&key, wanted)?;
        self.node_mut(id)
            .expect("node existed above")
            .set_name(assigned.clone());
        Some(assigned)
    }

    /// Reverse-reachability query; see [`Fsm::connected_check`].
    ///
    /// [`Fsm::connected_check`]: crate::model::Fsm::connected_check
    pub fn connected_check(&self, start: &ElementId, end: &ElementId) -> bool {
        connected_check(&self.connections, start, end)
    }

    /// Number of factors feeding `id`.
    pub fn factors_count(&self, id: &ElementId) -> usize {
        self.connections.iter().filter(|t| t.to() == id).count()
    }

    /// The weights of every connection feeding the fusion node `id`, in
    /// connection order.
    pub fn weights_into(&self, id: &ElementId) -> Vec<f32> {
        self.connections
            .iter()
            .filter(|t| t.to() == id)
            .map(|t| t.weight)
            .collect()
    }

    /// Assigns a weight to a connection and renormalizes its siblings so the
    /// weights feeding the same weighted fusion node keep summing to 1.
    pub fn set_weight(&mut self, connection: &ElementId, weight: f32) -> bool {
        let Some(edited) = self.connections.iter_mut().find(|t| t.id() == connection) else {
            return false;
        };
        edited.weight = round2(weight);
        self.update_weights(connection);
        true
    }

    /// Rebalances every weight feeding the same weighted fusion node as the
    /// edited connection, keeping the sum at 1. Each sibling absorbs a share
    /// of the difference proportional to its current weight; when every
    /// sibling is at zero the difference is split equally instead.
    pub fn update_weights(&mut self, edited: &ElementId) {
        let Some(target) = self.connection(edited).map(|t| t.to().clone()) else {
            return;
        };
        let is_weighted_fusion = self
            .node(&target)
            .is_some_and(|n| n.kind == UtilityKind::Fusion && n.fusion == FusionKind::Weighted);
        if !is_weighted_fusion {
            return;
        }

        let sum: f32 = self
            .connections
            .iter()
            .filter(|t| t.to() == &target)
            .map(|t| t.weight)
            .sum();
        if (sum - 1.0).abs() < f32::EPSILON {
            return;
        }
        let sum_others: f32 = self
            .connections
            .iter()
            .filter(|t| t.to() == &target && t.id() != edited)
            .map(|t| t.weight)
            .sum();
        let others_count = self
            .connections
            .iter()
            .filter(|t| t.to() == &target && t.id() != edited)
            .count();
        if others_count == 0 {
            return;
        }

        for transition in self
            .connections
            .iter_mut()
            .filter(|t| t.to() == &target && t.id() != edited)
        {
            let delta = if sum_others == 0.0 {
                (1.0 - sum) / others_count as f32
            } else {
                (1.0 - sum) * transition.weight / sum_others
            };
            transition.weight = round2(transition.weight + delta);
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<UtilityNode>, Vec<Transition>) {
        (self.nodes, self.connections)
    }

    pub fn sub_elems(&self) -> Vec<&Element> {
        let mut result = Vec::new();
        for node in &self.nodes {
            if let Some(sub) = &node.sub_element {
                result.extend(sub.sub_elems());
                result.push(sub.as_ref());
            }
        }
        result
    }

    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for node in &self.nodes {
            if node.kind == UtilityKind::Action && self.factors_count(node.id()) == 0 {
                issues.push(Issue::NoFactors {
                    element: self.name.clone(),
                    node: node.name().to_string(),
                });
            }
        }
        issues.extend(validate::repeated_names(
            &self.name,
            self.nodes.iter().map(UtilityNode::name),
        ));
        issues
    }
}

/// Weights are kept to two decimal places, like the editor shows them.
fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
