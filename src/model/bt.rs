use crate::error::GraphError;
use crate::model::validate::{self, Issue};
use crate::model::{
    connected_check, BehaviourKind, BehaviourNode, Element, ElementId, Rect, Transition,
};
use crate::naming::UniqueNamer;

/// A behaviour tree graph: composite, leaf and decorator nodes wired by
/// parent-to-child connections.
#[derive(Debug, Clone)]
pub struct BehaviourTree {
    id: ElementId,
    name: String,
    pub rect: Rect,
    namer: UniqueNamer,
    nodes: Vec<BehaviourNode>,
    connections: Vec<Transition>,
}

impl BehaviourTree {
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

    pub fn nodes(&self) -> &[BehaviourNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Transition] {
        &self.connections
    }

    pub fn node(&self, id: &ElementId) -> Option<&BehaviourNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &ElementId) -> Option<&mut BehaviourNode> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn connection(&self, id: &ElementId) -> Option<&Transition> {
        self.connections.iter().find(|t| t.id() == id)
    }

    /// Adds a node and returns its identifier. The first node of a tree
    /// becomes its root.
    pub fn add_node(&mut self, kind: BehaviourKind, base_name: &str, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(id.clone(), base_name);
        let mut node = BehaviourNode::new(id.clone(), name, kind, rect);
        node.is_root = !self.has_root();
        self.nodes.push(node);
        id
    }

    /// Adds a leaf node that is a portal into a nested container.
    pub fn add_sub_node(&mut self, mut sub: Element, rect: Rect) -> ElementId {
        let id = ElementId::fresh();
        let name = self.namer.add_name(sub.id().clone(), sub.name());
        sub.set_name(name);
        let mut node = BehaviourNode::with_sub_element(id.clone(), sub, rect);
        node.is_root = !self.has_root();
        self.nodes.push(node);
        id
    }

    pub(crate) fn insert_node(&mut self, node: BehaviourNode) {
        self.nodes.push(node);
    }

    pub(crate) fn insert_connection(&mut self, connection: Transition) {
        self.connections.push(connection);
    }

    /// Whether wiring `from` down to `to` would be accepted by the editor:
    /// rejects self-loops, edges that close a cycle, leaf parents, and a
    /// second child under a decorator. `add_connection` itself does not
    /// enforce this; callers check it first, as the menus do.
    pub fn connection_allowed(&self, from: &ElementId, to: &ElementId) -> bool {
        if from == to {
            return false;
        }
        let (Some(parent), Some(_child)) = (self.node(from), self.node(to)) else {
            return false;
        };
        if parent.kind == BehaviourKind::Leaf {
            return false;
        }
        if parent.kind.is_decorator() && self.children_count(from) > 0 {
            return false;
        }
        !self.connected_check(from, to)
    }

    /// Connects a parent node to a child. The child stops being a root.
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
        self.node_mut(to).expect("endpoint checked above").is_root = false;
        Ok(id)
    }

    /// Deletes a node. With `cascade` set, every connection touching it is
    /// deleted too; either way the node's registered name is freed.
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

    pub fn has_root(&self) -> bool {
        self.nodes.iter().any(|n| n.is_root)
    }

    pub fn root_node(&self) -> Option<&BehaviourNode> {
        self.nodes.iter().find(|n| n.is_root)
    }

    /// Makes `id` the sole root of the tree.
    pub fn set_root(&mut self, id: &ElementId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        for node in &mut self.nodes {
            node.is_root = false;
        }
        self.node_mut(id).expect("node existed above").is_root = true;
        true
    }

    pub fn children_count(&self, id: &ElementId) -> usize {
        self.connections.iter().filter(|t| t.from() == id).count()
    }

    /// Children of a node, in connection insertion order.
    pub fn children(&self, id: &ElementId) -> Vec<&BehaviourNode> {
        self.connections
            .iter()
            .filter(|t| t.from() == id)
            .filter_map(|t| self.node(t.to()))
            .collect()
    }

    pub(crate) fn into_parts(self) -> (Vec<BehaviourNode>, Vec<Transition>) {
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
        if self.nodes.iter().filter(|n| n.is_root).count() > 1 {
            issues.push(Issue::MoreThanOneRoot {
                element: self.name.clone(),
            });
        }
        issues.extend(validate::repeated_names(
            &self.name,
            self.nodes.iter().map(BehaviourNode::name),
        ));
        issues
    }
}
