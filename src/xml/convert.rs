//! Conversion between the in-memory entities and their flat XML projection.
//!
//! Loading builds an explicit `old id -> new id` remap table over every node
//! before any edge is reconstructed, so transitions are always re-pointed
//! through the table and never fixed up in place.

use ahash::AHashMap;

use crate::error::XmlError;
use crate::model::{
    BehaviourKind, BehaviourNode, BehaviourTree, CurveKind, Element, ElementId, Fsm, FusionKind,
    Perception, PerceptionData, PerceptionKind, Rect, ReturnValue, StateKind, StateNode,
    Transition, UtilityKind, UtilityNode, UtilitySystem,
};
use crate::xml::{ElemType, XmlElement, XmlPerception};

/// Whether deserialization keeps the stored identifiers or issues fresh ones.
///
/// Fresh identifiers are required for paste and duplicate operations, where
/// the stored ones are no longer unique once the copy lives alongside the
/// original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    Preserve,
    Reissue,
}

impl IdPolicy {
    fn id_for(&self, raw: &str) -> ElementId {
        match self {
            IdPolicy::Preserve => ElementId::from(raw.to_string()),
            IdPolicy::Reissue => ElementId::fresh(),
        }
    }
}

impl Element {
    pub fn to_xml(&self) -> XmlElement {
        match self {
            Element::Fsm(e) => e.to_xml(),
            Element::BehaviourTree(e) => e.to_xml(),
            Element::UtilitySystem(e) => e.to_xml(),
        }
    }

    fn elem_type(&self) -> ElemType {
        match self {
            Element::Fsm(_) => ElemType::Fsm,
            Element::BehaviourTree(_) => ElemType::BehaviourTree,
            Element::UtilitySystem(_) => ElemType::UtilitySystem,
        }
    }
}

impl Fsm {
    pub fn to_xml(&self) -> XmlElement {
        let mut record =
            XmlElement::record(ElemType::Fsm, self.id().to_string(), self.name().to_string());
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.nodes = self.states().iter().map(StateNode::to_xml).collect();
        record.transitions = self.transitions().iter().map(Transition::to_xml).collect();
        record
    }
}

impl BehaviourTree {
    pub fn to_xml(&self) -> XmlElement {
        let mut record = XmlElement::record(
            ElemType::BehaviourTree,
            self.id().to_string(),
            self.name().to_string(),
        );
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.nodes = self.nodes().iter().map(BehaviourNode::to_xml).collect();
        record.transitions = self.connections().iter().map(Transition::to_xml).collect();
        record
    }
}

impl UtilitySystem {
    pub fn to_xml(&self) -> XmlElement {
        let mut record = XmlElement::record(
            ElemType::UtilitySystem,
            self.id().to_string(),
            self.name().to_string(),
        );
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.nodes = self.nodes().iter().map(UtilityNode::to_xml).collect();
        record.transitions = self.connections().iter().map(Transition::to_xml).collect();
        record
    }
}

impl StateNode {
    pub fn to_xml(&self) -> XmlElement {
        let mut record =
            XmlElement::record(ElemType::State, self.id().to_string(), self.name().to_string());
        record.second_type = Some(self.kind.as_str().to_string());
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.sub_element = self.sub_element.as_ref().map(|sub| Box::new(sub.to_xml()));
        record
    }
}

impl BehaviourNode {
    pub fn to_xml(&self) -> XmlElement {
        let mut record = XmlElement::record(
            ElemType::BehaviourNode,
            self.id().to_string(),
            self.name().to_string(),
        );
        record.second_type = Some(self.kind.as_str().to_string());
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.is_root = self.is_root;
        record.is_random = self.is_random;
        record.n_property = self.n_property;
        record.sub_element = self.sub_element.as_ref().map(|sub| Box::new(sub.to_xml()));
        record
    }
}

impl UtilityNode {
    pub fn to_xml(&self) -> XmlElement {
        let mut record = XmlElement::record(
            ElemType::UtilityNode,
            self.id().to_string(),
            self.name().to_string(),
        );
        record.second_type = Some(self.kind.as_str().to_string());
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.fusion_type = Some(self.fusion.as_str().to_string());
        record.curve_type = Some(self.curve.as_str().to_string());
        record.variable_min = self.variable_min;
        record.variable_max = self.variable_max;
        record.slope = self.slope;
        record.exp = self.exp;
        record.displ_x = self.displ_x;
        record.displ_y = self.displ_y;
        record.sub_element = self.sub_element.as_ref().map(|sub| Box::new(sub.to_xml()));
        record
    }
}

impl Transition {
    pub fn to_xml(&self) -> XmlElement {
        let mut record = XmlElement::record(
            ElemType::Transition,
            self.id().to_string(),
            self.name().to_string(),
        );
        record.pos_x = self.rect.x;
        record.pos_y = self.rect.y;
        record.from_id = Some(self.from().to_string());
        record.to_id = Some(self.to().to_string());
        record.weight = self.weight;
        record.perception = self.perception.as_ref().map(Perception::to_xml);
        record
    }
}

impl Perception {
    pub fn to_xml(&self) -> XmlPerception {
        let mut record = XmlPerception::record(self.id().to_string(), self.kind());
        match self.data() {
            PerceptionData::Timer { seconds } => record.timer = *seconds,
            PerceptionData::IsInState { fsm, state } => {
                record.elem_name = Some(fsm.clone());
                record.state_name = Some(state.clone());
            }
            PerceptionData::BehaviourTreeStatus { tree, status } => {
                record.elem_name = Some(tree.clone());
                record.status = Some(*status);
            }
            PerceptionData::And { left, right } | PerceptionData::Or { left, right } => {
                record.first_child = Some(Box::new(left.to_xml()));
                record.second_child = Some(Box::new(right.to_xml()));
            }
            PerceptionData::Custom { name } => record.custom_name = Some(name.clone()),
            PerceptionData::Push | PerceptionData::Value => {}
        }
        record
    }
}

impl XmlPerception {
    pub fn to_perception(&self, policy: IdPolicy) -> Perception {
        let data = match self.kind {
            PerceptionKind::Push => PerceptionData::Push,
            PerceptionKind::Value => PerceptionData::Value,
            PerceptionKind::Timer => PerceptionData::Timer {
                seconds: self.timer,
            },
            PerceptionKind::IsInState => PerceptionData::IsInState {
                fsm: self.elem_name.clone().unwrap_or_default(),
                state: self.state_name.clone().unwrap_or_default(),
            },
            PerceptionKind::BehaviourTreeStatus => PerceptionData::BehaviourTreeStatus {
                tree: self.elem_name.clone().unwrap_or_default(),
                status: self.status.unwrap_or(ReturnValue::Succeed),
            },
            PerceptionKind::And | PerceptionKind::Or => {
                let left = self
                    .first_child
                    .as_ref()
                    .map(|c| c.to_perception(policy))
                    .unwrap_or_else(|| Perception::new(PerceptionKind::Push));
                let right = self
                    .second_child
                    .as_ref()
                    .map(|c| c.to_perception(policy))
                    .unwrap_or_else(|| Perception::new(PerceptionKind::Push));
                if self.kind == PerceptionKind::And {
                    PerceptionData::And {
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                } else {
                    PerceptionData::Or {
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
            }
            PerceptionKind::Custom => PerceptionData::Custom {
                name: self.custom_name.clone().unwrap_or_default(),
            },
        };
        Perception::from_parts(policy.id_for(&self.id), data)
    }
}

impl XmlElement {
    /// Rebuilds a container from its serialized form.
    pub fn to_element(&self, policy: IdPolicy) -> Result<Element, XmlError> {
        match self.elem_type {
            ElemType::Fsm => Ok(Element::Fsm(self.to_fsm(policy)?)),
            ElemType::BehaviourTree => Ok(Element::BehaviourTree(self.to_bt(policy)?)),
            ElemType::UtilitySystem => Ok(Element::UtilitySystem(self.to_us(policy)?)),
            other => Err(XmlError::UnexpectedRecord {
                found: other.label(),
                context: "top-level element",
            }),
        }
    }

    /// Remap table over this container's direct nodes, built before any edge
    /// is reconstructed.
    fn node_remap(&self, policy: IdPolicy) -> AHashMap<String, ElementId> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), policy.id_for(&node.id)))
            .collect()
    }

    fn endpoints(
        &self,
        remap: &AHashMap<String, ElementId>,
    ) -> Result<(ElementId, ElementId), XmlError> {
        let mut resolved = [None, None];
        for (slot, raw) in [&self.from_id, &self.to_id].into_iter().enumerate() {
            let raw = raw.as_ref().ok_or_else(|| {
                XmlError::Malformed(format!(
                    "transition '{}' is missing an endpoint identifier",
                    self.name
                ))
            })?;
            resolved[slot] = Some(remap.get(raw).cloned().ok_or_else(|| {
                XmlError::MissingEndpoint {
                    transition: self.name.clone(),
                    endpoint: raw.clone(),
                }
            })?);
        }
        Ok((
            resolved[0].take().expect("filled above"),
            resolved[1].take().expect("filled above"),
        ))
    }

    fn to_transition(
        &self,
        policy: IdPolicy,
        remap: &AHashMap<String, ElementId>,
    ) -> Result<Transition, XmlError> {
        if self.elem_type != ElemType::Transition {
            return Err(XmlError::UnexpectedRecord {
                found: self.elem_type.label(),
                context: "transition list",
            });
        }
        let (from, to) = self.endpoints(remap)?;
        let mut transition =
            Transition::new(policy.id_for(&self.id), self.name.clone(), from, to);
        transition.rect =
            Rect::new(self.pos_x, self.pos_y, Rect::TRANSITION_WIDTH, Rect::TRANSITION_HEIGHT);
        transition.weight = self.weight;
        transition.perception = self.perception.as_ref().map(|p| p.to_perception(policy));
        Ok(transition)
    }

    fn to_fsm(&self, policy: IdPolicy) -> Result<Fsm, XmlError> {
        let mut fsm = Fsm::from_parts(
            policy.id_for(&self.id),
            self.name.clone(),
            Rect::at(self.pos_x, self.pos_y),
        );
        let remap = self.node_remap(policy);
        for node_xml in &self.nodes {
            if node_xml.elem_type != ElemType::State {
                return Err(XmlError::UnexpectedRecord {
                    found: node_xml.elem_type.label(),
                    context: "FSM node list",
                });
            }
            let id = remap[&node_xml.id].clone();
            let rect = Rect::at(node_xml.pos_x, node_xml.pos_y);
            let mut node = match &node_xml.sub_element {
                Some(sub_xml) => {
                    let mut sub = sub_xml.to_element(policy)?;
                    let name = fsm.namer_mut().add_name(sub.id().clone(), &node_xml.name);
                    sub.set_name(name);
                    StateNode::with_sub_element(id, sub, rect)
                }
                None => {
                    let name = fsm.namer_mut().add_name(id.clone(), &node_xml.name);
                    StateNode::new(id, name, rect)
                }
            };
            node.kind = parse_state_kind(node_xml.second_type.as_deref());
            fsm.insert_state(node);
        }
        for transition_xml in &self.transitions {
            let mut transition = transition_xml.to_transition(policy, &remap)?;
            let name = fsm
                .namer_mut()
                .add_name(transition.id().clone(), transition_xml.name.as_str());
            transition.set_name(name);
            fsm.insert_transition(transition);
        }
        Ok(fsm)
    }

    fn to_bt(&self, policy: IdPolicy) -> Result<BehaviourTree, XmlError> {
        let mut tree = BehaviourTree::from_parts(
            policy.id_for(&self.id),
            self.name.clone(),
            Rect::at(self.pos_x, self.pos_y),
        );
        let remap = self.node_remap(policy);
        for node_xml in &self.nodes {
            if node_xml.elem_type != ElemType::BehaviourNode {
                return Err(XmlError::UnexpectedRecord {
                    found: node_xml.elem_type.label(),
                    context: "behaviour tree node list",
                });
            }
            let id = remap[&node_xml.id].clone();
            let rect = Rect::at(node_xml.pos_x, node_xml.pos_y);
            let mut node = match &node_xml.sub_element {
                Some(sub_xml) => {
                    let mut sub = sub_xml.to_element(policy)?;
                    let name = tree.namer_mut().add_name(sub.id().clone(), &node_xml.name);
                    sub.set_name(name);
                    BehaviourNode::with_sub_element(id, sub, rect)
                }
                None => {
                    let name = tree.namer_mut().add_name(id.clone(), &node_xml.name);
                    BehaviourNode::new(
                        id,
                        name,
                        parse_behaviour_kind(node_xml.second_type.as_deref())?,
                        rect,
                    )
                }
            };
            node.is_root = node_xml.is_root;
            node.is_random = node_xml.is_random;
            node.n_property = node_xml.n_property;
            tree.insert_node(node);
        }
        for transition_xml in &self.transitions {
            let mut connection = transition_xml.to_transition(policy, &remap)?;
            let name = tree
                .namer_mut()
                .add_name(connection.id().clone(), transition_xml.name.as_str());
            connection.set_name(name);
            tree.insert_connection(connection);
        }
        Ok(tree)
    }

    fn to_us(&self, policy: IdPolicy) -> Result<UtilitySystem, XmlError> {
        let mut system = UtilitySystem::from_parts(
            policy.id_for(&self.id),
            self.name.clone(),
            Rect::at(self.pos_x, self.pos_y),
        );
        let remap = self.node_remap(policy);
        for node_xml in &self.nodes {
            if node_xml.elem_type != ElemType::UtilityNode {
                return Err(XmlError::UnexpectedRecord {
                    found: node_xml.elem_type.label(),
                    context: "utility system node list",
                });
            }
            let id = remap[&node_xml.id].clone();
            let rect = Rect::at(node_xml.pos_x, node_xml.pos_y);
            let mut node = match &node_xml.sub_element {
                Some(sub_xml) => {
                    let mut sub = sub_xml.to_element(policy)?;
                    let name = system.namer_mut().add_name(sub.id().clone(), &node_xml.name);
                    sub.set_name(name);
                    UtilityNode::with_sub_element(id, sub, rect)
                }
                None => {
                    let name = system.namer_mut().add_name(id.clone(), &node_xml.name);
                    UtilityNode::new(
                        id,
                        name,
                        parse_utility_kind(node_xml.second_type.as_deref())?,
                        rect,
                    )
                }
            };
            node.fusion = parse_fusion_kind(node_xml.fusion_type.as_deref());
            node.curve = parse_curve_kind(node_xml.curve_type.as_deref());
            node.variable_min = node_xml.variable_min;
            node.variable_max = node_xml.variable_max;
            node.slope = node_xml.slope;
            node.exp = node_xml.exp;
            node.displ_x = node_xml.displ_x;
            node.displ_y = node_xml.displ_y;
            system.insert_node(node);
        }
        for transition_xml in &self.transitions {
            let mut connection = transition_xml.to_transition(policy, &remap)?;
            let name = system
                .namer_mut()
                .add_name(connection.id().clone(), transition_xml.name.as_str());
            connection.set_name(name);
            system.insert_connection(connection);
        }
        Ok(system)
    }
}

/// Extracts a clipboard fragment: the selected nodes plus every edge whose two
/// endpoints are both in the selection.
pub fn copy_fragment(element: &Element, selection: &[ElementId]) -> XmlElement {
    let mut fragment = XmlElement::record(
        element.elem_type(),
        element.id().to_string(),
        element.name().to_string(),
    );
    match element {
        Element::Fsm(fsm) => {
            fragment.nodes = fsm
                .states()
                .iter()
                .filter(|s| selection.contains(s.id()))
                .map(StateNode::to_xml)
                .collect();
            fragment.transitions = edge_subset(fsm.transitions(), selection);
        }
        Element::BehaviourTree(tree) => {
            fragment.nodes = tree
                .nodes()
                .iter()
                .filter(|n| selection.contains(n.id()))
                .map(BehaviourNode::to_xml)
                .collect();
            fragment.transitions = edge_subset(tree.connections(), selection);
        }
        Element::UtilitySystem(system) => {
            fragment.nodes = system
                .nodes()
                .iter()
                .filter(|n| selection.contains(n.id()))
                .map(UtilityNode::to_xml)
                .collect();
            fragment.transitions = edge_subset(system.connections(), selection);
        }
    }
    fragment
}

fn edge_subset(transitions: &[Transition], selection: &[ElementId]) -> Vec<XmlElement> {
    transitions
        .iter()
        .filter(|t| selection.contains(t.from()) && selection.contains(t.to()))
        .map(Transition::to_xml)
        .collect()
}

/// Pastes a copied fragment into a container of the same kind.
///
/// Every pasted entity receives a fresh identifier and re-registers its
/// display name through the target's namer, so repeated pastes produce
/// disjoint identifiers and names while keeping the fragment's internal
/// topology. Returns the identifiers of the pasted nodes.
pub fn paste_into(target: &mut Element, fragment: &XmlElement) -> Result<Vec<ElementId>, XmlError> {
    if fragment.elem_type != target.elem_type() {
        return Err(XmlError::FragmentMismatch {
            target: target.elem_type().label(),
            found: fragment.elem_type.label(),
        });
    }
    let converted = fragment.to_element(IdPolicy::Reissue)?;
    let mut pasted = Vec::new();
    match (target, converted) {
        (Element::Fsm(dst), Element::Fsm(src)) => {
            let already_has_entry = dst.has_entry_state();
            let (states, transitions) = src.into_parts();
            for mut node in states {
                if already_has_entry && node.kind == StateKind::Entry {
                    node.kind = StateKind::Default;
                }
                let key = node.name_key().clone();
                let assigned = dst.namer_mut().add_name(key, node.name());
                node.set_name(assigned);
                pasted.push(node.id().clone());
                dst.insert_state(node);
            }
            for mut transition in transitions {
                let assigned = dst
                    .namer_mut()
                    .add_name(transition.id().clone(), transition.name());
                transition.set_name(assigned);
                dst.insert_transition(transition);
            }
        }
        (Element::BehaviourTree(dst), Element::BehaviourTree(src)) => {
            let already_has_root = dst.has_root();
            let (nodes, connections) = src.into_parts();
            for mut node in nodes {
                if already_has_root {
                    node.is_root = false;
                }
                let key = node.name_key().clone();
                let assigned = dst.namer_mut().add_name(key, node.name());
                node.set_name(assigned);
                pasted.push(node.id().clone());
                dst.insert_node(node);
            }
            for mut connection in connections {
                let assigned = dst
                    .namer_mut()
                    .add_name(connection.id().clone(), connection.name());
                connection.set_name(assigned);
                dst.insert_connection(connection);
            }
        }
        (Element::UtilitySystem(dst), Element::UtilitySystem(src)) => {
            let (nodes, connections) = src.into_parts();
            for mut node in nodes {
                let key = node.name_key().clone();
                let assigned = dst.namer_mut().add_name(key, node.name());
                node.set_name(assigned);
                pasted.push(node.id().clone());
                dst.insert_node(node);
            }
            for mut connection in connections {
                let assigned = dst
                    .namer_mut()
                    .add_name(connection.id().clone(), connection.name());
                connection.set_name(assigned);
                dst.insert_connection(connection);
            }
        }
        _ => unreachable!("fragment kind checked above"),
    }
    Ok(pasted)
}

fn parse_state_kind(raw: Option<&str>) -> StateKind {
    match raw {
        Some("Entry") => StateKind::Entry,
        Some("Default") => StateKind::Default,
        _ => StateKind::Unconnected,
    }
}

fn parse_behaviour_kind(raw: Option<&str>) -> Result<BehaviourKind, XmlError> {
    match raw {
        Some("Sequence") => Ok(BehaviourKind::Sequence),
        Some("Selector") => Ok(BehaviourKind::Selector),
        Some("Leaf") => Ok(BehaviourKind::Leaf),
        Some("LoopN") => Ok(BehaviourKind::LoopN),
        Some("LoopUntilFail") => Ok(BehaviourKind::LoopUntilFail),
        Some("Inverter") => Ok(BehaviourKind::Inverter),
        Some("DelayTimer") => Ok(BehaviourKind::DelayTimer),
        Some("Succeeder") => Ok(BehaviourKind::Succeeder),
        Some("Conditional") => Ok(BehaviourKind::Conditional),
        other => Err(XmlError::Malformed(format!(
            "unknown behaviour node type '{}'",
            other.unwrap_or("<missing>")
        ))),
    }
}

fn parse_utility_kind(raw: Option<&str>) -> Result<UtilityKind, XmlError> {
    match raw {
        Some("Variable") => Ok(UtilityKind::Variable),
        Some("Fusion") => Ok(UtilityKind::Fusion),
        Some("Action") => Ok(UtilityKind::Action),
        Some("Curve") => Ok(UtilityKind::Curve),
        other => Err(XmlError::Malformed(format!(
            "unknown utility node type '{}'",
            other.unwrap_or("<missing>")
        ))),
    }
}

fn parse_fusion_kind(raw: Option<&str>) -> FusionKind {
    match raw {
        Some("GetMax") => FusionKind::GetMax,
        Some("GetMin") => FusionKind::GetMin,
        _ => FusionKind::Weighted,
    }
}

fn parse_curve_kind(raw: Option<&str>) -> CurveKind {
    match raw {
        Some("Exponential") => CurveKind::Exponential,
        Some("LinearParts") => CurveKind::LinearParts,
        _ => CurveKind::Linear,
    }
}
