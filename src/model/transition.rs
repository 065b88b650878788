use crate::model::{ElementId, Perception, PerceptionKind, Rect};

/// A directed edge between two nodes of the same container.
///
/// Transitions hold non-owning references to their endpoints: identifiers
/// only, never responsible for the nodes' lifetimes. FSM transitions own a
/// root [`Perception`]; utility system connections carry a `weight` instead.
#[derive(Debug, Clone)]
pub struct Transition {
    id: ElementId,
    name: String,
    pub rect: Rect,
    from: ElementId,
    to: ElementId,
    /// Contribution weight when the target is a weighted fusion node.
    pub weight: f32,
    pub perception: Option<Perception>,
}

impl Transition {
    /// A plain connection, as used by behaviour trees and utility systems.
    pub(crate) fn new(id: ElementId, name: String, from: ElementId, to: ElementId) -> Self {
        Self {
            id,
            name,
            rect: Rect::new(0.0, 0.0, Rect::TRANSITION_WIDTH, Rect::TRANSITION_HEIGHT),
            from,
            to,
            weight: 1.0,
            perception: None,
        }
    }

    /// An FSM transition, guarded by a fresh `Push` perception.
    pub(crate) fn with_perception(
        id: ElementId,
        name: String,
        from: ElementId,
        to: ElementId,
    ) -> Self {
        let mut transition = Self::new(id, name, from, to);
        transition.perception = Some(Perception::new(PerceptionKind::Push));
        transition
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn from(&self) -> &ElementId {
        &self.from
    }

    pub fn to(&self) -> &ElementId {
        &self.to
    }

    /// Whether this transition touches the given node.
    pub fn is_incident_to(&self, node: &ElementId) -> bool {
        &self.from == node || &self.to == node
    }
}
