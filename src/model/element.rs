use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{BehaviourTree, Fsm, Issue, UtilitySystem};
use crate::naming::UniqueNamer;

/// Process-unique identifier token assigned at creation.
///
/// Identifiers are the sole cross-reference mechanism between entities:
/// transitions point at their endpoint nodes by identifier, never by ownership,
/// and serialized documents are stitched back together by identifier remapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Issues a new identifier, unique within the process.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ElementId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placement rectangle of an entity on the authoring canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A node-sized rectangle at the given canvas position.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, Self::NODE_WIDTH, Self::NODE_HEIGHT)
    }

    pub const NODE_WIDTH: f32 = 150.0;
    pub const NODE_HEIGHT: f32 = 90.0;
    pub const TRANSITION_WIDTH: f32 = 200.0;
    pub const TRANSITION_HEIGHT: f32 = 70.0;
}

impl Default for Rect {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// A container graph: the unit of authoring, saving and code export.
///
/// Nodes may host a nested `Element` as a sub-element, which is how hierarchies
/// of machines are composed. A container exclusively owns its nodes and
/// connections; dropping it drops every descendant.
#[derive(Debug, Clone)]
pub enum Element {
    Fsm(Fsm),
    BehaviourTree(BehaviourTree),
    UtilitySystem(UtilitySystem),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Fsm(e) => e.id(),
            Element::BehaviourTree(e) => e.id(),
            Element::UtilitySystem(e) => e.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Fsm(e) => e.name(),
            Element::BehaviourTree(e) => e.name(),
            Element::UtilitySystem(e) => e.name(),
        }
    }

    pub fn set_name(&mut self, name: String) {
        match self {
            Element::Fsm(e) => e.set_name(name),
            Element::BehaviourTree(e) => e.set_name(name),
            Element::UtilitySystem(e) => e.set_name(name),
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Element::Fsm(e) => e.rect,
            Element::BehaviourTree(e) => e.rect,
            Element::UtilitySystem(e) => e.rect,
        }
    }

    /// The container type, properly written.
    pub fn type_label(&self) -> &'static str {
        match self {
            Element::Fsm(_) => "FSM",
            Element::BehaviourTree(_) => "Behaviour Tree",
            Element::UtilitySystem(_) => "Utility System",
        }
    }

    pub fn namer(&self) -> &UniqueNamer {
        match self {
            Element::Fsm(e) => e.namer(),
            Element::BehaviourTree(e) => e.namer(),
            Element::UtilitySystem(e) => e.namer(),
        }
    }

    /// Recursive flatten of every nested container reachable through this
    /// element's portal nodes, deepest first.
    pub fn sub_elems(&self) -> Vec<&Element> {
        match self {
            Element::Fsm(e) => e.sub_elems(),
            Element::BehaviourTree(e) => e.sub_elems(),
            Element::UtilitySystem(e) => e.sub_elems(),
        }
    }

    /// Structural issues of this container alone, ignoring nested ones.
    pub fn own_issues(&self) -> Vec<Issue> {
        match self {
            Element::Fsm(e) => e.issues(),
            Element::BehaviourTree(e) => e.issues(),
            Element::UtilitySystem(e) => e.issues(),
        }
    }

    /// Structural issues of this container and every nested sub-element,
    /// recomputed from scratch on every call and sorted by severity.
    pub fn issues(&self) -> Vec<Issue> {
        let mut all = self.own_issues();
        for sub in self.sub_elems() {
            all.extend(sub.own_issues());
        }
        crate::model::validate::sort_by_priority(&mut all);
        all
    }
}
