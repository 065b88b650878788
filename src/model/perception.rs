use serde::{Deserialize, Serialize};

use crate::model::ElementId;

/// Which condition variant a perception node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerceptionKind {
    Push,
    Timer,
    Value,
    IsInState,
    BehaviourTreeStatus,
    And,
    Or,
    Custom,
}

impl PerceptionKind {
    pub const ALL: [PerceptionKind; 8] = [
        PerceptionKind::Push,
        PerceptionKind::Timer,
        PerceptionKind::Value,
        PerceptionKind::IsInState,
        PerceptionKind::BehaviourTreeStatus,
        PerceptionKind::And,
        PerceptionKind::Or,
        PerceptionKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerceptionKind::Push => "Push",
            PerceptionKind::Timer => "Timer",
            PerceptionKind::Value => "Value",
            PerceptionKind::IsInState => "IsInState",
            PerceptionKind::BehaviourTreeStatus => "BehaviourTreeStatus",
            PerceptionKind::And => "And",
            PerceptionKind::Or => "Or",
            PerceptionKind::Custom => "Custom",
        }
    }
}

/// Runtime result reported by the external engines, referenced by
/// `BehaviourTreeStatus` perceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnValue {
    Succeed,
    Failed,
    Running,
}

impl ReturnValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnValue::Succeed => "Succeed",
            ReturnValue::Failed => "Failed",
            ReturnValue::Running => "Running",
        }
    }
}

/// Payload of a perception node. Leaf kinds carry their parameters; `And` and
/// `Or` compose two child perceptions.
#[derive(Debug, Clone, PartialEq)]
pub enum PerceptionData {
    Push,
    Timer { seconds: f32 },
    Value,
    IsInState { fsm: String, state: String },
    BehaviourTreeStatus { tree: String, status: ReturnValue },
    And { left: Box<Perception>, right: Box<Perception> },
    Or { left: Box<Perception>, right: Box<Perception> },
    Custom { name: String },
}

impl PerceptionData {
    fn default_for(kind: PerceptionKind) -> Self {
        match kind {
            PerceptionKind::Push => PerceptionData::Push,
            PerceptionKind::Timer => PerceptionData::Timer { seconds: 1.0 },
            PerceptionKind::Value => PerceptionData::Value,
            PerceptionKind::IsInState => PerceptionData::IsInState {
                fsm: String::new(),
                state: String::new(),
            },
            PerceptionKind::BehaviourTreeStatus => PerceptionData::BehaviourTreeStatus {
                tree: String::new(),
                status: ReturnValue::Succeed,
            },
            PerceptionKind::And => PerceptionData::And {
                left: Box::new(Perception::new(PerceptionKind::Push)),
                right: Box::new(Perception::new(PerceptionKind::Push)),
            },
            PerceptionKind::Or => PerceptionData::Or {
                left: Box::new(Perception::new(PerceptionKind::Push)),
                right: Box::new(Perception::new(PerceptionKind::Push)),
            },
            PerceptionKind::Custom => PerceptionData::Custom {
                name: String::new(),
            },
        }
    }
}

/// A boolean condition gating an FSM transition: a small recursive expression
/// tree authored here and evaluated by the external runtime engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Perception {
    id: ElementId,
    data: PerceptionData,
}

impl Perception {
    /// A fresh perception of the given kind with default parameters; `And` and
    /// `Or` start out with two `Push` children.
    pub fn new(kind: PerceptionKind) -> Self {
        Self {
            id: ElementId::fresh(),
            data: PerceptionData::default_for(kind),
        }
    }

    pub(crate) fn from_parts(id: ElementId, data: PerceptionData) -> Self {
        Self { id, data }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> PerceptionKind {
        match &self.data {
            PerceptionData::Push => PerceptionKind::Push,
            PerceptionData::Timer { .. } => PerceptionKind::Timer,
            PerceptionData::Value => PerceptionKind::Value,
            PerceptionData::IsInState { .. } => PerceptionKind::IsInState,
            PerceptionData::BehaviourTreeStatus { .. } => PerceptionKind::BehaviourTreeStatus,
            PerceptionData::And { .. } => PerceptionKind::And,
            PerceptionData::Or { .. } => PerceptionKind::Or,
            PerceptionData::Custom { .. } => PerceptionKind::Custom,
        }
    }

    pub fn data(&self) -> &PerceptionData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut PerceptionData {
        &mut self.data
    }

    /// Recursive search for the subtree node with the given identifier.
    pub fn find(&self, id: &ElementId) -> Option<&Perception> {
        if &self.id == id {
            return Some(self);
        }
        match &self.data {
            PerceptionData::And { left, right } | PerceptionData::Or { left, right } => {
                left.find(id).or_else(|| right.find(id))
            }
            _ => None,
        }
    }

    /// Replaces the kind of the subtree node with identifier `target`,
    /// in place. An `And`↔`Or` change keeps both children; any other change
    /// resets the node to a fresh leaf of the new kind. Returns whether the
    /// target was found.
    pub fn change_kind(&mut self, target: &ElementId, kind: PerceptionKind) -> bool {
        if &self.id == target {
            self.retag(kind);
            return true;
        }
        match &mut self.data {
            PerceptionData::And { left, right } | PerceptionData::Or { left, right } => {
                left.change_kind(target, kind) || right.change_kind(target, kind)
            }
            _ => false,
        }
    }

    fn retag(&mut self, kind: PerceptionKind) {
        if self.kind() == kind {
            return;
        }
        let compatible = matches!(
            (&self.data, kind),
            (PerceptionData::And { .. }, PerceptionKind::Or)
                | (PerceptionData::Or { .. }, PerceptionKind::And)
        );
        if compatible {
            let (left, right) = match std::mem::replace(&mut self.data, PerceptionData::Push) {
                PerceptionData::And { left, right } | PerceptionData::Or { left, right } => {
                    (left, right)
                }
                _ => unreachable!("compatible retag requires a composite"),
            };
            self.data = match kind {
                PerceptionKind::And => PerceptionData::And { left, right },
                PerceptionKind::Or => PerceptionData::Or { left, right },
                _ => unreachable!(),
            };
        } else {
            self.data = PerceptionData::default_for(kind);
        }
    }
}
