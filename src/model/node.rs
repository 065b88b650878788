use serde::{Deserialize, Serialize};

use crate::model::{Element, ElementId, Rect};

/// FSM state classification. `Entry` is where execution starts; `Unconnected`
/// is recomputed for non-entry states with no incident transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    Default,
    Entry,
    Unconnected,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Default => "Default",
            StateKind::Entry => "Entry",
            StateKind::Unconnected => "Unconnected",
        }
    }
}

/// A state placed inside an FSM, optionally a portal into a nested container.
#[derive(Debug, Clone)]
pub struct StateNode {
    id: ElementId,
    name: String,
    pub kind: StateKind,
    pub rect: Rect,
    pub sub_element: Option<Box<Element>>,
}

impl StateNode {
    pub(crate) fn new(id: ElementId, name: String, rect: Rect) -> Self {
        Self {
            id,
            name,
            kind: StateKind::Unconnected,
            rect,
            sub_element: None,
        }
    }

    pub(crate) fn with_sub_element(id: ElementId, sub: Element, rect: Rect) -> Self {
        let name = sub.name().to_string();
        Self {
            id,
            name,
            kind: StateKind::Unconnected,
            rect,
            sub_element: Some(Box::new(sub)),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Display name. A portal node shares its name with its sub-element.
    pub fn name(&self) -> &str {
        match &self.sub_element {
            Some(sub) => sub.name(),
            None => &self.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if let Some(sub) = &mut self.sub_element {
            sub.set_name(name.clone());
        }
        self.name = name;
    }

    /// The node type, properly written; portals report their sub-element type.
    pub fn type_label(&self) -> &'static str {
        match &self.sub_element {
            Some(sub) => sub.type_label(),
            None => self.kind.as_str(),
        }
    }

    /// The identifier the owning namer keys this node's name under: the
    /// sub-element's for portals, the node's own otherwise.
    pub(crate) fn name_key(&self) -> &ElementId {
        match &self.sub_element {
            Some(sub) => sub.id(),
            None => &self.id,
        }
    }
}

/// Behaviour tree node classification. Everything past `Leaf` is a decorator:
/// it wraps exactly one child and modifies its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviourKind {
    Sequence,
    Selector,
    Leaf,
    LoopN,
    LoopUntilFail,
    Inverter,
    DelayTimer,
    Succeeder,
    Conditional,
}

impl BehaviourKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviourKind::Sequence => "Sequence",
            BehaviourKind::Selector => "Selector",
            BehaviourKind::Leaf => "Leaf",
            BehaviourKind::LoopN => "LoopN",
            BehaviourKind::LoopUntilFail => "LoopUntilFail",
            BehaviourKind::Inverter => "Inverter",
            BehaviourKind::DelayTimer => "DelayTimer",
            BehaviourKind::Succeeder => "Succeeder",
            BehaviourKind::Conditional => "Conditional",
        }
    }

    /// Sequences and selectors take any number of children.
    pub fn is_composite(&self) -> bool {
        matches!(self, BehaviourKind::Sequence | BehaviourKind::Selector)
    }

    /// Decorators are constrained to at most one outgoing connection.
    pub fn is_decorator(&self) -> bool {
        matches!(
            self,
            BehaviourKind::LoopN
                | BehaviourKind::LoopUntilFail
                | BehaviourKind::Inverter
                | BehaviourKind::DelayTimer
                | BehaviourKind::Succeeder
                | BehaviourKind::Conditional
        )
    }

    /// Prefix used for generated decorator variable names.
    pub(crate) fn decorator_prefix(&self) -> Option<&'static str> {
        match self {
            BehaviourKind::LoopN => Some("LoopN"),
            BehaviourKind::LoopUntilFail => Some("LoopUntilFail"),
            BehaviourKind::Inverter => Some("Inverter"),
            BehaviourKind::DelayTimer => Some("Timer"),
            BehaviourKind::Succeeder => Some("Succeeder"),
            BehaviourKind::Conditional => Some("Conditional"),
            _ => None,
        }
    }
}

/// A node placed inside a behaviour tree.
#[derive(Debug, Clone)]
pub struct BehaviourNode {
    id: ElementId,
    name: String,
    pub kind: BehaviourKind,
    pub rect: Rect,
    /// Exactly one root per tree is the intended invariant; violations are
    /// reported as issues, not enforced.
    pub is_root: bool,
    /// Sequences only: execute children in random order.
    pub is_random: bool,
    /// Loop count for `LoopN`, delay in seconds for `DelayTimer`.
    pub n_property: f32,
    pub sub_element: Option<Box<Element>>,
}

impl BehaviourNode {
    pub(crate) fn new(id: ElementId, name: String, kind: BehaviourKind, rect: Rect) -> Self {
        Self {
            id,
            name,
            kind,
            rect,
            is_root: false,
            is_random: false,
            n_property: 0.0,
            sub_element: None,
        }
    }

    pub(crate) fn with_sub_element(id: ElementId, sub: Element, rect: Rect) -> Self {
        let name = sub.name().to_string();
        Self {
            id,
            name,
            kind: BehaviourKind::Leaf,
            rect,
            is_root: false,
            is_random: false,
            n_property: 0.0,
            sub_element: Some(Box::new(sub)),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        match &self.sub_element {
            Some(sub) => sub.name(),
            None => &self.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if let Some(sub) = &mut self.sub_element {
            sub.set_name(name.clone());
        }
        self.name = name;
    }

    pub fn type_label(&self) -> &'static str {
        match &self.sub_element {
            Some(sub) => sub.type_label(),
            None => self.kind.as_str(),
        }
    }

    pub(crate) fn name_key(&self) -> &ElementId {
        match &self.sub_element {
            Some(sub) => sub.id(),
            None => &self.id,
        }
    }
}

/// Utility system node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilityKind {
    Variable,
    Fusion,
    Action,
    Curve,
}

impl UtilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilityKind::Variable => "Variable",
            UtilityKind::Fusion => "Fusion",
            UtilityKind::Action => "Action",
            UtilityKind::Curve => "Curve",
        }
    }
}

/// How a fusion node combines its incoming factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionKind {
    Weighted,
    GetMax,
    GetMin,
}

impl FusionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionKind::Weighted => "Weighted",
            FusionKind::GetMax => "GetMax",
            FusionKind::GetMin => "GetMin",
        }
    }
}

/// Shape of a curve node's response function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    Linear,
    Exponential,
    LinearParts,
}

impl CurveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Linear => "Linear",
            CurveKind::Exponential => "Exponential",
            CurveKind::LinearParts => "LinearParts",
        }
    }
}

/// A node placed inside a utility system.
#[derive(Debug, Clone)]
pub struct UtilityNode {
    id: ElementId,
    name: String,
    pub kind: UtilityKind,
    pub rect: Rect,
    /// Combination mode, read when `kind` is `Fusion`.
    pub fusion: FusionKind,
    /// Curve shape, read when `kind` is `Curve`.
    pub curve: CurveKind,
    /// Bounds for `Variable` nodes.
    pub variable_min: f32,
    pub variable_max: f32,
    /// Shape parameters for `Curve` nodes.
    pub slope: f32,
    pub exp: f32,
    pub displ_x: f32,
    pub displ_y: f32,
    pub sub_element: Option<Box<Element>>,
}

impl UtilityNode {
    pub(crate) fn new(id: ElementId, name: String, kind: UtilityKind, rect: Rect) -> Self {
        Self {
            id,
            name,
            kind,
            rect,
            fusion: FusionKind::Weighted,
            curve: CurveKind::Linear,
            variable_min: 0.0,
            variable_max: 1.0,
            slope: 1.0,
            exp: 1.0,
            displ_x: 0.0,
            displ_y: 0.0,
            sub_element: None,
        }
    }

    pub(crate) fn with_sub_element(id: ElementId, sub: Element, rect: Rect) -> Self {
        let name = sub.name().to_string();
        let mut node = Self::new(id, name, UtilityKind::Action, rect);
        node.sub_element = Some(Box::new(sub));
        node
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        match &self.sub_element {
            Some(sub) => sub.name(),
            None => &self.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if let Some(sub) = &mut self.sub_element {
            sub.set_name(name.clone());
        }
        self.name = name;
    }

    pub fn type_label(&self) -> &'static str {
        match &self.sub_element {
            Some(sub) => sub.type_label(),
            None => self.kind.as_str(),
        }
    }

    pub(crate) fn name_key(&self) -> &ElementId {
        match &self.sub_element {
            Some(sub) => sub.id(),
            None => &self.id,
        }
    }
}
