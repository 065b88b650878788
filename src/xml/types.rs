use serde::{Deserialize, Serialize};

use crate::model::{PerceptionKind, ReturnValue};

/// Discriminator for what an [`XmlElement`] record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElemType {
    #[serde(rename = "FSM")]
    Fsm,
    #[serde(rename = "BT")]
    BehaviourTree,
    #[serde(rename = "US")]
    UtilitySystem,
    State,
    BehaviourNode,
    UtilityNode,
    Transition,
}

impl ElemType {
    pub fn label(&self) -> &'static str {
        match self {
            ElemType::Fsm => "FSM",
            ElemType::BehaviourTree => "Behaviour Tree",
            ElemType::UtilitySystem => "Utility System",
            ElemType::State => "State",
            ElemType::BehaviourNode => "Behaviour Node",
            ElemType::UtilityNode => "Utility Node",
            ElemType::Transition => "Transition",
        }
    }
}

fn one() -> f32 {
    1.0
}

fn is_one(value: &f32) -> bool {
    *value == 1.0
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The flat, serializable projection of any container, node or transition.
///
/// This single record type is the interchange format for save files and
/// clipboard fragments. Edges reference their endpoints through identifier
/// attributes, never through nesting, so a document can be reloaded with one
/// internal identifier-remapping pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "element")]
pub struct XmlElement {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@elemType")]
    pub elem_type: ElemType,
    /// Node subtype discriminator: state/behaviour/utility kind, as written.
    #[serde(rename = "@secondType", default, skip_serializing_if = "Option::is_none")]
    pub second_type: Option<String>,
    #[serde(rename = "@posX", default)]
    pub pos_x: f32,
    #[serde(rename = "@posY", default)]
    pub pos_y: f32,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@fromId", default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    #[serde(rename = "@toId", default, skip_serializing_if = "Option::is_none")]
    pub to_id: Option<String>,
    #[serde(rename = "@weight", default = "one", skip_serializing_if = "is_one")]
    pub weight: f32,
    #[serde(rename = "@isRoot", default, skip_serializing_if = "is_false")]
    pub is_root: bool,
    #[serde(rename = "@isRandom", default, skip_serializing_if = "is_false")]
    pub is_random: bool,
    #[serde(rename = "@nProperty", default, skip_serializing_if = "is_zero")]
    pub n_property: f32,
    #[serde(rename = "@fusionType", default, skip_serializing_if = "Option::is_none")]
    pub fusion_type: Option<String>,
    #[serde(rename = "@curveType", default, skip_serializing_if = "Option::is_none")]
    pub curve_type: Option<String>,
    #[serde(rename = "@variableMin", default, skip_serializing_if = "is_zero")]
    pub variable_min: f32,
    #[serde(rename = "@variableMax", default = "one", skip_serializing_if = "is_one")]
    pub variable_max: f32,
    #[serde(rename = "@slope", default = "one", skip_serializing_if = "is_one")]
    pub slope: f32,
    #[serde(rename = "@exp", default = "one", skip_serializing_if = "is_one")]
    pub exp: f32,
    #[serde(rename = "@displX", default, skip_serializing_if = "is_zero")]
    pub displ_x: f32,
    #[serde(rename = "@displY", default, skip_serializing_if = "is_zero")]
    pub displ_y: f32,
    #[serde(rename = "perception", default, skip_serializing_if = "Option::is_none")]
    pub perception: Option<XmlPerception>,
    #[serde(rename = "subElement", default, skip_serializing_if = "Option::is_none")]
    pub sub_element: Option<Box<XmlElement>>,
    #[serde(rename = "node", default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<XmlElement>,
    #[serde(rename = "transition", default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<XmlElement>,
}

impl XmlElement {
    /// An empty record of the given type; conversion code fills in the rest.
    pub(crate) fn record(elem_type: ElemType, id: String, name: String) -> Self {
        Self {
            name,
            elem_type,
            second_type: None,
            pos_x: 0.0,
            pos_y: 0.0,
            id,
            from_id: None,
            to_id: None,
            weight: 1.0,
            is_root: false,
            is_random: false,
            n_property: 0.0,
            fusion_type: None,
            curve_type: None,
            variable_min: 0.0,
            variable_max: 1.0,
            slope: 1.0,
            exp: 1.0,
            displ_x: 0.0,
            displ_y: 0.0,
            perception: None,
            sub_element: None,
            nodes: Vec::new(),
            transitions: Vec::new(),
        }
    }
}

/// Serialized form of a perception expression subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "perception")]
pub struct XmlPerception {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: PerceptionKind,
    #[serde(rename = "@timer", default, skip_serializing_if = "is_zero")]
    pub timer: f32,
    #[serde(rename = "@elemName", default, skip_serializing_if = "Option::is_none")]
    pub elem_name: Option<String>,
    #[serde(rename = "@stateName", default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(rename = "@status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReturnValue>,
    #[serde(rename = "@customName", default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(rename = "firstChild", default, skip_serializing_if = "Option::is_none")]
    pub first_child: Option<Box<XmlPerception>>,
    #[serde(rename = "secondChild", default, skip_serializing_if = "Option::is_none")]
    pub second_child: Option<Box<XmlPerception>>,
}

impl XmlPerception {
    pub(crate) fn record(id: String, kind: PerceptionKind) -> Self {
        Self {
            id,
            kind,
            timer: 0.0,
            elem_name: None,
            state_name: None,
            status: None,
            custom_name: None,
            first_child: None,
            second_child: None,
        }
    }
}
