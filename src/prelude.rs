//! Prelude module for convenient imports
//!
//! Re-exports the types needed for the common author / validate / save /
//! export loop, so callers can bring the core API in with one `use`.
//!
//! # Example
//!
//! ```rust,no_run
//! use sekkei::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = BehaviourTree::new("Forager", Rect::default());
//! let root = tree.add_node(BehaviourKind::Selector, "Root", Rect::at(0.0, 0.0));
//! let eat = tree.add_node(BehaviourKind::Leaf, "Eat", Rect::at(0.0, 200.0));
//! tree.add_connection(&root, &eat)?;
//!
//! let element = Element::BehaviourTree(tree);
//! let script = Generator::builtin().generate(&element)?;
//! println!("{}", script.main().contents);
//! # Ok(())
//! # }
//! ```

// Graph containers and nodes
pub use crate::model::{
    BehaviourKind, BehaviourNode, BehaviourTree, CurveKind, Element, ElementId, Fsm, FusionKind,
    Issue, Perception, PerceptionData, PerceptionKind, Rect, ReturnValue, StateKind, StateNode,
    Transition, UtilityKind, UtilityNode, UtilitySystem,
};

// Naming registry
pub use crate::naming::UniqueNamer;

// Serialization and clipboard
pub use crate::xml::{copy_fragment, paste_into, IdPolicy, XmlElement};

// Code export
pub use crate::codegen::{GeneratedScript, Generator};

// Errors
pub use crate::error::{GenerateError, GraphError, XmlError};
