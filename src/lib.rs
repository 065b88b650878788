//! # Sekkei - Behaviour Graph Authoring and Export Engine
//!
//! **Sekkei** is the document engine behind a node-based editor for game AI:
//! finite state machines, behaviour trees and utility systems are authored as
//! graphs, saved as XML documents, and exported as C# scripts targeting the
//! runtime behaviour engines.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: Build an [`Element`](model::Element) (an FSM, behaviour
//!     tree or utility system) by adding nodes and connections. Nodes can be
//!     portals into nested elements, forming hierarchies of machines.
//! 2.  **Validate**: Query [`Element::issues`](model::Element::issues) at any
//!     time; issues are recomputed from scratch, never cached.
//! 3.  **Save / Load**: Round-trip the whole hierarchy through XML with
//!     [`Element::save_xml`](model::Element::save_xml) and
//!     [`Element::load_xml`](model::Element::load_xml). The same machinery
//!     drives copy/paste between containers.
//! 4.  **Export**: Run a [`Generator`](codegen::Generator) over the element to
//!     produce the C# scripts for the runtime engines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sekkei::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut fsm = Fsm::new("Guard", Rect::default());
//! let idle = fsm.add_state("Idle", Rect::at(100.0, 100.0));
//! let chase = fsm.add_state("Chase", Rect::at(400.0, 100.0));
//! let spotted = fsm.add_transition(&idle, &chase)?;
//! let _ = fsm.rename_transition(&spotted, "Spotted");
//!
//! let element = Element::Fsm(fsm);
//! assert!(element.issues().is_empty());
//!
//! element.save_xml("Guard_savedData.xml".as_ref())?;
//! let script = Generator::builtin().generate(&element)?;
//! script.write_to("scripts".as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod codegen;
pub mod error;
pub mod model;
pub mod naming;
pub mod prelude;
pub mod xml;
