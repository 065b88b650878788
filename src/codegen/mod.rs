//! C# script generation for the runtime behaviour engines.
//!
//! A generation run takes one container, splices its graph into a script
//! template and returns the resulting source files. Nested sub-machines are
//! emitted as extra `Create*` methods chained into the same script; `Custom`
//! perceptions referenced by the graph each get a stub script of their own.
//!
//! Generation refuses to run while the container has outstanding validation
//! issues, matching the editor's export button.

mod bt;
mod fsm;
mod templates;

pub use templates::{BuiltinTemplates, DirTemplates, TemplateSource};

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::GenerateError;
use crate::model::Element;
use crate::naming::UniqueNamer;

pub(crate) const TAB: &str = "    ";
const ACTION_ENDING: &str = "Action";
const CHECK_ENDING: &str = "SuccessCheck";
const SUB_FSM_ENDING: &str = "_SubFSM";
const SUB_BT_ENDING: &str = "_SubBT";

/// One generated source file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

/// The output of one generation run: the main script first, followed by the
/// custom perception stubs it references.
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedScript {
    pub fn main(&self) -> &GeneratedFile {
        &self.files[0]
    }

    pub fn write_to(&self, dir: &Path) -> Result<(), GenerateError> {
        fs::create_dir_all(dir).map_err(|e| GenerateError::WriteFailed {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        for file in &self.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.contents).map_err(|e| GenerateError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Drives template expansion for one container at a time.
pub struct Generator {
    templates: Box<dyn TemplateSource>,
}

impl Generator {
    pub fn new(templates: Box<dyn TemplateSource>) -> Self {
        Self { templates }
    }

    /// A generator over the stock templates.
    pub fn builtin() -> Self {
        Self::new(Box::new(BuiltinTemplates))
    }

    pub fn generate(&self, element: &Element) -> Result<GeneratedScript, GenerateError> {
        let issues = element.issues();
        if !issues.is_empty() {
            warn!(
                element = element.name(),
                count = issues.len(),
                "refusing to generate code with outstanding issues"
            );
            return Err(GenerateError::UnresolvedIssues {
                element: element.name().to_string(),
                count: issues.len(),
            });
        }

        let mut run = RunContext::new(self.templates.as_ref());
        let script_name = clean_name(element.name());
        let mut subs: Vec<SubRef<'_>> = Vec::new();

        let mut text = match element {
            Element::Fsm(machine) => {
                let mut text = run.templates.template("FSM_Template")?;
                text = text.replace("#SCRIPTNAME#", &script_name);
                text = text.replace("#ENDING#", "_FSM");
                let body = fsm::create_fragment(machine, "_FSM", false, false, &mut subs, &mut run)?;
                text.replace("#FSMCREATE#", &body)
            }
            Element::BehaviourTree(tree) => {
                let mut text = run.templates.template("BT_Template")?;
                text = text.replace("#SCRIPTNAME#", &script_name);
                text = text.replace("#ENDING#", "_BT");
                let body = bt::create_fragment(tree, "_BT", false, &mut subs, &mut run)?;
                text.replace("#BTCREATE#", &body)
            }
            Element::UtilitySystem(_) => {
                return Err(GenerateError::Unsupported("Utility System"));
            }
        };

        let all_subs = expand_sub_machines(&mut text, subs, &mut run)?;
        text = text.replace("#SUBELEMCREATE#", "");

        text = text.replace("#ACTIONS#", &methods_code(element));
        text = text.replace("#SUBELEM1#", &sub_decl_code(&all_subs));
        text = text.replace("#SUBELEM2#", &sub_init_code(&all_subs));
        text = text.replace("#SUBELEM3#", &sub_update_code(&all_subs));

        let mut files = vec![GeneratedFile {
            name: format!("{script_name}.cs"),
            contents: text,
        }];
        files.extend(run.extra_files);
        info!(element = element.name(), files = files.len(), "generated script");
        Ok(GeneratedScript { files })
    }
}

/// A nested container queued for emission, tagged with whether its host is a
/// behaviour tree (sub-FSMs hosted by a tree get an exit transition stub).
pub(crate) struct SubRef<'a> {
    pub(crate) element: &'a Element,
    pub(crate) hosted_by_bt: bool,
}

/// Mutable state shared across one generation run.
pub(crate) struct RunContext<'t> {
    pub(crate) templates: &'t dyn TemplateSource,
    /// Variable names for perception nodes, keyed by perception identifier.
    pub(crate) perception_names: UniqueNamer,
    extra_files: Vec<GeneratedFile>,
    generated_customs: Vec<String>,
}

impl<'t> RunContext<'t> {
    fn new(templates: &'t dyn TemplateSource) -> Self {
        Self {
            templates,
            perception_names: UniqueNamer::new(),
            extra_files: Vec::new(),
            generated_customs: Vec::new(),
        }
    }

    /// Emits the stub script for a custom perception type, once per type name.
    pub(crate) fn custom_script(&mut self, type_name: &str) -> Result<(), GenerateError> {
        if self.generated_customs.iter().any(|n| n == type_name) {
            return Ok(());
        }
        let contents = self
            .templates
            .template("CustomPerception_Template")?
            .replace("#CUSTOMNAME#", type_name);
        self.generated_customs.push(type_name.to_string());
        self.extra_files.push(GeneratedFile {
            name: format!("{type_name}Perception.cs"),
            contents,
        });
        Ok(())
    }
}

/// Expands the `#SUBELEMCREATE#` chain breadth-first: each sub-machine's
/// fragment ends in the placeholder again, so exactly one occurrence exists at
/// any point until the final cleanup replace.
fn expand_sub_machines<'a>(
    text: &mut String,
    mut pending: Vec<SubRef<'a>>,
    run: &mut RunContext<'_>,
) -> Result<Vec<SubRef<'a>>, GenerateError> {
    let mut all = Vec::new();
    while !pending.is_empty() {
        let mut next = Vec::new();
        for sub in &pending {
            let fragment = match sub.element {
                Element::Fsm(machine) => fsm::create_fragment(
                    machine,
                    SUB_FSM_ENDING,
                    true,
                    sub.hosted_by_bt,
                    &mut next,
                    run,
                )?,
                Element::BehaviourTree(tree) => {
                    bt::create_fragment(tree, SUB_BT_ENDING, true, &mut next, run)?
                }
                Element::UtilitySystem(_) => {
                    return Err(GenerateError::Unsupported("Utility System"));
                }
            };
            *text = text.replacen("#SUBELEMCREATE#", &fragment, 1);
        }
        all.extend(pending);
        pending = next;
    }
    Ok(all)
}

fn sub_engine_parts(sub: &Element) -> (&'static str, &'static str) {
    match sub {
        Element::Fsm(_) => ("StateMachineEngine", SUB_FSM_ENDING),
        _ => ("BehaviourTreeEngine", SUB_BT_ENDING),
    }
}

fn sub_decl_code(subs: &[SubRef<'_>]) -> String {
    let mut out = String::new();
    for sub in subs {
        let (engine, ending) = sub_engine_parts(sub.element);
        out.push_str(&format!(
            "private {engine} {}{ending};\n{TAB}",
            clean_name(sub.element.name())
        ));
    }
    out
}

fn sub_init_code(subs: &[SubRef<'_>]) -> String {
    let mut out = String::new();
    for sub in subs.iter().rev() {
        let (_, ending) = sub_engine_parts(sub.element);
        out.push_str(&format!(
            "Create{}{ending}();\n{TAB}{TAB}",
            clean_name(sub.element.name())
        ));
    }
    out
}

fn sub_update_code(subs: &[SubRef<'_>]) -> String {
    let mut out = String::new();
    for sub in subs {
        let (_, ending) = sub_engine_parts(sub.element);
        out.push_str(&format!(
            "\n{TAB}{TAB}{}{ending}.Update();",
            clean_name(sub.element.name())
        ));
    }
    out
}

/// The `#ACTIONS#` block: one empty action method per plain state or leaf,
/// plus a success check stub for behaviour tree leaves. Portal nodes
/// contribute their sub-machine's methods instead.
fn methods_code(element: &Element) -> String {
    let mut out = String::new();
    match element {
        Element::Fsm(machine) => {
            for node in machine.states() {
                match &node.sub_element {
                    Some(sub) => out.push_str(&methods_code(sub)),
                    None => out.push_str(&action_method(&clean_name(node.name()))),
                }
            }
        }
        Element::BehaviourTree(tree) => {
            for node in tree.nodes() {
                if node.kind != crate::model::BehaviourKind::Leaf {
                    continue;
                }
                match &node.sub_element {
                    Some(sub) => out.push_str(&methods_code(sub)),
                    None => {
                        let name = clean_name(node.name());
                        out.push_str(&action_method(&name));
                        out.push_str(&check_method(&name));
                    }
                }
            }
        }
        Element::UtilitySystem(_) => {}
    }
    out
}

fn action_method(name: &str) -> String {
    format!("\n{TAB}private void {name}{ACTION_ENDING}()\n{TAB}{{\n{TAB}{TAB}\n{TAB}}}\n{TAB}")
}

fn check_method(name: &str) -> String {
    format!(
        "\n{TAB}private ReturnValues {name}{CHECK_ENDING}()\n{TAB}{{\n{TAB}{TAB}//Write here the code for the success check for {name}\n{TAB}{TAB}return ReturnValues.Failed;\n{TAB}}}\n{TAB}"
    )
}

/// Strips a display name down to a usable C# identifier: alphanumerics only,
/// with leading digits dropped.
pub(crate) fn clean_name(name: &str) -> String {
    let kept: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    kept.trim_start_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

/// Numbers render the way the C# inspector shows them: no trailing `.0`.
pub(crate) fn fmt_num(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
