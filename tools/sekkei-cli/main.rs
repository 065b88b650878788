use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sekkei::codegen::{DirTemplates, Generator};
use sekkei::prelude::*;

/// Inspect, validate and export behaviour graph documents from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the structure of a saved document
    Inspect {
        /// Path to the saved XML document
        document: PathBuf,
    },
    /// List the validation issues of a saved document
    Validate {
        /// Path to the saved XML document
        document: PathBuf,
    },
    /// Generate the C# scripts for a saved document
    Generate {
        /// Path to the saved XML document
        document: PathBuf,
        /// Directory the generated scripts are written to
        #[arg(short, long, default_value = "generated")]
        out_dir: PathBuf,
        /// Directory of template overrides (falls back to the built-in templates)
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Inspect { document } => {
            let element = Element::load_xml(&document).map_err(|e| e.to_string())?;
            print_element(&element, 0);
            Ok(())
        }
        Command::Validate { document } => {
            let element = Element::load_xml(&document).map_err(|e| e.to_string())?;
            let issues = element.issues();
            if issues.is_empty() {
                println!("no issues found");
            } else {
                for issue in &issues {
                    println!("{issue}");
                }
            }
            Ok(())
        }
        Command::Generate {
            document,
            out_dir,
            templates,
        } => {
            let element = Element::load_xml(&document).map_err(|e| e.to_string())?;
            let generator = match templates {
                Some(dir) => Generator::new(Box::new(DirTemplates::new(dir))),
                None => Generator::builtin(),
            };
            let script = generator.generate(&element).map_err(|e| e.to_string())?;
            script.write_to(&out_dir).map_err(|e| e.to_string())?;
            for file in &script.files {
                println!("wrote {}", out_dir.join(&file.name).display());
            }
            Ok(())
        }
    }
}

fn print_element(element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{} \"{}\"", element.type_label(), element.name());
    match element {
        Element::Fsm(machine) => {
            for state in machine.states() {
                println!("{indent}  [{}] {}", state.type_label(), state.name());
                if let Some(sub) = &state.sub_element {
                    print_element(sub, depth + 2);
                }
            }
            for transition in machine.transitions() {
                let (from, to) = endpoint_names(
                    machine.state(transition.from()).map(|s| s.name()),
                    machine.state(transition.to()).map(|s| s.name()),
                );
                println!("{indent}  {} -> {} ({})", from, to, transition.name());
            }
        }
        Element::BehaviourTree(tree) => {
            for node in tree.nodes() {
                let marker = if node.is_root { " (root)" } else { "" };
                println!("{indent}  [{}] {}{marker}", node.type_label(), node.name());
                if let Some(sub) = &node.sub_element {
                    print_element(sub, depth + 2);
                }
            }
        }
        Element::UtilitySystem(system) => {
            for node in system.nodes() {
                println!("{indent}  [{}] {}", node.type_label(), node.name());
                if let Some(sub) = &node.sub_element {
                    print_element(sub, depth + 2);
                }
            }
        }
    }
}

fn endpoint_names<'a>(from: Option<&'a str>, to: Option<&'a str>) -> (&'a str, &'a str) {
    (from.unwrap_or("?"), to.unwrap_or("?"))
}
