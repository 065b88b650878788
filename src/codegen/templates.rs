use std::fs;
use std::path::PathBuf;

use crate::error::GenerateError;

/// Source of the C# script templates generated code is spliced into.
///
/// Templates are plain text with `#TAG#` placeholders; the generator fills
/// them in and never inspects the surrounding text, so users can reshape the
/// scripts freely as long as the placeholders survive.
pub trait TemplateSource {
    fn template(&self, name: &str) -> Result<String, GenerateError>;
}

/// The stock templates, compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn template(&self, name: &str) -> Result<String, GenerateError> {
        let text = match name {
            "FSM_Template" => include_str!("../../templates/FSM_Template.txt"),
            "BT_Template" => include_str!("../../templates/BT_Template.txt"),
            "CustomPerception_Template" => {
                include_str!("../../templates/CustomPerception_Template.txt")
            }
            _ => return Err(GenerateError::TemplateNotFound(name.to_string())),
        };
        Ok(text.to_string())
    }
}

/// Templates read from a directory of `<name>.txt` files, for overriding the
/// stock ones.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn template(&self, name: &str) -> Result<String, GenerateError> {
        let path = self.root.join(format!("{name}.txt"));
        if !path.is_file() {
            return Err(GenerateError::TemplateNotFound(name.to_string()));
        }
        fs::read_to_string(&path).map_err(|e| GenerateError::TemplateRead {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}
