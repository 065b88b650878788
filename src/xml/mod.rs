//! XML save files and clipboard fragments.
//!
//! Documents serialize to a flat record tree ([`XmlElement`]) in which every
//! edge names its endpoints by identifier attribute. Loading rebuilds the
//! containers through an identifier remap table, so the same machinery backs
//! both file round-trips and copy/paste.

mod convert;
mod types;

pub use convert::{copy_fragment, paste_into, IdPolicy};
pub use types::{ElemType, XmlElement, XmlPerception};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::XmlError;
use crate::model::Element;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

impl XmlElement {
    /// Serializes the record tree and writes it to `path`.
    pub fn save(&self, path: &Path) -> Result<(), XmlError> {
        let body = quick_xml::se::to_string(self).map_err(|e| XmlError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let document = format!("{XML_HEADER}{body}");
        fs::write(path, document).map_err(|e| XmlError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "wrote document");
        Ok(())
    }

    /// Reads and parses a record tree from `path`.
    pub fn load(path: &Path) -> Result<Self, XmlError> {
        let raw = fs::read_to_string(path).map_err(|e| XmlError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let record: XmlElement =
            quick_xml::de::from_str(&raw).map_err(|e| XmlError::Malformed(e.to_string()))?;
        debug!(path = %path.display(), name = %record.name, "read document");
        Ok(record)
    }
}

impl Element {
    /// Saves this container and everything nested in it to an XML document.
    pub fn save_xml(&self, path: &Path) -> Result<(), XmlError> {
        self.to_xml().save(path)
    }

    /// Loads a container from an XML document, keeping the stored identifiers.
    pub fn load_xml(path: &Path) -> Result<Self, XmlError> {
        XmlElement::load(path)?.to_element(IdPolicy::Preserve)
    }
}
