use thiserror::Error;

/// Errors that can occur while mutating a graph container.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("node '{0}' is not part of this element")]
    UnknownNode(String),
}

/// Errors that can occur while saving, loading or pasting serialized documents.
#[derive(Error, Debug, Clone)]
pub enum XmlError {
    #[error("could not read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("could not write '{path}': {message}")]
    Write { path: String, message: String },

    #[error("malformed save data: {0}")]
    Malformed(String),

    #[error("wrong content in saved data: a '{found}' record cannot appear as a {context}")]
    UnexpectedRecord {
        found: &'static str,
        context: &'static str,
    },

    #[error(
        "transition '{transition}' references node '{endpoint}', which is not part of the document"
    )]
    MissingEndpoint {
        transition: String,
        endpoint: String,
    },

    #[error("cannot paste {found} content into a {target}")]
    FragmentMismatch {
        target: &'static str,
        found: &'static str,
    },
}

/// Errors that can occur during template-driven code generation.
#[derive(Error, Debug, Clone)]
pub enum GenerateError {
    #[error("the template file '{0}' was not found")]
    TemplateNotFound(String),

    #[error("could not read template '{name}': {message}")]
    TemplateRead { name: String, message: String },

    #[error("'{element}' has {count} outstanding validation issue(s); resolve them before exporting code")]
    UnresolvedIssues { element: String, count: usize },

    #[error("code generation is not supported for {0} elements")]
    Unsupported(&'static str),

    #[error("could not write generated file '{path}': {message}")]
    WriteFailed { path: String, message: String },
}
