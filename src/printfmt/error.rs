use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a print format lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    Missing,
    Disabled,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::Missing => write!(f, "does not exist"),
            NotFoundReason::Disabled => write!(f, "is disabled"),
        }
    }
}

/// Coarse error categories callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    NotFound,
    TemplateNotFound,
    MissingParameter,
    Other,
}

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("Print Format {name} {reason}")]
    FormatNotFound {
        name: String,
        reason: NotFoundReason,
    },

    #[error("DocType {0} does not exist")]
    DocTypeNotFound(String),

    #[error("{doctype} {name} not found")]
    DocumentNotFound { doctype: String, name: String },

    #[error("No template found at path: {}", .0.display())]
    NoTemplate(PathBuf),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Parameters {} required", .0.join(", "))]
    MissingParameter(Vec<&'static str>),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl PrintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrintError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            PrintError::FormatNotFound { .. }
            | PrintError::DocTypeNotFound(_)
            | PrintError::DocumentNotFound { .. }
            | PrintError::NoTemplate(_) => ErrorKind::NotFound,
            PrintError::TemplateNotFound(_) => ErrorKind::TemplateNotFound,
            PrintError::MissingParameter(_) => ErrorKind::MissingParameter,
            PrintError::Template(_)
            | PrintError::Io(_)
            | PrintError::Serialization(_)
            | PrintError::Store(_) => ErrorKind::Other,
        }
    }

    pub fn format_not_found(name: impl Into<String>, reason: NotFoundReason) -> Self {
        PrintError::FormatNotFound {
            name: name.into(),
            reason,
        }
    }
}

impl From<minijinja::Error> for PrintError {
    fn from(err: minijinja::Error) -> Self {
        if stencil::is_not_found(&err) {
            PrintError::TemplateNotFound(err.detail().unwrap_or_default().to_string())
        } else {
            PrintError::Template(format!("{:#}", err))
        }
    }
}

pub type Result<T> = std::result::Result<T, PrintError>;
