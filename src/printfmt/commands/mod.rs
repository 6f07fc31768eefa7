use crate::model::PrintFormatRecord;
use std::path::PathBuf;

pub mod export;
pub mod handler;
pub mod lifecycle;
pub mod render;
pub mod resolve;
pub mod style;

/// Name of the built-in layout; a request for it never touches the store.
pub const STANDARD_FORMAT: &str = stencil::STANDARD_PRINT_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

/// Outcome of a command that changes records.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_formats: Vec<PrintFormatRecord>,
    pub exported_paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_formats(mut self, formats: Vec<PrintFormatRecord>) -> Self {
        self.affected_formats = formats;
        self
    }
}
