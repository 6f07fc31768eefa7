//! # Storage Layer
//!
//! This module defines the record store abstraction for printfmt. The [`RecordStore`]
//! trait is the only way the rest of the crate reads or writes records.
//!
//! ## Records
//!
//! - **Print Format**: named template definitions ([`PrintFormatRecord`])
//! - **DocType**: document type metadata, used for module membership and field layout
//! - **Documents**: the business documents being printed, addressed by `(doctype, name)`
//! - **Defaults**: system-wide key/value settings such as `print_style`
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON files under a home directory
//!   ```text
//!   <home>/
//!   ├── print_formats.json   # {name: record}
//!   ├── doctypes.json        # {doctype: meta}
//!   ├── documents.json       # {doctype: {name: document}}
//!   └── defaults.json        # {key: value}
//!   ```
//! - [`memory::InMemoryStore`]: no persistence, for tests
//!
//! Lookups that may legitimately miss (`get_print_format`, `get_doctype`,
//! `get_default`) return `Ok(None)`; callers decide what a miss means.
//! Documents are always expected to exist, so a missing one is an error.

use crate::error::Result;
use crate::model::{DocTypeMeta, Document, PrintFormatRecord};

pub mod fs;
pub mod memory;

/// Default key naming the stylesheet used when a request names none.
pub const PRINT_STYLE_DEFAULT: &str = "print_style";

pub trait RecordStore {
    fn get_print_format(&self, name: &str) -> Result<Option<PrintFormatRecord>>;

    /// All print formats, sorted by name
    fn list_print_formats(&self) -> Result<Vec<PrintFormatRecord>>;

    /// Create or replace a print format
    fn save_print_format(&mut self, record: &PrintFormatRecord) -> Result<()>;

    fn delete_print_format(&mut self, name: &str) -> Result<()>;

    fn get_doctype(&self, doctype: &str) -> Result<Option<DocTypeMeta>>;

    fn save_doctype(&mut self, meta: &DocTypeMeta) -> Result<()>;

    fn get_document(&self, doctype: &str, name: &str) -> Result<Document>;

    fn save_document(&mut self, doc: &Document) -> Result<()>;

    fn get_default(&self, key: &str) -> Result<Option<String>>;

    fn set_default(&mut self, key: &str, value: &str) -> Result<()>;
}
