use crate::commands::STANDARD_FORMAT;
use crate::config::PrintConfig;
use crate::error::{NotFoundReason, PrintError, Result};
use crate::modules::print_format_template_path;
use crate::store::RecordStore;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Where a print format's template came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The built-in layout, rendered by name.
    Standard,
    /// A template file in the module tree.
    File { path: PathBuf, source: String },
    /// Template source stored on the Print Format record.
    Stored(String),
}

impl TemplateSource {
    /// Template text, or the standard sentinel name for [`TemplateSource::Standard`].
    pub fn source(&self) -> &str {
        match self {
            TemplateSource::Standard => STANDARD_FORMAT,
            TemplateSource::File { source, .. } => source,
            TemplateSource::Stored(source) => source,
        }
    }
}

pub fn get_print_format<S: RecordStore + ?Sized>(
    store: &S,
    config: &PrintConfig,
    doctype: &str,
    format_name: &str,
) -> Result<TemplateSource> {
    if format_name == STANDARD_FORMAT {
        return Ok(TemplateSource::Standard);
    }

    let record = store
        .get_print_format(format_name)?
        .ok_or_else(|| PrintError::format_not_found(format_name, NotFoundReason::Missing))?;
    if record.disabled {
        return Err(PrintError::format_not_found(
            format_name,
            NotFoundReason::Disabled,
        ));
    }

    let module = store
        .get_doctype(doctype)?
        .map(|meta| meta.module)
        .ok_or_else(|| PrintError::DocTypeNotFound(doctype.to_string()))?;
    let path = print_format_template_path(&config.app_root, &module, format_name);

    if path.is_file() {
        debug!(format = format_name, path = %path.display(), "using template file");
        let source = fs::read_to_string(&path)?;
        return Ok(TemplateSource::File { path, source });
    }

    match record.stored_html() {
        Some(html) => {
            debug!(format = format_name, "using stored template");
            Ok(TemplateSource::Stored(html.to_string()))
        }
        None => Err(PrintError::NoTemplate(path)),
    }
}
