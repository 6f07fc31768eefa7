use crate::error::{PrintError, Result};
use crate::model::PrintFormatRecord;
use crate::modules::{doc_path, scrub, PRINT_FORMAT_DOCTYPE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The module a record exports into.
pub fn export_module(record: &PrintFormatRecord) -> Result<&str> {
    record
        .module
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            PrintError::Store(format!(
                "Print Format {} has no module to export into",
                record.name
            ))
        })
}

/// Write a print format definition into the module tree so it can be
/// committed alongside code.
///
/// The file lands at `<app_root>/<module>/print_format/<name>/<name>.json`,
/// next to where the resolver looks for `<name>.html`.
pub fn export_to_files(app_root: &Path, record: &PrintFormatRecord) -> Result<PathBuf> {
    let module = export_module(record)?;

    let dir = doc_path(app_root, module, PRINT_FORMAT_DOCTYPE, &record.name);
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{}.json", scrub(&record.name)));
    let content = serde_json::to_string_pretty(record)?;
    fs::write(&path, content)?;

    info!(format = %record.name, path = %path.display(), "exported print format");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_json_definition() {
        let dir = tempfile::tempdir().unwrap();
        let record = PrintFormatRecord::new("Invoice Classic", "Sales Invoice")
            .with_module("Accounts")
            .with_html("<p>{{ doc.name }}</p>")
            .standard();

        let path = export_to_files(dir.path(), &record).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("accounts/print_format/invoice_classic/invoice_classic.json")
        );

        let written: PrintFormatRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record);
    }

    #[test]
    fn test_export_requires_module() {
        let dir = tempfile::tempdir().unwrap();
        let record = PrintFormatRecord::new("Loose", "Sales Invoice");
        let err = export_to_files(dir.path(), &record).unwrap_err();
        assert!(matches!(err, PrintError::Store(_)));
    }
}
