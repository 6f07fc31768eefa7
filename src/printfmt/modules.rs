//! Module tree path conventions.
//!
//! Records that belong to a module live under
//! `<app_root>/<module>/<doctype>/<name>/`, with every segment scrubbed.

use std::path::{Path, PathBuf};

pub use stencil::scrub;

pub const PRINT_FORMAT_DOCTYPE: &str = "Print Format";

pub fn module_path(app_root: &Path, module: &str) -> PathBuf {
    app_root.join(scrub(module))
}

pub fn doc_path(app_root: &Path, module: &str, doctype: &str, name: &str) -> PathBuf {
    module_path(app_root, module)
        .join(scrub(doctype))
        .join(scrub(name))
}

/// Where a print format's template file is expected on disk.
pub fn print_format_template_path(app_root: &Path, module: &str, format_name: &str) -> PathBuf {
    doc_path(app_root, module, PRINT_FORMAT_DOCTYPE, format_name)
        .join(format!("{}.html", scrub(format_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_format_template_path() {
        let path = print_format_template_path(Path::new("/apps"), "Accounts", "Sales Invoice Classic");
        assert_eq!(
            path,
            PathBuf::from(
                "/apps/accounts/print_format/sales_invoice_classic/sales_invoice_classic.html"
            )
        );
    }

    #[test]
    fn test_doc_path_scrubs_every_segment() {
        let path = doc_path(Path::new("root"), "Stock-Ledger", "Print Format", "Pick List");
        assert_eq!(path, PathBuf::from("root/stock_ledger/print_format/pick_list"));
    }
}
