use super::RecordStore;
use crate::error::{NotFoundReason, PrintError, Result};
use crate::model::{DocTypeMeta, Document, PrintFormatRecord};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    formats: BTreeMap<String, PrintFormatRecord>,
    doctypes: HashMap<String, DocTypeMeta>,
    documents: HashMap<(String, String), Document>,
    defaults: HashMap<String, String>,
    format_lookups: Cell<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_print_format` calls served so far.
    pub fn format_lookups(&self) -> usize {
        self.format_lookups.get()
    }
}

impl RecordStore for InMemoryStore {
    fn get_print_format(&self, name: &str) -> Result<Option<PrintFormatRecord>> {
        self.format_lookups.set(self.format_lookups.get() + 1);
        Ok(self.formats.get(name).cloned())
    }

    fn list_print_formats(&self) -> Result<Vec<PrintFormatRecord>> {
        Ok(self.formats.values().cloned().collect())
    }

    fn save_print_format(&mut self, record: &PrintFormatRecord) -> Result<()> {
        self.formats.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn delete_print_format(&mut self, name: &str) -> Result<()> {
        if self.formats.remove(name).is_none() {
            return Err(PrintError::format_not_found(name, NotFoundReason::Missing));
        }
        Ok(())
    }

    fn get_doctype(&self, doctype: &str) -> Result<Option<DocTypeMeta>> {
        Ok(self.doctypes.get(doctype).cloned())
    }

    fn save_doctype(&mut self, meta: &DocTypeMeta) -> Result<()> {
        self.doctypes.insert(meta.name.clone(), meta.clone());
        Ok(())
    }

    fn get_document(&self, doctype: &str, name: &str) -> Result<Document> {
        self.documents
            .get(&(doctype.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| PrintError::DocumentNotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })
    }

    fn save_document(&mut self, doc: &Document) -> Result<()> {
        self.documents
            .insert((doc.doctype.clone(), doc.name.clone()), doc.clone());
        Ok(())
    }

    fn get_default(&self, key: &str) -> Result<Option<String>> {
        Ok(self.defaults.get(key).cloned())
    }

    fn set_default(&mut self, key: &str, value: &str) -> Result<()> {
        self.defaults.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::DocField;

    pub const INVOICE: &str = "Sales Invoice";
    pub const INVOICE_NAME: &str = "SINV-0001";
    pub const ACCOUNTS: &str = "Accounts";

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// A `Sales Invoice` doctype in `Accounts`, covering every visibility rule.
        pub fn with_invoice_doctype(mut self) -> Self {
            let mut hidden = DocField::new("internal_ref", "Internal Ref", "Data");
            hidden.hidden = true;
            let mut no_print = DocField::new("notes", "Notes", "Text");
            no_print.print_hide = true;

            let meta = DocTypeMeta::new(INVOICE, ACCOUNTS)
                .with_field(DocField::new("customer", "Customer", "Link"))
                .with_field(DocField::new("col_1", "", "Column Break"))
                .with_field(DocField::new("grand_total", "Grand Total", "Currency"))
                .with_field(DocField::new("unlabelled", "", "Data"))
                .with_field(hidden)
                .with_field(no_print)
                .with_field(DocField::new("sec_terms", "Terms", "Section Break"))
                .with_field(DocField::new("terms", "Terms and Conditions", "Text"));
            self.store.save_doctype(&meta).unwrap();
            self
        }

        pub fn with_invoice(mut self) -> Self {
            let doc = Document::new(INVOICE, INVOICE_NAME)
                .with_value("customer", "Acme <Corp>")
                .with_value("grand_total", 1250.5)
                .with_value("unlabelled", "should not print")
                .with_value("internal_ref", "REF-SECRET")
                .with_value("notes", "private note")
                .with_value("terms", "Net 30");
            self.store.save_document(&doc).unwrap();
            self
        }

        pub fn with_format(mut self, record: PrintFormatRecord) -> Self {
            self.store.save_print_format(&record).unwrap();
            self
        }

        pub fn with_default(mut self, key: &str, value: &str) -> Self {
            self.store.set_default(key, value).unwrap();
            self
        }
    }

    /// Doctype, document and no print formats.
    pub fn invoice_store() -> InMemoryStore {
        StoreFixture::new()
            .with_invoice_doctype()
            .with_invoice()
            .store
    }
}
