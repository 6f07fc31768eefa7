use super::RecordStore;
use crate::error::{NotFoundReason, PrintError, Result};
use crate::model::{DocTypeMeta, Document, PrintFormatRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const FORMATS_FILE: &str = "print_formats.json";
const DOCTYPES_FILE: &str = "doctypes.json";
const DOCUMENTS_FILE: &str = "documents.json";
const DEFAULTS_FILE: &str = "defaults.json";

type DocumentTable = BTreeMap<String, BTreeMap<String, Document>>;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    fn load_table<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_table<T: Serialize>(&self, file: &str, table: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(table)?;
        fs::write(self.root.join(file), content)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn get_print_format(&self, name: &str) -> Result<Option<PrintFormatRecord>> {
        let mut formats: BTreeMap<String, PrintFormatRecord> = self.load_table(FORMATS_FILE)?;
        Ok(formats.remove(name))
    }

    fn list_print_formats(&self) -> Result<Vec<PrintFormatRecord>> {
        let formats: BTreeMap<String, PrintFormatRecord> = self.load_table(FORMATS_FILE)?;
        Ok(formats.into_values().collect())
    }

    fn save_print_format(&mut self, record: &PrintFormatRecord) -> Result<()> {
        let mut formats: BTreeMap<String, PrintFormatRecord> = self.load_table(FORMATS_FILE)?;
        formats.insert(record.name.clone(), record.clone());
        self.save_table(FORMATS_FILE, &formats)
    }

    fn delete_print_format(&mut self, name: &str) -> Result<()> {
        let mut formats: BTreeMap<String, PrintFormatRecord> = self.load_table(FORMATS_FILE)?;
        if formats.remove(name).is_none() {
            return Err(PrintError::format_not_found(name, NotFoundReason::Missing));
        }
        self.save_table(FORMATS_FILE, &formats)
    }

    fn get_doctype(&self, doctype: &str) -> Result<Option<DocTypeMeta>> {
        let mut doctypes: BTreeMap<String, DocTypeMeta> = self.load_table(DOCTYPES_FILE)?;
        Ok(doctypes.remove(doctype))
    }

    fn save_doctype(&mut self, meta: &DocTypeMeta) -> Result<()> {
        let mut doctypes: BTreeMap<String, DocTypeMeta> = self.load_table(DOCTYPES_FILE)?;
        doctypes.insert(meta.name.clone(), meta.clone());
        self.save_table(DOCTYPES_FILE, &doctypes)
    }

    fn get_document(&self, doctype: &str, name: &str) -> Result<Document> {
        let mut documents: DocumentTable = self.load_table(DOCUMENTS_FILE)?;
        documents
            .get_mut(doctype)
            .and_then(|docs| docs.remove(name))
            .ok_or_else(|| PrintError::DocumentNotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })
    }

    fn save_document(&mut self, doc: &Document) -> Result<()> {
        let mut documents: DocumentTable = self.load_table(DOCUMENTS_FILE)?;
        documents
            .entry(doc.doctype.clone())
            .or_default()
            .insert(doc.name.clone(), doc.clone());
        self.save_table(DOCUMENTS_FILE, &documents)
    }

    fn get_default(&self, key: &str) -> Result<Option<String>> {
        let mut defaults: BTreeMap<String, String> = self.load_table(DEFAULTS_FILE)?;
        Ok(defaults.remove(key))
    }

    fn set_default(&mut self, key: &str, value: &str) -> Result<()> {
        let mut defaults: BTreeMap<String, String> = self.load_table(DEFAULTS_FILE)?;
        defaults.insert(key.to_string(), value.to_string());
        self.save_table(DEFAULTS_FILE, &defaults)
    }
}
