//! Doctype metadata cache.
//!
//! Rendering looks up a doctype's metadata on every request; [`MetaCache`] keeps
//! it in memory until a lifecycle hook invalidates it through
//! [`CacheInvalidator::clear_doctype`].

use crate::error::{PrintError, Result};
use crate::model::DocTypeMeta;
use crate::store::RecordStore;
use std::collections::HashMap;
use tracing::debug;

pub trait CacheInvalidator {
    fn clear_doctype(&mut self, doctype: &str);
}

#[derive(Debug, Default)]
pub struct MetaCache {
    entries: HashMap<String, DocTypeMeta>,
    cleared: Vec<String>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached metadata for `doctype`, loading it from `store` on a miss.
    pub fn meta<S: RecordStore + ?Sized>(&mut self, store: &S, doctype: &str) -> Result<DocTypeMeta> {
        if let Some(meta) = self.entries.get(doctype) {
            return Ok(meta.clone());
        }
        let meta = store
            .get_doctype(doctype)?
            .ok_or_else(|| PrintError::DocTypeNotFound(doctype.to_string()))?;
        self.entries.insert(doctype.to_string(), meta.clone());
        Ok(meta)
    }

    pub fn contains(&self, doctype: &str) -> bool {
        self.entries.contains_key(doctype)
    }

    /// Doctypes invalidated so far, in order.
    pub fn cleared(&self) -> &[String] {
        &self.cleared
    }
}

impl CacheInvalidator for MetaCache {
    fn clear_doctype(&mut self, doctype: &str) {
        debug!(doctype, "clearing cached metadata");
        self.entries.remove(doctype);
        self.cleared.push(doctype.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn test_meta_is_cached_until_cleared() {
        let mut store = InMemoryStore::new();
        store
            .save_doctype(&DocTypeMeta::new("Sales Invoice", "Accounts"))
            .unwrap();
        let mut cache = MetaCache::new();

        cache.meta(&store, "Sales Invoice").unwrap();
        assert!(cache.contains("Sales Invoice"));

        store
            .save_doctype(&DocTypeMeta::new("Sales Invoice", "Selling"))
            .unwrap();
        assert_eq!(cache.meta(&store, "Sales Invoice").unwrap().module, "Accounts");

        cache.clear_doctype("Sales Invoice");
        assert_eq!(cache.meta(&store, "Sales Invoice").unwrap().module, "Selling");
        assert_eq!(cache.cleared().to_vec(), vec!["Sales Invoice".to_string()]);
    }

    #[test]
    fn test_unknown_doctype() {
        let store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let err = cache.meta(&store, "Nope").unwrap_err();
        assert!(matches!(err, PrintError::DocTypeNotFound(_)));
    }
}
