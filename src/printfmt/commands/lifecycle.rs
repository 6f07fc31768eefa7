use crate::cache::CacheInvalidator;
use crate::commands::export::{export_module, export_to_files};
use crate::commands::{CmdMessage, CmdResult};
use crate::context::RequestContext;
use crate::error::{NotFoundReason, PrintError, Result};
use crate::model::PrintFormatRecord;
use crate::store::RecordStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// Hooks a record runs around persistence.
///
/// The orchestrators below call `validate` before writing, `on_update` after a
/// successful write and `on_delete` before removal. `on_update` returns the
/// path of the exported definition, if one was written.
pub trait Lifecycle {
    fn validate(&mut self, ctx: &RequestContext, store: &dyn RecordStore) -> Result<()>;

    fn on_update(
        &self,
        ctx: &RequestContext,
        cache: &mut dyn CacheInvalidator,
    ) -> Result<Option<PathBuf>>;

    fn on_delete(&self, ctx: &RequestContext, cache: &mut dyn CacheInvalidator) -> Result<()>;
}

fn ensure_may_modify(record: &PrintFormatRecord, ctx: &RequestContext) -> Result<()> {
    if record.is_standard() && !ctx.user.is_administrator() {
        return Err(PrintError::PermissionDenied(
            "Standard Print Format cannot be updated".to_string(),
        ));
    }
    Ok(())
}

fn exports_on_update(record: &PrintFormatRecord, ctx: &RequestContext) -> bool {
    record.is_standard() && ctx.config.developer_mode
}

impl Lifecycle for PrintFormatRecord {
    fn validate(&mut self, ctx: &RequestContext, store: &dyn RecordStore) -> Result<()> {
        ensure_may_modify(self, ctx)?;

        let previous = store.get_print_format(&self.name)?;
        if let Some(previous) = &previous {
            // Clearing the flag does not unlock a stored standard format.
            ensure_may_modify(previous, ctx)?;
        }
        if exports_on_update(self, ctx) {
            export_module(self)?;
        }

        self.old_doc_type = previous.and_then(|previous| previous.doc_type);
        Ok(())
    }

    fn on_update(
        &self,
        ctx: &RequestContext,
        cache: &mut dyn CacheInvalidator,
    ) -> Result<Option<PathBuf>> {
        if let Some(old) = self.old_doc_type.as_deref().filter(|d| !d.is_empty()) {
            cache.clear_doctype(old);
        }
        if let Some(current) = self.doc_type.as_deref().filter(|d| !d.is_empty()) {
            cache.clear_doctype(current);
        }

        if exports_on_update(self, ctx) {
            return export_to_files(&ctx.config.app_root, self).map(Some);
        }
        Ok(None)
    }

    fn on_delete(&self, _ctx: &RequestContext, cache: &mut dyn CacheInvalidator) -> Result<()> {
        if let Some(current) = self.doc_type.as_deref().filter(|d| !d.is_empty()) {
            cache.clear_doctype(current);
        }
        Ok(())
    }
}

/// Validate, persist and run `on_update`. A failing `on_update` restores the
/// previously stored record (or removes a new one) before the error is returned.
pub fn save_print_format<S: RecordStore>(
    store: &mut S,
    cache: &mut dyn CacheInvalidator,
    ctx: &RequestContext,
    mut record: PrintFormatRecord,
) -> Result<CmdResult> {
    record.validate(ctx, &*store)?;
    let previous = store.get_print_format(&record.name)?;
    store.save_print_format(&record)?;

    let exported = match record.on_update(ctx, cache) {
        Ok(exported) => exported,
        Err(err) => {
            warn!(
                format = %record.name,
                error = %err,
                "on_update failed, restoring print format"
            );
            match previous {
                Some(previous) => store.save_print_format(&previous)?,
                None => store.delete_print_format(&record.name)?,
            }
            return Err(err);
        }
    };

    info!(format = %record.name, user = %ctx.user.name, "saved print format");

    let mut result = CmdResult::default();
    if let Some(path) = exported {
        result.add_message(CmdMessage::info(format!(
            "Exported {} to {}",
            record.name,
            path.display()
        )));
        result.exported_paths.push(path);
    }
    result.add_message(CmdMessage::success(format!(
        "Print Format saved: {}",
        record.name
    )));
    Ok(result.with_affected_formats(vec![record]))
}

pub fn delete_print_format<S: RecordStore>(
    store: &mut S,
    cache: &mut dyn CacheInvalidator,
    ctx: &RequestContext,
    name: &str,
) -> Result<CmdResult> {
    let record = store
        .get_print_format(name)?
        .ok_or_else(|| PrintError::format_not_found(name, NotFoundReason::Missing))?;

    ensure_may_modify(&record, ctx)?;
    record.on_delete(ctx, cache)?;
    store.delete_print_format(name)?;

    info!(format = %name, user = %ctx.user.name, "deleted print format");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Print Format deleted: {}", name)));
    Ok(result.with_affected_formats(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MetaCache;
    use crate::config::PrintConfig;
    use crate::context::User;
    use crate::error::ErrorKind;
    use crate::store::memory::InMemoryStore;

    fn ctx(user: User) -> RequestContext {
        RequestContext::new(user, PrintConfig::default())
    }

    #[test]
    fn test_non_admin_cannot_edit_standard() {
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let record = PrintFormatRecord::new("Invoice Std", "Sales Invoice").standard();

        let err = save_print_format(&mut store, &mut cache, &ctx(User::new("alice")), record)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "Standard Print Format cannot be updated");
        assert!(store.get_print_format("Invoice Std").unwrap().is_none());
        assert!(cache.cleared().is_empty());
    }

    #[test]
    fn test_non_admin_can_edit_custom() {
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let record = PrintFormatRecord::new("Mine", "Sales Invoice");

        save_print_format(&mut store, &mut cache, &ctx(User::new("alice")), record).unwrap();
        assert!(store.get_print_format("Mine").unwrap().is_some());
    }

    #[test]
    fn test_admin_update_clears_old_and_new_doctype() {
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let admin = ctx(User::administrator());

        let record = PrintFormatRecord::new("Shared", "Sales Invoice").standard();
        save_print_format(&mut store, &mut cache, &admin, record).unwrap();

        let mut moved = store.get_print_format("Shared").unwrap().unwrap();
        moved.doc_type = Some("Delivery Note".into());
        let mut cache = MetaCache::new();
        let result = save_print_format(&mut store, &mut cache, &admin, moved).unwrap();

        assert_eq!(
            cache.cleared().to_vec(),
            vec!["Sales Invoice".to_string(), "Delivery Note".to_string()]
        );
        assert_eq!(
            result.affected_formats[0].old_doc_type.as_deref(),
            Some("Sales Invoice")
        );
    }

    #[test]
    fn test_first_save_has_no_old_doctype() {
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let record = PrintFormatRecord::new("New", "Sales Invoice");

        let result =
            save_print_format(&mut store, &mut cache, &ctx(User::new("alice")), record).unwrap();
        assert!(result.affected_formats[0].old_doc_type.is_none());
        assert_eq!(cache.cleared().to_vec(), vec!["Sales Invoice".to_string()]);
    }

    #[test]
    fn test_developer_mode_exports_standard_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let config = PrintConfig::default()
            .with_developer_mode(true)
            .with_app_root(dir.path());
        let admin = RequestContext::new(User::administrator(), config);

        let record = PrintFormatRecord::new("Invoice Std", "Sales Invoice")
            .with_module("Accounts")
            .standard();
        let result = save_print_format(&mut store, &mut cache, &admin, record).unwrap();

        let exported = dir
            .path()
            .join("accounts/print_format/invoice_std/invoice_std.json");
        assert!(exported.exists());
        assert_eq!(result.exported_paths, vec![exported.clone()]);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == format!("Exported Invoice Std to {}", exported.display())));
    }

    #[test]
    fn test_developer_mode_standard_without_module_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let config = PrintConfig::default()
            .with_developer_mode(true)
            .with_app_root(dir.path());
        let admin = RequestContext::new(User::administrator(), config);

        let record = PrintFormatRecord::new("No Module", "Sales Invoice").standard();
        let err = save_print_format(&mut store, &mut cache, &admin, record).unwrap_err();

        assert!(matches!(err, PrintError::Store(_)));
        assert!(store.get_print_format("No Module").unwrap().is_none());
        assert!(cache.cleared().is_empty());
    }

    #[test]
    fn test_failed_export_restores_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the module directory should go makes the export fail.
        let app_root = dir.path().join("apps");
        std::fs::write(&app_root, "not a directory").unwrap();

        let mut store = InMemoryStore::new();
        let original = PrintFormatRecord::new("Invoice Std", "Sales Invoice")
            .with_module("Accounts")
            .with_html("<p>original</p>")
            .standard();
        store.save_print_format(&original).unwrap();

        let config = PrintConfig::default()
            .with_developer_mode(true)
            .with_app_root(&app_root);
        let admin = RequestContext::new(User::administrator(), config);
        let edited = original.clone().with_html("<p>edited</p>");

        let mut cache = MetaCache::new();
        let err = save_print_format(&mut store, &mut cache, &admin, edited).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(store.get_print_format("Invoice Std").unwrap(), Some(original));

        let fresh = PrintFormatRecord::new("Fresh Std", "Sales Invoice")
            .with_module("Accounts")
            .standard();
        save_print_format(&mut store, &mut cache, &admin, fresh).unwrap_err();
        assert!(store.get_print_format("Fresh Std").unwrap().is_none());
    }

    #[test]
    fn test_non_admin_cannot_unset_standard_on_stored_record() {
        let mut store = InMemoryStore::new();
        store
            .save_print_format(&PrintFormatRecord::new("Std", "Sales Invoice").standard())
            .unwrap();
        let mut cache = MetaCache::new();

        let demoted = PrintFormatRecord::new("Std", "Sales Invoice").with_html("<p>mine</p>");
        let err = save_print_format(&mut store, &mut cache, &ctx(User::new("alice")), demoted)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        let stored = store.get_print_format("Std").unwrap().unwrap();
        assert!(stored.is_standard());
        assert!(stored.html.is_none());
    }

    #[test]
    fn test_no_export_outside_developer_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let config = PrintConfig::default().with_app_root(dir.path());
        let admin = RequestContext::new(User::administrator(), config);

        let record = PrintFormatRecord::new("Invoice Std", "Sales Invoice")
            .with_module("Accounts")
            .standard();
        save_print_format(&mut store, &mut cache, &admin, record).unwrap();

        assert!(!dir.path().join("accounts").exists());
    }

    #[test]
    fn test_no_export_for_custom_format_in_developer_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let config = PrintConfig::default()
            .with_developer_mode(true)
            .with_app_root(dir.path());
        let admin = RequestContext::new(User::administrator(), config);

        let record = PrintFormatRecord::new("Custom", "Sales Invoice").with_module("Accounts");
        save_print_format(&mut store, &mut cache, &admin, record).unwrap();

        assert!(!dir.path().join("accounts").exists());
    }

    #[test]
    fn test_delete_clears_doctype() {
        let mut store = InMemoryStore::new();
        store
            .save_print_format(&PrintFormatRecord::new("Gone", "Sales Invoice"))
            .unwrap();
        let mut cache = MetaCache::new();

        delete_print_format(&mut store, &mut cache, &ctx(User::new("alice")), "Gone").unwrap();
        assert!(store.get_print_format("Gone").unwrap().is_none());
        assert_eq!(cache.cleared().to_vec(), vec!["Sales Invoice".to_string()]);
    }

    #[test]
    fn test_delete_standard_requires_admin() {
        let mut store = InMemoryStore::new();
        store
            .save_print_format(&PrintFormatRecord::new("Std", "Sales Invoice").standard())
            .unwrap();
        let mut cache = MetaCache::new();

        let err = delete_print_format(&mut store, &mut cache, &ctx(User::new("alice")), "Std")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(store.get_print_format("Std").unwrap().is_some());
    }

    #[test]
    fn test_delete_missing() {
        let mut store = InMemoryStore::new();
        let mut cache = MetaCache::new();
        let err = delete_print_format(&mut store, &mut cache, &ctx(User::administrator()), "Nope")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
