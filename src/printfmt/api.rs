//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It owns the
//! capabilities a request needs (store, template engine, permission checker and
//! the metadata cache) and forwards each call to the matching command.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O**: no stdout, stderr or process exit
//! - **Ambient state**: who is asking and how the system is configured arrive in
//!   a [`RequestContext`] on every call
//!
//! ## Generic Over Capabilities
//!
//! `PrintApi<S, E, P>` is generic over the store, engine and permission checker:
//! - Production: `PrintApi<FileStore, StencilEngine, RolePermissions>`
//! - Testing: `PrintApi<InMemoryStore, StencilEngine, RolePermissions>`

use crate::cache::MetaCache;
use crate::commands::{self, CmdResult};
use crate::context::RequestContext;
use crate::engine::TemplateEngine;
use crate::error::Result;
use crate::model::{PrintFormatRecord, PrintResponse};
use crate::permissions::PermissionChecker;
use crate::store::RecordStore;

pub struct PrintApi<S: RecordStore, E: TemplateEngine, P: PermissionChecker> {
    store: S,
    engine: E,
    permissions: P,
    cache: MetaCache,
}

impl<S: RecordStore, E: TemplateEngine, P: PermissionChecker> PrintApi<S, E, P> {
    pub fn new(store: S, engine: E, permissions: P) -> Self {
        Self {
            store,
            engine,
            permissions,
            cache: MetaCache::new(),
        }
    }

    /// Full print response for the document named in `ctx.params`.
    pub fn print(&mut self, ctx: &RequestContext) -> Result<PrintResponse> {
        commands::handler::get_args(
            &self.store,
            &mut self.cache,
            &self.engine,
            &self.permissions,
            ctx,
        )
    }

    /// Rendered HTML only, without permission checks.
    pub fn html(
        &mut self,
        ctx: &RequestContext,
        doc: DocumentRef<'_>,
        print_format: Option<&str>,
    ) -> Result<String> {
        commands::render::get_html(
            &self.store,
            &mut self.cache,
            &self.engine,
            ctx,
            doc,
            print_format,
        )
    }

    pub fn print_format(
        &self,
        ctx: &RequestContext,
        doctype: &str,
        format_name: &str,
    ) -> Result<TemplateSource> {
        commands::resolve::get_print_format(&self.store, &ctx.config, doctype, format_name)
    }

    pub fn print_style(&self, ctx: &RequestContext, style: Option<&str>) -> Result<String> {
        commands::style::get_print_style(&self.store, &self.engine, ctx, style)
    }

    pub fn save_format(
        &mut self,
        ctx: &RequestContext,
        record: PrintFormatRecord,
    ) -> Result<CmdResult> {
        commands::lifecycle::save_print_format(&mut self.store, &mut self.cache, ctx, record)
    }

    pub fn delete_format(&mut self, ctx: &RequestContext, name: &str) -> Result<CmdResult> {
        commands::lifecycle::delete_print_format(&mut self.store, &mut self.cache, ctx, name)
    }

    pub fn list_formats(&self) -> Result<Vec<PrintFormatRecord>> {
        self.store.list_print_formats()
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }
}

pub use crate::commands::render::{is_visible, DocumentRef};
pub use crate::commands::resolve::TemplateSource;
pub use crate::commands::{CmdMessage, MessageLevel, STANDARD_FORMAT};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintConfig;
    use crate::context::User;
    use crate::engine::StencilEngine;
    use crate::model::PrintParams;
    use crate::permissions::RolePermissions;
    use crate::store::memory::fixtures::{invoice_store, INVOICE, INVOICE_NAME};
    use crate::store::memory::InMemoryStore;

    fn api() -> PrintApi<InMemoryStore, StencilEngine, RolePermissions> {
        PrintApi::new(invoice_store(), StencilEngine::new(), RolePermissions::new())
    }

    fn admin() -> RequestContext {
        RequestContext::new(User::administrator(), PrintConfig::default())
    }

    #[test]
    fn test_print_dispatches_to_handler() {
        let mut api = api();
        let ctx = admin().with_params(PrintParams::new(INVOICE, INVOICE_NAME));
        let response = api.print(&ctx).unwrap();
        assert_eq!(response.comment.as_deref(), Some("Administrator"));
        assert!(api.cache().contains(INVOICE));
    }

    #[test]
    fn test_save_invalidates_owned_cache() {
        let mut api = api();
        let ctx = admin().with_params(PrintParams::new(INVOICE, INVOICE_NAME));
        api.print(&ctx).unwrap();
        assert!(api.cache().contains(INVOICE));

        api.save_format(&ctx, PrintFormatRecord::new("Slip", INVOICE).with_html("x"))
            .unwrap();
        assert!(!api.cache().contains(INVOICE));
        assert_eq!(api.list_formats().unwrap().len(), 1);
    }

    #[test]
    fn test_print_format_standard() {
        let api = api();
        let source = api.print_format(&admin(), INVOICE, STANDARD_FORMAT).unwrap();
        assert_eq!(source, TemplateSource::Standard);
    }

    #[test]
    fn test_delete_format() {
        let mut api = api();
        api.save_format(&admin(), PrintFormatRecord::new("Slip", INVOICE).with_html("x"))
            .unwrap();
        let result = api.delete_format(&admin(), "Slip").unwrap();
        assert_eq!(result.affected_formats[0].name, "Slip");
        assert!(api.list_formats().unwrap().is_empty());
    }
}
