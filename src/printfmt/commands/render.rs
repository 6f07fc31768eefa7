use crate::cache::MetaCache;
use crate::commands::resolve::{get_print_format, TemplateSource};
use crate::commands::STANDARD_FORMAT;
use crate::context::RequestContext;
use crate::engine::{PrintContext, TemplateEngine};
use crate::error::Result;
use crate::model::{DocField, Document};
use crate::store::RecordStore;
use std::borrow::Cow;
use tracing::debug;

/// The document to render: already loaded, or addressed by doctype and name.
#[derive(Debug, Clone, Copy)]
pub enum DocumentRef<'a> {
    Loaded(&'a Document),
    ByName { doctype: &'a str, name: &'a str },
}

impl<'a> From<&'a Document> for DocumentRef<'a> {
    fn from(doc: &'a Document) -> Self {
        DocumentRef::Loaded(doc)
    }
}

/// Whether a field belongs on the printed page.
///
/// Layout-only fields, unlabelled fields, and fields marked hidden or
/// print-hidden are left out.
pub fn is_visible(field: &DocField) -> bool {
    !field.is_layout()
        && field.label.as_deref().is_some_and(|l| !l.is_empty())
        && !field.print_hide
        && !field.hidden
}

/// Render `doc` with `print_format`, falling back to the request's format and
/// then the standard layout.
pub fn get_html<S, E>(
    store: &S,
    cache: &mut MetaCache,
    engine: &E,
    ctx: &RequestContext,
    doc: DocumentRef<'_>,
    print_format: Option<&str>,
) -> Result<String>
where
    S: RecordStore + ?Sized,
    E: TemplateEngine + ?Sized,
{
    let doc: Cow<'_, Document> = match doc {
        DocumentRef::Loaded(doc) => Cow::Borrowed(doc),
        DocumentRef::ByName { doctype, name } => Cow::Owned(store.get_document(doctype, name)?),
    };

    let format_name = print_format
        .filter(|f| !f.is_empty())
        .or_else(|| ctx.params.format())
        .unwrap_or(STANDARD_FORMAT);
    debug!(doctype = %doc.doctype, name = %doc.name, format = format_name, "rendering");

    let source = get_print_format(store, &ctx.config, &doc.doctype, format_name)?;
    let meta = cache.meta(store, &doc.doctype)?;
    let print_ctx = PrintContext {
        doc: &doc,
        meta: &meta,
        user: &ctx.user.name,
    };

    match source {
        TemplateSource::Standard => engine.render_named(STANDARD_FORMAT, &print_ctx),
        TemplateSource::File { source, .. } | TemplateSource::Stored(source) => {
            engine.render_source(&source, &print_ctx)
        }
    }
}
