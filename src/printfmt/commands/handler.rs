use crate::cache::MetaCache;
use crate::commands::render::{get_html, DocumentRef};
use crate::commands::style::get_print_style;
use crate::commands::STANDARD_FORMAT;
use crate::context::{RequestContext, User};
use crate::engine::TemplateEngine;
use crate::error::{PrintError, Result};
use crate::model::{Document, PrintParams, PrintResponse};
use crate::permissions::{PermissionChecker, PermissionType};
use crate::store::RecordStore;
use minijinja::HtmlEscape;
use tracing::{debug, warn};

fn required_params(params: &PrintParams) -> Result<(&str, &str)> {
    match (params.doctype(), params.name()) {
        (Some(doctype), Some(name)) => Ok((doctype, name)),
        _ => Err(PrintError::MissingParameter(vec!["doctype", "name", "format"])),
    }
}

fn check_print_permission<P: PermissionChecker + ?Sized>(
    permissions: &P,
    user: &User,
    doc: &Document,
) -> Result<()> {
    for ptype in [PermissionType::Read, PermissionType::Print] {
        if !permissions.has_permission(user, &doc.doctype, ptype, doc) {
            return Err(PrintError::PermissionDenied(format!(
                "No {} permission",
                ptype
            )));
        }
    }
    Ok(())
}

fn error_body(message: &str, params: Option<&PrintParams>) -> String {
    let mut body = format!("<h1>Error</h1>\n<p>{}</p>", HtmlEscape(message));
    if let Some(params) = params {
        let echoed =
            serde_json::to_string_pretty(params).unwrap_or_else(|_| format!("{:?}", params));
        body.push_str(&format!("\n<pre>{}</pre>", HtmlEscape(&echoed)));
    }
    body
}

/// Handle a print request described by `ctx.params`.
///
/// Missing parameters and insufficient permissions produce an error body
/// rather than an `Err`, so the caller always has something to display.
/// Lookup and rendering failures are returned as errors.
pub fn get_args<S, E, P>(
    store: &S,
    cache: &mut MetaCache,
    engine: &E,
    permissions: &P,
    ctx: &RequestContext,
) -> Result<PrintResponse>
where
    S: RecordStore + ?Sized,
    E: TemplateEngine + ?Sized,
    P: PermissionChecker + ?Sized,
{
    let mut params = ctx.params.clone();
    if params.format().is_none() {
        params.format = Some(STANDARD_FORMAT.to_string());
    }

    let (doctype, name) = match required_params(&params) {
        Ok(pair) => pair,
        Err(err) => {
            warn!(?params, "print request missing parameters");
            return Ok(PrintResponse::error(error_body(&err.to_string(), Some(&params))));
        }
    };

    let doc = store.get_document(doctype, name)?;
    if let Err(err) = check_print_permission(permissions, &ctx.user, &doc) {
        warn!(user = %ctx.user.name, doctype, name, "{}", err);
        return Ok(PrintResponse::error(error_body(&err.to_string(), None)));
    }

    debug!(user = %ctx.user.name, doctype, name, "printing document");
    let body = get_html(
        store,
        cache,
        engine,
        ctx,
        DocumentRef::Loaded(&doc),
        params.format(),
    )?;
    let css = get_print_style(store, engine, ctx, params.style())?;

    Ok(PrintResponse {
        body,
        css: Some(css),
        comment: Some(ctx.user.name.clone()),
    })
}
