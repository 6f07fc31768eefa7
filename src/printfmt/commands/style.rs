use crate::context::RequestContext;
use crate::engine::TemplateEngine;
use crate::error::{PrintError, Result};
use crate::store::{RecordStore, PRINT_STYLE_DEFAULT};
use stencil::STANDARD_STYLESHEET;
use tracing::warn;

pub fn stylesheet_name(style: &str) -> String {
    format!("templates/styles/{}.css", style.to_lowercase())
}

/// Render the stylesheet named `style`, or the configured default.
///
/// An unknown style falls back to the standard stylesheet. A missing standard
/// stylesheet is not recovered from.
pub fn get_print_style<S, E>(
    store: &S,
    engine: &E,
    ctx: &RequestContext,
    style: Option<&str>,
) -> Result<String>
where
    S: RecordStore + ?Sized,
    E: TemplateEngine + ?Sized,
{
    let style = match style.filter(|s| !s.is_empty()) {
        Some(style) => style.to_string(),
        None => store
            .get_default(PRINT_STYLE_DEFAULT)?
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ctx.config.print_style.clone()),
    };

    match engine.render_asset(&stylesheet_name(&style)) {
        Err(PrintError::TemplateNotFound(_)) => {
            warn!(style = %style, "print style not found, using standard");
            engine.render_asset(STANDARD_STYLESHEET)
        }
        rendered => rendered,
    }
}
