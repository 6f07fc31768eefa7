//! Template rendering capability.
//!
//! The command layer never talks to a template language directly. It hands a
//! [`PrintContext`] to a [`TemplateEngine`], which decides how the context is
//! exposed. [`StencilEngine`] is the production implementation backed by the
//! `stencil` crate.

use crate::commands::render::is_visible;
use crate::error::Result;
use crate::model::{DocField, DocTypeMeta, Document};
use minijinja::value::{Value, ViaDeserialize};
use std::path::PathBuf;
use stencil::Stencil;

/// Data bound into a print template.
#[derive(Debug, Clone, Copy)]
pub struct PrintContext<'a> {
    pub doc: &'a Document,
    pub meta: &'a DocTypeMeta,
    pub user: &'a str,
}

pub trait TemplateEngine {
    /// Render a named template (built-in or from a search path) against a document.
    fn render_named(&self, name: &str, ctx: &PrintContext<'_>) -> Result<String>;

    /// Render template source text against a document.
    fn render_source(&self, source: &str, ctx: &PrintContext<'_>) -> Result<String>;

    /// Render a named template that takes no document, such as a stylesheet.
    ///
    /// Fails with `PrintError::TemplateNotFound` when the name does not resolve.
    fn render_asset(&self, name: &str) -> Result<String>;
}

pub struct StencilEngine {
    stencil: Stencil,
}

impl StencilEngine {
    pub fn new() -> Self {
        Self {
            stencil: Stencil::new(),
        }
    }

    pub fn with_search_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            stencil: Stencil::with_search_paths(paths),
        }
    }
}

impl Default for StencilEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn template_context(ctx: &PrintContext<'_>) -> Value {
    minijinja::context! {
        doc => ctx.doc,
        meta => ctx.meta,
        user => ctx.user,
        utils => stencil::utils(),
        is_visible => Value::from_function(|field: ViaDeserialize<DocField>| is_visible(&field)),
    }
}

impl TemplateEngine for StencilEngine {
    fn render_named(&self, name: &str, ctx: &PrintContext<'_>) -> Result<String> {
        Ok(self.stencil.render(name, template_context(ctx))?)
    }

    fn render_source(&self, source: &str, ctx: &PrintContext<'_>) -> Result<String> {
        Ok(self.stencil.render_str(source, template_context(ctx))?)
    }

    fn render_asset(&self, name: &str) -> Result<String> {
        Ok(self.stencil.render(name, ())?)
    }
}
