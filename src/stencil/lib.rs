//! # Stencil - Print Template Rendering
//!
//! A small layer over [minijinja](https://docs.rs/minijinja) that knows where print
//! templates live and which helpers they can call.
//!
//! ## The Problem
//!
//! Print layouts come from three places:
//! - Layouts and stylesheets that ship with the application
//! - Template directories on disk that a deployment may add or override
//! - Template source strings authored by users and kept in a database
//!
//! Each caller should not have to know which of these a name resolves to, and a
//! template author should find the same helpers no matter where the template came from.
//!
//! ## The Solution
//!
//! A [`Stencil`] owns a minijinja environment whose loader checks the configured
//! search paths first and falls back to the embedded built-ins:
//!
//! ```text
//! search_paths[0]/templates/styles/standard.css   (if present)
//! search_paths[1]/templates/styles/standard.css   (if present)
//! <embedded>      templates/styles/standard.css
//! ```
//!
//! Inline sources are rendered with [`Stencil::render_str`] and share the same
//! environment, so `{% include %}` and `{% extends %}` work from user templates too.
//!
//! ## Quick Example
//!
//! ```rust
//! use stencil::{Stencil, STANDARD_STYLESHEET};
//!
//! let stencil = Stencil::new();
//! let css = stencil.render(STANDARD_STYLESHEET, ()).unwrap();
//! assert!(css.contains(".print-format"));
//! ```
//!
//! ## Helpers
//!
//! [`utils`] returns the helper namespace handed to print templates as `utils`:
//!
//! ```jinja
//! {{ utils.scrub("Sales Invoice") }}        {# sales_invoice #}
//! {{ utils.fmt_money(1234.5, "USD") }}      {# USD 1,234.50 #}
//! {{ utils.flt("3.14159", 2) }}             {# 3.14 #}
//! {{ utils.nowdate() }}                     {# 2024-05-01 #}
//! ```
//!
//! The same `scrub` helper is also registered as a filter.
//!
//! ## Not Found
//!
//! Missing templates surface as minijinja errors of kind
//! [`ErrorKind::TemplateNotFound`]; use [`is_not_found`] to tell them apart from
//! syntax or rendering errors.

use minijinja::{Environment, Error, ErrorKind, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the built-in document layout.
pub const STANDARD_PRINT_FORMAT: &str = "templates/print_formats/standard.html";

/// Name of the built-in default stylesheet.
pub const STANDARD_STYLESHEET: &str = "templates/styles/standard.css";

static BUILTINS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            STANDARD_PRINT_FORMAT,
            include_str!("templates/print_formats/standard.html"),
        ),
        (
            STANDARD_STYLESHEET,
            include_str!("templates/styles/standard.css"),
        ),
        (
            "templates/styles/classic.css",
            include_str!("templates/styles/classic.css"),
        ),
    ])
});

/// Returns the embedded source of a built-in template.
pub fn builtin(name: &str) -> Option<&'static str> {
    BUILTINS.get(name).copied()
}

/// Returns the names of all built-in templates, sorted.
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Returns true if the error means a template could not be located.
pub fn is_not_found(err: &Error) -> bool {
    err.kind() == ErrorKind::TemplateNotFound
}

/// A template environment with built-ins and an optional filesystem overlay.
///
/// # Example
///
/// ```rust
/// use stencil::Stencil;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Ctx { name: String }
///
/// let stencil = Stencil::new();
/// let out = stencil
///     .render_str("Hello {{ name | scrub }}", &Ctx { name: "Big Co".into() })
///     .unwrap();
/// assert_eq!(out, "Hello big_co");
/// ```
pub struct Stencil {
    env: Environment<'static>,
    search_paths: Vec<PathBuf>,
}

impl Stencil {
    /// Creates an environment that only knows the built-in templates.
    pub fn new() -> Self {
        Self::with_search_paths(Vec::new())
    }

    /// Creates an environment that looks in `search_paths`, in order, before
    /// falling back to the built-ins.
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        let mut env = Environment::new();
        let paths = search_paths.clone();
        env.set_loader(move |name| load_template(&paths, name));
        env.add_filter("scrub", scrub);
        Self { env, search_paths }
    }

    /// The directories consulted before the built-ins.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Renders a template by name.
    pub fn render<T: Serialize>(&self, name: &str, ctx: T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(ctx)
    }

    /// Renders a template given as source text.
    ///
    /// Inline sources are not auto-escaped; the author controls the markup.
    pub fn render_str<T: Serialize>(&self, source: &str, ctx: T) -> Result<String, Error> {
        self.env.render_str(source, ctx)
    }

    /// Returns true if `name` resolves to a template that compiles.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

impl Default for Stencil {
    fn default() -> Self {
        Self::new()
    }
}

fn load_template(search_paths: &[PathBuf], name: &str) -> Result<Option<String>, Error> {
    let Some(relative) = safe_relative(name) else {
        return Ok(None);
    };

    for root in search_paths {
        let path = root.join(&relative);
        if path.is_file() {
            let source = fs::read_to_string(&path).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(e)
            })?;
            return Ok(Some(source));
        }
    }

    Ok(builtin(name).map(str::to_string))
}

/// Template names must stay below their search root.
fn safe_relative(name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains('\\') {
        return None;
    }
    let path = Path::new(name);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

/// The helper namespace exposed to print templates as `utils`.
pub fn utils() -> Value {
    Value::from_iter([
        ("scrub", Value::from_function(scrub)),
        ("flt", Value::from_function(flt)),
        ("fmt_money", Value::from_function(fmt_money)),
        ("nowdate", Value::from_function(nowdate)),
    ])
}

/// Converts a display name into a file and identifier safe form.
pub fn scrub(text: &str) -> String {
    text.replace([' ', '-'], "_").to_lowercase()
}

fn to_f64(value: &Value) -> f64 {
    let number = match value.as_str() {
        Some(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        None => f64::try_from(value.clone()).unwrap_or(0.0),
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Coerces a value to a float, optionally rounded to `precision` places.
/// Unparseable or non-finite input becomes `0.0`.
pub fn flt(value: Value, precision: Option<u32>) -> f64 {
    let number = to_f64(&value);
    match precision {
        Some(p) => {
            let factor = 10f64.powi(p as i32);
            (number * factor).round() / factor
        }
        None => number,
    }
}

/// Formats an amount with two decimals and thousands separators.
pub fn fmt_money(value: Value, currency: Option<&str>) -> String {
    let amount = to_f64(&value);
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    match currency {
        Some(c) if !c.is_empty() => format!("{} {}{}.{}", c, sign, grouped, fraction),
        _ => format!("{}{}.{}", sign, grouped, fraction),
    }
}

/// Today's date in the local timezone as `YYYY-MM-DD`.
pub fn nowdate() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::fs;

    #[derive(Serialize)]
    struct Item {
        name: String,
        amount: f64,
    }

    #[test]
    fn test_builtin_stylesheet_renders() {
        let stencil = Stencil::new();
        let css = stencil.render(STANDARD_STYLESHEET, ()).unwrap();
        assert!(css.contains(".print-format"));
    }

    #[test]
    fn test_builtin_names_sorted() {
        let names = builtin_names();
        assert_eq!(names.len(), 3);
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let stencil = Stencil::new();
        let err = stencil.render("templates/styles/nope.css", ()).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_syntax_error_is_not_not_found() {
        let stencil = Stencil::new();
        let err = stencil.render_str("{% if %}", ()).unwrap_err();
        assert!(!is_not_found(&err));
    }

    #[test]
    fn test_search_path_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("templates/styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("standard.css"), "body { color: red; }").unwrap();

        let stencil = Stencil::with_search_paths(vec![dir.path().to_path_buf()]);
        let css = stencil.render(STANDARD_STYLESHEET, ()).unwrap();
        assert_eq!(css, "body { color: red; }");
    }

    #[test]
    fn test_search_path_adds_new_template() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("templates/styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("modern.css"), "h1 {}").unwrap();

        let stencil = Stencil::with_search_paths(vec![dir.path().to_path_buf()]);
        assert!(stencil.has_template("templates/styles/modern.css"));
        assert!(!Stencil::new().has_template("templates/styles/modern.css"));
    }

    #[test]
    fn test_parent_segments_are_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(dir.path().join("secret.css"), "nope").unwrap();

        let stencil = Stencil::with_search_paths(vec![inner]);
        let err = stencil.render("../secret.css", ()).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_render_str_with_loop() {
        let stencil = Stencil::new();
        let items = vec![
            Item {
                name: "a".into(),
                amount: 1.0,
            },
            Item {
                name: "b".into(),
                amount: 2.0,
            },
        ];
        let out = stencil
            .render_str(
                "{% for i in items %}{{ i.name }}={{ i.amount }};{% endfor %}",
                minijinja::context! { items => items },
            )
            .unwrap();
        assert_eq!(out, "a=1.0;b=2.0;");
    }

    #[test]
    fn test_utils_namespace_callable() {
        let stencil = Stencil::new();
        let out = stencil
            .render_str(
                "{{ utils.scrub('Sales Invoice') }}|{{ utils.fmt_money(1234.5, 'USD') }}",
                minijinja::context! { utils => utils() },
            )
            .unwrap();
        assert_eq!(out, "sales_invoice|USD 1,234.50");
    }

    #[test]
    fn test_scrub() {
        assert_eq!(scrub("Sales Invoice"), "sales_invoice");
        assert_eq!(scrub("Pick-List Standard"), "pick_list_standard");
        assert_eq!(scrub("simple"), "simple");
    }

    #[test]
    fn test_flt() {
        assert_eq!(flt(Value::from("3.14159"), Some(2)), 3.14);
        assert_eq!(flt(Value::from(2), None), 2.0);
        assert_eq!(flt(Value::from("garbage"), None), 0.0);
    }

    #[test]
    fn test_fmt_money() {
        assert_eq!(fmt_money(Value::from(0), None), "0.00");
        assert_eq!(fmt_money(Value::from(999.999), None), "1,000.00");
        assert_eq!(fmt_money(Value::from(1234567.891), None), "1,234,567.89");
        assert_eq!(fmt_money(Value::from(-42.5), Some("EUR")), "EUR -42.50");
    }

    #[test]
    fn test_non_finite_amounts_are_zero() {
        assert_eq!(fmt_money(Value::from(f64::INFINITY), None), "0.00");
        assert_eq!(fmt_money(Value::from(f64::NAN), Some("USD")), "USD 0.00");
        assert_eq!(fmt_money(Value::from("inf"), None), "0.00");
        assert_eq!(flt(Value::from(f64::NEG_INFINITY), Some(2)), 0.0);
    }

    #[test]
    fn test_nowdate_shape() {
        let today = nowdate();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[4..5], "-");
    }
}
