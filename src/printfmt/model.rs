use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field types that only shape the layout and never carry a value.
pub const LAYOUT_FIELD_TYPES: [&str; 2] = ["Column Break", "Section Break"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Standard {
    Yes,
    #[default]
    No,
}

/// A stored print format definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintFormatRecord {
    pub name: String,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub standard: Standard,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub html: Option<String>,
    // Filled by validate so on_update can clear the cache of the previous doctype
    #[serde(skip)]
    pub old_doc_type: Option<String>,
}

impl PrintFormatRecord {
    pub fn new(name: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_type: Some(doc_type.into()),
            standard: Standard::No,
            module: None,
            disabled: false,
            html: None,
            old_doc_type: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn standard(mut self) -> Self {
        self.standard = Standard::Yes;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_standard(&self) -> bool {
        self.standard == Standard::Yes
    }

    /// Stored template source, if any non-empty source is present.
    pub fn stored_html(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.is_empty())
    }
}

/// Field definition of a document type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocField {
    #[serde(default)]
    pub fieldname: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub fieldtype: String,
    #[serde(default)]
    pub print_hide: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl DocField {
    pub fn new(fieldname: &str, label: &str, fieldtype: &str) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            label: Some(label.to_string()).filter(|l| !l.is_empty()),
            fieldtype: fieldtype.to_string(),
            print_hide: false,
            hidden: false,
        }
    }

    pub fn is_layout(&self) -> bool {
        LAYOUT_FIELD_TYPES.contains(&self.fieldtype.as_str())
    }
}

/// Document type metadata: owning module and field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeMeta {
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub fields: Vec<DocField>,
}

impl DocTypeMeta {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: DocField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, fieldname: &str) -> Option<&DocField> {
        self.fields.iter().find(|f| f.fieldname == fieldname)
    }
}

/// A stored business document.
///
/// Field values are flattened on serialization, so templates read
/// `doc.customer` rather than `doc.values.customer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doctype: String,
    pub name: String,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Document {
    pub fn new(doctype: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            doctype: doctype.into(),
            name: name.into(),
            values: Map::new(),
        }
    }

    pub fn with_value(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// Request parameters identifying what to print and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl PrintParams {
    pub fn new(doctype: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            doctype: Some(doctype.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn doctype(&self) -> Option<&str> {
        non_empty(&self.doctype)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn format(&self) -> Option<&str> {
        non_empty(&self.format)
    }

    pub fn style(&self) -> Option<&str> {
        non_empty(&self.style)
    }
}

/// Output of a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintResponse {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl PrintResponse {
    /// A response that carries only an HTML error fragment.
    pub fn error(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            css: None,
            comment: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.css.is_none() && self.comment.is_none()
    }
}
