//! Declarative form fields.
//!
//! Every form in the dashboard (entity create/edit, login, register) is a static list of
//! [`FieldDescriptor`]s. One validation routine here and one renderer in `views::form` serve them all.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// Where a select field gets its options from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSource {
    Categories,
    Profiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Absolute http(s) URL when present
    Url,
    Email,
    Password,
    Select(OptionSource),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Form input name and wire key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_len: usize,
    pub placeholder: &'static str,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            min_len: 0,
            placeholder: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

/// Submitted (or prefilled) values keyed by input name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

impl From<HashMap<String, String>> for FormValues {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

/// Field name to message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, name: &'static str, message: String) {
        self.0.entry(name).or_insert(message);
    }
}

/// Check every descriptor against the submitted values
pub fn validate(fields: &[FieldDescriptor], values: &FormValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    for field in fields {
        let raw = values.get(field.name);
        let value = if field.kind == FieldKind::Password { raw } else { raw.trim() };

        if value.is_empty() {
            if field.required {
                errors.insert(field.name, format!("{} is required", field.label));
            }
            continue;
        }

        match field.kind {
            FieldKind::Url if !is_valid_url(value) => {
                errors.insert(field.name, "Invalid URL".to_string());
            }
            FieldKind::Email if !is_valid_email(value) => {
                errors.insert(field.name, "Enter a valid email address".to_string());
            }
            _ => {}
        }

        if field.min_len > 0 && value.chars().count() < field.min_len {
            errors.insert(
                field.name,
                format!("{} must be at least {} characters", field.label, field.min_len),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Build the JSON body the backend expects from the descriptor list
pub fn payload(fields: &[FieldDescriptor], values: &FormValues) -> Value {
    let mut body = Map::new();
    for field in fields {
        let value = values.get(field.name).trim();
        body.insert(field.name.to_string(), Value::String(value.to_string()));
    }
    Value::Object(body)
}

fn is_valid_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

fn is_valid_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
