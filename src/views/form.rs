use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::NamedEntity;
use crate::forms::{FieldDescriptor, FieldErrors, FieldKind, FormValues, OptionSource};

use super::escape;

pub type SelectOptions = HashMap<OptionSource, Arc<Vec<NamedEntity>>>;

/// Everything needed to draw one form
pub struct FormView<'a> {
    pub fields: &'a [FieldDescriptor],
    pub values: &'a FormValues,
    pub errors: Option<&'a FieldErrors>,
    pub options: &'a SelectOptions,
    pub action: &'a str,
    pub hidden: &'a [(&'static str, String)],
    pub submit: &'a str,
    pub cancel: Option<&'a str>,
}

pub fn render(view: &FormView<'_>) -> String {
    let mut html = format!(r#"<form method="post" action="{}" class="card" novalidate>"#, escape(view.action));

    for (name, value) in view.hidden {
        html.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            name,
            escape(value)
        ));
    }

    for field in view.fields {
        html.push_str(&render_field(field, view));
    }

    html.push_str(&format!(r#"<button type="submit">{}</button>"#, escape(view.submit)));
    if let Some(cancel) = view.cancel {
        html.push_str(&format!(r#" <a class="button secondary" href="{}">Cancel</a>"#, escape(cancel)));
    }
    html.push_str("</form>");
    html
}

fn render_field(field: &FieldDescriptor, view: &FormView<'_>) -> String {
    let value = view.values.get(field.name);
    let required = if field.required { " required" } else { "" };
    let marker = if field.required { " *" } else { "" };

    let input = match field.kind {
        FieldKind::Select(source) => {
            let entries = view.options.get(&source).map(|o| o.as_slice()).unwrap_or(&[]);
            let mut select = format!(r#"<select id="{0}" name="{0}"{1}>"#, field.name, required);
            select.push_str(&format!(r#"<option value="">Select {}</option>"#, escape(&field.label.to_lowercase())));
            for entry in entries {
                let selected = if entry.id == value { " selected" } else { "" };
                select.push_str(&format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    escape(&entry.id),
                    selected,
                    escape(&entry.name)
                ));
            }
            select.push_str("</select>");
            select
        }
        kind => {
            let (input_type, shown) = match kind {
                FieldKind::Url => ("url", value),
                FieldKind::Email => ("email", value),
                FieldKind::Password => ("password", ""),
                _ => ("text", value),
            };
            format!(
                r#"<input id="{0}" name="{0}" type="{1}" value="{2}" placeholder="{3}"{4}>"#,
                field.name,
                input_type,
                escape(shown),
                escape(field.placeholder),
                required
            )
        }
    };

    let error = view
        .errors
        .and_then(|errors| errors.get(field.name))
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<div class="field"><label for="{}">{}{}</label>{}{}</div>"#,
        field.name,
        escape(field.label),
        marker,
        input,
        error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("name", "Category name", FieldKind::Text).required(),
        FieldDescriptor::new("category", "Category", FieldKind::Select(OptionSource::Categories)),
        FieldDescriptor::new("password", "Password", FieldKind::Password),
    ];

    #[test]
    fn test_renders_errors_and_keeps_values() {
        let values = FormValues::new().with("name", "").with("category", "c2").with("password", "secret");
        let errors = forms::validate(FIELDS, &values).unwrap_err();

        let mut options = SelectOptions::new();
        options.insert(
            OptionSource::Categories,
            Arc::new(vec![
                NamedEntity { id: "c1".into(), name: "Web".into() },
                NamedEntity { id: "c2".into(), name: "<Mobile>".into() },
            ]),
        );

        let html = render(&FormView {
            fields: FIELDS,
            values: &values,
            errors: Some(&errors),
            options: &options,
            action: "/dashboard/categories",
            hidden: &[("_page", "2".to_string())],
            submit: "Save",
            cancel: None,
        });

        assert!(html.contains("Category name is required"));
        assert!(html.contains(r#"<option value="c2" selected>&lt;Mobile&gt;</option>"#));
        assert!(html.contains(r#"name="_page" value="2""#));
        assert!(!html.contains("secret"), "passwords are never echoed");
    }
}
