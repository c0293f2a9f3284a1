use crate::backend::{Project, Reference};
use crate::color::badge_color;
use crate::forms::{FieldDescriptor, FieldKind, FormValues, OptionSource};

use super::{Cell, Resource, ResourceKind};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", "Project name", FieldKind::Text)
        .required()
        .placeholder("Client name"),
    FieldDescriptor::new("profile", "Profile", FieldKind::Select(OptionSource::Profiles)),
    FieldDescriptor::new("category", "Category", FieldKind::Select(OptionSource::Categories)).required(),
    FieldDescriptor::new("orderId", "Order ID", FieldKind::Text),
    FieldDescriptor::new("figmaLink", "Figma link", FieldKind::Url).placeholder("https://"),
    FieldDescriptor::new("websiteLink", "Website link", FieldKind::Url).placeholder("https://"),
    FieldDescriptor::new("adminLink", "Admin dashboard link", FieldKind::Url).placeholder("https://"),
];

const COLUMNS: &[&str] = &[
    "Client Name",
    "Profile",
    "Order ID",
    "Figma Link",
    "Website Link",
    "Admin Dashboard",
    "Category",
];

pub struct Projects;

impl Resource for Projects {
    type Record = Project;

    const KIND: ResourceKind = ResourceKind::Project;

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn id(record: &Project) -> &str {
        &record.id
    }

    fn label(record: &Project) -> &str {
        &record.name
    }

    fn cells(record: &Project) -> Vec<Cell> {
        let profile = record.profile.as_ref().and_then(Reference::name).unwrap_or("");
        let category = record.category.as_ref().and_then(Reference::name).unwrap_or("");

        vec![
            Cell::Text(record.name.clone()),
            Cell::Badge {
                text: profile.to_string(),
                color: (!profile.is_empty()).then(|| badge_color(profile)),
            },
            Cell::Text(record.order_id.clone().unwrap_or_default()),
            Cell::Link(record.figma_link.clone()),
            Cell::Link(record.website_link.clone()),
            Cell::Link(record.admin_link.clone()),
            Cell::Badge {
                text: category.to_string(),
                color: None,
            },
        ]
    }

    fn form_values(record: &Project) -> FormValues {
        FormValues::new()
            .with("name", record.name.clone())
            .with("profile", record.profile.as_ref().map(Reference::id).unwrap_or(""))
            .with("category", record.category.as_ref().map(Reference::id).unwrap_or(""))
            .with("orderId", record.order_id.clone().unwrap_or_default())
            .with("figmaLink", record.figma_link.clone().unwrap_or_default())
            .with("websiteLink", record.website_link.clone().unwrap_or_default())
            .with("adminLink", record.admin_link.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms;

    fn project() -> Project {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Storefront",
            "websiteLink": "https://shop.example.com",
            "category": { "_id": "c1", "name": "E-commerce" },
            "profile": { "_id": "pr1", "name": "Studio" },
            "orderId": "ORD-7"
        }))
        .unwrap()
    }

    #[test]
    fn test_cells_match_columns() {
        assert_eq!(Projects::cells(&project()).len(), Projects::columns().len());
    }

    #[test]
    fn test_form_values_use_reference_ids() {
        let values = Projects::form_values(&project());
        assert_eq!(values.get("category"), "c1");
        assert_eq!(values.get("profile"), "pr1");
        assert_eq!(values.get("figmaLink"), "");
    }

    #[test]
    fn test_prefilled_values_validate() {
        assert!(forms::validate(Projects::fields(), &Projects::form_values(&project())).is_ok());
    }

    #[test]
    fn test_category_required() {
        let values = FormValues::new().with("name", "Site");
        let errors = forms::validate(Projects::fields(), &values).unwrap_err();
        assert_eq!(errors.get("category"), Some("Category is required"));
    }

    #[test]
    fn test_payload_keys() {
        let body = Projects::payload(&Projects::form_values(&project()));
        assert_eq!(body["orderId"], "ORD-7");
        assert_eq!(body["category"], "c1");
        assert_eq!(body["websiteLink"], "https://shop.example.com");
    }
}
