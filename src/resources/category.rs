use crate::backend::Category;
use crate::forms::{FieldDescriptor, FieldKind, FormValues};

use super::{Cell, Resource, ResourceKind};

const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("name", "Category name", FieldKind::Text)
    .required()
    .placeholder("Category name")];

pub struct Categories;

impl Resource for Categories {
    type Record = Category;

    const KIND: ResourceKind = ResourceKind::Category;

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Created"]
    }

    fn id(record: &Category) -> &str {
        &record.id
    }

    fn label(record: &Category) -> &str {
        &record.name
    }

    fn cells(record: &Category) -> Vec<Cell> {
        vec![Cell::Text(record.name.clone()), Cell::Date(record.created_at)]
    }

    fn form_values(record: &Category) -> FormValues {
        FormValues::new().with("name", record.name.clone())
    }
}
