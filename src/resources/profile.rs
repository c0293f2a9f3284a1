use crate::backend::Profile;
use crate::color::badge_color;
use crate::forms::{FieldDescriptor, FieldKind, FormValues};

use super::{Cell, Resource, ResourceKind};

const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("name", "Profile name", FieldKind::Text)
    .required()
    .placeholder("Profile name")];

pub struct Profiles;

impl Resource for Profiles {
    type Record = Profile;

    const KIND: ResourceKind = ResourceKind::Profile;

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Created"]
    }

    fn id(record: &Profile) -> &str {
        &record.id
    }

    fn label(record: &Profile) -> &str {
        &record.name
    }

    fn cells(record: &Profile) -> Vec<Cell> {
        vec![
            Cell::Badge {
                text: record.name.clone(),
                color: Some(badge_color(&record.name)),
            },
            Cell::Date(record.created_at),
        ]
    }

    fn form_values(record: &Profile) -> FormValues {
        FormValues::new().with("name", record.name.clone())
    }
}
