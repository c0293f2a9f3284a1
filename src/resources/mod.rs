//! The three managed entity types and the trait that lets one controller, one set of handlers and
//! one renderer serve all of them.

mod category;
mod profile;
mod project;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::color::BadgeColor;
use crate::forms::{self, FieldDescriptor, FormValues};

pub use category::Categories;
pub use profile::Profiles;
pub use project::Projects;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Category,
    Profile,
}

impl ResourceKind {
    /// Path segment under `/dashboard`
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Category => "categories",
            ResourceKind::Profile => "profile",
        }
    }

    /// Backend path for writes and unpaginated reads
    pub fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Category => "categories",
            ResourceKind::Profile => "profile",
        }
    }

    /// Backend path for paginated reads
    pub fn page_path(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Category => "categories/pagination",
            ResourceKind::Profile => "profile/pagination",
        }
    }

    /// Only the projects endpoint understands `search` and `category`
    pub fn supports_filters(self) -> bool {
        matches!(self, ResourceKind::Project)
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Project => "Project",
            ResourceKind::Category => "Category",
            ResourceKind::Profile => "Profile",
        }
    }

    /// Heading of the list page and sidebar label
    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::Project => "All Projects",
            ResourceKind::Category => "Categories",
            ResourceKind::Profile => "Profiles",
        }
    }

    pub fn plural_lower(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Category => "categories",
            ResourceKind::Profile => "profiles",
        }
    }

    /// Kinds whose cached pages embed this kind's data and go stale when it changes
    pub fn dependents(self) -> &'static [ResourceKind] {
        match self {
            ResourceKind::Project => &[],
            ResourceKind::Category | ResourceKind::Profile => &[ResourceKind::Project],
        }
    }

    pub fn list_path(self) -> String {
        format!("/dashboard/{}", self.slug())
    }

    /// `/dashboard/{slug}/{id}` with the id percent-encoded into a single segment
    pub fn record_path(self, id: &str) -> String {
        format!("{}/{}", self.list_path(), encode_segment(id))
    }
}

// Form encoding leaves only `*-._` and alphanumerics bare; its `+` for space is not valid in a path
fn encode_segment(id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    match encoded.as_str() {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => encoded.replace('+', "%20"),
    }
}

/// One rendered table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Link(Option<String>),
    Badge { text: String, color: Option<BadgeColor> },
    Date(Option<DateTime<Utc>>),
}

/// Everything that differs between projects, categories and profiles.
pub trait Resource: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + Send + Sync + 'static;

    const KIND: ResourceKind;

    /// Form fields, in display order
    fn fields() -> &'static [FieldDescriptor];

    /// Table column headings, matching `cells`
    fn columns() -> &'static [&'static str];

    fn id(record: &Self::Record) -> &str;

    /// Human label used in confirmations
    fn label(record: &Self::Record) -> &str;

    fn cells(record: &Self::Record) -> Vec<Cell>;

    /// Prefill values for the edit form
    fn form_values(record: &Self::Record) -> FormValues;

    fn payload(values: &FormValues) -> Value {
        forms::payload(Self::fields(), values)
    }
}
