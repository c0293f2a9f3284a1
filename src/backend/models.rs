use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Pagination metadata describing one page of a larger collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

/// Pagination as the backend sends it. Only `total` is mandatory; the projects endpoint omits
/// the prev/next flags and some deployments omit `totalPages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePagination {
    pub total: u64,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total_pages: Option<u32>,
    pub has_prev_page: Option<bool>,
    pub has_next_page: Option<bool>,
}

impl Pagination {
    pub fn compute(total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit as u64) as u32;
        let page = page.max(1);

        Self {
            total,
            page,
            limit,
            total_pages,
            has_prev_page: page > 1,
            has_next_page: page < total_pages,
        }
    }

    pub(crate) fn from_wire(wire: WirePagination, requested_page: u32, requested_limit: u32) -> Self {
        let mut computed = Self::compute(
            wire.total,
            wire.page.unwrap_or(requested_page),
            wire.limit.unwrap_or(requested_limit),
        );
        if let Some(total_pages) = wire.total_pages {
            computed.total_pages = total_pages;
            computed.has_next_page = computed.page < total_pages;
        }
        if let Some(prev) = wire.has_prev_page {
            computed.has_prev_page = prev;
        }
        if let Some(next) = wire.has_next_page {
            computed.has_next_page = next;
        }
        computed
    }

    /// 1-based index range of the items on this page, `(0, 0)` for an empty collection
    pub fn item_range(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 0);
        }
        let first = (self.page as u64 - 1) * self.limit as u64 + 1;
        let last = (self.page as u64 * self.limit as u64).min(self.total);
        (first.min(self.total), last)
    }
}

/// One page of a collection. Replaced wholesale on every read.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Reference to another entity: resolved into `{ _id, name }` by list endpoints, a bare id elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Resolved {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
    Id(String),
}

impl Reference {
    pub fn id(&self) -> &str {
        match self {
            Reference::Resolved { id, .. } => id,
            Reference::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Resolved { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub figma_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub admin_link: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub category: Option<Reference>,
    #[serde(default)]
    pub profile: Option<Reference>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Minimal `{ _id, name }` shape used for select options
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "fullName")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginData {
    pub user: BackendUser,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_projects: u64,
    #[serde(default)]
    pub total_categories: u64,
    #[serde(default)]
    pub total_profiles: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjects {
    pub month: String,
    #[serde(default)]
    pub total_projects: u64,
}

/// What a successful write returned that the UI cares about
#[derive(Debug, Clone, Default)]
pub struct MutationReceipt {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_pagination_for_25_items() {
        let first = Pagination::compute(25, 1, 10);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_prev_page);
        assert!(first.has_next_page);
        assert_eq!(first.item_range(), (1, 10));

        let last = Pagination::compute(25, 3, 10);
        assert!(last.has_prev_page);
        assert!(!last.has_next_page);
        assert_eq!(last.item_range(), (21, 25));
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let p = Pagination::compute(0, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert_eq!(p.item_range(), (0, 0));
    }

    #[test]
    fn test_wire_flags_win_over_computed() {
        let wire: WirePagination = serde_json::from_value(serde_json::json!({
            "total": 30, "page": 2, "limit": 10, "totalPages": 3,
            "hasPrevPage": true, "hasNextPage": true
        }))
        .unwrap();
        let p = Pagination::from_wire(wire, 1, 10);
        assert_eq!(p.page, 2);
        assert!(p.has_prev_page && p.has_next_page);
    }

    #[test]
    fn test_wire_without_flags_is_completed() {
        let wire: WirePagination = serde_json::from_value(serde_json::json!({ "total": 25 })).unwrap();
        let p = Pagination::from_wire(wire, 3, 10);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next_page);
    }

    #[test]
    fn test_project_with_resolved_and_bare_references() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Storefront",
            "figmaLink": "https://figma.com/x",
            "category": { "_id": "c1", "name": "E-commerce" },
            "profile": "pr1",
            "orderId": null
        }))
        .unwrap();

        assert_eq!(project.category.as_ref().and_then(Reference::name), Some("E-commerce"));
        assert_eq!(project.profile.as_ref().map(Reference::id), Some("pr1"));
        assert_eq!(project.order_id, None);
    }

    #[test]
    fn test_backend_user_accepts_full_name() {
        let user: BackendUser = serde_json::from_value(serde_json::json!({
            "_id": "u1", "fullName": "Ada", "email": "a@b.c", "role": "admin"
        }))
        .unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.role, Role::Admin);
    }
}
