use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::backend::Pagination;

/// Hidden form fields that carry the list state through create/edit/delete round trips
pub const SEARCH_FIELD: &str = "_search";
pub const CATEGORY_FIELD: &str = "_category";
pub const PAGE_FIELD: &str = "_page";

/// Filter and page of one list view.
///
/// Changing either filter puts the view back on page 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListState {
    pub search: String,
    pub category: Option<String>,
    pub page: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("page {requested} is outside 1..={total_pages}")]
    OutOfRange { requested: u32, total_pages: u32 },
    #[error("already on the first page")]
    AtFirstPage,
    #[error("already on the last page")]
    AtLastPage,
}

/// Query string of `GET /dashboard/{slug}`. Values stay strings so a malformed page
/// falls back to 1 instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

impl ListState {
    pub fn from_params(params: &ListParams) -> Self {
        Self::build(
            params.search.as_deref(),
            params.category.as_deref(),
            params.page.as_deref(),
        )
    }

    pub fn from_form(form: &HashMap<String, String>) -> Self {
        Self::build(
            form.get(SEARCH_FIELD).map(String::as_str),
            form.get(CATEGORY_FIELD).map(String::as_str),
            form.get(PAGE_FIELD).map(String::as_str),
        )
    }

    fn build(search: Option<&str>, category: Option<&str>, page: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or("").trim().to_string(),
            category: normalize_category(category),
            page: page.and_then(|p| p.trim().parse().ok()).filter(|p| *p >= 1).unwrap_or(1),
        }
    }

    pub fn set_search(&mut self, search: &str) {
        let search = search.trim();
        if self.search != search {
            self.search = search.to_string();
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        let category = normalize_category(category);
        if self.category != category {
            self.category = category;
            self.page = 1;
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.category.is_some()
    }

    /// Jump to `page`, which must lie in `[1, total_pages]`
    pub fn goto(&mut self, page: u32, pagination: &Pagination) -> Result<(), NavError> {
        let total_pages = pagination.total_pages.max(1);
        if page == 0 || page > total_pages {
            return Err(NavError::OutOfRange {
                requested: page,
                total_pages,
            });
        }
        self.page = page;
        Ok(())
    }

    pub fn next(&mut self, pagination: &Pagination) -> Result<(), NavError> {
        if !pagination.has_next_page || self.page >= pagination.total_pages {
            return Err(NavError::AtLastPage);
        }
        self.page += 1;
        Ok(())
    }

    pub fn prev(&mut self, pagination: &Pagination) -> Result<(), NavError> {
        if !pagination.has_prev_page || self.page <= 1 {
            return Err(NavError::AtFirstPage);
        }
        self.page -= 1;
        Ok(())
    }

    /// Same filters on another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// `search=..&category=..&page=..`, leaving out empty filters
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if self.page != 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }

    /// List URL for this state under `base`
    pub fn href(&self, base: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }

    /// Hidden field name/value pairs
    pub fn hidden_fields(&self) -> [(&'static str, String); 3] {
        [
            (SEARCH_FIELD, self.search.clone()),
            (CATEGORY_FIELD, self.category.clone().unwrap_or_default()),
            (PAGE_FIELD, self.page.to_string()),
        ]
    }
}

// The category select submits "all" for "no filter"
fn normalize_category(category: Option<&str>) -> Option<String> {
    match category.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(id) => Some(id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = ListState {
            page: 3,
            ..ListState::default()
        };
        state.set_search("shop");
        assert_eq!(state.page, 1);

        state.page = 2;
        state.set_search("shop");
        assert_eq!(state.page, 2, "unchanged search keeps the page");

        state.set_category(Some("c1"));
        assert_eq!(state.page, 1);
        assert_eq!(state.category.as_deref(), Some("c1"));
    }

    #[test]
    fn test_all_category_means_no_filter() {
        let mut state = ListState::default();
        state.set_category(Some("all"));
        assert_eq!(state.category, None);
    }

    #[test]
    fn test_navigation_bounds() {
        let first = Pagination::compute(25, 1, 10);
        let mut state = ListState::default();
        assert_eq!(state.prev(&first), Err(NavError::AtFirstPage));
        assert!(state.next(&first).is_ok());
        assert_eq!(state.page, 2);

        let last = Pagination::compute(25, 3, 10);
        let mut state = state.with_page(3);
        assert_eq!(state.next(&last), Err(NavError::AtLastPage));
        assert_eq!(
            state.goto(4, &last),
            Err(NavError::OutOfRange {
                requested: 4,
                total_pages: 3
            })
        );
        assert!(state.goto(0, &last).is_err());
        assert!(state.goto(1, &last).is_ok());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_malformed_page_falls_back_to_first() {
        let params = ListParams {
            page: Some("abc".into()),
            ..ListParams::default()
        };
        assert_eq!(ListState::from_params(&params).page, 1);

        let params = ListParams {
            page: Some("0".into()),
            ..ListParams::default()
        };
        assert_eq!(ListState::from_params(&params).page, 1);
    }

    #[test]
    fn test_href_round_trips_through_hidden_fields() {
        let state = ListState {
            search: "web shop".into(),
            category: Some("c1".into()),
            page: 2,
        };
        assert_eq!(
            state.href("/dashboard/projects"),
            "/dashboard/projects?search=web+shop&category=c1&page=2"
        );

        let form: HashMap<String, String> = state
            .hidden_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(ListState::from_form(&form), state);
        assert_eq!(ListState::default().href("/x"), "/x");
    }
}
