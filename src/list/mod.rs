//! The paginated resource list: filter state, the shared query cache and the generic controller
//! that loads, mutates and refreshes any [`Resource`](crate::resources::Resource).

pub mod cache;
mod controller;
mod state;

pub use cache::{CacheKey, Fence, QueryCache, ReadTicket};
pub use controller::{
    ConfirmedDelete, ListContext, ListController, MutationError, PendingDelete, RequestStatus,
};
pub use state::{ListParams, ListState, NavError, CATEGORY_FIELD, PAGE_FIELD, SEARCH_FIELD};
