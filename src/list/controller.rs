use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::Session;
use crate::backend::{BackendClient, BackendError, NamedEntity, Page};
use crate::forms::{self, FieldErrors, FormValues, OptionSource};
use crate::notify::Toast;
use crate::resources::{Resource, ResourceKind};
use crate::types::Mutation;

use super::cache::{CacheKey, Fence, QueryCache};
use super::ListState;

/// What every list controller needs from the application
#[derive(Clone)]
pub struct ListContext {
    pub backend: BackendClient,
    pub cache: Arc<QueryCache>,
    pub page_size: u32,
}

impl ListContext {
    pub fn new(backend: BackendClient, cache: Arc<QueryCache>, page_size: u32) -> Self {
        Self {
            backend,
            cache,
            page_size: page_size.max(1),
        }
    }

    /// Select options for a form field, cached alongside the pages of their kind
    pub async fn options(&self, source: OptionSource) -> Result<Arc<Vec<NamedEntity>>, BackendError> {
        let kind = match source {
            OptionSource::Categories => ResourceKind::Category,
            OptionSource::Profiles => ResourceKind::Profile,
        };
        let key = CacheKey::all(kind);
        self.fenced_read(key, || self.backend.fetch_all::<NamedEntity>(kind))
            .await
    }

    /// Cache-first read. A response overtaken by an invalidation is re-read once; one overtaken
    /// by a later read yields to the stored value.
    async fn fenced_read<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Arc<T>, BackendError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, BackendError>>,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            return Ok(hit);
        }

        let mut retried = false;
        loop {
            let ticket = self.cache.begin_read(key.clone());
            let value = Arc::new(fetch().await?);

            match self.cache.complete_read(ticket, value.clone()) {
                Fence::Stored => return Ok(value),
                Fence::Superseded => return Ok(self.cache.get::<T>(&key).unwrap_or(value)),
                Fence::Invalidated if !retried => retried = true,
                Fence::Invalidated => return Ok(value),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A delete the user has asked for but not yet confirmed
#[derive(Debug, Clone)]
pub struct PendingDelete {
    id: String,
    label: String,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The user answered the blocking confirmation
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Only obtainable through [`PendingDelete::confirm`]
#[derive(Debug)]
pub struct ConfirmedDelete {
    id: String,
}

/// One list view of resource `R`: its filters, its current page and the outcome of the last
/// request. Lives for one HTTP request and shares the cache with every other controller.
pub struct ListController<R: Resource> {
    ctx: ListContext,
    state: ListState,
    status: RequestStatus,
    page: Option<Arc<Page<R::Record>>>,
    notifications: Vec<Toast>,
    _resource: PhantomData<R>,
}

impl<R: Resource> ListController<R> {
    pub fn new(ctx: ListContext, state: ListState) -> Self {
        Self {
            ctx,
            state,
            status: RequestStatus::Idle,
            page: None,
            notifications: Vec::new(),
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn page(&self) -> Option<&Page<R::Record>> {
        self.page.as_deref()
    }

    pub fn page_size(&self) -> u32 {
        self.ctx.page_size
    }

    pub fn context(&self) -> &ListContext {
        &self.ctx
    }

    /// Read the page for the current state. A page past the end (the last item of the last page
    /// was deleted, or the URL was edited) is clamped to the last page and read once more.
    pub async fn load(&mut self) -> Result<&Page<R::Record>, BackendError> {
        self.status = RequestStatus::Loading;

        let mut page = match self.read().await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(resource = R::KIND.slug(), "list read failed: {}", e);
                self.status = RequestStatus::Error(e.user_message(&format!("Failed to load {}", R::KIND.plural_lower())));
                return Err(e);
            }
        };

        let last = page.pagination.total_pages.max(1);
        if self.state.page > last {
            tracing::debug!(resource = R::KIND.slug(), from = self.state.page, to = last, "clamping page");
            self.state.page = last;
            page = match self.read().await {
                Ok(page) => page,
                Err(e) => {
                    self.status = RequestStatus::Error(e.user_message("Failed to load page"));
                    return Err(e);
                }
            };
        }

        self.status = RequestStatus::Success;
        Ok(&**self.page.insert(page))
    }

    async fn read(&self) -> Result<Arc<Page<R::Record>>, BackendError> {
        let limit = self.ctx.page_size;
        let key = CacheKey::page(R::KIND, self.state.clone(), limit);
        let state = &self.state;
        self.ctx
            .fenced_read(key, || self.ctx.backend.fetch_page::<R::Record>(R::KIND, state, limit))
            .await
    }

    /// Record with `id` on the loaded page
    pub fn find(&self, id: &str) -> Option<&R::Record> {
        self.page()?.items.iter().find(|record| R::id(record) == id)
    }

    pub async fn create(&mut self, values: &FormValues, session: &Session) -> Result<(), MutationError> {
        self.mutate(Mutation::Create, None, Some(values), session).await
    }

    pub async fn update(&mut self, id: &str, values: &FormValues, session: &Session) -> Result<(), MutationError> {
        self.mutate(Mutation::Update, Some(id), Some(values), session).await
    }

    /// Start a delete of a record on the loaded page
    pub fn request_delete(&self, id: &str) -> Option<PendingDelete> {
        self.find(id).map(|record| PendingDelete {
            id: R::id(record).to_string(),
            label: R::label(record).to_string(),
        })
    }

    pub async fn delete(&mut self, confirmed: ConfirmedDelete, session: &Session) -> Result<(), MutationError> {
        self.mutate(Mutation::Delete, Some(&confirmed.id), None, session).await
    }

    async fn mutate(
        &mut self,
        mutation: Mutation,
        id: Option<&str>,
        values: Option<&FormValues>,
        session: &Session,
    ) -> Result<(), MutationError> {
        let body = match values {
            Some(values) => {
                forms::validate(R::fields(), values).map_err(MutationError::Invalid)?;
                Some(R::payload(values))
            }
            None => None,
        };

        let receipt = match self
            .ctx
            .backend
            .mutate(R::KIND, mutation, id, body.as_ref(), session.bearer())
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(resource = R::KIND.slug(), action = mutation.verb(), "mutation failed: {}", e);
                let fallback = format!("Failed to {} {}", mutation.verb(), R::KIND.singular().to_lowercase());
                self.notifications.push(Toast::error(e.user_message(&fallback)));
                return Err(e.into());
            }
        };

        tracing::info!(resource = R::KIND.slug(), action = mutation.verb(), id = id.unwrap_or(""), "mutation succeeded");
        let default_message = format!("{} {} successfully", R::KIND.singular(), mutation.past_tense());
        let message = match mutation {
            Mutation::Delete => receipt.message.filter(|m| !m.is_empty()).unwrap_or(default_message),
            _ => default_message,
        };
        self.notifications.push(Toast::success(message));

        self.invalidate();
        if let Err(e) = self.load().await {
            self.notifications
                .push(Toast::error(e.user_message(&format!("Failed to refresh {}", R::KIND.plural_lower()))));
        }
        Ok(())
    }

    /// Discard cached reads of this kind and of kinds that embed it
    pub fn invalidate(&self) {
        self.ctx.cache.invalidate(R::KIND);
        for dependent in R::KIND.dependents() {
            self.ctx.cache.invalidate(*dependent);
        }
    }

    pub fn notifications(&self) -> &[Toast] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::Role;
    use crate::config::BackendConfig;
    use crate::resources::{Categories, Projects};

    fn context(server: &MockServer) -> ListContext {
        let backend = BackendClient::new(&BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap();
        ListContext::new(backend, Arc::new(QueryCache::new(Duration::from_secs(60))), 10)
    }

    fn admin() -> Session {
        Session {
            sub: "u1".into(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
            access_token: Some("backend-token".into()),
            exp: i64::MAX,
            iat: 0,
        }
    }

    fn projects(range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
        range
            .map(|i| {
                json!({
                    "_id": format!("p{}", i),
                    "name": format!("Project {}", i),
                    "category": { "_id": "c1", "name": "Web" },
                    "profile": { "_id": "pr1", "name": "Studio" }
                })
            })
            .collect()
    }

    fn categories(ids: &[&str], total: u64, page: u32) -> Value {
        let data: Vec<Value> = ids.iter().map(|id| json!({ "_id": id, "name": id.to_uppercase() })).collect();
        json!({
            "success": true,
            "data": data,
            "pagination": { "total": total, "page": page, "limit": 10, "totalPages": total.div_ceil(10) }
        })
    }

    async fn mount_project_page(server: &MockServer, page: u32, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("page", page.to_string()))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": items,
                "pagination": { "total": 25, "page": page, "limit": 10, "totalPages": 3 }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_walks_25_projects_in_pages_of_10() {
        let server = MockServer::start().await;
        mount_project_page(&server, 1, projects(1..=10)).await;
        mount_project_page(&server, 2, projects(11..=20)).await;
        mount_project_page(&server, 3, projects(21..=25)).await;

        let mut list = ListController::<Projects>::new(context(&server), ListState::default());

        let page = list.load().await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].id, "p1");
        assert!(!page.pagination.has_prev_page);
        assert!(page.pagination.has_next_page);
        assert_eq!(page.pagination.total_pages, 3);

        let pagination = page.pagination;
        list.state_mut().next(&pagination).unwrap();
        let page = list.load().await.unwrap();
        assert_eq!(page.items[0].id, "p11");
        assert_eq!(page.pagination.item_range(), (11, 20));
        assert!(page.pagination.has_prev_page && page.pagination.has_next_page);

        let pagination = page.pagination;
        list.state_mut().next(&pagination).unwrap();
        let page = list.load().await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(!page.pagination.has_next_page);

        let pagination = page.pagination;
        assert_eq!(list.state_mut().next(&pagination), Err(crate::list::NavError::AtLastPage));
        assert_eq!(list.state().page, 3);
        assert_eq!(list.status(), &RequestStatus::Success);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .and(query_param("page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&[], 12, 5)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["c11", "c12"], 12, 2)))
            .mount(&server)
            .await;

        let mut list = ListController::<Categories>::new(context(&server), ListState::default().with_page(5));
        let page = list.load().await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(list.state().page, 2);
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut list = ListController::<Categories>::new(context(&server), ListState::default());
        let err = list
            .create(&FormValues::new().with("name", "  "), &admin())
            .await
            .unwrap_err();

        match err {
            MutationError::Invalid(errors) => {
                assert_eq!(errors.get("name"), Some("Category name is required"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(list.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches_without_the_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["c1", "c2"], 2, 1)))
            .with_priority(1)
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["c2"], 1, 1)))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/categories/c1"))
            .and(header("authorization", "Bearer backend-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "deleted" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut list = ListController::<Categories>::new(context(&server), ListState::default());
        list.load().await.unwrap();

        let pending = list.request_delete("c1").expect("c1 is on the page");
        assert_eq!(pending.label(), "C1");
        list.delete(pending.confirm(), &admin()).await.unwrap();

        assert_eq!(list.notifications(), &[Toast::success("deleted")]);
        let ids: Vec<&str> = list.page().unwrap().items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);
        assert!(list.request_delete("c1").is_none());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_page_and_reports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["c1"], 1, 1)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/categories/c1"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "success": false, "message": "Category already exists" })),
            )
            .mount(&server)
            .await;

        let mut list = ListController::<Categories>::new(context(&server), ListState::default());
        list.load().await.unwrap();

        let err = list
            .update("c1", &FormValues::new().with("name", "Dup"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::Backend(BackendError::Api { status: 409, .. })));
        assert_eq!(list.notifications(), &[Toast::error("Category already exists")]);
        assert_eq!(list.page().unwrap().items[0].name, "C1");
    }

    #[tokio::test]
    async fn test_category_change_invalidates_projects() {
        let server = MockServer::start().await;
        let ctx = context(&server);
        let ticket = ctx.cache.begin_read(CacheKey::all(ResourceKind::Project));
        ctx.cache.complete_read(ticket, Arc::new(0u8));

        let list = ListController::<Categories>::new(ctx.clone(), ListState::default());
        list.invalidate();

        assert!(ctx.cache.is_empty());
        assert_eq!(ctx.cache.generation(ResourceKind::Project), 1);
    }

    #[tokio::test]
    async fn test_update_with_path_like_id_never_leaves_the_collection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(0)
            .mount(&server)
            .await;

        let mut list = ListController::<Categories>::new(context(&server), ListState::default());
        let err = list
            .update("../profile/victim", &FormValues::new().with("name", "X"), &admin())
            .await
            .unwrap_err();

        assert!(matches!(err, MutationError::Backend(BackendError::InvalidId(_))));
        assert_eq!(list.notifications(), &[Toast::error("Record not found")]);
        assert!(list.page().is_none());
    }

    #[tokio::test]
    async fn test_read_invalidated_in_flight_is_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(categories(&["stale"], 1, 1))
                    .set_delay(Duration::from_millis(300)),
            )
            .with_priority(1)
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["fresh"], 1, 1)))
            .mount(&server)
            .await;

        let ctx = context(&server);
        let mut list = ListController::<Categories>::new(ctx.clone(), ListState::default());
        let writer = ListController::<Categories>::new(ctx.clone(), ListState::default());

        let (page, ()) = tokio::join!(list.load(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            writer.invalidate();
        });
        let ids: Vec<String> = page.unwrap().items.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["fresh"]);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);

        // Served from the cache: the stale body was never stored
        let mut again = ListController::<Categories>::new(ctx, ListState::default());
        assert_eq!(again.load().await.unwrap().items[0].id, "fresh");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overtaken_read_yields_to_the_later_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(categories(&["old"], 1, 1))
                    .set_delay(Duration::from_millis(300)),
            )
            .with_priority(1)
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories/pagination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories(&["new"], 1, 1)))
            .mount(&server)
            .await;

        let ctx = context(&server);
        let mut early = ListController::<Categories>::new(ctx.clone(), ListState::default());
        let mut late = ListController::<Categories>::new(ctx.clone(), ListState::default());

        let (early_page, late_id) = tokio::join!(early.load(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            late.load().await.map(|page| page.items[0].id.clone())
        });

        assert_eq!(late_id.unwrap(), "new");
        assert_eq!(early_page.unwrap().items[0].id, "new");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert_eq!(ctx.cache.len(), 1);
    }
}
