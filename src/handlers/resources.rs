//! One generic set of CRUD handlers, instantiated per [`Resource`] in the router.

use std::collections::HashMap;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::Session;
use crate::backend::NamedEntity;
use crate::error::DashboardError;
use crate::forms::{FieldErrors, FieldKind, FormValues, OptionSource};
use crate::list::{ListContext, ListController, ListParams, ListState, MutationError};
use crate::notify::{self, Flash, Toast};
use crate::resources::Resource;
use crate::state::AppState;
use crate::types::Mutation;
use crate::views::form::{FormView, SelectOptions};
use crate::views::{self, form, pages, table};

/// GET /dashboard/{slug}
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    flash: Flash,
    Query(params): Query<ListParams>,
) -> Response {
    let ctx = state.list_context();
    let categories = filter_options::<R>(&ctx).await;

    let mut controller = ListController::<R>::new(ctx, ListState::from_params(&params));
    let load_error = controller
        .load()
        .await
        .err()
        .map(|e| e.user_message(&format!("Failed to load {}", R::KIND.plural_lower())));

    let body = table::render::<R>(controller.page(), controller.state(), &categories, load_error.as_deref());
    let html = views::layout(R::KIND.title(), &R::KIND.list_path(), &session, &flash.0, &body);
    let status = if load_error.is_some() { StatusCode::BAD_GATEWAY } else { StatusCode::OK };
    views::render(status, html, &flash)
}

/// GET /dashboard/{slug}/new
pub async fn new_form<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Response {
    let list_state = ListState::from_params(&params);
    let (options, notices) = select_options::<R>(&state.list_context()).await;
    let html = form_page::<R>(
        &session,
        Mutation::Create,
        &R::KIND.list_path(),
        &FormValues::new(),
        None,
        &options,
        &list_state,
        &notices,
    );
    Html(html).into_response()
}

/// POST /dashboard/{slug}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let list_state = ListState::from_form(&form);
    let values = FormValues::from(form);
    let mut controller = ListController::<R>::new(state.list_context(), list_state);

    let result = controller.create(&values, &session).await;
    finish_write(controller, result, &session, Mutation::Create, &R::KIND.list_path(), &values).await
}

/// GET /dashboard/{slug}/:id/edit
pub async fn edit_form<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, DashboardError> {
    let ctx = state.list_context();
    let mut controller = ListController::<R>::new(ctx.clone(), ListState::from_params(&params));
    controller.load().await?;

    let record = controller
        .find(&id)
        .ok_or_else(|| DashboardError::not_found(format!("{} not found", R::KIND.singular())))?;
    let values = R::form_values(record);

    let (options, notices) = select_options::<R>(&ctx).await;
    let html = form_page::<R>(
        &session,
        Mutation::Update,
        &R::KIND.record_path(&id),
        &values,
        None,
        &options,
        controller.state(),
        &notices,
    );
    Ok(Html(html).into_response())
}

/// POST /dashboard/{slug}/:id
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let list_state = ListState::from_form(&form);
    let values = FormValues::from(form);
    let mut controller = ListController::<R>::new(state.list_context(), list_state);

    let result = controller.update(&id, &values, &session).await;
    let action = R::KIND.record_path(&id);
    finish_write(controller, result, &session, Mutation::Update, &action, &values).await
}

/// GET /dashboard/{slug}/:id/delete
pub async fn delete_confirm<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, DashboardError> {
    let mut controller = ListController::<R>::new(state.list_context(), ListState::from_params(&params));
    controller.load().await?;

    let pending = controller
        .request_delete(&id)
        .ok_or_else(|| DashboardError::not_found(format!("{} not found", R::KIND.singular())))?;

    let list_path = R::KIND.list_path();
    let html = pages::confirm_delete(
        &session,
        &list_path,
        &R::KIND.singular().to_lowercase(),
        pending.label(),
        &format!("{}/delete", R::KIND.record_path(pending.id())),
        &controller.state().hidden_fields(),
        &controller.state().href(&list_path),
    );
    Ok(Html(html).into_response())
}

/// POST /dashboard/{slug}/:id/delete - the submit of the confirmation page
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let list_path = R::KIND.list_path();
    let mut controller = ListController::<R>::new(state.list_context(), ListState::from_form(&form));

    if let Err(e) = controller.load().await {
        let toast = Toast::error(e.user_message(&format!("Failed to load {}", R::KIND.plural_lower())));
        return notify::redirect_with(&controller.state().href(&list_path), &[toast]);
    }

    let Some(pending) = controller.request_delete(&id) else {
        let toast = Toast::error(format!("{} not found", R::KIND.singular()));
        return notify::redirect_with(&controller.state().href(&list_path), &[toast]);
    };

    // Failures are already queued as notifications
    let _ = controller.delete(pending.confirm(), &session).await;
    notify::redirect_with(&controller.state().href(&list_path), &controller.take_notifications())
}

/// Redirect back to the list after a successful write, or re-render the form with what went wrong
async fn finish_write<R: Resource>(
    mut controller: ListController<R>,
    result: Result<(), MutationError>,
    session: &Session,
    mutation: Mutation,
    action: &str,
    values: &FormValues,
) -> Response {
    let list_path = R::KIND.list_path();
    let (status, errors) = match result {
        Ok(()) => {
            let back = controller.state().href(&list_path);
            return notify::redirect_with(&back, &controller.take_notifications());
        }
        Err(MutationError::Invalid(errors)) => (StatusCode::UNPROCESSABLE_ENTITY, Some(errors)),
        Err(MutationError::Backend(e)) => {
            let status = e
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (status, None)
        }
    };

    let (options, option_notices) = select_options::<R>(controller.context()).await;
    let mut notices = controller.take_notifications();
    notices.extend(option_notices);
    let html = form_page::<R>(
        session,
        mutation,
        action,
        values,
        errors.as_ref(),
        &options,
        controller.state(),
        &notices,
    );
    (status, Html(html)).into_response()
}

#[allow(clippy::too_many_arguments)]
fn form_page<R: Resource>(
    session: &Session,
    mutation: Mutation,
    action: &str,
    values: &FormValues,
    errors: Option<&FieldErrors>,
    options: &SelectOptions,
    list_state: &ListState,
    notices: &[Toast],
) -> String {
    let list_path = R::KIND.list_path();
    let title = match mutation {
        Mutation::Update => format!("Edit {}", R::KIND.singular()),
        _ => format!("Add {}", R::KIND.singular()),
    };
    let submit = match mutation {
        Mutation::Update => "Save changes".to_string(),
        _ => format!("Create {}", R::KIND.singular().to_lowercase()),
    };

    let body = form::render(&FormView {
        fields: R::fields(),
        values,
        errors,
        options,
        action,
        hidden: &list_state.hidden_fields(),
        submit: &submit,
        cancel: Some(&list_state.href(&list_path)),
    });
    views::layout(&title, &list_path, session, notices, &body)
}

/// Options for every select field of `R`. A failed source leaves its select empty and adds a notice.
async fn select_options<R: Resource>(ctx: &ListContext) -> (SelectOptions, Vec<Toast>) {
    let mut options = SelectOptions::new();
    let mut notices = Vec::new();

    for field in R::fields() {
        let FieldKind::Select(source) = field.kind else {
            continue;
        };
        if options.contains_key(&source) {
            continue;
        }
        match ctx.options(source).await {
            Ok(entries) => {
                options.insert(source, entries);
            }
            Err(e) => {
                tracing::warn!(field = field.name, "select options unavailable: {}", e);
                notices.push(Toast::error(e.user_message(&format!("Failed to load {} options", field.label.to_lowercase()))));
            }
        }
    }
    (options, notices)
}

/// Category filter entries for list views that support filtering
async fn filter_options<R: Resource>(ctx: &ListContext) -> Vec<NamedEntity> {
    if !R::KIND.supports_filters() {
        return Vec::new();
    }
    match ctx.options(OptionSource::Categories).await {
        Ok(entries) => entries.as_ref().clone(),
        Err(e) => {
            tracing::warn!("category filter unavailable: {}", e);
            Vec::new()
        }
    }
}
