pub mod auth;
pub mod backend;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod list;
pub mod middleware;
pub mod notify;
pub mod resources;
pub mod state;
pub mod types;
pub mod views;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth as auth_pages, overview, resources as crud};
use crate::resources::{Categories, Profiles, Projects, Resource};
pub use crate::state::AppState;

/// Complete dashboard router
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(overview::show))
        .route("/logout", get(auth_pages::logout_confirm).post(auth_pages::logout))
        .merge(resource_routes::<Projects>())
        .merge(resource_routes::<Categories>())
        .merge(resource_routes::<Profiles>())
        .route_layer(from_fn_with_state(state.clone(), middleware::session_guard));

    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/login", get(auth_pages::login_form).post(auth_pages::login_submit))
        .route("/register", get(auth_pages::register_form).post(auth_pages::register_submit))
        // Session guard
        .merge(protected)
        .fallback(handlers::not_found)
        .with_state(state.clone());

    if state.config.server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// List, create, edit and delete routes for one resource
fn resource_routes<R: Resource>() -> Router<AppState> {
    let base = R::KIND.list_path();

    Router::new()
        .route(&base, get(crud::list::<R>).post(crud::create::<R>))
        .route(&format!("{}/new", base), get(crud::new_form::<R>))
        .route(&format!("{}/:id", base), post(crud::update::<R>))
        .route(&format!("{}/:id/edit", base), get(crud::edit_form::<R>))
        .route(
            &format!("{}/:id/delete", base),
            get(crud::delete_confirm::<R>).post(crud::delete::<R>),
        )
}
