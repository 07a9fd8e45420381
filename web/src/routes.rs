use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
#[tracing::instrument(skip(state))]
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Full pages
    let page_routes = Router::new()
        .route(
            "/",
            get(handlers::pages::index_page).post(handlers::pages::lookup_technician),
        )
        .route("/health", get(handlers::health::health_check))
        .route("/foremen", get(handlers::foremen::foremen_page))
        .route("/technicians/:id", get(handlers::pages::technician_page));

    // Pane partials and dialog fragments (HTMX)
    let fragment_routes = Router::new()
        .route("/fragments/foremen", get(handlers::foremen::foremen_partial))
        .route(
            "/fragments/technicians",
            get(handlers::technicians::technicians_partial),
        )
        .route("/fragments/tasks", get(handlers::tasks::tasks_partial))
        .route("/foremen/new", get(handlers::foremen::foreman_form))
        .route("/foremen/:id/edit", get(handlers::foremen::foreman_edit_form))
        .route("/foremen/:id/card", get(handlers::foremen::foreman_card))
        .route("/technicians/new", get(handlers::technicians::technician_form))
        .route(
            "/technicians/:id/edit",
            get(handlers::technicians::technician_edit_form),
        )
        .route(
            "/technicians/:id/card",
            get(handlers::technicians::technician_card),
        )
        .route("/tasks/new", get(handlers::tasks::task_form))
        .route("/tasks/:id/edit", get(handlers::tasks::task_edit_form))
        .route(
            "/tasks/:id/description",
            get(handlers::tasks::task_description),
        );

    // Form submissions
    let action_routes = Router::new()
        .route("/foremen", post(handlers::foremen::create_foreman))
        .route("/foremen/:id", post(handlers::foremen::update_foreman))
        .route("/technicians", post(handlers::technicians::create_technician))
        .route(
            "/technicians/:id",
            post(handlers::technicians::update_technician),
        )
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/:id", post(handlers::tasks::update_task))
        .route("/tasks/:id/status", post(handlers::tasks::update_task_status));

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .merge(fragment_routes)
        .merge(action_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
