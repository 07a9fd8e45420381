// Entry pages: role selection and the technician self-service view

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tera::Context;

use common::validation::parse_natural_id;

use crate::handlers::shared_utils::render;
use crate::handlers::tasks::{insert_task_pane, TaskPaneParams};
use crate::handlers::ErrorResponse;
use crate::state::AppState;

/// Role selection screen
#[tracing::instrument]
pub async fn index_page() -> Result<Html<String>, ErrorResponse> {
    render("index.html", &Context::new())
}

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    pub technician_id: String,
}

fn lookup_feedback(entered: &str, message: &str) -> Result<Response, ErrorResponse> {
    let mut context = Context::new();
    context.insert("lookup_value", entered);
    context.insert("lookup_error", message);
    render("index.html", &context).map(IntoResponse::into_response)
}

/// Technician sign-in by id. A known id redirects to the self-service page;
/// anything else re-renders the selection screen with a message.
#[tracing::instrument(skip(state))]
pub async fn lookup_technician(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Result<Response, ErrorResponse> {
    let id = match parse_natural_id(&form.technician_id, "technician_id") {
        Ok(id) => id,
        Err(e) => return lookup_feedback(&form.technician_id, &e.message),
    };

    match state.client.get_technician(id).await {
        Ok(technician) => Ok(
            Redirect::to(&format!("/technicians/{}", technician.technician_id)).into_response(),
        ),
        Err(e) if e.is_not_found() => lookup_feedback(
            &form.technician_id,
            &format!("Технический работник {} не найден", id),
        ),
        Err(e) => lookup_feedback(&form.technician_id, &format!("Error: {}", e.detail())),
    }
}

/// Technician self-service page: profile card plus the scoped task pane
#[tracing::instrument(skip(state))]
pub async fn technician_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ErrorResponse> {
    let technician = state.client.get_technician(id).await?;

    let mut context = Context::new();
    context.insert("technician", &technician);
    let params = TaskPaneParams::for_technician(id);
    insert_task_pane(&state, &mut context, &params).await?;
    render("technician.html", &context)
}
