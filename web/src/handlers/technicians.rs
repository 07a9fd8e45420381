// Technicians pane: paginated roster, creation and edit dialogs, detail card

use axum::extract::{Path, Query, State};
use axum::http::{header::HeaderName, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tera::Context;

use common::cache::CacheKey;
use common::errors::FieldError;
use common::validation::{TechnicianCreateForm, TechnicianUpdateForm};

use crate::handlers::foremen::GENDERS;
use crate::handlers::shared_utils::{
    calculate_pagination, field_errors_map, page_slice, render, retarget, setup_htmx_context,
    toast_trigger, with_trigger, ListParams,
};
use crate::handlers::ErrorResponse;
use crate::state::AppState;

pub async fn insert_technicians_pane(
    state: &AppState,
    context: &mut Context,
    params: &ListParams,
) -> Result<(), ErrorResponse> {
    let limit = params.limit.unwrap_or(state.config.ui.page_size).max(1);
    let offset = params.offset.unwrap_or(0);

    let technicians = state.technicians().await?;
    let total_count = technicians.len() as i64;
    let (page, total_pages) = calculate_pagination(offset, limit, total_count);

    context.insert("active_tab", "technicians");
    context.insert("technicians", &page_slice(&technicians, offset, limit));
    context.insert("limit", &limit);
    context.insert("offset", &offset);
    context.insert("page", &page);
    context.insert("total_pages", &total_pages);
    context.insert("total_count", &total_count);
    context.insert("has_prev", &(offset > 0));
    context.insert("has_next", &(offset + limit < total_count));
    context.insert("prev_offset", &(offset - limit).max(0));
    context.insert("next_offset", &(offset + limit));

    Ok(())
}

/// Technicians pane partial (HTMX)
#[tracing::instrument(skip(state, headers))]
pub async fn technicians_partial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ErrorResponse> {
    let mut context = Context::new();
    insert_technicians_pane(&state, &mut context, &params).await?;

    let template =
        setup_htmx_context(&mut context, &headers, "_technicians_pane.html", "admin.html");
    render(template, &context)
}

fn form_context(
    mode: &str,
    action: String,
    values: serde_json::Value,
    errors: &[FieldError],
) -> Context {
    let mut context = Context::new();
    context.insert("mode", mode);
    context.insert("action", &action);
    context.insert("values", &values);
    context.insert("errors", &field_errors_map(errors));
    context.insert("genders", &GENDERS);
    context
}

fn form_with_feedback(
    mode: &str,
    action: String,
    values: serde_json::Value,
    errors: &[FieldError],
    api_error: Option<String>,
) -> Result<Response, ErrorResponse> {
    let context = form_context(mode, action, values, errors);
    let html = render("_technician_form.html", &context)?;
    match api_error {
        Some(detail) => Ok(with_trigger(
            html,
            toast_trigger("error", &format!("Error: {}", detail), false),
        )),
        None => Ok(html.into_response()),
    }
}

async fn pane_with_toast(
    state: &AppState,
    params: &ListParams,
    message: &str,
) -> Result<Response, ErrorResponse> {
    let mut context = Context::new();
    insert_technicians_pane(state, &mut context, params).await?;
    let html = render("_technicians_pane.html", &context)?;
    Ok((
        retarget("#pane"),
        [(
            HeaderName::from_static("hx-trigger"),
            toast_trigger("success", message, true),
        )],
        html,
    )
        .into_response())
}

/// Blank registration form
#[tracing::instrument]
pub async fn technician_form(
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ErrorResponse> {
    let values = serde_json::json!({
        "specialization": "",
        "full_name": "",
        "gender": "",
        "phone_number": "",
    });
    let action = format!("/technicians?{}", params.query());
    let context = form_context("create", action, values, &[]);
    render("_technician_form.html", &context)
}

/// Edit form prefilled from the API. Gender is immutable and not offered.
#[tracing::instrument(skip(state))]
pub async fn technician_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ErrorResponse> {
    let technician = state.client.get_technician(id).await?;
    let values = serde_json::json!({
        "specialization": technician.specialization,
        "full_name": technician.full_name,
        "phone_number": technician.phone_number,
    });
    let action = format!("/technicians/{}?{}", id, params.query());
    let context = form_context("edit", action, values, &[]);
    render("_technician_form.html", &context)
}

/// Read-only detail card dialog
#[tracing::instrument(skip(state))]
pub async fn technician_card(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ErrorResponse> {
    let technician = state.client.get_technician(id).await?;
    let mut context = Context::new();
    context.insert("technician", &technician);
    render("_technician_card.html", &context)
}

#[tracing::instrument(skip(state, form))]
pub async fn create_technician(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Form(form): Form<TechnicianCreateForm>,
) -> Result<Response, ErrorResponse> {
    let values = serde_json::json!({
        "specialization": form.specialization,
        "full_name": form.full_name,
        "gender": form.gender,
        "phone_number": form.phone_number,
    });
    let action = format!("/technicians?{}", params.query());

    let dto = match form.validate() {
        Ok(dto) => dto,
        Err(errors) => return form_with_feedback("create", action, values, &errors, None),
    };

    match state.client.create_technician(&dto).await {
        Ok(created) => {
            state.cache.invalidate(CacheKey::Technicians).await;
            let message = format!(
                "Технический работник {} успешно добавлен",
                created.technician_id
            );
            pane_with_toast(&state, &params, &message).await
        }
        Err(e) => form_with_feedback("create", action, values, &[], Some(e.detail())),
    }
}

#[tracing::instrument(skip(state, form))]
pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListParams>,
    Form(form): Form<TechnicianUpdateForm>,
) -> Result<Response, ErrorResponse> {
    let values = serde_json::json!({
        "specialization": form.specialization,
        "full_name": form.full_name,
        "phone_number": form.phone_number,
    });
    let action = format!("/technicians/{}?{}", id, params.query());

    let dto = match form.validate() {
        Ok(dto) => dto,
        Err(errors) => return form_with_feedback("edit", action, values, &errors, None),
    };

    match state.client.update_technician(id, &dto).await {
        Ok(updated) => {
            state.cache.invalidate(CacheKey::Technicians).await;
            let message = format!(
                "Технический работник {} успешно обновлен",
                updated.technician_id
            );
            pane_with_toast(&state, &params, &message).await
        }
        Err(e) => form_with_feedback("edit", action, values, &[], Some(e.detail())),
    }
}
