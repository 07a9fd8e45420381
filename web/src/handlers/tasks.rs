// Task pane: filterable table, create/edit forms, status transitions

use axum::extract::{Path, Query, State};
use axum::http::{header::HeaderName, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tera::Context;

use common::cache::{CacheKey, TaskScope};
use common::errors::FieldError;
use common::filter::{TaskFilter, TaskFilterForm};
use common::models::{format_date_time, Role, Task, TaskStatus, TaskStatusUpdate};
use common::roster::RosterIndex;
use common::validation::{TaskCreateForm, TaskUpdateForm};

use crate::handlers::shared_utils::{
    calculate_pagination, field_errors_map, page_slice, render, retarget, setup_htmx_context,
    toast_trigger, with_trigger,
};
use crate::handlers::ErrorResponse;
use crate::state::AppState;

pub const STATUS_TRANSITION_MESSAGE: &str = "Недопустимое изменение статуса задачи";
pub const TASK_EDIT_LOCKED_MESSAGE: &str = "Редактировать можно только невыполненную задачу";

/// Scope, paging, and filter parameters carried by every task pane URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPaneParams {
    pub role: Option<String>,
    pub technician_id: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub date_start: String,
    #[serde(default)]
    pub date_end: String,
    #[serde(default)]
    pub workshop: String,
    #[serde(default)]
    pub foreman_name: String,
    #[serde(default)]
    pub technician_name: String,
    #[serde(default)]
    pub status: String,
}

impl TaskPaneParams {
    pub fn for_technician(id: i64) -> Self {
        Self {
            role: Some(Role::Technician.to_string()),
            technician_id: Some(id),
            ..Self::default()
        }
    }

    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(Role::Foreman)
    }

    /// Which task collection this pane shows. The technician view is scoped
    /// to its own id; everything else sees the full collection.
    pub fn scope(&self) -> TaskScope {
        match (self.role(), self.technician_id) {
            (Role::Technician, Some(id)) => TaskScope::Technician(id),
            _ => TaskScope::All,
        }
    }

    pub fn filter_form(&self) -> TaskFilterForm {
        TaskFilterForm {
            date_start: self.date_start.clone(),
            date_end: self.date_end.clone(),
            workshop: self.workshop.clone(),
            foreman_name: self.foreman_name.clone(),
            technician_name: self.technician_name.clone(),
            status: self.status.clone(),
        }
    }

    /// Query string reproducing this pane (scope, page, filter). Action URLs
    /// carry it so a mutation re-renders the view it was issued from.
    pub fn pane_query(&self) -> String {
        let mut pairs = self.filter_pairs();
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }

    /// Like [`Self::pane_query`] but without the offset, for pager links
    pub fn filter_query(&self) -> String {
        serde_urlencoded::to_string(&self.filter_pairs()).unwrap_or_default()
    }

    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("role", self.role().to_string())];
        if let Some(id) = self.technician_id {
            pairs.push(("technician_id", id.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        for (name, value) in [
            ("date_start", &self.date_start),
            ("date_end", &self.date_end),
            ("workshop", &self.workshop),
            ("foreman_name", &self.foreman_name),
            ("technician_name", &self.technician_name),
            ("status", &self.status),
        ] {
            if !value.trim().is_empty() {
                pairs.push((name, value.clone()));
            }
        }
        pairs
    }
}

fn status_class(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NotDone => "status-notdone",
        TaskStatus::Done => "status-done",
        TaskStatus::Cancelled => "status-cancelled",
    }
}

fn task_row(task: &Task, roster: &RosterIndex, role: Role, now: NaiveDateTime) -> serde_json::Value {
    let short = task.short_description();
    serde_json::json!({
        "id": task.task_id,
        "start_time": task.start_time,
        "end_time": task.end_time,
        "workshop": task.workshop,
        "foreman_id": task.foreman_id,
        "foreman_name": roster.foreman_name(task.foreman_id).unwrap_or(""),
        "technician_id": task.technician_id,
        "technician_name": roster.technician_name(task.technician_id).unwrap_or(""),
        "description": task.task_description,
        "short_description": short,
        "truncated": short != task.task_description,
        "status": task.status.to_string(),
        "status_class": status_class(task.status),
        "overdue": task.is_overdue(now),
        "can_edit": role.can_edit() && task.status.allows_edit(),
        "can_done": task.status.can_transition(TaskStatus::Done, role),
        "can_cancel": task.status.can_transition(TaskStatus::Cancelled, role),
    })
}

/// Fill the template context with everything the task pane renders: the
/// echoed filter form, the filtered and paginated rows with display names
/// joined through the roster, and the action availability per row.
pub async fn insert_task_pane(
    state: &AppState,
    context: &mut Context,
    params: &TaskPaneParams,
) -> Result<(), ErrorResponse> {
    let role = params.role();
    let filter_form = params.filter_form();

    let limit = params.limit.unwrap_or(state.config.ui.page_size).max(1);
    let offset = params.offset.unwrap_or(0);

    let tasks = state.tasks(params.scope()).await?;
    let roster = state.roster().await?;

    // A filter that fails normalization keeps its field errors inline and
    // leaves the table unfiltered.
    let (filter, filter_errors) = match filter_form.normalize() {
        Ok(filter) => (filter, Vec::new()),
        Err(errors) => (TaskFilter::default(), errors),
    };

    let visible = filter.apply(&tasks, &roster);
    let total_count = visible.len() as i64;
    let (page, total_pages) = calculate_pagination(offset, limit, total_count);
    let now = Local::now().naive_local();

    let rows: Vec<serde_json::Value> = page_slice(&visible, offset, limit)
        .iter()
        .map(|&task| task_row(task, &roster, role, now))
        .collect();

    context.insert("active_tab", "tasks");
    context.insert("role", &role.to_string());
    context.insert("can_create", &role.can_edit());
    context.insert("show_technician_column", &role.shows_technician_column());
    context.insert("technician_id", &params.technician_id);
    context.insert("tasks", &rows);
    context.insert("filter", &filter_form);
    context.insert("filter_errors", &field_errors_map(&filter_errors));
    context.insert(
        "status_options",
        &[
            TaskStatus::NotDone.to_string(),
            TaskStatus::Done.to_string(),
            TaskStatus::Cancelled.to_string(),
        ],
    );
    context.insert("limit", &limit);
    context.insert("offset", &offset);
    context.insert("page", &page);
    context.insert("total_pages", &total_pages);
    context.insert("total_count", &total_count);
    context.insert("has_prev", &(offset > 0));
    context.insert("has_next", &(offset + limit < total_count));
    context.insert("prev_offset", &(offset - limit).max(0));
    context.insert("next_offset", &(offset + limit));
    context.insert("pane_query", &params.pane_query());
    context.insert("filter_query", &params.filter_query());

    Ok(())
}

/// Task pane partial (HTMX)
#[tracing::instrument(skip(state, headers))]
pub async fn tasks_partial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TaskPaneParams>,
) -> Result<Response, ErrorResponse> {
    // Direct navigation to a technician-scoped fragment lands on the
    // self-service page instead of the bare table.
    if params.role() == Role::Technician && headers.get("HX-Request").is_none() {
        if let Some(id) = params.technician_id {
            return Ok(Redirect::to(&format!("/technicians/{}", id)).into_response());
        }
    }

    let mut context = Context::new();
    insert_task_pane(&state, &mut context, &params).await?;

    let template = setup_htmx_context(&mut context, &headers, "_tasks_pane.html", "admin.html");
    render(template, &context).map(IntoResponse::into_response)
}

async fn pane_with_toast(
    state: &AppState,
    params: &TaskPaneParams,
    kind: &str,
    message: &str,
    close_modal: bool,
) -> Result<Response, ErrorResponse> {
    let mut context = Context::new();
    insert_task_pane(state, &mut context, params).await?;
    let html = render("_tasks_pane.html", &context)?;
    Ok((
        retarget("#pane"),
        [(
            HeaderName::from_static("hx-trigger"),
            toast_trigger(kind, message, close_modal),
        )],
        html,
    )
        .into_response())
}

// ------------------------------------------------------------------
// Forms
// ------------------------------------------------------------------

async fn task_form_context(
    state: &AppState,
    mode: &str,
    action: String,
    values: serde_json::Value,
    errors: &[FieldError],
) -> Result<Context, ErrorResponse> {
    let roster = state.roster().await?;
    let workshops: Vec<serde_json::Value> = roster
        .foremen_with_workshop()
        .iter()
        .map(|f| {
            serde_json::json!({
                "id": f.foreman_id.to_string(),
                "workshop": f.workshop,
            })
        })
        .collect();

    let mut technicians: Vec<serde_json::Value> = state
        .technicians()
        .await?
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.technician_id.to_string(),
                "full_name": t.full_name,
            })
        })
        .collect();
    technicians.sort_by(|a, b| {
        let left: i64 = a["id"].as_str().unwrap_or("0").parse().unwrap_or(0);
        let right: i64 = b["id"].as_str().unwrap_or("0").parse().unwrap_or(0);
        left.cmp(&right)
    });

    let mut context = Context::new();
    context.insert("mode", mode);
    context.insert("action", &action);
    context.insert("values", &values);
    context.insert("errors", &field_errors_map(errors));
    context.insert("workshops", &workshops);
    context.insert("technicians", &technicians);
    Ok(context)
}

/// Blank task creation form; both times default to the current minute
#[tracing::instrument(skip(state))]
pub async fn task_form(
    State(state): State<AppState>,
    Query(params): Query<TaskPaneParams>,
) -> Result<Html<String>, ErrorResponse> {
    let now = format_date_time(Local::now().naive_local());
    let values = serde_json::json!({
        "start_time": now,
        "end_time": now,
        "workshop": "",
        "technician_id": "",
        "task_description": "",
    });
    let action = format!("/tasks?{}", params.pane_query());
    let context = task_form_context(&state, "create", action, values, &[]).await?;
    render("_task_form.html", &context)
}

/// Edit form for a pending task
#[tracing::instrument(skip(state))]
pub async fn task_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<TaskPaneParams>,
) -> Result<Html<String>, ErrorResponse> {
    let task = state.client.get_task(id).await?;
    if !task.status.allows_edit() {
        return Err(ErrorResponse::new(
            "validation_error",
            TASK_EDIT_LOCKED_MESSAGE,
        ));
    }

    let values = serde_json::json!({
        "start_time": task.start_time,
        "end_time": task.end_time,
        "task_description": task.task_description,
    });
    let action = format!("/tasks/{}?{}", id, params.pane_query());
    let context = task_form_context(&state, "edit", action, values, &[]).await?;
    render("_task_form.html", &context)
}

/// Full description dialog for a truncated table cell
#[tracing::instrument(skip(state))]
pub async fn task_description(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ErrorResponse> {
    let task = state.client.get_task(id).await?;
    let mut context = Context::new();
    context.insert("task_id", &task.task_id);
    context.insert("description", &task.task_description);
    render("_task_description.html", &context)
}

// ------------------------------------------------------------------
// Mutations
// ------------------------------------------------------------------

/// Create form body. The workshop select carries the owning foreman's id;
/// the wire DTO wants it in both fields.
#[derive(Debug, Deserialize)]
pub struct TaskCreateBody {
    pub start_time: String,
    pub end_time: String,
    pub workshop: String,
    pub technician_id: String,
    pub task_description: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdateBody {
    pub start_time: String,
    pub end_time: String,
    pub task_description: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub target: String,
}

async fn task_form_with_feedback(
    state: &AppState,
    mode: &str,
    action: String,
    values: serde_json::Value,
    errors: &[FieldError],
    api_error: Option<String>,
) -> Result<Response, ErrorResponse> {
    let context = task_form_context(state, mode, action, values, errors).await?;
    let html = render("_task_form.html", &context)?;
    match api_error {
        Some(detail) => Ok(with_trigger(
            html,
            toast_trigger("error", &format!("Error: {}", detail), false),
        )),
        None => Ok(html.into_response()),
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn create_task(
    State(state): State<AppState>,
    Query(params): Query<TaskPaneParams>,
    Form(body): Form<TaskCreateBody>,
) -> Result<Response, ErrorResponse> {
    let form = TaskCreateForm {
        start_time: body.start_time,
        end_time: body.end_time,
        workshop: body.workshop.clone(),
        foreman_id: body.workshop,
        technician_id: body.technician_id,
        task_description: body.task_description,
    };
    let values = serde_json::json!({
        "start_time": form.start_time,
        "end_time": form.end_time,
        "workshop": form.workshop,
        "technician_id": form.technician_id,
        "task_description": form.task_description,
    });
    let action = format!("/tasks?{}", params.pane_query());

    let dto = match form.validate() {
        Ok(dto) => dto,
        Err(errors) => {
            return task_form_with_feedback(&state, "create", action, values, &errors, None)
                .await
        }
    };

    match state.client.create_task(&dto).await {
        Ok(created) => {
            state.cache.invalidate(CacheKey::Tasks).await;
            let message = format!("Задача {} успешно добавлена", created.task_id);
            pane_with_toast(&state, &params, "success", &message, true).await
        }
        Err(e) => {
            task_form_with_feedback(
                &state,
                "create",
                action,
                values,
                &[],
                Some(e.detail()),
            )
            .await
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<TaskPaneParams>,
    Form(body): Form<TaskUpdateBody>,
) -> Result<Response, ErrorResponse> {
    let form = TaskUpdateForm {
        start_time: body.start_time,
        end_time: body.end_time,
        task_description: body.task_description,
    };
    let values = serde_json::json!({
        "start_time": form.start_time,
        "end_time": form.end_time,
        "task_description": form.task_description,
    });
    let action = format!("/tasks/{}?{}", id, params.pane_query());

    let dto = match form.validate() {
        Ok(dto) => dto,
        Err(errors) => {
            return task_form_with_feedback(&state, "edit", action, values, &errors, None)
                .await
        }
    };

    // The table only offers edit on pending rows, but the status may have
    // moved since that render.
    let current = match state.client.get_task(id).await {
        Ok(task) => task,
        Err(e) => {
            return task_form_with_feedback(
                &state,
                "edit",
                action,
                values,
                &[],
                Some(e.detail()),
            )
            .await
        }
    };
    if !current.status.allows_edit() {
        return pane_with_toast(&state, &params, "error", TASK_EDIT_LOCKED_MESSAGE, true).await;
    }

    match state.client.update_task(id, &dto).await {
        Ok(updated) => {
            state.cache.invalidate(CacheKey::Tasks).await;
            let message = format!("Задача {} успешно обновлена", updated.task_id);
            pane_with_toast(&state, &params, "success", &message, true).await
        }
        Err(e) => {
            task_form_with_feedback(
                &state,
                "edit",
                action,
                values,
                &[],
                Some(e.detail()),
            )
            .await
        }
    }
}

/// Status transition. The legality check runs here as well as in the row
/// rendering, so a stale or hand-crafted request cannot skip the state
/// machine.
#[tracing::instrument(skip(state))]
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<TaskPaneParams>,
    Form(body): Form<StatusBody>,
) -> Result<Response, ErrorResponse> {
    let role = params.role();
    let target = match body.target.parse::<TaskStatus>() {
        Ok(target) => target,
        Err(_) => {
            return pane_with_toast(&state, &params, "error", STATUS_TRANSITION_MESSAGE, false)
                .await
        }
    };

    let current = match state.client.get_task(id).await {
        Ok(task) => task,
        Err(e) => {
            let message = format!("Error: {}", e.detail());
            return pane_with_toast(&state, &params, "error", &message, false).await;
        }
    };

    if !current.status.can_transition(target, role) {
        tracing::warn!(
            task_id = id,
            from = %current.status,
            to = %target,
            role = %role,
            "Rejected illegal status transition"
        );
        return pane_with_toast(&state, &params, "error", STATUS_TRANSITION_MESSAGE, false).await;
    }

    let dto = TaskStatusUpdate {
        task_id: id,
        status: target,
    };
    match state.client.update_task_status(&dto).await {
        Ok(updated) => {
            state.cache.invalidate(CacheKey::Tasks).await;
            let message = match target {
                TaskStatus::Done => format!("Задача {} успешно выполнена", updated.task_id),
                TaskStatus::Cancelled => format!("Задача {} успешно отменена", updated.task_id),
                TaskStatus::NotDone => format!("Задача {} успешно обновлена", updated.task_id),
            };
            pane_with_toast(&state, &params, "success", &message, false).await
        }
        Err(e) => {
            let message = format!("Error: {}", e.detail());
            pane_with_toast(&state, &params, "error", &message, false).await
        }
    }
}
