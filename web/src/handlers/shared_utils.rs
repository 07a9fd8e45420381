// Shared utilities for page and fragment handlers

use axum::http::{header::HeaderName, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use common::errors::FieldError;
use serde::Deserialize;
use tera::Context;

use crate::handlers::ErrorResponse;
use crate::templates::TEMPLATES;

/// Paging parameters carried by the people pane URLs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    /// Query string reproducing this page view, carried by action URLs.
    /// Unset fields are omitted rather than sent empty.
    pub fn query(&self) -> String {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }
}

/// Check if request is HTMX and setup context accordingly.
/// Returns the template to render: the bare fragment for HTMX swaps, the
/// full page for direct navigation.
pub fn setup_htmx_context(
    context: &mut Context,
    headers: &HeaderMap,
    content_template: &'static str,
    full_template: &'static str,
) -> &'static str {
    let is_htmx = headers.get("HX-Request").is_some();
    context.insert("is_htmx", &is_htmx);

    if is_htmx {
        content_template
    } else {
        full_template
    }
}

/// Calculate pagination metadata
/// Returns (page, total_pages)
pub fn calculate_pagination(offset: i64, limit: i64, total_count: i64) -> (i64, i64) {
    let page = (offset / limit) + 1;
    let total_pages = ((total_count as f64) / (limit as f64)).ceil() as i64;
    (page, total_pages)
}

/// Slice one page out of a collection
pub fn page_slice<T>(items: &[T], offset: i64, limit: i64) -> &[T] {
    let start = (offset.max(0) as usize).min(items.len());
    let end = start.saturating_add(limit.max(0) as usize).min(items.len());
    &items[start..end]
}

/// Render a template, mapping failures to the standard error response
pub fn render(template: &str, context: &Context) -> Result<Html<String>, ErrorResponse> {
    let html = TEMPLATES.render(template, context).map_err(|e| {
        tracing::error!(error = %e, template = template, "Template rendering failed");
        ErrorResponse::new("template_error", format!("Failed to render '{}'", template))
    })?;
    Ok(Html(html))
}

/// HX-Trigger payload: a toast notification plus, optionally, a request to
/// close the open dialog. Browsers read response headers as Latin-1, so the
/// JSON is escaped down to ASCII before it goes on the wire.
pub fn toast_trigger(kind: &str, message: &str, close_modal: bool) -> HeaderValue {
    let mut events = serde_json::json!({
        "toast": { "kind": kind, "message": message }
    });
    if close_modal {
        events["close-modal"] = serde_json::Value::Bool(true);
    }
    let escaped = escape_non_ascii(&events.to_string());
    HeaderValue::from_str(&escaped).unwrap_or_else(|_| HeaderValue::from_static("{}"))
}

/// Attach an HX-Trigger header to a rendered fragment
pub fn with_trigger(html: Html<String>, trigger: HeaderValue) -> Response {
    let headers = [(HeaderName::from_static("hx-trigger"), trigger)];
    (headers, html).into_response()
}

/// Retarget a successful form submission at the surrounding pane instead of
/// the dialog the form was rendered in
pub fn retarget(target: &'static str) -> [(HeaderName, HeaderValue); 2] {
    [
        (
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static(target),
        ),
        (
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        ),
    ]
}

/// Field errors as a field-to-message map for inline rendering under form
/// inputs. Later errors for the same field win, which matches how the
/// validators report at most one message per field.
pub fn field_errors_map(errors: &[FieldError]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for error in errors {
        map.insert(
            error.field.clone(),
            serde_json::Value::String(error.message.clone()),
        );
    }
    serde_json::Value::Object(map)
}

fn escape_non_ascii(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let code = c as u32;
            if code <= 0xFFFF {
                out.push_str(&format!("\\u{:04x}", code));
            } else {
                // Encode astral-plane characters as a surrogate pair
                let reduced = code - 0x10000;
                let high = 0xD800 + (reduced >> 10);
                let low = 0xDC00 + (reduced & 0x3FF);
                out.push_str(&format!("\\u{:04x}\\u{:04x}", high, low));
            }
        }
    }
    out
}
