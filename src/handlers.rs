use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::config::DEFAULT_MODULE;
use crate::fragments::ErrorPageTemplate;
use crate::modules;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn module_get(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let kind = query
        .kind
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());
    render_module(&state, kind.trim(), None)
}

pub async fn update_check_post(State(state): State<AppState>) -> Response {
    let lookup = state.lookup();
    let message = match state.updates.refresh(&state.db).await {
        Ok(_) => lookup.localized("update", "check_done"),
        Err(e) => lookup
            .localized("update", "check_failed")
            .replace("{error}", &e.to_string()),
    };
    render_module(&state, "update", Some(handlebars::html_escape(&message)))
}

/// Build and render one module page. `message` must already be HTML.
pub fn render_module(state: &AppState, kind: &str, message: Option<String>) -> Response {
    let mut module = match modules::build(kind, &state.module_context(kind)) {
        Ok(Some(m)) => m,
        Ok(None) => {
            tracing::debug!(kind, "Unknown module requested");
            return error_page(state, StatusCode::NOT_FOUND, "not_found");
        }
        Err(e) => {
            tracing::error!(%e, kind, "Failed to set up module");
            return error_page(state, StatusCode::INTERNAL_SERVER_ERROR, "error");
        }
    };

    if let Some(message) = message {
        module.core_mut().message = message;
    }

    match module.render() {
        Ok(html) => html.into_response(),
        Err(e) => {
            tracing::error!(%e, kind, "Module render error");
            error_page(state, StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, message_key: &str) -> Response {
    let lookup = state.lookup();
    let title = lookup.localized("system", "title").to_uppercase();
    let message = lookup.localized("system", message_key);
    let page = ErrorPageTemplate {
        title: &title,
        status: status.as_u16(),
        message: &message,
    };
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
