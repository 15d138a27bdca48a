use crate::errors::AppError;
use crate::heatmap::build_grid;
use crate::models::{Grid, HeatmapQuery, HistoryEntry, IndexQuery, PinRequest};
use crate::state::AppState;
use crate::ui::{render, RenderContext};
use crate::view::{pinned_cookie, pinned_from_headers, Event, ViewState};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

pub async fn gym_data(State(state): State<AppState>) -> Response {
    let body = state.repository.load_raw().await;
    fresh(&state, ([(header::CONTENT_TYPE, "application/json")], body))
}

pub async fn latest(State(state): State<AppState>) -> Response {
    match state.repository.latest_raw().await {
        Some(point) => fresh(&state, Json(point)),
        None => fresh(&state, Json(Vec::<Value>::new())),
    }
}

pub async fn history(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let series = state.repository.load().await;
    let entries: Vec<HistoryEntry> = series.history(&name);
    fresh(&state, Json(entries))
}

pub async fn api_heatmap(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Grid> {
    let series = state.repository.load().await;
    Json(build_grid(
        &series,
        &name,
        state.config.hours,
        state.config.utc_offset,
    ))
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Html<String> {
    let mut view = view_state(&state, &headers);
    if query.reload {
        view = view.apply(Event::ReloadRequested);
    }
    show(&state, view).await
}

pub async fn heatmap_page(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    if query.gym.is_empty() {
        return Err(AppError::bad_request("gym must not be empty"));
    }

    let view = view_state(&state, &headers).apply(Event::ShowHeatmap(query.gym));
    Ok(show(&state, view).await)
}

pub async fn settings_page(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let view = view_state(&state, &headers).apply(Event::ShowSettings);
    show(&state, view).await
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<PinRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let view = view_state(&state, &headers).apply(Event::TogglePin(payload.name));
    info!("pinned gyms now {:?}", view.pinned);
    let cookie = pinned_cookie(&view.pinned)?;

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/settings")))
}

async fn show(state: &AppState, view: ViewState) -> Html<String> {
    let series = if view.loading {
        state.repository.reload().await
    } else {
        state.repository.load().await
    };
    let view = view.apply(Event::Loaded);
    Html(render(&view, &series, &render_context(state)))
}

fn view_state(state: &AppState, headers: &HeaderMap) -> ViewState {
    let pinned = pinned_from_headers(headers).unwrap_or_else(|| state.config.default_pinned.clone());
    ViewState::new(pinned)
}

fn render_context(state: &AppState) -> RenderContext {
    RenderContext {
        hours: state.config.hours,
        offset: state.config.utc_offset,
        now: Utc::now().with_timezone(&state.config.utc_offset).naive_local(),
    }
}

fn fresh(state: &AppState, body: impl IntoResponse) -> Response {
    let max_age = state.repository.feed().max_age().as_secs();
    (
        [(header::CACHE_CONTROL, format!("public, max-age={max_age}"))],
        body,
    )
        .into_response()
}
