use crate::errors::AppError;
use crate::models::{
    AnalyticsResponse, CollectionResponse, MutationResponse, NewStreak, Preferences, Streak,
    StreakView,
};
use crate::state::{AppData, AppState};
use crate::stats;
use crate::storage;
use crate::streaks::{self, Transition};
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{Html, Redirect},
};
use chrono::{Local, NaiveDate};
use std::path::Path;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = streaks::today();
    let mut data = state.data.lock().await;
    refresh_locked(&mut data, &state.data_dir, today).await;

    let views: Vec<StreakView> = data
        .streaks
        .iter()
        .map(|streak| to_view(streak, today))
        .collect();
    Html(render_index(&views, &data.preferences))
}

pub async fn list_streaks(State(state): State<AppState>) -> Json<CollectionResponse> {
    let today = streaks::today();
    let mut data = state.data.lock().await;
    refresh_locked(&mut data, &state.data_dir, today).await;

    let views = data
        .streaks
        .iter()
        .map(|streak| to_view(streak, today))
        .collect();
    Json(CollectionResponse {
        streaks: views,
        milestone: data.milestone,
    })
}

pub async fn add_streak(
    State(state): State<AppState>,
    Json(payload): Json<NewStreak>,
) -> Result<Json<StreakView>, AppError> {
    let view = insert_streak(&state, payload).await?;
    Ok(Json(view))
}

pub async fn add_streak_form(
    State(state): State<AppState>,
    Form(payload): Form<NewStreak>,
) -> Result<Redirect, AppError> {
    insert_streak(&state, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn check_in(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let (view, milestone) = check_in_by_id(&state, &id).await?;
    Ok(Json(MutationResponse {
        streak: view,
        milestone,
    }))
}

pub async fn check_in_form(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Redirect, AppError> {
    check_in_by_id(&state, &id).await?;
    Ok(Redirect::to("/"))
}

pub async fn fail_streak(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<StreakView>, AppError> {
    let view = fail_by_id(&state, &id).await?;
    Ok(Json(view))
}

pub async fn fail_streak_form(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Redirect, AppError> {
    fail_by_id(&state, &id).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_streak(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<StatusCode, AppError> {
    delete_by_id(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_streak_form(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Redirect, AppError> {
    delete_by_id(&state, &id).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let data = state.data.lock().await;
    let streak = data
        .streaks
        .iter()
        .find(|streak| streak.id == id)
        .ok_or_else(|| AppError::not_found("no streak with that id"))?;
    Ok(Json(stats::build_analytics(streak)))
}

pub async fn export_streaks(
    State(state): State<AppState>,
) -> ([(header::HeaderName, String); 1], Json<Vec<Streak>>) {
    let data = state.data.lock().await;
    let filename = format!(
        "streaks-backup-{}.json",
        Local::now().format("%Y-%m-%dT%H-%M-%S")
    );

    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(data.streaks.clone()),
    )
}

/// Replaces the whole collection with the parsed body. Nothing beyond the
/// parse is validated; a body that is not a streak array is surfaced as a
/// 400 with no partial import.
pub async fn import_streaks(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CollectionResponse>, AppError> {
    let imported: Vec<Streak> = serde_json::from_str(&body)
        .map_err(|err| AppError::bad_request(format!("invalid import data: {err}")))?;

    let today = streaks::today();
    let mut data = state.data.lock().await;
    data.streaks = imported;
    storage::persist_streaks(&state.data_dir, &data.streaks).await;

    let views = data
        .streaks
        .iter()
        .map(|streak| to_view(streak, today))
        .collect();
    Ok(Json(CollectionResponse {
        streaks: views,
        milestone: data.milestone,
    }))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let data = state.data.lock().await;
    Json(data.preferences.clone())
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Json(payload): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    if !matches!(payload.week_starts_on, 0 | 1 | 6) {
        return Err(AppError::bad_request("weekStartsOn must be 0, 1, or 6"));
    }

    let mut data = state.data.lock().await;
    data.preferences = payload;
    storage::persist_preferences(&state.data_dir, &data.preferences).await;
    Ok(Json(data.preferences.clone()))
}

pub async fn ack_milestone(State(state): State<AppState>) -> StatusCode {
    let mut data = state.data.lock().await;
    data.milestone = None;
    StatusCode::NO_CONTENT
}

/// Runs the updater over the whole collection and flushes once if anything
/// moved. Used by the page and list handlers on read and by the periodic
/// timer in between.
pub async fn refresh_and_persist(state: &AppState) {
    let today = streaks::today();
    let mut data = state.data.lock().await;
    refresh_locked(&mut data, &state.data_dir, today).await;
}

async fn refresh_locked(data: &mut AppData, data_dir: &Path, today: NaiveDate) {
    let (changed, crossed) = streaks::refresh_all(&mut data.streaks, today);
    if crossed.is_some() {
        data.milestone = crossed;
    }
    if changed {
        storage::persist_streaks(data_dir, &data.streaks).await;
    }
}

async fn insert_streak(state: &AppState, mut payload: NewStreak) -> Result<StreakView, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    payload.name = name.to_string();

    let today = streaks::today();
    let streak = streaks::create_streak_at(payload, today);
    let view = to_view(&streak, today);

    let mut data = state.data.lock().await;
    data.streaks.push(streak);
    storage::persist_streaks(&state.data_dir, &data.streaks).await;
    Ok(view)
}

async fn check_in_by_id(
    state: &AppState,
    id: &str,
) -> Result<(StreakView, Option<u32>), AppError> {
    let today = streaks::today();
    let mut data = state.data.lock().await;
    let index = position_of(&data, id)?;

    let transition = streaks::update_streak_status(&mut data.streaks[index], today);
    let milestone = match transition {
        Transition::Continued { milestone } => milestone,
        _ => None,
    };
    if milestone.is_some() {
        data.milestone = milestone;
    }
    if transition != Transition::Unchanged {
        storage::persist_streaks(&state.data_dir, &data.streaks).await;
    }

    Ok((to_view(&data.streaks[index], today), milestone))
}

async fn fail_by_id(state: &AppState, id: &str) -> Result<StreakView, AppError> {
    let today = streaks::today();
    let mut data = state.data.lock().await;
    let index = position_of(&data, id)?;

    streaks::fail_streak(&mut data.streaks[index], today);
    storage::persist_streaks(&state.data_dir, &data.streaks).await;
    Ok(to_view(&data.streaks[index], today))
}

async fn delete_by_id(state: &AppState, id: &str) -> Result<(), AppError> {
    let mut data = state.data.lock().await;
    let index = position_of(&data, id)?;

    data.streaks.remove(index);
    storage::persist_streaks(&state.data_dir, &data.streaks).await;
    Ok(())
}

fn position_of(data: &AppData, id: &str) -> Result<usize, AppError> {
    data.streaks
        .iter()
        .position(|streak| streak.id == id)
        .ok_or_else(|| AppError::not_found("no streak with that id"))
}

fn to_view(streak: &Streak, today: NaiveDate) -> StreakView {
    StreakView {
        status: streaks::derive_status(streak, today),
        can_check_in: streaks::can_check_in(streak, today),
        total_days: stats::total_days(streak, today),
        success_rate: stats::success_rate(streak, today),
        streak: streak.clone(),
    }
}
