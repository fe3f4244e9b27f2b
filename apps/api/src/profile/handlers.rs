//! Axum route handlers for onboarding, settings and reset.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::guidance::request_builder::days_since_birth;
use crate::profile::models::{DeliveryKind, UserProfile, DIETARY_OPTIONS};
use crate::profile::validation::{normalize_preferences, validate_birth_date, validate_name};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Onboarding,
    Ready,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: AppStatus,
    pub dietary_options: [&'static str; 6],
}

fn default_food() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default = "default_food")]
    pub opted_into_food: bool,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub delivery: Option<DeliveryKind>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub day_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl ProfileResponse {
    fn new(profile: UserProfile, today: NaiveDate, notice: Option<&'static str>) -> Self {
        Self {
            day_count: days_since_birth(profile.birth_date, today),
            profile,
            notice,
        }
    }
}

/// Loads the profile or reports that onboarding has not happened yet.
pub(crate) fn require_profile(state: &AppState) -> Result<UserProfile, AppError> {
    state
        .store
        .load()?
        .ok_or_else(|| AppError::NotFound("No profile found. Complete onboarding first.".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/status
///
/// `onboarding` until a profile exists, `ready` after.
pub async fn handle_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let status = match state.store.load()? {
        Some(profile) if profile.onboarding_complete => AppStatus::Ready,
        _ => AppStatus::Onboarding,
    };
    Ok(Json(StatusResponse {
        status,
        dietary_options: DIETARY_OPTIONS,
    }))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = require_profile(&state)?;
    Ok(Json(ProfileResponse::new(profile, Local::now().date_naive(), None)))
}

/// POST /api/v1/profile
///
/// Onboarding. Fails with 409 if a profile already exists.
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    if state.store.load()?.is_some() {
        return Err(AppError::Conflict(
            "A profile already exists. Update it from settings instead.".to_string(),
        ));
    }

    let today = Local::now().date_naive();
    let name = validate_name(&request.name)?;
    let notice = validate_birth_date(request.birth_date, today)?;

    let mut profile = UserProfile::new(name, request.birth_date, request.opted_into_food);
    profile.dietary_preferences = normalize_preferences(request.dietary_preferences);
    profile.delivery = request.delivery;
    state.store.save(&profile)?;

    info!("Onboarding complete (food={})", profile.opted_into_food);
    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::new(profile, today, notice)),
    ))
}

/// PUT /api/v1/profile
///
/// Settings. Check-in history is preserved.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut profile = require_profile(&state)?;

    let today = Local::now().date_naive();
    profile.name = validate_name(&request.name)?;
    let notice = validate_birth_date(request.birth_date, today)?;
    profile.birth_date = request.birth_date;
    profile.opted_into_food = request.opted_into_food;
    profile.dietary_preferences = normalize_preferences(request.dietary_preferences);
    profile.delivery = request.delivery;
    state.store.save(&profile)?;

    info!("Profile settings updated");
    Ok(Json(ProfileResponse::new(profile, today, notice)))
}

/// DELETE /api/v1/profile
///
/// Clears all local data and the current check-in session.
pub async fn handle_delete_profile(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.clear()?;
    state.session.reset().await;
    info!("App data reset");
    Ok(StatusCode::NO_CONTENT)
}
