//! Axum route handlers for the daily check-in.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::checkin::session::CheckInTicket;
use crate::checkin::symptoms::{SymptomCategory, SymptomSelection};
use crate::checkin::wizard::{WizardAdvance, WizardView};
use crate::errors::AppError;
use crate::guidance::generator::generate_guidance;
use crate::guidance::models::GuidancePlan;
use crate::guidance::request_builder::{days_since_birth, Milestone};
use crate::profile::handlers::require_profile;
use crate::profile::models::UserProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CatalogCategory {
    pub category: SymptomCategory,
    pub question: &'static str,
    pub symptoms: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    #[serde(default)]
    pub symptoms: BTreeMap<SymptomCategory, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub symptom: String,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub day_count: u32,
    pub milestone: &'static str,
    pub symptoms: Vec<String>,
    pub plan: GuidancePlan,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DraftAdvanceResponse {
    Step { draft: WizardView },
    Complete { check_in: CheckInResponse },
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline glue
// ────────────────────────────────────────────────────────────────────────────

/// Claims the session, records today's symptoms in history, then runs
/// guidance. A rejected check-in never touches history.
async fn submit_check_in(
    state: &AppState,
    selection: SymptomSelection,
) -> Result<CheckInResponse, AppError> {
    let today = Local::now().date_naive();
    let mut profile = require_profile(state)?;
    let ticket = state.session.begin(&selection).await?;

    profile.record_check_in(today, selection.symptom_ids());
    if let Err(e) = state.store.save(&profile) {
        state.session.abandon(ticket).await;
        return Err(e.into());
    }

    run_guidance(state, ticket, profile, selection, today).await
}

/// Runs the pipeline on its own task so it completes even if the client goes
/// away, then publishes the plan only if no newer check-in replaced it.
async fn run_guidance(
    state: &AppState,
    ticket: CheckInTicket,
    profile: UserProfile,
    selection: SymptomSelection,
    today: NaiveDate,
) -> Result<CheckInResponse, AppError> {
    let day_count = days_since_birth(profile.birth_date, today);
    let symptoms = selection.symptom_ids();

    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        let plan = generate_guidance(
            task_state.model.as_ref(),
            &task_state.retry_policy,
            &profile,
            &selection,
            today,
        )
        .await;
        let accepted = task_state.session.finish(ticket, plan.clone()).await;
        (accepted, plan)
    });

    let (accepted, plan) = handle
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Guidance task failed: {e}")))?;

    if !accepted {
        warn!("Discarding guidance for a check-in that was started over");
        return Err(AppError::Conflict(
            "This check-in was replaced by a newer one.".to_string(),
        ));
    }

    info!(
        "Guidance ready: day {}, source={:?}, {} meals",
        day_count,
        plan.source,
        plan.meals.len()
    );

    Ok(CheckInResponse {
        day_count,
        milestone: Milestone::for_day(day_count).label(),
        symptoms,
        plan,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/symptoms
pub async fn handle_symptom_catalog() -> Json<Vec<CatalogCategory>> {
    Json(
        SymptomCategory::ORDERED
            .into_iter()
            .map(|category| CatalogCategory {
                category,
                question: category.question(),
                symptoms: category.symptoms(),
            })
            .collect(),
    )
}

/// POST /api/v1/checkins
///
/// One-shot check-in with the full selection in the body.
pub async fn handle_check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, AppError> {
    let selection = SymptomSelection::from_categories(request.symptoms)?;
    Ok(Json(submit_check_in(&state, selection).await?))
}

/// GET /api/v1/checkins/draft
pub async fn handle_get_draft(State(state): State<AppState>) -> Json<WizardView> {
    Json(state.session.with_wizard(|w| w.view()).await)
}

/// POST /api/v1/checkins/draft/toggle
pub async fn handle_toggle_draft(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<WizardView>, AppError> {
    let view = state
        .session
        .with_wizard(|w| w.toggle(&request.symptom).map(|_| w.view()))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/checkins/draft/next
///
/// Advances the wizard; on the last step, submits the check-in.
pub async fn handle_next_draft(
    State(state): State<AppState>,
) -> Result<Json<DraftAdvanceResponse>, AppError> {
    let (advance, view) = state
        .session
        .with_wizard(|w| {
            let advance = w.next();
            (advance, w.view())
        })
        .await;

    match advance {
        WizardAdvance::Step(_) => Ok(Json(DraftAdvanceResponse::Step { draft: view })),
        WizardAdvance::Complete(selection) => {
            let check_in = submit_check_in(&state, selection).await?;
            Ok(Json(DraftAdvanceResponse::Complete { check_in }))
        }
    }
}

/// POST /api/v1/checkins/draft/back
pub async fn handle_back_draft(State(state): State<AppState>) -> Json<WizardView> {
    Json(
        state
            .session
            .with_wizard(|w| {
                w.back();
                w.view()
            })
            .await,
    )
}

/// POST /api/v1/checkins/retry
///
/// "Try again" after a fallback plan: re-runs guidance for the last selection
/// without touching history.
pub async fn handle_retry(
    State(state): State<AppState>,
) -> Result<Json<CheckInResponse>, AppError> {
    let selection = state
        .session
        .last_selection()
        .await
        .ok_or_else(|| AppError::NotFound("No check-in to retry.".to_string()))?;
    let profile = require_profile(&state)?;
    let ticket = state.session.begin(&selection).await?;
    let today = Local::now().date_naive();
    Ok(Json(run_guidance(&state, ticket, profile, selection, today).await?))
}

/// POST /api/v1/checkins/reset
///
/// Start over. A request still in flight will have its result discarded.
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    if state.session.is_in_flight().await {
        info!("Starting over while guidance is in flight; its result will be dropped");
    }
    state.session.reset().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/checkins/latest
pub async fn handle_latest(
    State(state): State<AppState>,
) -> Result<Json<GuidancePlan>, AppError> {
    state
        .session
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No guidance yet. Complete a check-in first.".to_string()))
}
