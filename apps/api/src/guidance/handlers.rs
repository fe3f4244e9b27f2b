//! Axum route handlers for sharing the latest plan.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guidance::models::GuidancePlan;
use crate::guidance::share::{meals_share_text, partner_share_text, whatsapp_link};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ShareMealsRequest {
    /// Indices into the plan's meals. Omitted means every meal.
    pub meal_indices: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub text: String,
    pub link: String,
}

impl ShareResponse {
    fn new(text: String) -> Self {
        Self {
            link: whatsapp_link(&text),
            text,
        }
    }
}

async fn latest_plan(state: &AppState) -> Result<GuidancePlan, AppError> {
    state
        .session
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound("No guidance yet. Complete a check-in first.".to_string()))
}

/// POST /api/v1/share/meals
///
/// 422 with "Please select at least one meal." when nothing is selected.
pub async fn handle_share_meals(
    State(state): State<AppState>,
    Json(request): Json<ShareMealsRequest>,
) -> Result<Json<ShareResponse>, AppError> {
    let plan = latest_plan(&state).await?;
    let indices = request
        .meal_indices
        .unwrap_or_else(|| (0..plan.meals.len()).collect());
    let text = meals_share_text(&plan, &indices)?;
    Ok(Json(ShareResponse::new(text)))
}

/// POST /api/v1/share/partner
pub async fn handle_share_partner(
    State(state): State<AppState>,
) -> Result<Json<ShareResponse>, AppError> {
    let plan = latest_plan(&state).await?;
    Ok(Json(ShareResponse::new(partner_share_text(&plan))))
}
