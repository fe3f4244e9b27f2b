pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::checkin::handlers as checkin;
use crate::guidance::handlers as share;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(profile::handle_status))
        .route("/api/v1/symptoms", get(checkin::handle_symptom_catalog))
        // Profile (onboarding / settings / reset)
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile)
                .post(profile::handle_create_profile)
                .put(profile::handle_update_profile)
                .delete(profile::handle_delete_profile),
        )
        // Check-in
        .route("/api/v1/checkins", post(checkin::handle_check_in))
        .route("/api/v1/checkins/draft", get(checkin::handle_get_draft))
        .route(
            "/api/v1/checkins/draft/toggle",
            post(checkin::handle_toggle_draft),
        )
        .route("/api/v1/checkins/draft/next", post(checkin::handle_next_draft))
        .route("/api/v1/checkins/draft/back", post(checkin::handle_back_draft))
        .route("/api/v1/checkins/retry", post(checkin::handle_retry))
        .route("/api/v1/checkins/reset", post(checkin::handle_reset))
        .route("/api/v1/checkins/latest", get(checkin::handle_latest))
        // Share
        .route("/api/v1/share/meals", post(share::handle_share_meals))
        .route("/api/v1/share/partner", post(share::handle_share_partner))
        .with_state(state)
}
