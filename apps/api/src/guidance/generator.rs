//! Guidance Generation — the check-in → guidance-request → fallback pipeline.
//!
//! Flow: build_request → retry_with_backoff(model.invoke) →
//!       Ok:  parse_payload → normalize
//!       Err: fallback_plan (quota or generic variant)
//!
//! This function never fails: every path ends in a fully populated plan.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::checkin::symptoms::SymptomSelection;
use crate::guidance::defaults::{fallback_plan, FallbackReason};
use crate::guidance::models::GuidancePlan;
use crate::guidance::normalizer::{normalize, parse_payload, ParsedPayload};
use crate::guidance::request_builder::build_request;
use crate::llm_client::retry::{retry_with_backoff, RetryPolicy};
use crate::llm_client::GuidanceModel;
use crate::profile::models::UserProfile;

pub async fn generate_guidance(
    model: &dyn GuidanceModel,
    policy: &RetryPolicy,
    profile: &UserProfile,
    selection: &SymptomSelection,
    today: NaiveDate,
) -> GuidancePlan {
    let request = build_request(profile, selection, today);
    info!(
        "Requesting guidance: {} symptoms, food={}",
        selection.len(),
        profile.opted_into_food
    );

    match retry_with_backoff(policy, || model.invoke(&request)).await {
        Ok(text) => {
            let payload = parse_payload(&text);
            if payload == ParsedPayload::Malformed {
                info!("Model response malformed; using default plan content");
            }
            normalize(&payload, profile.opted_into_food)
        }
        Err(err) => {
            let reason = FallbackReason::from(&err);
            error!("Guidance request failed, serving {reason:?} fallback: {err}");
            fallback_plan(profile.opted_into_food, reason)
        }
    }
}
