//! Fixed defaults shared by the normalizer and the fallback payload.

use crate::guidance::models::{GuidancePlan, Meal, MealCategory, PlanSource};
use crate::llm_client::LlmError;

pub const DEFAULT_REASSURANCE: &str = "I hear the heaviness you're carrying in your body today.";
pub const QUOTA_REASSURANCE: &str =
    "The guidance is resting for a moment, but I still see you and the effort you are making.";
pub const DEFAULT_FOCUS: &str = "Gentle rest and warmth.";
pub const DEFAULT_ACTIONS: [&str; 3] = [
    "Sip warm water",
    "Keep your feet covered",
    "Deep belly breaths",
];
pub const DEFAULT_IGNORE: &str = "Unfinished household tasks.";
pub const DEFAULT_SPOUSE_MESSAGE: &str =
    "Please take care of all chores today so she can simply focus on her recovery.";
pub const DEFAULT_MEAL_NAME: &str = "Warm Nourishing Bowl";
pub const DEFAULT_MEAL_RATIONALE: &str = "Warm, soft and easy to digest.";

pub const QUOTA_WARNING: &str = "The recovery guide is taking a short rest due to high demand. \
    Please try again in a few minutes.";
pub const UNAVAILABLE_WARNING: &str = "I'm having a little trouble connecting. Please try again.";

/// Which fallback variant to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Quota,
    Unavailable,
}

impl From<&LlmError> for FallbackReason {
    fn from(err: &LlmError) -> Self {
        if err.is_retryable() {
            FallbackReason::Quota
        } else {
            FallbackReason::Unavailable
        }
    }
}

pub fn default_actions() -> Vec<String> {
    DEFAULT_ACTIONS.iter().map(|s| s.to_string()).collect()
}

fn meal(category: MealCategory, name: &str, rationale: &str, ingredients: &[&str], steps: &[&str]) -> Meal {
    Meal {
        category,
        name: name.to_string(),
        rationale: rationale.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_meals() -> Vec<Meal> {
    vec![
        meal(
            MealCategory::Breakfast,
            "Warm Rice Porridge",
            "Soft grains that settle an unsettled stomach.",
            &["Rice", "Water", "Pinch of Salt"],
            &["Boil rice until very soft.", "Add salt.", "Serve warm."],
        ),
        meal(
            MealCategory::Lunch,
            "Simple Mung Dal",
            "Gentle protein that is easy to digest.",
            &["Mung Dal", "Turmeric", "Ghee"],
            &["Cook dal with turmeric.", "Stir in ghee.", "Serve hot."],
        ),
        meal(
            MealCategory::Dinner,
            "Stewed Apple",
            "Warm fruit that is kind to a tired gut.",
            &["Apple", "Cinnamon"],
            &["Slice apple.", "Simmer with cinnamon until soft.", "Eat warm."],
        ),
    ]
}

/// The hand-authored plan served when the model is unavailable.
pub fn fallback_plan(opted_into_food: bool, reason: FallbackReason) -> GuidancePlan {
    let (reassurance, warning) = match reason {
        FallbackReason::Quota => (QUOTA_REASSURANCE, QUOTA_WARNING),
        FallbackReason::Unavailable => (DEFAULT_REASSURANCE, UNAVAILABLE_WARNING),
    };

    GuidancePlan {
        reassurance: reassurance.to_string(),
        focus: DEFAULT_FOCUS.to_string(),
        actions: default_actions(),
        ignore: DEFAULT_IGNORE.to_string(),
        meals: if opted_into_food {
            default_meals()
        } else {
            Vec::new()
        },
        spouse_message: DEFAULT_SPOUSE_MESSAGE.to_string(),
        source: PlanSource::Fallback,
        check_in_warning: Some(warning.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_fallback_uses_quota_variant() {
        let plan = fallback_plan(true, FallbackReason::Quota);
        assert_eq!(plan.reassurance, QUOTA_REASSURANCE);
        assert_eq!(plan.check_in_warning.as_deref(), Some(QUOTA_WARNING));
        assert!(plan.is_fallback());
        assert_eq!(plan.meals.len(), 3);
    }

    #[test]
    fn test_generic_fallback_without_food() {
        let plan = fallback_plan(false, FallbackReason::Unavailable);
        assert_eq!(plan.reassurance, DEFAULT_REASSURANCE);
        assert_eq!(plan.check_in_warning.as_deref(), Some(UNAVAILABLE_WARNING));
        assert!(plan.meals.is_empty());
        assert_eq!(plan.actions, default_actions());
    }

    #[test]
    fn test_reason_from_error() {
        let quota = LlmError::RateLimited {
            status: 429,
            message: String::new(),
        };
        let auth = LlmError::AuthFailed {
            status: 401,
            message: String::new(),
        };
        assert_eq!(FallbackReason::from(&quota), FallbackReason::Quota);
        assert_eq!(FallbackReason::from(&auth), FallbackReason::Unavailable);
    }

    #[test]
    fn test_default_meals_are_complete() {
        for meal in default_meals() {
            assert!(!meal.name.is_empty());
            assert!(!meal.rationale.is_empty());
            assert!(!meal.ingredients.is_empty());
            assert!(meal.steps.len() <= 3);
        }
    }
}
