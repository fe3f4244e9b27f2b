use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
            MealCategory::Snack => "Snack",
        }
    }

    /// Case-insensitive match on the category name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }

    /// Category implied by a meal's position in the day's plan.
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => MealCategory::Breakfast,
            1 => MealCategory::Lunch,
            2 => MealCategory::Dinner,
            _ => MealCategory::Snack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub category: MealCategory,
    pub name: String,
    pub rationale: String,
    /// Positional: rendered as a shopping list in this order.
    pub ingredients: Vec<String>,
    /// Positional: step N follows step N-1.
    pub steps: Vec<String>,
}

/// Whether a plan came from the model or was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Model,
    Fallback,
}

/// The guidance returned for one check-in. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidancePlan {
    /// Exactly one validating sentence.
    pub reassurance: String,
    pub focus: String,
    pub actions: Vec<String>,
    /// The one thing she has permission to let go of today.
    pub ignore: String,
    /// Empty unless the user opted into meal planning.
    pub meals: Vec<Meal>,
    pub spouse_message: String,
    pub source: PlanSource,
    /// Set on fallback plans: the "please try again" line to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_warning: Option<String>,
}

impl GuidancePlan {
    pub fn is_fallback(&self) -> bool {
        self.source == PlanSource::Fallback
    }
}
