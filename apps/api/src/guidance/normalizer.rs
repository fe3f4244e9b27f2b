//! Response Normalizer — parse-then-validate for raw model output.
//!
//! Every field is taken from the payload only when it is present and has the
//! expected shape; anything else falls back to the shared defaults, so a plan
//! leaving this module is always fully populated.

use serde_json::{Map, Value};
use tracing::warn;

use crate::guidance::defaults::{
    default_actions, default_meals, DEFAULT_FOCUS, DEFAULT_IGNORE, DEFAULT_MEAL_NAME,
    DEFAULT_MEAL_RATIONALE, DEFAULT_REASSURANCE, DEFAULT_SPOUSE_MESSAGE,
};
use crate::guidance::models::{GuidancePlan, Meal, MealCategory, PlanSource};
use crate::llm_client::strip_json_fences;

/// The prompt asks for 1-3 actions; extra items are dropped.
pub const MAX_ACTIONS: usize = 3;

/// Outcome of parsing raw model text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    /// A JSON object; individual fields are still unchecked.
    Parsed(Map<String, Value>),
    /// Not JSON, or JSON that is not an object.
    Malformed,
}

pub fn parse_payload(text: &str) -> ParsedPayload {
    match serde_json::from_str::<Value>(strip_json_fences(text)) {
        Ok(Value::Object(fields)) => ParsedPayload::Parsed(fields),
        Ok(other) => {
            warn!("Model returned JSON that is not an object: {}", kind_of(&other));
            ParsedPayload::Malformed
        }
        Err(e) => {
            warn!("Model returned unparseable JSON: {e}");
            ParsedPayload::Malformed
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds a plan from a parsed payload. Meals are always empty when the user
/// has not opted into food, whatever the model sent.
pub fn normalize(payload: &ParsedPayload, opted_into_food: bool) -> GuidancePlan {
    let empty = Map::new();
    let fields = match payload {
        ParsedPayload::Parsed(fields) => fields,
        ParsedPayload::Malformed => &empty,
    };

    let actions = match string_list(fields.get("actions")) {
        Some(list) if !list.is_empty() => list.into_iter().take(MAX_ACTIONS).collect(),
        _ => default_actions(),
    };

    let meals = if opted_into_food {
        normalize_meals(fields.get("meals"))
    } else {
        Vec::new()
    };

    GuidancePlan {
        reassurance: string_field(fields, "reassurance", DEFAULT_REASSURANCE),
        focus: string_field(fields, "focus", DEFAULT_FOCUS),
        actions,
        ignore: string_field(fields, "ignore", DEFAULT_IGNORE),
        meals,
        spouse_message: string_field(fields, "spouseMessage", DEFAULT_SPOUSE_MESSAGE),
        source: PlanSource::Model,
        check_in_warning: None,
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn string_field(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    non_blank(fields.get(key)).unwrap_or(default).to_string()
}

/// `None` when the value is not an array; otherwise its non-blank strings, in order.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| non_blank(Some(item)))
            .map(str::to_string)
            .collect(),
    )
}

fn normalize_meals(value: Option<&Value>) -> Vec<Meal> {
    let Some(items) = value.and_then(Value::as_array) else {
        return default_meals();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(position, fields)| normalize_meal(position, fields))
        .collect()
}

fn normalize_meal(position: usize, fields: &Map<String, Value>) -> Meal {
    Meal {
        category: non_blank(fields.get("category"))
            .and_then(MealCategory::parse)
            .unwrap_or_else(|| MealCategory::for_position(position)),
        name: string_field(fields, "name", DEFAULT_MEAL_NAME),
        rationale: string_field(fields, "rationale", DEFAULT_MEAL_RATIONALE),
        ingredients: string_list(fields.get("ingredients")).unwrap_or_default(),
        steps: string_list(fields.get("steps")).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::guidance::defaults::{fallback_plan, FallbackReason};

    fn well_formed_plan() -> GuidancePlan {
        GuidancePlan {
            reassurance: "That ache in your back is real and heavy.".to_string(),
            focus: "Warmth and stillness".to_string(),
            actions: vec![
                "Lie on your side for ten minutes".to_string(),
                "Ask for a warm compress".to_string(),
            ],
            ignore: "The thank-you messages.".to_string(),
            meals: vec![
                Meal {
                    category: MealCategory::Breakfast,
                    name: "Ragi Porridge".to_string(),
                    rationale: "Iron and warmth first thing.".to_string(),
                    ingredients: vec!["Ragi flour".to_string(), "Jaggery".to_string()],
                    steps: vec!["Whisk into water.".to_string(), "Simmer.".to_string()],
                },
                Meal {
                    category: MealCategory::Dinner,
                    name: "Vegetable Khichdi".to_string(),
                    rationale: "Soft and filling.".to_string(),
                    ingredients: vec!["Rice".to_string(), "Moong dal".to_string()],
                    steps: vec![
                        "Rinse.".to_string(),
                        "Pressure cook.".to_string(),
                        "Add ghee.".to_string(),
                    ],
                },
            ],
            spouse_message: "Please handle the evening feed tonight.".to_string(),
            source: PlanSource::Model,
            check_in_warning: None,
        }
    }

    /// The plan in the shape the model sends it.
    fn model_text(plan: &GuidancePlan) -> String {
        let mut value = serde_json::to_value(plan).unwrap();
        let fields = value.as_object_mut().unwrap();
        let message = fields.remove("spouse_message").unwrap();
        fields.insert("spouseMessage".to_string(), message);
        value.to_string()
    }

    #[test]
    fn test_well_formed_plan_passes_through_unchanged() {
        let plan = well_formed_plan();
        let text = model_text(&plan);
        let normalized = normalize(&parse_payload(&text), true);
        assert_eq!(normalized, plan);
    }

    #[test]
    fn test_missing_ignore_and_non_array_actions_use_defaults() {
        let text = json!({
            "reassurance": "You are carrying so much.",
            "focus": "Rest",
            "actions": "drink water",
            "meals": [],
            "spouseMessage": "Hold the baby for an hour."
        })
        .to_string();
        let plan = normalize(&parse_payload(&text), false);
        assert_eq!(plan.ignore, DEFAULT_IGNORE);
        assert_eq!(plan.actions, default_actions());
        assert_eq!(plan.reassurance, "You are carrying so much.");
    }

    #[test]
    fn test_meals_dropped_when_not_opted_in() {
        let plan = well_formed_plan();
        let text = model_text(&plan);
        let normalized = normalize(&parse_payload(&text), false);
        assert!(normalized.meals.is_empty());
        assert_eq!(normalized.focus, plan.focus);
    }

    #[test]
    fn test_malformed_text_yields_default_content() {
        let payload = parse_payload("Sorry, I can't help with that.");
        assert_eq!(payload, ParsedPayload::Malformed);

        let plan = normalize(&payload, true);
        let fallback = fallback_plan(true, FallbackReason::Unavailable);
        assert_eq!(plan.reassurance, fallback.reassurance);
        assert_eq!(plan.actions, fallback.actions);
        assert_eq!(plan.meals, fallback.meals);
        assert_eq!(plan.source, PlanSource::Model);
        assert!(plan.check_in_warning.is_none());
    }

    #[test]
    fn test_json_array_is_malformed() {
        assert_eq!(parse_payload("[1, 2]"), ParsedPayload::Malformed);
    }

    #[test]
    fn test_fenced_json_is_parsed() {
        let payload = parse_payload("```json\n{\"focus\": \"Slow mornings\"}\n```");
        let plan = normalize(&payload, false);
        assert_eq!(plan.focus, "Slow mornings");
        assert_eq!(plan.reassurance, DEFAULT_REASSURANCE);
    }

    #[test]
    fn test_blank_and_wrongly_typed_strings_are_defaulted() {
        let text = json!({
            "reassurance": "   ",
            "focus": 42,
            "spouseMessage": null
        })
        .to_string();
        let plan = normalize(&parse_payload(&text), false);
        assert_eq!(plan.reassurance, DEFAULT_REASSURANCE);
        assert_eq!(plan.focus, DEFAULT_FOCUS);
        assert_eq!(plan.spouse_message, DEFAULT_SPOUSE_MESSAGE);
    }

    #[test]
    fn test_actions_keep_order_skip_non_strings_and_cap() {
        let text = json!({
            "actions": ["one", 2, "", "three", "four", "five"]
        })
        .to_string();
        let plan = normalize(&parse_payload(&text), false);
        assert_eq!(plan.actions, vec!["one", "three", "four"]);
    }

    #[test]
    fn test_meals_normalized_per_field() {
        let text = json!({
            "meals": [
                "not a meal",
                { "name": "Sheera", "ingredients": "semolina", "steps": ["Roast.", "Add milk."] },
                { "category": "snack", "rationale": "Quick energy." }
            ]
        })
        .to_string();
        let plan = normalize(&parse_payload(&text), true);
        assert_eq!(plan.meals.len(), 2);

        let first = &plan.meals[0];
        assert_eq!(first.category, MealCategory::Breakfast);
        assert_eq!(first.name, "Sheera");
        assert_eq!(first.rationale, DEFAULT_MEAL_RATIONALE);
        assert!(first.ingredients.is_empty());
        assert_eq!(first.steps, vec!["Roast.", "Add milk."]);

        let second = &plan.meals[1];
        assert_eq!(second.category, MealCategory::Snack);
        assert_eq!(second.name, DEFAULT_MEAL_NAME);
        assert_eq!(second.rationale, "Quick energy.");
    }

    #[test]
    fn test_empty_meals_kept_when_opted_in() {
        let mut plan = well_formed_plan();
        plan.meals.clear();
        let normalized = normalize(&parse_payload(&model_text(&plan)), true);
        assert!(normalized.meals.is_empty());
        assert_eq!(normalized, plan);
    }

    #[test]
    fn test_meals_of_non_objects_yield_empty_list() {
        let text = json!({ "meals": ["soup", 3] }).to_string();
        let plan = normalize(&parse_payload(&text), true);
        assert!(plan.meals.is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_kept() {
        let mut plan = well_formed_plan();
        plan.focus = "  Warmth first ".to_string();
        plan.actions[0] = " Lie down\n".to_string();
        let normalized = normalize(&parse_payload(&model_text(&plan)), true);
        assert_eq!(normalized, plan);
    }

    #[test]
    fn test_non_array_meals_use_default_meals_when_opted_in() {
        let text = json!({ "meals": { "name": "Soup" } }).to_string();
        let plan = normalize(&parse_payload(&text), true);
        assert_eq!(plan.meals, default_meals());

        let plan = normalize(&parse_payload("{}"), true);
        assert_eq!(plan.meals, default_meals());
    }
}
