//! Guidance Request Builder — turns a profile and today's selection into a
//! model call: system instruction, user turn, and a strict response schema.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::checkin::symptoms::SymptomSelection;
use crate::guidance::models::MealCategory;
use crate::guidance::prompts::{
    GUIDANCE_CONTENTS_TEMPLATE, GUIDANCE_SYSTEM_TEMPLATE, MEALS_OPTED_IN_TEMPLATE,
    MEALS_OPTED_OUT,
};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PLAIN_LANGUAGE_INSTRUCTION};
use crate::llm_client::GuidanceRequest;
use crate::profile::models::UserProfile;

/// Shown in place of a symptom list when nothing was selected.
pub const NO_SYMPTOMS_SENTINEL: &str = "none (feeling steady)";
const NO_PREFERENCE: &str = "No preference";

/// Recovery phase by days since birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Milestone {
    SacredWindow,
    Strengthening,
    Return,
}

impl Milestone {
    pub fn for_day(day_count: u32) -> Self {
        match day_count {
            0..=42 => Milestone::SacredWindow,
            43..=180 => Milestone::Strengthening,
            _ => Milestone::Return,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::SacredWindow => "Sacred Window",
            Milestone::Strengthening => "The Strengthening",
            Milestone::Return => "The Return",
        }
    }
}

/// Whole days since birth, floored. A future birth date counts as day 0.
pub fn days_since_birth(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - birth_date).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

pub fn symptom_summary(selection: &SymptomSelection) -> String {
    if selection.is_empty() {
        NO_SYMPTOMS_SENTINEL.to_string()
    } else {
        selection.symptom_ids().join(", ")
    }
}

fn meal_instruction(profile: &UserProfile) -> String {
    if !profile.opted_into_food {
        return MEALS_OPTED_OUT.to_string();
    }
    let preferences = if profile.dietary_preferences.is_empty() {
        NO_PREFERENCE.to_string()
    } else {
        profile.dietary_preferences.join(", ")
    };
    MEALS_OPTED_IN_TEMPLATE.replace("{preferences}", &preferences)
}

/// Replaces each `{key}` in `template` in a single pass. Inserted values are
/// never rescanned, so user text containing braces stays as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the full guidance call for one check-in.
pub fn build_request(
    profile: &UserProfile,
    selection: &SymptomSelection,
    today: NaiveDate,
) -> GuidanceRequest {
    let day_count = days_since_birth(profile.birth_date, today);
    let symptoms = symptom_summary(selection);
    let delivery_line = profile
        .delivery
        .map(|d| format!("\n- Delivery: {}.", d.describe()))
        .unwrap_or_default();

    let day_count_text = day_count.to_string();
    let meals = meal_instruction(profile);

    let system_instruction = fill_template(
        GUIDANCE_SYSTEM_TEMPLATE,
        &[
            ("plain_language", PLAIN_LANGUAGE_INSTRUCTION),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("meal_instruction", meals.as_str()),
            ("delivery_line", delivery_line.as_str()),
            ("milestone", Milestone::for_day(day_count).label()),
            ("day_count", day_count_text.as_str()),
            ("symptoms", symptoms.as_str()),
            ("name", profile.name.as_str()),
        ],
    );

    let contents = fill_template(
        GUIDANCE_CONTENTS_TEMPLATE,
        &[
            ("symptoms", symptoms.as_str()),
            ("day_count", day_count_text.as_str()),
            ("opted_into_food", if profile.opted_into_food { "true" } else { "false" }),
        ],
    );

    GuidanceRequest {
        system_instruction,
        contents,
        response_schema: response_schema(),
    }
}

/// Response schema in Gemini's OpenAPI subset. Every field is required so the
/// model is constrained to emit the full plan shape.
pub fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    let categories: Vec<&str> = MealCategory::ALL.iter().map(|c| c.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "reassurance": string,
            "focus": string,
            "actions": string_list,
            "ignore": string,
            "meals": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING", "enum": categories },
                        "name": string,
                        "rationale": string,
                        "ingredients": string_list,
                        "steps": string_list
                    },
                    "required": ["category", "name", "rationale", "ingredients", "steps"]
                }
            },
            "spouseMessage": string
        },
        "required": ["reassurance", "focus", "actions", "ignore", "meals", "spouseMessage"]
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Days;

    use super::*;
    use crate::checkin::symptoms::SymptomCategory;
    use crate::profile::models::DeliveryKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn profile_born(days_ago: u64, food: bool) -> UserProfile {
        UserProfile::new("Meera".to_string(), today() - Days::new(days_ago), food)
    }

    #[test]
    fn test_day_count_today_is_zero() {
        assert_eq!(days_since_birth(today(), today()), 0);
    }

    #[test]
    fn test_day_count_ten_days_ago() {
        assert_eq!(days_since_birth(today() - Days::new(10), today()), 10);
    }

    #[test]
    fn test_day_count_future_birth_clamps_to_zero() {
        assert_eq!(days_since_birth(today() + Days::new(5), today()), 0);
    }

    #[test]
    fn test_milestone_boundaries() {
        assert_eq!(Milestone::for_day(0), Milestone::SacredWindow);
        assert_eq!(Milestone::for_day(42), Milestone::SacredWindow);
        assert_eq!(Milestone::for_day(43), Milestone::Strengthening);
        assert_eq!(Milestone::for_day(180), Milestone::Strengthening);
        assert_eq!(Milestone::for_day(181), Milestone::Return);
    }

    #[test]
    fn test_empty_selection_uses_sentinel() {
        let request = build_request(&profile_born(10, true), &SymptomSelection::new(), today());
        assert!(!request.system_instruction.is_empty());
        assert!(request.system_instruction.contains("Day 10 postpartum."));
        assert!(request
            .system_instruction
            .contains("Symptoms: none (feeling steady)."));
        assert_eq!(
            request.contents,
            "Symptoms: none (feeling steady). Day: 10. Plan for food: true."
        );
    }

    #[test]
    fn test_selection_is_comma_joined() {
        let mut raw = BTreeMap::new();
        raw.insert(
            SymptomCategory::Physical,
            vec!["Fatigue".to_string(), "Back ache".to_string()],
        );
        raw.insert(SymptomCategory::Emotional, vec!["Anxious".to_string()]);
        let selection = SymptomSelection::from_categories(raw).unwrap();

        let request = build_request(&profile_born(3, false), &selection, today());
        assert!(request
            .system_instruction
            .contains("Symptoms: Fatigue, Back ache, Anxious."));
        assert!(request.system_instruction.contains("Day 3 postpartum."));
        assert!(request.system_instruction.contains("Milestone: Sacred Window."));
    }

    #[test]
    fn test_no_placeholders_survive() {
        let mut profile = profile_born(200, true);
        profile.delivery = Some(DeliveryKind::Cesarean);
        let request = build_request(&profile, &SymptomSelection::new(), today());
        for placeholder in [
            "{name}",
            "{day_count}",
            "{symptoms}",
            "{milestone}",
            "{delivery_line}",
            "{meal_instruction}",
            "{plain_language}",
            "{json_only}",
            "{preferences}",
        ] {
            assert!(
                !request.system_instruction.contains(placeholder),
                "{placeholder} left in prompt"
            );
        }
        assert!(request.system_instruction.contains("for Meera."));
        assert!(request.system_instruction.contains("cesarean birth"));
        assert!(request.system_instruction.contains("Milestone: The Return."));
    }

    #[test]
    fn test_opted_out_asks_for_empty_meals() {
        let request = build_request(&profile_born(5, false), &SymptomSelection::new(), today());
        assert!(request.system_instruction.contains(MEALS_OPTED_OUT));
    }

    #[test]
    fn test_opted_in_lists_dietary_preferences() {
        let mut profile = profile_born(5, true);
        profile.dietary_preferences = vec!["Vegan".to_string(), "South Indian".to_string()];
        let request = build_request(&profile, &SymptomSelection::new(), today());
        assert!(request
            .system_instruction
            .contains("Dietary preferences: Vegan, South Indian."));
    }

    #[test]
    fn test_braces_in_user_text_are_not_substituted() {
        let mut profile = profile_born(5, true);
        profile.name = "Asha {symptoms}".to_string();
        profile.dietary_preferences = vec!["{name}".to_string(), "{day_count}".to_string()];
        let request = build_request(&profile, &SymptomSelection::new(), today());
        assert!(request
            .system_instruction
            .contains("Dietary preferences: {name}, {day_count}."));
        assert!(request.system_instruction.contains("for Asha {symptoms}."));
        assert!(request.system_instruction.contains("Day 5 postpartum."));
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        let filled = fill_template("{a} {\"b\": 1} {a", &[("a", "x")]);
        assert_eq!(filled, "x {\"b\": 1} {a");
    }

    #[test]
    fn test_schema_requires_every_plan_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        for field in ["reassurance", "focus", "actions", "ignore", "meals", "spouseMessage"] {
            assert!(required.contains(&field), "{field} not required");
            assert!(schema["properties"].get(field).is_some());
        }
        let meal = &schema["properties"]["meals"]["items"];
        assert_eq!(meal["required"].as_array().unwrap().len(), 5);
        assert_eq!(meal["properties"]["category"]["enum"][3], "Snack");
    }
}
