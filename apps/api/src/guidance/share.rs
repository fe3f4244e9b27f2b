//! Share formatting — plain-text blobs for WhatsApp deep links.

use thiserror::Error;

use crate::guidance::models::{GuidancePlan, Meal};

const WHATSAPP_BASE: &str = "https://wa.me/?text=";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Please select at least one meal.")]
    NoMealsSelected,
}

/// Formats the selected meals (by index into `plan.meals`) for whoever is
/// cooking. Indices that do not name a meal are ignored; meals keep plan order.
pub fn meals_share_text(plan: &GuidancePlan, selected: &[usize]) -> Result<String, ShareError> {
    let meals: Vec<&Meal> = plan
        .meals
        .iter()
        .enumerate()
        .filter(|(i, _)| selected.contains(i))
        .map(|(_, meal)| meal)
        .collect();

    if meals.is_empty() {
        return Err(ShareError::NoMealsSelected);
    }

    let mut text = String::from("*Postpartum Recovery Meals*\n\n");
    text.push_str("Hi, please prepare these for me today:\n\n");

    for meal in meals {
        text.push_str(&format!(
            "🥘 *{}* ({})\n",
            meal.name.to_uppercase(),
            meal.category.as_str()
        ));
        text.push_str("_Ingredients:_\n");
        for ingredient in &meal.ingredients {
            text.push_str(&format!("- {ingredient}\n"));
        }
        text.push_str("_Steps:_\n");
        for (idx, step) in meal.steps.iter().enumerate() {
            text.push_str(&format!("{}. {step}\n", idx + 1));
        }
        text.push('\n');
    }

    text.push_str("Thank you!");
    Ok(text)
}

pub fn partner_share_text(plan: &GuidancePlan) -> String {
    format!(
        "Hi, I received this update today:\n\n\"{}\"",
        plan.spouse_message
    )
}

pub fn whatsapp_link(text: &str) -> String {
    format!("{WHATSAPP_BASE}{}", urlencoding::encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::defaults::{fallback_plan, FallbackReason};

    fn plan() -> GuidancePlan {
        fallback_plan(true, FallbackReason::Unavailable)
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert_eq!(meals_share_text(&plan(), &[]), Err(ShareError::NoMealsSelected));
        assert_eq!(
            ShareError::NoMealsSelected.to_string(),
            "Please select at least one meal."
        );
    }

    #[test]
    fn test_out_of_range_only_is_rejected() {
        assert_eq!(
            meals_share_text(&plan(), &[9]),
            Err(ShareError::NoMealsSelected)
        );
    }

    #[test]
    fn test_meals_text_lists_ingredients_and_numbered_steps() {
        let text = meals_share_text(&plan(), &[2, 0]).unwrap();
        assert!(text.starts_with("*Postpartum Recovery Meals*"));
        assert!(text.ends_with("Thank you!"));

        let porridge = text.find("*WARM RICE PORRIDGE* (Breakfast)").unwrap();
        let apple = text.find("*STEWED APPLE* (Dinner)").unwrap();
        assert!(porridge < apple, "meals keep plan order");
        assert!(!text.contains("MUNG DAL"));
        assert!(text.contains("- Pinch of Salt\n"));
        assert!(text.contains("1. Boil rice until very soft.\n2. Add salt.\n3. Serve warm.\n"));
    }

    #[test]
    fn test_partner_text_quotes_message() {
        let text = partner_share_text(&plan());
        assert!(text.starts_with("Hi, I received this update today:\n\n\""));
        assert!(text.contains("focus on her recovery."));
    }

    #[test]
    fn test_whatsapp_link_is_url_encoded() {
        let link = whatsapp_link("Hi there\n& thanks");
        assert_eq!(link, "https://wa.me/?text=Hi%20there%0A%26%20thanks");
    }
}
