//! Symptom catalog and the per-check-in selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Check-in categories, in the order the wizard walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomCategory {
    Physical,
    Internal,
    Emotional,
    Lactation,
}

const PHYSICAL: &[&str] = &[
    "Heavy bleeding",
    "Soreness",
    "Incision pain",
    "Back ache",
    "Fatigue",
    "Night sweats",
    "Leg swelling",
    "Pelvic pain/discomfort",
    "Hemorrhoids",
    "Feeling okay",
];

const INTERNAL: &[&str] = &[
    "Constipation",
    "Bloating",
    "Painful urination",
    "Chills",
    "Low appetite",
    "Steady inside",
];

const EMOTIONAL: &[&str] = &[
    "Overwhelmed",
    "Anxious",
    "Low mood",
    "Irritable",
    "Lonely",
    "Okay",
];

const LACTATION: &[&str] = &[
    "Sore nipples",
    "Engorgement",
    "Supply worries",
    "Latch issues",
    "Low Milk Supply",
    "Comfortable",
];

impl SymptomCategory {
    pub const ORDERED: [SymptomCategory; 4] = [
        SymptomCategory::Physical,
        SymptomCategory::Internal,
        SymptomCategory::Emotional,
        SymptomCategory::Lactation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SymptomCategory::Physical => "Physical",
            SymptomCategory::Internal => "Internal",
            SymptomCategory::Emotional => "Emotional",
            SymptomCategory::Lactation => "Lactation",
        }
    }

    /// The question shown above this category's options.
    pub fn question(&self) -> &'static str {
        match self {
            SymptomCategory::Physical => "How is your body feeling? Select all that apply",
            SymptomCategory::Internal => "What's happening inside? Select all that apply",
            SymptomCategory::Emotional => "How is your heart and mind? Select all that apply",
            SymptomCategory::Lactation => "How is feeding going? Select all that apply",
        }
    }

    pub fn symptoms(&self) -> &'static [&'static str] {
        match self {
            SymptomCategory::Physical => PHYSICAL,
            SymptomCategory::Internal => INTERNAL,
            SymptomCategory::Emotional => EMOTIONAL,
            SymptomCategory::Lactation => LACTATION,
        }
    }

    pub fn contains(&self, symptom_id: &str) -> bool {
        self.symptoms().contains(&symptom_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymptomError {
    #[error("'{symptom}' is not a {} symptom", .category.label())]
    NotInCategory {
        category: SymptomCategory,
        symptom: String,
    },
}

/// Symptoms chosen today, grouped by category.
///
/// Each category keeps selection order and holds no duplicates; flattening
/// walks categories in wizard order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymptomSelection {
    by_category: BTreeMap<SymptomCategory, Vec<String>>,
}

impl SymptomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from raw request data, rejecting ids that do not
    /// belong to their category and dropping duplicates.
    pub fn from_categories(
        raw: BTreeMap<SymptomCategory, Vec<String>>,
    ) -> Result<Self, SymptomError> {
        let mut selection = Self::new();
        for (category, ids) in raw {
            for id in ids {
                selection.insert(category, &id)?;
            }
        }
        Ok(selection)
    }

    /// Adds `symptom_id` under `category`. Returns false if it was already selected.
    pub fn insert(&mut self, category: SymptomCategory, symptom_id: &str) -> Result<bool, SymptomError> {
        if !category.contains(symptom_id) {
            return Err(SymptomError::NotInCategory {
                category,
                symptom: symptom_id.to_string(),
            });
        }
        let ids = self.by_category.entry(category).or_default();
        if ids.iter().any(|s| s == symptom_id) {
            return Ok(false);
        }
        ids.push(symptom_id.to_string());
        Ok(true)
    }

    /// Flips the selection state of `symptom_id`. Returns whether it is now selected.
    pub fn toggle(&mut self, category: SymptomCategory, symptom_id: &str) -> Result<bool, SymptomError> {
        if let Some(ids) = self.by_category.get_mut(&category) {
            if let Some(pos) = ids.iter().position(|s| s == symptom_id) {
                ids.remove(pos);
                if ids.is_empty() {
                    self.by_category.remove(&category);
                }
                return Ok(false);
            }
        }
        self.insert(category, symptom_id)
    }

    pub fn is_selected(&self, category: SymptomCategory, symptom_id: &str) -> bool {
        self.in_category(category).iter().any(|s| s == symptom_id)
    }

    pub fn in_category(&self, category: SymptomCategory) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    /// All selected ids, category by category.
    pub fn symptom_ids(&self) -> Vec<String> {
        self.by_category.values().flatten().cloned().collect()
    }
}
