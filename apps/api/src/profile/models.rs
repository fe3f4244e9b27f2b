use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed key the single profile record is stored under.
pub const STORAGE_KEY: &str = "saanvi_recovery_v1";
/// Only the most recent check-ins are kept.
pub const HISTORY_WINDOW: usize = 30;

pub const DIETARY_OPTIONS: [&str; 6] = [
    "Gluten Free",
    "No Dairy",
    "Vegan",
    "North Indian",
    "South Indian",
    "No preference",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    Vaginal,
    Cesarean,
}

impl DeliveryKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DeliveryKind::Vaginal => "vaginal birth",
            DeliveryKind::Cesarean => "cesarean birth (healing incision)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub symptom_ids: Vec<String>,
}

/// The persisted user record. Written by onboarding and settings only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub onboarding_complete: bool,
    pub opted_into_food: bool,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub delivery: Option<DeliveryKind>,
    #[serde(default)]
    pub history: Vec<DailyRecord>,
}

impl UserProfile {
    pub fn new(name: String, birth_date: NaiveDate, opted_into_food: bool) -> Self {
        Self {
            name,
            birth_date,
            onboarding_complete: true,
            opted_into_food,
            dietary_preferences: Vec::new(),
            delivery: None,
            history: Vec::new(),
        }
    }

    /// Upserts the record for `date` and trims history to `HISTORY_WINDOW`.
    pub fn record_check_in(&mut self, date: NaiveDate, symptom_ids: Vec<String>) {
        match self.history.iter_mut().find(|r| r.date == date) {
            Some(record) => record.symptom_ids = symptom_ids,
            None => self.history.push(DailyRecord { date, symptom_ids }),
        }

        if self.history.len() > HISTORY_WINDOW {
            let excess = self.history.len() - HISTORY_WINDOW;
            self.history.drain(..excess);
        }
    }
}
