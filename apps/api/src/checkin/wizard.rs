//! Multi-step check-in: one step per symptom category.

use serde::Serialize;

use crate::checkin::symptoms::{SymptomCategory, SymptomError, SymptomSelection};

/// Result of pressing "next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAdvance {
    /// Moved on to another category.
    Step(SymptomCategory),
    /// The last step was confirmed; the selection is ready to submit.
    Complete(SymptomSelection),
}

#[derive(Debug, Clone, Default)]
pub struct CheckInWizard {
    step: usize,
    selection: SymptomSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymptomOption {
    pub id: &'static str,
    pub selected: bool,
}

/// What a client needs to render the current step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub step: usize,
    pub total_steps: usize,
    pub category: SymptomCategory,
    pub question: &'static str,
    pub options: Vec<SymptomOption>,
    pub selected_count: usize,
    pub continue_label: &'static str,
}

impl CheckInWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_steps() -> usize {
        SymptomCategory::ORDERED.len()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current_category(&self) -> SymptomCategory {
        SymptomCategory::ORDERED[self.step]
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 == Self::total_steps()
    }

    pub fn selection(&self) -> &SymptomSelection {
        &self.selection
    }

    /// Toggles a symptom of the current step's category.
    pub fn toggle(&mut self, symptom_id: &str) -> Result<bool, SymptomError> {
        let category = self.current_category();
        self.selection.toggle(category, symptom_id)
    }

    pub fn next(&mut self) -> WizardAdvance {
        if self.is_last_step() {
            return WizardAdvance::Complete(self.selection.clone());
        }
        self.step += 1;
        WizardAdvance::Step(self.current_category())
    }

    /// No-op on the first step.
    pub fn back(&mut self) -> SymptomCategory {
        self.step = self.step.saturating_sub(1);
        self.current_category()
    }

    pub fn view(&self) -> WizardView {
        let category = self.current_category();
        let continue_label = match (self.is_last_step(), self.selection.is_empty()) {
            (false, _) => "Next",
            (true, true) => "I feel steady",
            (true, false) => "Finish Check-in",
        };

        WizardView {
            step: self.step,
            total_steps: Self::total_steps(),
            category,
            question: category.question(),
            options: category
                .symptoms()
                .iter()
                .map(|&id| SymptomOption {
                    id,
                    selected: self.selection.is_selected(category, id),
                })
                .collect(),
            selected_count: self.selection.len(),
            continue_label,
        }
    }
}
