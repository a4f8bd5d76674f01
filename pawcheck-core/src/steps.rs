//! Step navigation for the check-in wizard.
//!
//! The wizard is an ordered sequence of steps. Transitions are explicit
//! (the user asks to move); leaving the inventory step is gated on the
//! document's completion flags, and the gates are evaluated strictly in
//! order — satisfying one re-evaluates the next rather than advancing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::CheckInDocument;

/// One page of the wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    OwnerInfo,
    PetInfo,
    FeedingMedication,
    HealthInfo,
    Inventory,
    Thanks,
}

/// All steps in wizard order.
pub const STEP_ORDER: [WizardStep; 6] = [
    WizardStep::OwnerInfo,
    WizardStep::PetInfo,
    WizardStep::FeedingMedication,
    WizardStep::HealthInfo,
    WizardStep::Inventory,
    WizardStep::Thanks,
];

impl WizardStep {
    /// URL-style slug for the step (the original derived the current
    /// step from a query parameter holding this value).
    pub fn slug(&self) -> &'static str {
        match self {
            WizardStep::OwnerInfo => "owner-info",
            WizardStep::PetInfo => "pet-info",
            WizardStep::FeedingMedication => "feeding-medication",
            WizardStep::HealthInfo => "health-info",
            WizardStep::Inventory => "inventory",
            WizardStep::Thanks => "thanks",
        }
    }

    /// Human-facing title.
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::OwnerInfo => "Owner Information",
            WizardStep::PetInfo => "Pet Information",
            WizardStep::FeedingMedication => "Feeding & Medication",
            WizardStep::HealthInfo => "Health Information",
            WizardStep::Inventory => "Inventory",
            WizardStep::Thanks => "Thank You",
        }
    }

    fn position(&self) -> usize {
        STEP_ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<WizardStep> {
        STEP_ORDER.get(self.position() + 1).copied()
    }

    pub fn prev(&self) -> Option<WizardStep> {
        self.position().checked_sub(1).map(|i| STEP_ORDER[i])
    }

    pub fn is_last(&self) -> bool {
        *self == WizardStep::Thanks
    }

    /// The step to show when no slug is present.
    pub fn first() -> WizardStep {
        WizardStep::OwnerInfo
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner-info" => Ok(WizardStep::OwnerInfo),
            "pet-info" => Ok(WizardStep::PetInfo),
            "feeding-medication" => Ok(WizardStep::FeedingMedication),
            "health-info" => Ok(WizardStep::HealthInfo),
            "inventory" => Ok(WizardStep::Inventory),
            "thanks" => Ok(WizardStep::Thanks),
            _ => Err(format!("Unknown wizard step '{}'", s)),
        }
    }
}

/// A gate blocking the transition out of the inventory step, in the
/// order they must be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    /// No inventory items and the "nothing to check in" flag unset.
    EmptyInventory,
    /// Grooming popup not yet acknowledged.
    GroomingPopup,
    /// Terms popup not yet accepted.
    TermsPopup,
}

impl StepGate {
    /// User-facing message shown when the gate blocks.
    pub fn message(&self) -> &'static str {
        match self {
            StepGate::EmptyInventory => {
                "Add at least one inventory item, or mark the inventory as complete."
            }
            StepGate::GroomingPopup => "Review the grooming options before continuing.",
            StepGate::TermsPopup => "Accept the boarding terms before continuing.",
        }
    }
}

impl fmt::Display for StepGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Outcome of an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the given step.
    Advanced(WizardStep),
    /// Blocked; the gate names the popup or message to surface.
    Blocked(StepGate),
    /// Already at the terminal step.
    Finished,
}

/// Controller deciding step transitions against the document state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepNavigator;

impl StepNavigator {
    pub fn new() -> Self {
        StepNavigator
    }

    /// First unsatisfied gate for leaving the inventory step, if any.
    pub fn inventory_gate(&self, doc: &CheckInDocument) -> Option<StepGate> {
        if doc.inventory.is_empty() && !doc.inventory_complete {
            return Some(StepGate::EmptyInventory);
        }
        if !doc.grooming_acknowledged {
            return Some(StepGate::GroomingPopup);
        }
        if !doc.terms_accepted {
            return Some(StepGate::TermsPopup);
        }
        None
    }

    /// Request a transition from `current` to the next step.
    pub fn advance(&self, current: WizardStep, doc: &CheckInDocument) -> Transition {
        if current.is_last() {
            return Transition::Finished;
        }
        if current == WizardStep::Inventory {
            if let Some(gate) = self.inventory_gate(doc) {
                return Transition::Blocked(gate);
            }
        }
        match current.next() {
            Some(next) => Transition::Advanced(next),
            None => Transition::Finished,
        }
    }

    /// Step backwards, saturating at the first step.
    pub fn retreat(&self, current: WizardStep) -> WizardStep {
        current.prev().unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated_doc(
        inventory: &[&str],
        complete: bool,
        grooming_ack: bool,
        terms: bool,
    ) -> CheckInDocument {
        let mut doc = CheckInDocument::new();
        doc.inventory = inventory.iter().map(|s| s.to_string()).collect();
        doc.inventory_complete = complete;
        doc.grooming_acknowledged = grooming_ack;
        doc.terms_accepted = terms;
        doc
    }

    #[test]
    fn test_step_order_round_trip() {
        for step in STEP_ORDER {
            let parsed: WizardStep = step.slug().parse().unwrap();
            assert_eq!(parsed, step);
        }
        assert!("checkout".parse::<WizardStep>().is_err());
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(WizardStep::first(), WizardStep::OwnerInfo);
        assert!(WizardStep::Thanks.is_last());
        assert_eq!(WizardStep::Thanks.next(), None);
        assert_eq!(WizardStep::OwnerInfo.prev(), None);
    }

    #[test]
    fn test_advance_through_ungated_steps() {
        let navigator = StepNavigator::new();
        let doc = CheckInDocument::new();

        assert_eq!(
            navigator.advance(WizardStep::OwnerInfo, &doc),
            Transition::Advanced(WizardStep::PetInfo)
        );
        assert_eq!(
            navigator.advance(WizardStep::HealthInfo, &doc),
            Transition::Advanced(WizardStep::Inventory)
        );
    }

    #[test]
    fn test_empty_inventory_blocks_first() {
        let navigator = StepNavigator::new();
        let doc = gated_doc(&[], false, true, true);

        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Blocked(StepGate::EmptyInventory)
        );
    }

    #[test]
    fn test_inventory_complete_flag_satisfies_first_gate() {
        let navigator = StepNavigator::new();
        let doc = gated_doc(&[], true, true, true);

        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Advanced(WizardStep::Thanks)
        );
    }

    #[test]
    fn test_grooming_gate_comes_before_terms() {
        let navigator = StepNavigator::new();
        // Both popups unsatisfied: grooming must surface first.
        let doc = gated_doc(&[], true, false, false);

        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Blocked(StepGate::GroomingPopup)
        );
    }

    #[test]
    fn test_satisfying_grooming_reveals_terms_gate() {
        let navigator = StepNavigator::new();
        let mut doc = gated_doc(&[], true, false, false);

        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Blocked(StepGate::GroomingPopup)
        );

        // Acknowledging grooming re-evaluates rather than advancing.
        doc.grooming_acknowledged = true;
        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Blocked(StepGate::TermsPopup)
        );

        doc.terms_accepted = true;
        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Advanced(WizardStep::Thanks)
        );
    }

    #[test]
    fn test_items_in_inventory_satisfy_first_gate() {
        let navigator = StepNavigator::new();
        let doc = gated_doc(&["blue leash"], false, true, true);

        assert_eq!(
            navigator.advance(WizardStep::Inventory, &doc),
            Transition::Advanced(WizardStep::Thanks)
        );
    }

    #[test]
    fn test_advance_past_thanks_is_finished() {
        let navigator = StepNavigator::new();
        let doc = CheckInDocument::new();

        assert_eq!(
            navigator.advance(WizardStep::Thanks, &doc),
            Transition::Finished
        );
    }

    #[test]
    fn test_retreat_saturates() {
        let navigator = StepNavigator::new();
        assert_eq!(
            navigator.retreat(WizardStep::PetInfo),
            WizardStep::OwnerInfo
        );
        assert_eq!(
            navigator.retreat(WizardStep::OwnerInfo),
            WizardStep::OwnerInfo
        );
    }
}
