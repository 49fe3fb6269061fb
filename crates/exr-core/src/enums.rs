//! Expense categories and the receipt capture stage machine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ExpenseCategory
// ---------------------------------------------------------------------------

/// Fixed set of receipt categories accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Meals,
    Lodging,
    Airfare,
    GroundTransportation,
    Mileage,
    Parking,
    Tolls,
    Fuel,
    OfficeSupplies,
    RegistrationFees,
    Equipment,
    Postage,
    Telecommunications,
    Other,
}

impl ExpenseCategory {
    /// Every category, in picker order.
    pub const ALL: [Self; 14] = [
        Self::Meals,
        Self::Lodging,
        Self::Airfare,
        Self::GroundTransportation,
        Self::Mileage,
        Self::Parking,
        Self::Tolls,
        Self::Fuel,
        Self::OfficeSupplies,
        Self::RegistrationFees,
        Self::Equipment,
        Self::Postage,
        Self::Telecommunications,
        Self::Other,
    ];

    /// Wire name, identical to the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::Lodging => "lodging",
            Self::Airfare => "airfare",
            Self::GroundTransportation => "ground_transportation",
            Self::Mileage => "mileage",
            Self::Parking => "parking",
            Self::Tolls => "tolls",
            Self::Fuel => "fuel",
            Self::OfficeSupplies => "office_supplies",
            Self::RegistrationFees => "registration_fees",
            Self::Equipment => "equipment",
            Self::Postage => "postage",
            Self::Telecommunications => "telecommunications",
            Self::Other => "other",
        }
    }

    /// Human label shown in the category picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meals => "Meals",
            Self::Lodging => "Lodging",
            Self::Airfare => "Airfare",
            Self::GroundTransportation => "Ground Transportation",
            Self::Mileage => "Mileage",
            Self::Parking => "Parking",
            Self::Tolls => "Tolls",
            Self::Fuel => "Fuel",
            Self::OfficeSupplies => "Office Supplies",
            Self::RegistrationFees => "Registration Fees",
            Self::Equipment => "Equipment",
            Self::Postage => "Postage",
            Self::Telecommunications => "Telecommunications",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = CoreError;

    /// Accepts the wire name or the picker label, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(wanted)
                    || category.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CoreError::Validation(format!("unknown expense category '{wanted}'")))
    }
}

// ---------------------------------------------------------------------------
// ReceiptStage
// ---------------------------------------------------------------------------

/// Stage of the receipt capture pipeline.
///
/// ```text
/// idle → photo_acquired → form_visible → submitted → idle (url shown)
///   ↺ (cancel)      ↘ idle (encode failed)   ↘ idle   ↘ form_visible (failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStage {
    #[default]
    Idle,
    PhotoAcquired,
    FormVisible,
    Submitted,
}

impl ReceiptStage {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::PhotoAcquired, Self::Idle],
            Self::PhotoAcquired => &[Self::FormVisible, Self::Idle],
            Self::FormVisible => &[Self::Submitted, Self::Idle],
            Self::Submitted => &[Self::Idle, Self::FormVisible],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Validate a transition, returning the target stage.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] when `next` is not reachable.
    pub fn transition_to(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PhotoAcquired => "photo_acquired",
            Self::FormVisible => "form_visible",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for ReceiptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn there_are_exactly_fourteen_categories() {
        assert_eq!(ExpenseCategory::ALL.len(), 14);
        let mut names: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14, "wire names must be unique");
    }

    #[test]
    fn category_serde_matches_as_str() {
        for category in ExpenseCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[rstest]
    #[case("meals", ExpenseCategory::Meals)]
    #[case("Ground Transportation", ExpenseCategory::GroundTransportation)]
    #[case("OFFICE_SUPPLIES", ExpenseCategory::OfficeSupplies)]
    #[case("  other ", ExpenseCategory::Other)]
    fn category_parses_wire_name_or_label(#[case] input: &str, #[case] expected: ExpenseCategory) {
        assert_eq!(input.parse::<ExpenseCategory>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("snacks")]
    #[case("meals and lodging")]
    fn category_rejects_free_text(#[case] input: &str) {
        let err = input.parse::<ExpenseCategory>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn category_rejects_unknown_on_deserialize() {
        let parsed = serde_json::from_str::<ExpenseCategory>("\"snacks\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn receipt_stage_happy_path() {
        let stage = ReceiptStage::Idle;
        let stage = stage.transition_to(ReceiptStage::PhotoAcquired).unwrap();
        let stage = stage.transition_to(ReceiptStage::FormVisible).unwrap();
        let stage = stage.transition_to(ReceiptStage::Submitted).unwrap();
        let stage = stage.transition_to(ReceiptStage::Idle).unwrap();
        assert_eq!(stage, ReceiptStage::Idle);
    }

    #[test]
    fn receipt_stage_failure_returns_to_form() {
        assert!(ReceiptStage::Submitted.can_transition_to(ReceiptStage::FormVisible));
    }

    #[test]
    fn receipt_stage_cannot_skip_encoding() {
        let err = ReceiptStage::Idle
            .transition_to(ReceiptStage::Submitted)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: "idle".into(),
                to: "submitted".into(),
            }
        );
        assert!(!ReceiptStage::PhotoAcquired.can_transition_to(ReceiptStage::Submitted));
    }
}
