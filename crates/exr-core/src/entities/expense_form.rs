use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Travel flag as the form endpoint expects it: the literal strings `"Yes"` / `"No"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TravelFlag {
    Yes,
    No,
}

impl From<bool> for TravelFlag {
    fn from(travel: bool) -> Self {
        if travel { Self::Yes } else { Self::No }
    }
}

/// Expense metadata as typed on the travel form. Held only while the form is open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFormInput {
    pub employee_department: String,
    pub school: String,
    /// Expected `YYYY-MM-DD`, not checked.
    pub period_ending: String,
    pub trip_purpose: String,
    pub travel: bool,
    pub travel_start_date: Option<String>,
    pub travel_end_date: Option<String>,
    /// Miles driven keyed by date string.
    pub mileage: BTreeMap<String, f64>,
}

impl ExpenseFormInput {
    /// Check that every required field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InputIncomplete`] naming the first empty field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("employeeDepartment", &self.employee_department),
            ("school", &self.school),
            ("periodEnding", &self.period_ending),
            ("tripPurpose", &self.trip_purpose),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::InputIncomplete { field });
            }
        }
        Ok(())
    }

    /// Build the wire body for the form endpoint.
    ///
    /// Travel dates are only sent when `travel` is set; blank dates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InputIncomplete`] if a required field is empty.
    pub fn to_payload(&self) -> Result<ExpenseFormPayload, CoreError> {
        self.validate()?;

        let travel_date = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| self.travel && !v.is_empty())
                .map(ToString::to_string)
        };

        Ok(ExpenseFormPayload {
            employee_department: self.employee_department.trim().to_string(),
            school: self.school.trim().to_string(),
            period_ending: self.period_ending.trim().to_string(),
            trip_purpose: self.trip_purpose.trim().to_string(),
            travel: TravelFlag::from(self.travel),
            travel_start_date: travel_date(&self.travel_start_date),
            travel_end_date: travel_date(&self.travel_end_date),
            mileage: self.mileage.clone(),
        })
    }
}

/// JSON body posted to the expense form endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFormPayload {
    pub employee_department: String,
    pub school: String,
    pub period_ending: String,
    pub trip_purpose: String,
    pub travel: TravelFlag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_end_date: Option<String>,
    #[serde(default)]
    pub mileage: BTreeMap<String, f64>,
}

/// What the form endpoint said back.
///
/// The endpoint answers with a sentence such as
/// `"File successfully processed. Download link: https://..."`, sometimes
/// JSON-encoded as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReceipt {
    pub download_url: Option<String>,
    pub raw: String,
}

const DOWNLOAD_LINK_MARKER: &str = "Download link:";

impl FormReceipt {
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let text = serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string());
        let download_url = text.find(DOWNLOAD_LINK_MARKER).and_then(|idx| {
            text[idx + DOWNLOAD_LINK_MARKER.len()..]
                .split_whitespace()
                .next()
                .map(ToString::to_string)
        });
        Self {
            download_url,
            raw: text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_input() -> ExpenseFormInput {
        ExpenseFormInput {
            employee_department: "Facilities".into(),
            school: "Lincoln High".into(),
            period_ending: "2024-06-30".into(),
            trip_purpose: "Conference".into(),
            ..Default::default()
        }
    }

    #[test]
    fn travel_flag_serializes_as_yes_no() {
        assert_eq!(serde_json::to_string(&TravelFlag::from(true)).unwrap(), "\"Yes\"");
        assert_eq!(serde_json::to_string(&TravelFlag::from(false)).unwrap(), "\"No\"");
    }

    #[test]
    fn payload_never_carries_a_boolean_travel() {
        for travel in [true, false] {
            let input = ExpenseFormInput {
                travel,
                ..complete_input()
            };
            let json = serde_json::to_value(input.to_payload().unwrap()).unwrap();
            let value = json["travel"].as_str().expect("travel must be a string");
            assert!(value == "Yes" || value == "No");
        }
    }

    #[test]
    fn missing_required_field_is_input_incomplete() {
        let input = ExpenseFormInput {
            school: "   ".into(),
            ..complete_input()
        };
        assert_eq!(
            input.to_payload().unwrap_err(),
            CoreError::InputIncomplete { field: "school" }
        );
    }

    #[test]
    fn travel_dates_dropped_when_not_travelling() {
        let input = ExpenseFormInput {
            travel: false,
            travel_start_date: Some("2024-06-01".into()),
            travel_end_date: Some("2024-06-03".into()),
            ..complete_input()
        };
        let json = serde_json::to_value(input.to_payload().unwrap()).unwrap();
        assert!(json.get("travelStartDate").is_none());
        assert!(json.get("travelEndDate").is_none());
    }

    #[test]
    fn travel_dates_kept_when_travelling() {
        let input = ExpenseFormInput {
            travel: true,
            travel_start_date: Some("2024-06-01".into()),
            travel_end_date: None,
            ..complete_input()
        };
        let json = serde_json::to_value(input.to_payload().unwrap()).unwrap();
        assert_eq!(json["travelStartDate"], "2024-06-01");
        assert!(json.get("travelEndDate").is_none());
    }

    #[test]
    fn mileage_serializes_as_date_keyed_map() {
        let mut input = complete_input();
        input.mileage.insert("2024-06-02".into(), 12.5);
        input.mileage.insert("2024-06-01".into(), 3.0);
        let json = serde_json::to_value(input.to_payload().unwrap()).unwrap();
        assert_eq!(json["mileage"]["2024-06-01"], 3.0);
        assert_eq!(json["mileage"]["2024-06-02"], 12.5);
    }

    #[test]
    fn form_receipt_extracts_download_link_from_json_string() {
        let body = r#""File successfully processed. Download link: https://bucket.s3.amazonaws.com/output.xlsx?X-Amz-Signature=abc""#;
        let receipt = FormReceipt::from_body(body);
        assert_eq!(
            receipt.download_url.as_deref(),
            Some("https://bucket.s3.amazonaws.com/output.xlsx?X-Amz-Signature=abc")
        );
        assert!(receipt.raw.starts_with("File successfully processed."));
    }

    #[test]
    fn form_receipt_without_link() {
        let receipt = FormReceipt::from_body("{\"ok\":true}");
        assert!(receipt.download_url.is_none());
        assert_eq!(receipt.raw, "{\"ok\":true}");
    }
}
