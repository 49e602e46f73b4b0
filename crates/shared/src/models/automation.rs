use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

pub const MIN_THRESHOLD_USD: f64 = 1.0;
pub const MIN_CHARGE_USD: f64 = 5.0;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AutomationAction {
    Email,
    Charge,
}

impl fmt::Display for AutomationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Charge => write!(f, "charge"),
        }
    }
}

/// Balance rule stored by the provider. Read and written, never evaluated locally.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Automation {
    pub uuid: String,
    /// USD
    pub threshold: f64,
    pub action: AutomationAction,
    #[serde(default)]
    pub message_target: String,
    #[serde(default)]
    pub charge_amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub creation_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parses a user-typed dollar amount: `$1,250.5` -> 1250.5. Anything but digits,
/// `.` and `-` is ignored and only the leading number counts.
pub fn parse_usd(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    NUMBER_PREFIX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn checked_usd(
    field: &'static str,
    raw: &str,
    min: f64,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = parse_usd(raw) else {
        errors.push(FieldError {
            field,
            message: "Amount must be a number".to_string(),
        });
        return None;
    };
    if value < min {
        errors.push(FieldError {
            field,
            message: format!("Must be at least ${min:.2}"),
        });
        return None;
    }
    Some(format!("{value:.2}"))
}

/// A new rule as entered in the add-automation form.
#[derive(Debug, Clone, PartialEq)]
pub enum NewAutomation {
    Email {
        threshold: String,
        email: String,
    },
    Charge {
        threshold: String,
        charge_amount: String,
        card: String,
    },
}

impl NewAutomation {
    pub fn action(&self) -> AutomationAction {
        match self {
            Self::Email { .. } => AutomationAction::Email,
            Self::Charge { .. } => AutomationAction::Charge,
        }
    }

    /// Validates the form and renders the provider's form fields.
    pub fn to_form_fields(&self) -> Result<Vec<(&'static str, String)>, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut fields = vec![("action", self.action().to_string())];

        match self {
            Self::Email { threshold, email } => {
                if let Some(amount) =
                    checked_usd("threshold", threshold, MIN_THRESHOLD_USD, &mut errors)
                {
                    fields.push(("fundsThresholdAmount", amount));
                }
                if EMAIL.is_match(email.trim()) {
                    fields.push(("emailInput", email.trim().to_string()));
                } else {
                    errors.push(FieldError {
                        field: "emailTarget",
                        message: "Please enter a valid email".to_string(),
                    });
                }
            }
            Self::Charge {
                threshold,
                charge_amount,
                card,
            } => {
                if let Some(amount) =
                    checked_usd("threshold", threshold, MIN_THRESHOLD_USD, &mut errors)
                {
                    fields.push(("fundsThresholdAmount", amount));
                }
                if let Some(amount) =
                    checked_usd("chargeAmount", charge_amount, MIN_CHARGE_USD, &mut errors)
                {
                    fields.push(("fundsChargeAmount", amount));
                }
                if card.is_empty() {
                    errors.push(FieldError {
                        field: "chooseCard",
                        message: "Required".to_string(),
                    });
                } else {
                    fields.push(("chooseCard", card.clone()));
                }
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(errors)
        }
    }
}
