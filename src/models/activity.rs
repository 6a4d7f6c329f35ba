//! Records returned by the remote activity API.
//!
//! The remote API owns these shapes; every field is optional and unknown
//! fields are carried through untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A monetary amount. The remote API sends either a JSON number or a
/// numeric string such as `"125000.00"`; both are read as exact decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl Amount {
    pub fn value(self) -> Decimal {
        self.0
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        raw.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
            .map(Amount)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Amount::parse(&n.to_string())
                .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", n))),
            Value::String(s) => Amount::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {:?}", s))),
            other => Err(serde::de::Error::custom(format!(
                "invalid amount: {}",
                other
            ))),
        }
    }
}

/// Accepts a string or a number and yields its textual form; `null` and
/// empty strings become `None`.
pub(crate) fn opt_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// A single aid activity (project).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "opt_code")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organisation: Option<Value>,
    #[serde(default, deserialize_with = "opt_code")]
    pub organisation_id: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub sector_code: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub recipient_country_code: Option<String>,
    #[serde(default)]
    pub total_budget: Option<Amount>,
    #[serde(default)]
    pub start_planned: Option<String>,
    #[serde(default)]
    pub start_actual: Option<String>,
    #[serde(default)]
    pub end_planned: Option<String>,
    #[serde(default)]
    pub end_actual: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub collaboration_type: Option<String>,
    #[serde(default)]
    pub default_flow_type: Option<String>,
    #[serde(default)]
    pub default_aid_type: Option<String>,
    #[serde(default)]
    pub default_finance_type: Option<String>,
    #[serde(default)]
    pub default_tied_status: Option<String>,
    #[serde(default)]
    pub activity_status: Option<String>,
    /// Fields this service does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Recipient country code, if present.
    pub fn country_code(&self) -> Option<&str> {
        self.recipient_country_code.as_deref()
    }

    /// Total budget, if present.
    pub fn budget(&self) -> Option<Decimal> {
        self.total_budget.map(Amount::value)
    }
}

/// The organisation reporting an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organisation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "opt_code")]
    pub org_type: Option<String>,
    #[serde(default, rename = "ref", deserialize_with = "opt_code")]
    pub reference: Option<String>,
}

/// A financial transaction attached to an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub provider_org: Option<String>,
    #[serde(default)]
    pub receiver_org: Option<String>,
    #[serde(default)]
    pub value: Option<Amount>,
    #[serde(default)]
    pub transaction_date: Option<String>,
}

impl Transaction {
    pub fn is_commitment(&self) -> bool {
        self.transaction_type.as_deref() == Some("Commitments")
    }
}

/// A policy marker (e.g. gender equality) with its significance level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyMarker {
    #[serde(default, deserialize_with = "opt_code")]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub significance: Option<String>,
}

impl PolicyMarker {
    /// Human readable significance level.
    pub fn significance_label(&self) -> Option<&'static str> {
        match self.significance.as_deref() {
            Some("1") => Some("Significant"),
            Some("2") => Some("Principal"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_accepts_numeric_codes_and_string_budget() {
        let activity: Activity = serde_json::from_value(json!({
            "id": 660,
            "identifier": "NL-1-PPR-23872",
            "title": "Clean water",
            "sector_code": 14030,
            "recipient_country_code": "KE",
            "total_budget": "125000.50",
            "flow": "ODA"
        }))
        .unwrap();

        assert_eq!(activity.id.as_deref(), Some("660"));
        assert_eq!(activity.sector_code.as_deref(), Some("14030"));
        assert_eq!(activity.budget(), Some(Decimal::new(12500050, 2)));
        assert_eq!(activity.extra["flow"], "ODA");
    }

    #[test]
    fn test_activity_missing_fields_are_none() {
        let activity: Activity =
            serde_json::from_value(json!({ "recipient_country_code": "" })).unwrap();
        assert!(activity.country_code().is_none());
        assert!(activity.budget().is_none());
        assert!(activity.title.is_none());
    }

    #[test]
    fn test_numeric_budgets_are_exact() {
        let activity: Activity =
            serde_json::from_value(json!({ "total_budget": 0.1 })).unwrap();
        assert_eq!(activity.budget(), Some(Decimal::new(1, 1)));

        let activity: Activity =
            serde_json::from_value(json!({ "total_budget": 2.5e6 })).unwrap();
        assert_eq!(activity.budget(), Some(Decimal::from(2_500_000)));
    }

    #[test]
    fn test_malformed_budget_is_rejected() {
        let result: Result<Activity, _> =
            serde_json::from_value(json!({ "total_budget": "lots" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_significance_labels() {
        let marker = PolicyMarker {
            significance: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(marker.significance_label(), Some("Principal"));
        let marker = PolicyMarker {
            significance: Some("7".into()),
            ..Default::default()
        };
        assert_eq!(marker.significance_label(), None);
    }
}
