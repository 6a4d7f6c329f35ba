//! In-memory stand-in for the remote API, shared by the unit and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use url::form_urlencoded;

use crate::errors::AppError;
use crate::gateway::{ApiQuery, DataSource, RESOURCE_ACTIVITY, RESOURCE_LAST_UPDATED};

/// Serves a fixed activity dataset and evaluates activity filters locally,
/// the way the remote API would.
pub struct FakeSource {
    state: Mutex<FakeState>,
}

struct FakeState {
    activities: Value,
    resources: HashMap<String, Value>,
    marker: String,
    unavailable: bool,
    calls: Vec<(String, String)>,
}

impl FakeSource {
    pub fn new(activities: Value) -> Self {
        Self {
            state: Mutex::new(FakeState {
                activities,
                resources: HashMap::new(),
                marker: "2012-02-13 10:00:00".to_string(),
                unavailable: false,
                calls: Vec::new(),
            }),
        }
    }

    pub fn set_json(&self, resource: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .resources
            .insert(resource.to_string(), value);
    }

    pub fn set_activities(&self, activities: Value) {
        self.state.lock().unwrap().activities = activities;
    }

    pub fn set_marker(&self, marker: &str) {
        self.state.lock().unwrap().marker = marker.to_string();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    /// Number of fetches of `resource`, failed ones included.
    pub fn calls(&self, resource: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(r, _)| r == resource)
            .count()
    }

    pub fn marker_calls(&self) -> usize {
        self.calls(RESOURCE_LAST_UPDATED)
    }

    /// Query strings sent for `resource`, oldest first.
    pub fn queries(&self, resource: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(r, _)| r == resource)
            .map(|(_, q)| q.clone())
            .collect()
    }

    pub fn last_query(&self, resource: &str) -> Option<String> {
        self.queries(resource).pop()
    }

    fn record(&self, resource: &str, query: &ApiQuery) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push((resource.to_string(), query.to_query_string()));
        if state.unavailable {
            return Err(AppError::NotFound(format!("{} unavailable", resource)));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn fetch_text(&self, resource: &str, query: &ApiQuery) -> Result<String, AppError> {
        self.record(resource, query)?;
        let state = self.state.lock().unwrap();
        if resource == RESOURCE_LAST_UPDATED {
            return Ok(format!("{}\n", state.marker));
        }
        state
            .resources
            .get(resource)
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::NotFound(resource.to_string()))
    }

    async fn fetch_json(&self, resource: &str, query: &ApiQuery) -> Result<Value, AppError> {
        self.record(resource, query)?;
        let state = self.state.lock().unwrap();
        if resource == RESOURCE_ACTIVITY {
            return Ok(filter_activities(&state.activities, query));
        }
        state
            .resources
            .get(resource)
            .cloned()
            .ok_or_else(|| AppError::NotFound(resource.to_string()))
    }
}

/// Apply the remote API's filter semantics to a JSON array of activities.
fn filter_activities(activities: &Value, query: &ApiQuery) -> Value {
    let mut text_filters: Vec<(String, String)> = Vec::new();
    let mut filters: Vec<(String, String)> = Vec::new();

    let raw = query.to_query_string();
    for part in raw.split('&').filter(|p| !p.is_empty()) {
        if part.contains("__icontains=") {
            for alternative in part.split('|') {
                text_filters.extend(form_urlencoded::parse(alternative.as_bytes()).into_owned());
            }
        } else {
            filters.extend(form_urlencoded::parse(part.as_bytes()).into_owned());
        }
    }

    let matches = |activity: &Value| -> bool {
        let field = |name: &str| -> String {
            match &activity[name] {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            }
        };

        let text_ok = text_filters.is_empty()
            || text_filters.iter().any(|(key, needle)| {
                let name = key.trim_end_matches("__icontains");
                field(name).to_lowercase().contains(&needle.to_lowercase())
            });

        text_ok
            && filters.iter().all(|(key, value)| {
                if key == "_order_by" {
                    true
                } else if let Some(name) = key.strip_suffix("__gt") {
                    let actual: Decimal = field(name).parse().unwrap_or_default();
                    actual > value.parse::<Decimal>().unwrap_or_default()
                } else {
                    value.split('|').any(|v| v == field(key))
                }
            })
    };

    Value::Array(
        activities
            .as_array()
            .map(|items| items.iter().filter(|a| matches(a)).cloned().collect())
            .unwrap_or_default(),
    )
}
