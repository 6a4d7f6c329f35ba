//! Facet selection parsed from a listing request, and the choices offered back.

use serde::Serialize;

use crate::errors::AppError;

/// The filters a user picked for one listing request.
///
/// Built from the raw query-string pairs; repeated keys accumulate for the
/// multi-valued facets and the last value wins for single-valued ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetSelection {
    pub query: String,
    pub countries: Vec<String>,
    pub regions: Vec<i64>,
    pub budget: Option<u64>,
    pub sectors: Vec<String>,
}

impl FacetSelection {
    /// Parse and validate the facet parameters of a request.
    pub fn from_params(params: &[(String, String)]) -> Result<Self, AppError> {
        let mut selection = FacetSelection::default();

        for (key, raw) in params {
            let value = raw.trim();
            match key.as_str() {
                "query" => selection.query = value.to_string(),
                "countries" if !value.is_empty() => push_unique(&mut selection.countries, value),
                "sectors" if !value.is_empty() => push_unique(&mut selection.sectors, value),
                "regions" if !value.is_empty() => {
                    let region = value.parse::<i64>().map_err(|_| {
                        AppError::Validation(format!("Invalid region: {}", value))
                    })?;
                    if !selection.regions.contains(&region) {
                        selection.regions.push(region);
                    }
                }
                "budget" => {
                    selection.budget = if value.is_empty() {
                        None
                    } else {
                        Some(value.parse::<u64>().map_err(|_| {
                            AppError::Validation(format!("Invalid budget: {}", value))
                        })?)
                    };
                }
                _ => {}
            }
        }

        Ok(selection)
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// A filter dimension whose constraint can be lifted to compute its choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Countries,
    Budget,
    Sectors,
}

/// One selectable option of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Choices still worth offering for every facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetChoices {
    pub countries: Vec<Choice>,
    pub regions: Vec<Choice>,
    pub budget: Vec<Choice>,
    pub sectors: Vec<Choice>,
}
