//! Facet choice derivation.
//!
//! Each facet offers only the values present in its complement set: the
//! results the search would have with that facet's own constraint lifted.
//! Picking any offered value therefore never yields an empty page, and
//! already selected values stay changeable.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::geo::{iso_to_country, subregion_name};
use crate::models::{Activity, Choice};
use crate::presentation::CurrencyFormat;

/// Budget lower bounds offered to the user, ascending.
pub const BUDGET_LADDER: [u64; 8] = [
    0, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

/// Sort by label, then move selected values to the front. Both groups keep
/// label order.
pub fn selected_first(mut choices: Vec<Choice>, selected: &[String]) -> Vec<Choice> {
    choices.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    choices.sort_by_key(|choice| !selected.contains(&choice.value));
    choices
}

/// Distinct recipient countries of the complement.
pub fn country_choices(complement: &[Activity], selected: &[String]) -> Vec<Choice> {
    let codes: BTreeSet<&str> = complement.iter().filter_map(Activity::country_code).collect();
    let choices = codes
        .into_iter()
        .map(|code| Choice::new(code, iso_to_country(code).unwrap_or(code)))
        .collect();
    selected_first(choices, selected)
}

/// Largest budget in the complement; activities without one are skipped.
pub fn budget_ceiling(complement: &[Activity]) -> Decimal {
    complement
        .iter()
        .filter_map(Activity::budget)
        .fold(Decimal::ZERO, Decimal::max)
}

/// Ladder rungs strictly below the complement's largest budget.
pub fn budget_choices(complement: &[Activity], currency: &CurrencyFormat) -> Vec<Choice> {
    let ceiling = budget_ceiling(complement);
    BUDGET_LADDER
        .iter()
        .take_while(|&&threshold| Decimal::from(threshold) < ceiling)
        .map(|&threshold| {
            Choice::new(
                threshold.to_string(),
                format!("> {}", currency.format(Decimal::from(threshold))),
            )
        })
        .collect()
}

/// Distinct (code, name) sector pairs of the complement.
pub fn sector_choices(complement: &[Activity], selected: &[String]) -> Vec<Choice> {
    let pairs: BTreeSet<(&str, &str)> = complement
        .iter()
        .filter_map(|a| Some((a.sector_code.as_deref()?, a.sector.as_deref()?)))
        .filter(|(_, name)| !name.is_empty())
        .collect();
    let choices = pairs
        .into_iter()
        .map(|(code, name)| Choice::new(code, name))
        .collect();
    selected_first(choices, selected)
}

/// Subregions covering the complement's countries.
pub fn region_choices(subregions: &[i64], selected: &[i64]) -> Vec<Choice> {
    let distinct: BTreeSet<i64> = subregions.iter().copied().collect();
    let selected: Vec<String> = selected.iter().map(i64::to_string).collect();
    let choices = distinct
        .into_iter()
        .map(|code| {
            let label = subregion_name(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string());
            Choice::new(code.to_string(), label)
        })
        .collect();
    selected_first(choices, &selected)
}
