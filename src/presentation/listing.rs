//! Listing page: pagination, sorting links, map summary and CSV export.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{query_string, query_with, write_csv_rows, CurrencyFormat};
use crate::errors::AppError;
use crate::geo::iso_to_country;
use crate::models::{Activity, CountryBorder, FacetChoices, FacetSelection};

/// Fields the listing can be sorted by, with their link text.
pub const SORTABLE_FIELDS: [(&str, &str); 3] = [
    ("total_budget", "Budget"),
    ("start_actual", "Start date"),
    ("recipient_country", "Country"),
];

/// Where the current page sits in the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pagination {
    /// Resolve the `page` parameter (a 1-based number or `last`).
    ///
    /// An empty result set still has one (empty) page. Anything else out of
    /// range, or not a number, is not found.
    pub fn resolve(total: usize, per_page: usize, page: Option<&str>) -> Result<Self, AppError> {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);

        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some("last") => num_pages,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| AppError::NotFound(format!("Invalid page: {}", raw)))?,
        };
        if page == 0 || page > num_pages {
            return Err(AppError::NotFound(format!("Page {} does not exist", page)));
        }

        Ok(Self {
            page,
            num_pages,
            per_page,
            total,
            has_previous: page > 1,
            has_next: page < num_pages,
        })
    }

    /// Index range of the current page.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1) * self.per_page;
        start.min(self.total)..(start + self.per_page).min(self.total)
    }
}

/// A column header link that cycles the sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortingLink {
    pub text: String,
    /// `ascending`, `descending` or `unsorted`
    pub class: String,
    pub url: String,
}

impl SortingLink {
    pub fn new(field: &str, text: &str, order_by: Option<&str>, params: &[(String, String)]) -> Self {
        let descending = format!("-{}", field);
        let (class, next) = match order_by {
            Some(current) if current == field => ("ascending", descending.as_str()),
            Some(current) if current == descending => ("descending", field),
            _ => ("unsorted", field),
        };

        Self {
            text: text.to_string(),
            class: class.to_string(),
            url: query_with(params, "order_by", next),
        }
    }
}

/// Links for every sortable column.
pub fn sorting_links(order_by: Option<&str>, params: &[(String, String)]) -> Vec<SortingLink> {
    SORTABLE_FIELDS
        .iter()
        .map(|(field, text)| SortingLink::new(field, text, order_by, params))
        .collect()
}

/// Per-country totals for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCountry {
    pub iso2: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub total_budget: Decimal,
    pub total_budget_label: String,
    pub total_activities: usize,
    /// The current search narrowed to this country.
    pub url: String,
}

/// Summarise `activities` per country, for every country with a border
/// record. Activities without a budget count towards the total activities
/// only.
pub fn map_countries(
    activities: &[Activity],
    borders: &[CountryBorder],
    params: &[(String, String)],
    currency: &CurrencyFormat,
) -> Vec<MapCountry> {
    borders
        .iter()
        .filter_map(|border| {
            let matching: Vec<&Activity> = activities
                .iter()
                .filter(|a| a.country_code() == Some(border.iso2.as_str()))
                .collect();
            if matching.is_empty() {
                return None;
            }
            let total_budget: Decimal = matching.iter().filter_map(|a| a.budget()).sum();

            Some(MapCountry {
                iso2: border.iso2.clone(),
                name: border.name.clone(),
                lon: border.lon,
                lat: border.lat,
                total_budget,
                total_budget_label: currency.format(total_budget),
                total_activities: matching.len(),
                url: query_with(params, "countries", &border.iso2),
            })
        })
        .collect()
}

/// Distinct recipient countries, in first-seen order.
pub fn distinct_countries(activities: &[Activity]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in activities.iter().filter_map(Activity::country_code) {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}

/// An activity as shown in the result list.
#[derive(Debug, Clone, Serialize)]
pub struct ListedActivity {
    #[serde(flatten)]
    pub activity: Activity,
    pub country_name: Option<&'static str>,
    pub budget_label: Option<String>,
}

impl ListedActivity {
    pub fn new(activity: &Activity, currency: &CurrencyFormat) -> Self {
        Self {
            activity: activity.clone(),
            country_name: activity.country_code().and_then(iso_to_country),
            budget_label: activity.budget().map(|b| currency.format(b)),
        }
    }
}

/// The selection as redisplayed to the user: the search box holds the
/// residual text, and countries named in the text show up as selected.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayedSelection {
    pub query: String,
    pub countries: Vec<String>,
    pub regions: Vec<i64>,
    pub budget: Option<u64>,
    pub sectors: Vec<String>,
}

impl DisplayedSelection {
    pub fn new(selection: &FacetSelection, residual: &str, implied: &[String]) -> Self {
        let mut countries = selection.countries.clone();
        for code in implied {
            if !countries.contains(code) {
                countries.push(code.clone());
            }
        }
        Self {
            query: residual.to_string(),
            countries,
            regions: selection.regions.clone(),
            budget: selection.budget,
            sectors: selection.sectors.clone(),
        }
    }
}

/// Everything the listing page renders.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub selection: DisplayedSelection,
    pub activities: Vec<ListedActivity>,
    pub pagination: Pagination,
    pub choices: FacetChoices,
    pub sorting_links: Vec<SortingLink>,
    pub countries: Vec<MapCountry>,
    /// The current request, re-encoded.
    pub url: String,
}

impl ListingView {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        selection: DisplayedSelection,
        activities: &[Activity],
        pagination: Pagination,
        choices: FacetChoices,
        order_by: Option<&str>,
        borders: &[CountryBorder],
        params: &[(String, String)],
        currency: &CurrencyFormat,
    ) -> Self {
        Self {
            selection,
            activities: activities[pagination.range()]
                .iter()
                .map(|a| ListedActivity::new(a, currency))
                .collect(),
            pagination,
            choices,
            sorting_links: sorting_links(order_by, params),
            countries: map_countries(activities, borders, params, currency),
            url: query_string(params),
        }
    }
}

pub const LISTING_CSV_HEADER: [&str; 6] = [
    "title",
    "description",
    "country",
    "start date",
    "budget",
    "principal sector",
];

/// The whole result set as CSV.
pub fn listing_csv(activities: &[Activity], currency: &CurrencyFormat) -> Result<Vec<u8>, AppError> {
    let header: Vec<String> = LISTING_CSV_HEADER.iter().map(|h| h.to_string()).collect();
    let rows = activities.iter().map(|a| {
        vec![
            a.title.clone().unwrap_or_default(),
            a.description.clone().unwrap_or_default(),
            a.country_code()
                .and_then(iso_to_country)
                .unwrap_or("Unspecified")
                .to_string(),
            a.start_actual.clone().unwrap_or_default(),
            a.budget().map(|b| currency.format(b)).unwrap_or_default(),
            a.sector.clone().unwrap_or_default(),
        ]
    });
    write_csv_rows(std::iter::once(header).chain(rows))
}
