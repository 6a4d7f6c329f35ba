//! Activity search pipeline.
//!
//! A request's facets are resolved (country names in the text, region
//! members), turned into one remote query for the result list, and then
//! re-run with one facet lifted at a time to work out which choices each
//! facet can still offer.

mod parser;
mod reconcile;

pub use parser::extract_countries;
pub use reconcile::*;

use std::sync::Arc;

use crate::db::BorderRepository;
use crate::errors::AppError;
use crate::gateway::{ApiQuery, Gateway};
use crate::geo::iso_to_country;
use crate::models::{Activity, Facet, FacetChoices, FacetSelection};
use crate::presentation::{distinct_countries, CurrencyFormat};

const COUNTRY_ORDER_FIELD: &str = "recipient_country";

/// Requested result order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Unsorted,
    /// Sorted by the remote API on this field (a leading `-` means descending).
    Remote(String),
    /// Sorted locally by country display name; the remote API only knows codes.
    Country { descending: bool },
}

impl SortOrder {
    pub fn from_param(order_by: Option<&str>) -> Self {
        match order_by.map(str::trim).filter(|o| !o.is_empty()) {
            None => SortOrder::Unsorted,
            Some(COUNTRY_ORDER_FIELD) => SortOrder::Country { descending: false },
            Some(o) if o.strip_prefix('-') == Some(COUNTRY_ORDER_FIELD) => {
                SortOrder::Country { descending: true }
            }
            Some(o) => SortOrder::Remote(o.to_string()),
        }
    }

    fn remote_field(&self) -> Option<&str> {
        match self {
            SortOrder::Remote(field) => Some(field),
            _ => None,
        }
    }

    /// Stable sort by country name. Unknown countries sort as an empty name.
    fn apply(&self, activities: &mut [Activity]) {
        if let SortOrder::Country { descending } = self {
            if *descending {
                activities.sort_by(|a, b| country_name(b).cmp(country_name(a)));
            } else {
                activities.sort_by(|a, b| country_name(a).cmp(country_name(b)));
            }
        }
    }
}

fn country_name(activity: &Activity) -> &'static str {
    activity
        .country_code()
        .and_then(iso_to_country)
        .unwrap_or("")
}

/// The constraints sent to the remote API for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub text: String,
    pub countries: Vec<String>,
    pub budget: Option<u64>,
    pub sectors: Vec<String>,
}

impl SearchCriteria {
    pub fn has(&self, facet: Facet) -> bool {
        match facet {
            Facet::Countries => !self.countries.is_empty(),
            Facet::Budget => self.budget.is_some(),
            Facet::Sectors => !self.sectors.is_empty(),
        }
    }

    /// The same criteria with one facet lifted.
    pub fn without(&self, facet: Facet) -> Self {
        let mut criteria = self.clone();
        match facet {
            Facet::Countries => criteria.countries.clear(),
            Facet::Budget => criteria.budget = None,
            Facet::Sectors => criteria.sectors.clear(),
        }
        criteria
    }

    /// Only the free text.
    pub fn text_only(&self) -> Self {
        Self {
            text: self.text.clone(),
            ..Default::default()
        }
    }

    pub fn to_query(&self, order: &SortOrder) -> ApiQuery {
        ApiQuery::new()
            .icontains_any(&["description", "title"], &self.text)
            .one_of("recipient_country_code", &self.countries)
            .gt("total_budget", self.budget)
            .one_of("sector_code", &self.sectors)
            .order_by(order.remote_field())
    }
}

/// A facet selection after the free text and regions have been expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    /// Free text with country names removed.
    pub residual: String,
    /// Countries named in the free text.
    pub implied_countries: Vec<String>,
    /// Countries shown as selected: requested plus implied.
    pub selected_countries: Vec<String>,
    pub criteria: SearchCriteria,
}

/// Result list plus the choices every facet still offers.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub resolved: ResolvedSelection,
    pub activities: Arc<Vec<Activity>>,
    pub choices: FacetChoices,
}

fn push_missing(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

pub struct SearchService {
    gateway: Arc<Gateway>,
    borders: Arc<BorderRepository>,
    currency: CurrencyFormat,
}

impl SearchService {
    pub fn new(gateway: Arc<Gateway>, borders: Arc<BorderRepository>, currency: CurrencyFormat) -> Self {
        Self {
            gateway,
            borders,
            currency,
        }
    }

    /// Expand a raw selection: country names in the text become country
    /// facet values, and selected regions add their member countries.
    pub async fn resolve(&self, selection: &FacetSelection) -> Result<ResolvedSelection, AppError> {
        let (residual, implied_countries) = extract_countries(&selection.query);

        let mut selected_countries = selection.countries.clone();
        push_missing(&mut selected_countries, &implied_countries);

        let mut countries = selected_countries.clone();
        let region_members = self.borders.countries_in_subregions(&selection.regions).await?;
        push_missing(&mut countries, &region_members);

        let criteria = SearchCriteria {
            text: residual.clone(),
            countries,
            budget: selection.budget,
            sectors: selection.sectors.clone(),
        };

        Ok(ResolvedSelection {
            residual,
            implied_countries,
            selected_countries,
            criteria,
        })
    }

    /// One remote search, in the requested order.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        order: &SortOrder,
    ) -> Result<Arc<Vec<Activity>>, AppError> {
        let activities = self.gateway.activities(&criteria.to_query(order)).await?;
        if matches!(order, SortOrder::Country { .. }) {
            let mut sorted = activities.as_ref().clone();
            order.apply(&mut sorted);
            return Ok(Arc::new(sorted));
        }
        Ok(activities)
    }

    /// Run the primary search and derive every facet's choices.
    ///
    /// The remote calls are made one after another.
    pub async fn run(&self, selection: &FacetSelection, order: &SortOrder) -> Result<SearchOutcome, AppError> {
        let resolved = self.resolve(selection).await?;
        let criteria = &resolved.criteria;

        let primary = self.search(criteria, order).await?;
        let base = if primary.is_empty() {
            self.search(&criteria.text_only(), order).await?
        } else {
            primary.clone()
        };

        let countries = self.complement(criteria, Facet::Countries, &primary, &base, order).await?;
        let budget = self.complement(criteria, Facet::Budget, &primary, &base, order).await?;
        let sectors = self.complement(criteria, Facet::Sectors, &primary, &base, order).await?;

        let subregions = self
            .borders
            .subregions_for_countries(&distinct_countries(&countries))
            .await?;

        let choices = FacetChoices {
            countries: country_choices(&countries, &resolved.selected_countries),
            regions: region_choices(&subregions, &selection.regions),
            budget: budget_choices(&budget, &self.currency),
            sectors: sector_choices(&sectors, &selection.sectors),
        };

        tracing::debug!(
            results = primary.len(),
            countries = choices.countries.len(),
            regions = choices.regions.len(),
            budget = choices.budget.len(),
            sectors = choices.sectors.len(),
            "Search complete"
        );

        Ok(SearchOutcome {
            resolved,
            activities: primary,
            choices,
        })
    }

    /// The result set with `facet` lifted. Re-queried only when the facet
    /// constrains anything and the primary search found something.
    async fn complement(
        &self,
        criteria: &SearchCriteria,
        facet: Facet,
        primary: &Arc<Vec<Activity>>,
        base: &Arc<Vec<Activity>>,
        order: &SortOrder,
    ) -> Result<Arc<Vec<Activity>>, AppError> {
        if criteria.has(facet) && !primary.is_empty() {
            self.search(&criteria.without(facet), order).await
        } else {
            Ok(base.clone())
        }
    }
}
