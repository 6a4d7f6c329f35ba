//! Activity listing endpoint.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use super::{csv_attachment, success, OutputFormat};
use crate::errors::AppError;
use crate::models::FacetSelection;
use crate::presentation::{
    distinct_countries, listing_csv, DisplayedSelection, ListingView, Pagination,
};
use crate::search::SortOrder;
use crate::AppState;

/// Value of the last occurrence of `key`.
fn last_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Reject a page parameter that can never be valid, before any remote call.
fn check_page(page: Option<&str>) -> Result<(), AppError> {
    match page.map(str::trim) {
        None | Some("") | Some("last") => Ok(()),
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(AppError::NotFound(format!("Invalid page: {}", raw))),
        },
    }
}

/// GET /api/activities - Search, filter and page through activities.
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let selection = FacetSelection::from_params(&params)?;
    let order_by = last_value(&params, "order_by").filter(|o| !o.trim().is_empty());
    let page = last_value(&params, "page");
    let format = OutputFormat::from_param(last_value(&params, "format"));
    check_page(page)?;

    let order = SortOrder::from_param(order_by);
    let outcome = state.search.run(&selection, &order).await?;
    let currency = state.config.currency();

    let pagination = Pagination::resolve(outcome.activities.len(), state.config.page_size, page)?;

    if format == OutputFormat::Csv {
        let body = listing_csv(&outcome.activities, &currency)?;
        return csv_attachment("search_results.csv", body);
    }

    let borders = state
        .borders
        .borders_for(&distinct_countries(&outcome.activities))
        .await?;

    let displayed = DisplayedSelection::new(
        &selection,
        &outcome.resolved.residual,
        &outcome.resolved.implied_countries,
    );
    let view = ListingView::assemble(
        displayed,
        &outcome.activities,
        pagination,
        outcome.choices,
        order_by,
        &borders,
        &params,
        &currency,
    );

    Ok(success(view)?.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_precheck() {
        assert!(check_page(None).is_ok());
        assert!(check_page(Some("last")).is_ok());
        assert!(check_page(Some("3")).is_ok());
        assert!(matches!(check_page(Some("0")), Err(AppError::NotFound(_))));
        assert!(matches!(check_page(Some("x")), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_last_value_wins() {
        let params = vec![
            ("page".to_string(), "1".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        assert_eq!(last_value(&params, "page"), Some("2"));
        assert_eq!(last_value(&params, "format"), None);
    }
}
