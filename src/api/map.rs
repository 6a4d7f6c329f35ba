//! Map reference data endpoint.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::models::CountryBorder;
use crate::AppState;

/// A country outline for the map page.
#[derive(Debug, Serialize)]
pub struct MapBorder {
    pub iso2: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub geometry: String,
}

impl From<CountryBorder> for MapBorder {
    fn from(border: CountryBorder) -> Self {
        Self {
            iso2: border.iso2,
            name: border.name,
            lon: border.lon,
            lat: border.lat,
            geometry: border.geometry,
        }
    }
}

/// GET /api/map - Every stored country border.
pub async fn list_borders(State(state): State<AppState>) -> ApiResult<Vec<MapBorder>> {
    let borders = state.borders.all().await?;
    success(borders.into_iter().map(MapBorder::from).collect())
}
