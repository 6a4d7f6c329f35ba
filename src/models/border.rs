//! Country border reference record.

use serde::{Deserialize, Serialize};

/// A country row of the `world_borders` reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryBorder {
    pub name: String,
    #[serde(default)]
    pub area: i64,
    #[serde(default)]
    pub pop2005: i64,
    #[serde(default)]
    pub fips: String,
    pub iso2: String,
    #[serde(default)]
    pub iso3: String,
    #[serde(default)]
    pub un: i64,
    pub region: i64,
    pub subregion: i64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub lat: f64,
    /// Polygon geometry, stored as opaque text for the map client.
    #[serde(default)]
    pub geometry: String,
}
