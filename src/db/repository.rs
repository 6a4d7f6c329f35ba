//! Country border repository.
//!
//! The table is read-only while serving; it is filled at startup either from
//! a CSV export of the world borders dataset or from the embedded country
//! table.

use std::path::Path;

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::geo::COUNTRIES;
use crate::models::CountryBorder;

const BORDER_COLUMNS: &str =
    "name, area, pop2005, fips, iso2, iso3, un, region, subregion, lon, lat, geometry";

/// Access to the `world_borders` table.
#[derive(Clone)]
pub struct BorderRepository {
    pool: SqlitePool,
}

impl BorderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored borders.
    pub async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM world_borders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Replace the whole table with `borders`, in one transaction.
    pub async fn replace_all(&self, borders: &[CountryBorder]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM world_borders")
            .execute(&mut *tx)
            .await?;

        for border in borders {
            sqlx::query(&format!(
                "INSERT INTO world_borders ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                BORDER_COLUMNS
            ))
            .bind(&border.name)
            .bind(border.area)
            .bind(border.pop2005)
            .bind(&border.fips)
            .bind(&border.iso2)
            .bind(&border.iso3)
            .bind(border.un)
            .bind(border.region)
            .bind(border.subregion)
            .bind(border.lon)
            .bind(border.lat)
            .bind(&border.geometry)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(borders.len())
    }

    /// Fill the table from the embedded country list (no geometry).
    pub async fn seed_reference_data(&self) -> Result<usize, AppError> {
        let borders: Vec<CountryBorder> = COUNTRIES
            .iter()
            .map(|c| CountryBorder {
                name: c.name.to_string(),
                area: 0,
                pop2005: 0,
                fips: String::new(),
                iso2: c.iso2.to_string(),
                iso3: String::new(),
                un: 0,
                region: c.region,
                subregion: c.subregion,
                lon: 0.0,
                lat: 0.0,
                geometry: String::new(),
            })
            .collect();
        self.replace_all(&borders).await
    }

    /// Reload the table from a CSV file with a header row naming the
    /// border columns (upper or lower case).
    pub async fn import_csv(&self, path: &Path) -> Result<usize, AppError> {
        let borders = read_borders_csv(path)?;
        let count = self.replace_all(&borders).await?;
        tracing::info!("Imported {} country borders from {:?}", count, path);
        Ok(count)
    }

    /// All borders, by name.
    pub async fn all(&self) -> Result<Vec<CountryBorder>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM world_borders ORDER BY name",
            BORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(border_from_row).collect())
    }

    /// Borders whose ISO2 code is in `iso2`, by name.
    pub async fn borders_for(&self, iso2: &[String]) -> Result<Vec<CountryBorder>, AppError> {
        if iso2.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM world_borders WHERE iso2 IN (", BORDER_COLUMNS));
        let mut separated = query.separated(", ");
        for code in iso2 {
            separated.push_bind(code);
        }
        query.push(") ORDER BY name");

        let rows = query.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(border_from_row).collect())
    }

    /// Distinct subregions of the given countries.
    pub async fn subregions_for_countries(&self, iso2: &[String]) -> Result<Vec<i64>, AppError> {
        if iso2.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT DISTINCT subregion FROM world_borders WHERE iso2 IN (");
        let mut separated = query.separated(", ");
        for code in iso2 {
            separated.push_bind(code);
        }
        query.push(") ORDER BY subregion");

        let rows = query.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| row.get("subregion")).collect())
    }

    /// ISO2 codes of every country in the given subregions.
    pub async fn countries_in_subregions(&self, subregions: &[i64]) -> Result<Vec<String>, AppError> {
        if subregions.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT DISTINCT iso2 FROM world_borders WHERE subregion IN (");
        let mut separated = query.separated(", ");
        for code in subregions {
            separated.push_bind(*code);
        }
        query.push(") ORDER BY iso2");

        let rows = query.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| row.get("iso2")).collect())
    }
}

fn border_from_row(row: &sqlx::sqlite::SqliteRow) -> CountryBorder {
    CountryBorder {
        name: row.get("name"),
        area: row.get("area"),
        pop2005: row.get("pop2005"),
        fips: row.get("fips"),
        iso2: row.get("iso2"),
        iso3: row.get("iso3"),
        un: row.get("un"),
        region: row.get("region"),
        subregion: row.get("subregion"),
        lon: row.get("lon"),
        lat: row.get("lat"),
        geometry: row.get("geometry"),
    }
}

fn read_borders_csv(path: &Path) -> Result<Vec<CountryBorder>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    // The world borders dataset names its columns in upper case.
    let headers = reader.headers()?.clone();
    let lowered: csv::StringRecord = headers.iter().map(str::to_lowercase).collect();
    reader.set_headers(lowered);

    let mut borders = Vec::new();
    for (line, record) in reader.deserialize::<CountryBorder>().enumerate() {
        let border = record.map_err(|e| {
            AppError::BadRequest(format!("Invalid border record {}: {}", line + 1, e))
        })?;
        borders.push(border);
    }
    Ok(borders)
}
