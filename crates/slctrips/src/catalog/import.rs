//! Fixture loading for the in-memory store and the CLI.

use super::destination::{Destination, DestinationId};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid destination CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid destination JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row}: drive_time_minutes must be non-negative (got {value})")]
    InvalidDriveTime { row: usize, value: i64 },
}

#[derive(Debug, Deserialize)]
struct DestinationRow {
    id: String,
    #[serde(default)]
    slug: Option<String>,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    subcategory: String,
    #[serde(default)]
    drive_time_minutes: Option<i64>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    season_tags: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    short: Option<String>,
    #[serde(default)]
    long: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
}

impl DestinationRow {
    fn into_destination(self, row: usize) -> Result<Destination, ImportError> {
        let minutes = self.drive_time_minutes.unwrap_or(0);
        let drive_time_minutes =
            u32::try_from(minutes).map_err(|_| ImportError::InvalidDriveTime {
                row,
                value: minutes,
            })?;

        let id = match self.id.trim().parse::<i64>() {
            Ok(value) => DestinationId::Int(value),
            Err(_) => DestinationId::Text(self.id.trim().to_string()),
        };

        let season_tags = self
            .season_tags
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Destination {
            id,
            slug: self.slug.filter(|slug| !slug.trim().is_empty()),
            name: self.name,
            category: self.category,
            subcategory: self.subcategory,
            drive_time_minutes,
            rating: self.rating,
            season_tags,
            latitude: self.latitude,
            longitude: self.longitude,
            short: self.short.filter(|text| !text.is_empty()),
            long: self.long.filter(|text| !text.is_empty()),
            image_url: None,
            featured: self.featured.unwrap_or(false),
        })
    }
}

/// Load destinations from a `.json` array or a CSV export.
pub fn load_destinations<P: AsRef<Path>>(path: P) -> Result<Vec<Destination>, ImportError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_reader(file)?)
    } else {
        destinations_from_csv(file)
    }
}

pub fn destinations_from_csv<R: Read>(reader: R) -> Result<Vec<Destination>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<DestinationRow>()
        .enumerate()
        .map(|(index, row)| row?.into_destination(index + 1))
        .collect()
}
