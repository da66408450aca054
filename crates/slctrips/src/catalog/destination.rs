use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Record identifier as stored upstream: legacy rows use integers, newer rows UUID text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DestinationId {
    Int(i64),
    Text(String),
}

impl DestinationId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

impl From<i64> for DestinationId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for DestinationId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single catalog entry. Only read by the discovery core, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drive_time_minutes: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub season_tags: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
}

/// Hosted rows carry explicit nulls for unset columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Destination {
    pub fn new(id: impl Into<DestinationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: None,
            name: name.into(),
            category: String::new(),
            subcategory: String::new(),
            drive_time_minutes: 0,
            rating: None,
            season_tags: Vec::new(),
            latitude: None,
            longitude: None,
            short: None,
            long: None,
            image_url: None,
            featured: false,
        }
    }

    /// Rating used for ranking; missing ratings rank as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Gear item linked to a destination through the affiliate join table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateGear {
    pub name: String,
    pub affiliate_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub display_order: i32,
}

/// Destination plus the joined and computed fields served by the detail route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationDetail {
    #[serde(flatten)]
    pub destination: Destination,
    pub affiliate_gear: Vec<AffiliateGear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_link: Option<String>,
}

impl DestinationDetail {
    pub fn new(destination: Destination, mut gear: Vec<AffiliateGear>) -> Self {
        gear.sort_by_key(|item| item.display_order);

        let (maps_embed_url, maps_link) = match destination.coordinates() {
            Some(Coordinates {
                latitude,
                longitude,
            }) => (
                Some(format!(
                    "https://maps.google.com/maps?q={latitude},{longitude}&z=12&output=embed"
                )),
                Some(format!(
                    "https://www.google.com/maps/search/?api=1&query={latitude},{longitude}"
                )),
            ),
            None => (None, None),
        };

        Self {
            destination,
            affiliate_gear: gear,
            maps_embed_url,
            maps_link,
        }
    }
}

/// Distinct non-empty categories present in the list, sorted.
pub fn distinct_categories(destinations: &[Destination]) -> Vec<String> {
    destinations
        .iter()
        .map(|destination| destination.category.trim())
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty subcategories, optionally restricted to one category.
pub fn distinct_subcategories(destinations: &[Destination], category: Option<&str>) -> Vec<String> {
    destinations
        .iter()
        .filter(|destination| match category {
            Some(category) => destination.category == category,
            None => true,
        })
        .map(|destination| destination.subcategory.trim())
        .filter(|subcategory| !subcategory.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
