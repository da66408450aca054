use super::destination::Destination;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    NameAsc,
    RatingDesc,
    DriveTimeAsc,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name_asc",
            Self::RatingDesc => "rating_desc",
            Self::DriveTimeAsc => "drive_time_asc",
        }
    }

    /// Lenient parse; unrecognised keys fall back to [`SortKey::NameAsc`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rating_desc" => Self::RatingDesc,
            "drive_time_asc" => Self::DriveTimeAsc,
            _ => Self::NameAsc,
        }
    }
}

/// Sorted copy of the list. Equal keys keep their input order.
pub fn sort_destinations(destinations: &[Destination], key: SortKey) -> Vec<Destination> {
    let mut sorted = destinations.to_vec();
    match key {
        SortKey::NameAsc => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::RatingDesc => {
            sorted.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()))
        }
        SortKey::DriveTimeAsc => sorted.sort_by_key(|destination| destination.drive_time_minutes),
    }
    sorted
}

/// Case-folded comparison first, raw text as the tiebreak so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
