//! Composable list predicates. Each returns a new list in input order and
//! never mutates its argument.

use super::destination::Destination;
use super::drive_band::DriveBand;

/// Selector value that disables the category and subcategory filters.
pub const ALL: &str = "All";

/// Keep destinations whose name, category, subcategory or descriptions contain
/// the trimmed query, ignoring case. A blank query keeps everything.
pub fn search(destinations: &[Destination], query: &str) -> Vec<Destination> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return destinations.to_vec();
    }

    destinations
        .iter()
        .filter(|destination| matches_query(destination, &needle))
        .cloned()
        .collect()
}

fn matches_query(destination: &Destination, needle: &str) -> bool {
    let fields = [
        Some(destination.name.as_str()),
        Some(destination.category.as_str()),
        Some(destination.subcategory.as_str()),
        destination.short.as_deref(),
        destination.long.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Exact, case-sensitive category match. `None` or [`ALL`] keeps everything.
pub fn by_category(destinations: &[Destination], category: Option<&str>) -> Vec<Destination> {
    match active_selector(category) {
        Some(selected) => destinations
            .iter()
            .filter(|destination| destination.category == selected)
            .cloned()
            .collect(),
        None => destinations.to_vec(),
    }
}

/// Exact, case-sensitive subcategory match. `None` or [`ALL`] keeps everything.
pub fn by_subcategory(destinations: &[Destination], subcategory: Option<&str>) -> Vec<Destination> {
    match active_selector(subcategory) {
        Some(selected) => destinations
            .iter()
            .filter(|destination| destination.subcategory == selected)
            .cloned()
            .collect(),
        None => destinations.to_vec(),
    }
}

/// Keep destinations whose drive time falls inside the band. No band keeps everything.
pub fn by_drive_band(destinations: &[Destination], band: Option<DriveBand>) -> Vec<Destination> {
    match band {
        Some(band) => destinations
            .iter()
            .filter(|destination| band.contains(destination.drive_time_minutes))
            .cloned()
            .collect(),
        None => destinations.to_vec(),
    }
}

/// Trimmed selector value, or `None` when it is blank or [`ALL`].
pub fn active_selector(selector: Option<&str>) -> Option<&str> {
    selector
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL)
}
