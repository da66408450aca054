use super::destination::Destination;
use super::drive_band::DriveBand;
use super::filters;
use super::sort::{sort_destinations, SortKey};

pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Listing criteria. Every field is optional; unknown values disable their stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub band: Option<String>,
    pub sort: Option<String>,
}

impl DiscoveryQuery {
    pub fn band(&self) -> Option<DriveBand> {
        self.band.as_deref().and_then(DriveBand::from_label)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.as_deref().map(SortKey::parse).unwrap_or_default()
    }
}

/// Search, then category and subcategory, then drive band, then sort, then
/// keep the first `page_size` results. Anything past the page is dropped.
pub fn discover(
    destinations: &[Destination],
    criteria: &DiscoveryQuery,
    page_size: usize,
) -> Vec<Destination> {
    let matched = filters::search(destinations, criteria.query.as_deref().unwrap_or_default());
    let matched = filters::by_category(&matched, criteria.category.as_deref());
    let matched = filters::by_subcategory(&matched, criteria.subcategory.as_deref());
    let matched = filters::by_drive_band(&matched, criteria.band());

    let mut page = sort_destinations(&matched, criteria.sort_key());
    page.truncate(page_size);
    page
}
