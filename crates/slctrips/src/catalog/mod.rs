//! Destination data model and the discovery core: filters, sorting, the
//! seasonal boost, featured picks and the listing pipeline.

pub mod destination;
pub mod discovery;
pub mod drive_band;
pub mod featured;
pub mod filters;
pub mod import;
pub mod seasonal;
pub mod sort;
pub mod tripkit;

pub use destination::{
    distinct_categories, distinct_subcategories, AffiliateGear, Coordinates, Destination,
    DestinationDetail, DestinationId,
};
pub use discovery::{discover, DiscoveryQuery, DEFAULT_PAGE_SIZE};
pub use drive_band::DriveBand;
pub use featured::{
    featured_score, pick_featured, pick_featured_scored, ScoredPick, DEFAULT_FEATURED_LIMIT,
};
pub use import::{load_destinations, ImportError};
pub use seasonal::seasonal_boost;
pub use sort::{sort_destinations, SortKey};
pub use tripkit::{
    CheckoutRequest, SubscribeRequest, Subscriber, SubscriptionError, TripKit, TripKitId,
    TripKitStop, TripKitView,
};
