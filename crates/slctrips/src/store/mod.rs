//! Boundary to the hosted database. Every call is a single round trip with no
//! caching and no retry; failures surface as [`StoreError`].

pub mod lookup;
pub mod memory;
pub mod supabase;

use crate::catalog::{
    AffiliateGear, Destination, DestinationId, Subscriber, TripKit, TripKitId, TripKitStop,
};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use lookup::{resolve_destination, LookupError, LookupStage, Resolved};
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

/// Offset pagination for the raw listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Category selector with the "All" sentinel and blanks removed.
    pub fn category(&self) -> Option<&str> {
        crate::catalog::filters::active_selector(self.category.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub destinations: Vec<Destination>,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database request failed: {0}")]
    Transport(String),
    #[error("database responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected database payload: {0}")]
    Decode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Read access to destinations plus the upsert used by maintenance tooling.
pub trait DestinationStore: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Destination>, StoreError>> + Send;

    fn fetch_by_id(
        &self,
        id: &DestinationId,
    ) -> impl Future<Output = Result<Option<Destination>, StoreError>> + Send;

    fn fetch_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Destination>, StoreError>> + Send;

    /// First destination whose name contains `fragment`, ignoring case.
    fn find_by_name_fragment(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Option<Destination>, StoreError>> + Send;

    fn fetch_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Destination>, StoreError>> + Send;

    fn fetch_featured(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Destination>, StoreError>> + Send;

    fn list(&self, query: &ListQuery) -> impl Future<Output = Result<Page, StoreError>> + Send;

    fn count(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;

    fn upsert(
        &self,
        destination: Destination,
    ) -> impl Future<Output = Result<Destination, StoreError>> + Send;

    fn affiliate_gear(
        &self,
        id: &DestinationId,
    ) -> impl Future<Output = Result<Vec<AffiliateGear>, StoreError>> + Send;
}

pub trait TripKitStore: Send + Sync {
    fn fetch_tripkits(&self) -> impl Future<Output = Result<Vec<TripKit>, StoreError>> + Send;

    fn fetch_tripkit_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<TripKit>, StoreError>> + Send;

    fn fetch_tripkit_by_id(
        &self,
        id: &TripKitId,
    ) -> impl Future<Output = Result<Option<TripKit>, StoreError>> + Send;

    /// Linked destinations ordered by display order.
    fn tripkit_stops(
        &self,
        id: &TripKitId,
    ) -> impl Future<Output = Result<Vec<TripKitStop>, StoreError>> + Send;

    /// Insert or refresh a subscriber keyed by email and kit.
    fn upsert_subscriber(
        &self,
        subscriber: Subscriber,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
