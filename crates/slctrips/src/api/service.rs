use crate::catalog::{
    discover, distinct_categories, distinct_subcategories, filters, pick_featured_scored,
    sort_destinations, CheckoutRequest, Destination, DestinationDetail, DiscoveryQuery, DriveBand,
    ScoredPick, SortKey, SubscribeRequest, TripKit, TripKitId, TripKitView,
};
use crate::config::DiscoveryConfig;
use crate::error::AppError;
use crate::store::{resolve_destination, DestinationStore, ListQuery, TripKitStore};
use crate::weather::WeatherProvider;
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
const FEATURED_CANDIDATE_POOL: usize = 50;

/// Server-local calendar date. The seasonal window follows this clock.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationListResponse {
    pub destinations: Vec<Destination>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoverResponse {
    pub destinations: Vec<Destination>,
    pub count: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub destinations: Vec<Destination>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetsResponse {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    pub bands: Vec<DriveBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicksResponse {
    pub date: NaiveDate,
    pub destinations: Vec<ScoredPick>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripKitListResponse {
    pub tripkits: Vec<TripKit>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutResponse {
    pub checkout_required: bool,
    pub tripkit: TripKit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub destinations: usize,
}

/// Request-scoped operations behind the HTTP surface. Holds no per-request state.
pub struct CatalogService<S, W> {
    store: Arc<S>,
    weather: Arc<W>,
    discovery: DiscoveryConfig,
    clock: fn() -> NaiveDate,
}

impl<S, W> CatalogService<S, W>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    pub fn new(store: Arc<S>, weather: Arc<W>, discovery: DiscoveryConfig) -> Self {
        Self {
            store,
            weather,
            discovery,
            clock: local_today,
        }
    }

    /// Replace the calendar used for the seasonal boost.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn list(&self, query: &ListQuery) -> Result<DestinationListResponse, AppError> {
        let page = self.store.list(query).await?;
        Ok(DestinationListResponse {
            destinations: page.destinations,
            pagination: Pagination {
                limit: query.limit(),
                offset: query.offset(),
                total: page.total,
            },
        })
    }

    pub async fn destination(&self, raw_id: &str) -> Result<Destination, AppError> {
        Ok(resolve_destination(self.store.as_ref(), raw_id)
            .await?
            .destination)
    }

    pub async fn destination_detail(&self, raw_id: &str) -> Result<DestinationDetail, AppError> {
        let destination = self.destination(raw_id).await?;
        let gear = self.store.affiliate_gear(&destination.id).await?;
        Ok(DestinationDetail::new(destination, gear))
    }

    pub async fn discover(
        &self,
        criteria: &DiscoveryQuery,
        page_size: Option<usize>,
    ) -> Result<DiscoverResponse, AppError> {
        let page_size = page_size
            .filter(|size| *size > 0)
            .unwrap_or(self.discovery.page_size);
        let candidates = self.store.fetch_all().await?;
        let destinations = discover(&candidates, criteria, page_size);

        Ok(DiscoverResponse {
            count: destinations.len(),
            destinations,
            page_size,
        })
    }

    pub async fn facets(&self, category: Option<&str>) -> Result<FacetsResponse, AppError> {
        let category = filters::active_selector(category);

        let all = self.store.fetch_all().await?;
        let subcategories = match category {
            Some(category) => {
                let scoped = self.store.fetch_by_category(category).await?;
                distinct_subcategories(&scoped, None)
            }
            None => distinct_subcategories(&all, None),
        };

        Ok(FacetsResponse {
            categories: distinct_categories(&all),
            subcategories,
            bands: DriveBand::catalog().to_vec(),
        })
    }

    pub async fn search(
        &self,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<SearchResponse, AppError> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Ok(SearchResponse {
                destinations: Vec::new(),
                count: 0,
            });
        }

        let candidates = self.store.fetch_all().await?;
        let matched = filters::search(&candidates, query);
        let mut destinations = sort_destinations(&matched, SortKey::NameAsc);
        destinations.truncate(limit.unwrap_or(DEFAULT_SEARCH_LIMIT));

        Ok(SearchResponse {
            count: destinations.len(),
            destinations,
        })
    }

    pub async fn todays_picks(&self) -> Result<PicksResponse, AppError> {
        let today = (self.clock)();
        let mut candidates = self.store.fetch_featured(FEATURED_CANDIDATE_POOL).await?;
        if candidates.is_empty() {
            candidates = self.store.fetch_all().await?;
        }

        let destinations = pick_featured_scored(&candidates, today, self.discovery.featured_limit);
        Ok(PicksResponse {
            date: today,
            count: destinations.len(),
            destinations,
        })
    }

    pub async fn stats(&self) -> Result<StatsResponse, AppError> {
        Ok(StatsResponse {
            destinations: self.store.count().await?,
        })
    }

    pub async fn tripkits(&self) -> Result<TripKitListResponse, AppError> {
        let tripkits = self.store.fetch_tripkits().await?;
        Ok(TripKitListResponse {
            count: tripkits.len(),
            tripkits,
        })
    }

    pub async fn tripkit(&self, slug: &str) -> Result<TripKitView, AppError> {
        let tripkit = self
            .store
            .fetch_tripkit_by_slug(slug)
            .await?
            .ok_or_else(|| tripkit_not_found(slug))?;
        let stops = self.store.tripkit_stops(&tripkit.id).await?;
        Ok(TripKitView::new(tripkit, stops))
    }

    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<SubscribeResponse, AppError> {
        let subscriber = request.into_subscriber(Utc::now())?;
        let tripkit = subscriber.tripkit_id.0.clone();
        self.store.upsert_subscriber(subscriber).await?;
        info!(%tripkit, "tripkit subscriber recorded");

        Ok(SubscribeResponse {
            success: true,
            message: "You're subscribed! Check your inbox for your TripKit.".to_string(),
        })
    }

    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutResponse, AppError> {
        let tripkit_ref = request
            .tripkit_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("tripkit_id is required".to_string()))?;
        let email = request.email.unwrap_or_default();
        if !crate::catalog::tripkit::is_valid_email(email.trim()) {
            return Err(AppError::BadRequest(
                "a valid email is required for checkout".to_string(),
            ));
        }

        let tripkit = match self
            .store
            .fetch_tripkit_by_id(&TripKitId(tripkit_ref.clone()))
            .await?
        {
            Some(tripkit) => tripkit,
            None => self
                .store
                .fetch_tripkit_by_slug(&tripkit_ref)
                .await?
                .ok_or_else(|| tripkit_not_found(&tripkit_ref))?,
        };

        if tripkit.is_free() {
            return Ok(CheckoutResponse {
                checkout_required: false,
                tripkit,
            });
        }

        Err(AppError::Unavailable(
            "Payment processing is not enabled for this deployment".to_string(),
        ))
    }

    pub async fn weather(&self, latitude: f64, longitude: f64) -> Result<Value, AppError> {
        Ok(self.weather.current(latitude, longitude).await?)
    }
}

fn tripkit_not_found(reference: &str) -> AppError {
    AppError::NotFound {
        message: format!("TripKit '{reference}' was not found"),
        id: Some(reference.to_string()),
    }
}
