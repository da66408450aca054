#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use slctrips::api::{catalog_router, CatalogService};
use slctrips::catalog::{
    AffiliateGear, Destination, DestinationId, Subscriber, TripKit, TripKitId, TripKitStop,
};
use slctrips::config::DiscoveryConfig;
use slctrips::store::{DestinationStore, ListQuery, MemoryStore, Page, StoreError, TripKitStore};
use slctrips::weather::{WeatherError, WeatherProvider};
use std::sync::Arc;
use tower::ServiceExt;

pub const ARCHES_ID: &str = "9b2f6d3e-2c55-4c0e-9a57-31e3f1b8d7a1";

pub fn destination(id: DestinationId, name: &str, category: &str, minutes: u32) -> Destination {
    let mut destination = Destination::new(id, name);
    destination.category = category.to_string();
    destination.drive_time_minutes = minutes;
    destination
}

/// The three-destination scenario plus a few extra records for API tests.
pub fn scenario() -> Vec<Destination> {
    let mut arches = destination(
        DestinationId::from(ARCHES_ID),
        "Arches National Park",
        "Parks",
        240,
    );
    arches.slug = Some("arches-national-park".to_string());
    arches.subcategory = "National".to_string();
    arches.rating = Some(4.9);
    arches.latitude = Some(38.73);
    arches.longitude = Some(-109.59);

    let mut park_city = destination(DestinationId::Int(7), "Park City Main Street", "Towns", 45);
    park_city.subcategory = "Mountain".to_string();
    park_city.rating = Some(4.2);

    let mut temple = destination(DestinationId::Int(12), "Temple Square", "Landmarks", 15);
    temple.slug = Some("temple-square".to_string());
    temple.subcategory = "Historic".to_string();
    temple.rating = Some(4.5);

    vec![arches, park_city, temple]
}

pub fn extended() -> Vec<Destination> {
    let mut list = scenario();

    let mut cemetery = destination(
        DestinationId::Int(30),
        "Old Bingham Cemetery",
        "Landmarks",
        40,
    );
    cemetery.subcategory = "Cemeteries".to_string();
    cemetery.rating = Some(3.1);
    cemetery.season_tags = vec!["haunted".to_string(), "ghost".to_string()];
    list.push(cemetery);

    let mut canyon = destination(
        DestinationId::Int(31),
        "Big Cottonwood Canyon",
        "Parks",
        35,
    );
    canyon.subcategory = "Canyons".to_string();
    canyon.rating = Some(3.9);
    canyon.season_tags = vec!["fall-colors".to_string()];
    list.push(canyon);

    list
}

pub fn tripkits() -> Vec<(TripKit, Vec<TripKitStop>)> {
    let haunted = TripKit {
        id: TripKitId("tk-haunted".to_string()),
        slug: "haunted-utah".to_string(),
        name: "Haunted Utah".to_string(),
        tagline: Some("Ghost towns and spooky stops".to_string()),
        price: 12.0,
        sections: Vec::new(),
    };
    let free = TripKit {
        id: TripKitId("tk-free".to_string()),
        slug: "salt-lake-starter".to_string(),
        name: "Salt Lake Starter".to_string(),
        tagline: None,
        price: 0.0,
        sections: Vec::new(),
    };

    let list = extended();
    let haunted_stops = vec![
        TripKitStop {
            destination: list[3].clone(),
            display_order: 1,
            is_preview: true,
        },
        TripKitStop {
            destination: list[2].clone(),
            display_order: 2,
            is_preview: false,
        },
    ];
    let free_stops = vec![TripKitStop {
        destination: list[2].clone(),
        display_order: 1,
        is_preview: false,
    }];

    vec![(haunted, haunted_stops), (free, free_stops)]
}

pub fn memory_store() -> MemoryStore {
    let gear = vec![
        AffiliateGear {
            name: "Trail map".to_string(),
            affiliate_url: "https://shop.example/map".to_string(),
            image_url: None,
            price: Some(12.0),
            display_order: 2,
        },
        AffiliateGear {
            name: "Hydration pack".to_string(),
            affiliate_url: "https://shop.example/pack".to_string(),
            image_url: None,
            price: Some(80.0),
            display_order: 1,
        },
    ];

    let store = MemoryStore::new(extended())
        .with_gear(DestinationId::from(ARCHES_ID), gear)
        .expect("gear seeded");
    tripkits()
        .into_iter()
        .try_fold(store, |store, (tripkit, stops)| store.with_tripkit(tripkit, stops))
        .expect("tripkits seeded")
}

#[derive(Debug, Default, Clone)]
pub struct StubWeather;

impl WeatherProvider for StubWeather {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Value, WeatherError> {
        Ok(json!({
            "coord": { "lat": latitude, "lon": longitude },
            "main": { "temp": 61.5 },
        }))
    }
}

/// Store whose every call fails as if the database were unreachable.
#[derive(Debug, Default, Clone)]
pub struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Transport("connection refused".to_string())
}

impl DestinationStore for UnreachableStore {
    async fn fetch_all(&self) -> Result<Vec<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_by_id(&self, _id: &DestinationId) -> Result<Option<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_by_slug(&self, _slug: &str) -> Result<Option<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn find_by_name_fragment(
        &self,
        _fragment: &str,
    ) -> Result<Option<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_by_category(&self, _category: &str) -> Result<Vec<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_featured(&self, _limit: usize) -> Result<Vec<Destination>, StoreError> {
        Err(unreachable())
    }
    async fn list(&self, _query: &ListQuery) -> Result<Page, StoreError> {
        Err(unreachable())
    }
    async fn count(&self) -> Result<usize, StoreError> {
        Err(unreachable())
    }
    async fn upsert(&self, _destination: Destination) -> Result<Destination, StoreError> {
        Err(unreachable())
    }
    async fn affiliate_gear(&self, _id: &DestinationId) -> Result<Vec<AffiliateGear>, StoreError> {
        Err(unreachable())
    }
}

impl TripKitStore for UnreachableStore {
    async fn fetch_tripkits(&self) -> Result<Vec<TripKit>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_tripkit_by_slug(&self, _slug: &str) -> Result<Option<TripKit>, StoreError> {
        Err(unreachable())
    }
    async fn fetch_tripkit_by_id(&self, _id: &TripKitId) -> Result<Option<TripKit>, StoreError> {
        Err(unreachable())
    }
    async fn tripkit_stops(&self, _id: &TripKitId) -> Result<Vec<TripKitStop>, StoreError> {
        Err(unreachable())
    }
    async fn upsert_subscriber(&self, _subscriber: Subscriber) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

pub fn october_20() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid date")
}

pub fn march_20() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).expect("valid date")
}

pub fn router_with(store: MemoryStore, clock: fn() -> NaiveDate) -> (Router, Arc<CatalogService<MemoryStore, StubWeather>>) {
    let service = Arc::new(
        CatalogService::new(
            Arc::new(store),
            Arc::new(StubWeather),
            DiscoveryConfig::default(),
        )
        .with_clock(clock),
    );
    (catalog_router(service.clone()), service)
}

pub fn router() -> Router {
    router_with(memory_store(), october_20).0
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, headers, body)
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).expect("request builds");
    let (status, _, body) = send(router, request).await;
    (status, body)
}

pub async fn post_json(router: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds");
    let (status, _, body) = send(router, request).await;
    (status, body)
}

pub fn names(body: &Value, field: &str) -> Vec<String> {
    body[field]
        .as_array()
        .expect("array field")
        .iter()
        .map(|item| item["name"].as_str().expect("name").to_string())
        .collect()
}
