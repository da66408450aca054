mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::*;
use serde_json::json;
use slctrips::api::{catalog_router, CatalogService};
use slctrips::config::DiscoveryConfig;
use std::sync::Arc;

fn unreachable_router() -> axum::Router {
    let service = Arc::new(CatalogService::new(
        Arc::new(UnreachableStore),
        Arc::new(StubWeather),
        DiscoveryConfig::default(),
    ));
    catalog_router(service)
}

#[tokio::test]
async fn destinations_listing_paginates_with_total() {
    let (status, body) = get(router(), "/api/destinations?limit=2&offset=1&category=All").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"], json!({ "limit": 2, "offset": 1, "total": 5 }));
    assert_eq!(
        names(&body, "destinations"),
        vec!["Big Cottonwood Canyon", "Old Bingham Cemetery"]
    );
}

#[tokio::test]
async fn destinations_listing_filters_by_category_and_search() {
    let (status, body) = get(router(), "/api/destinations?category=Parks&search=arch").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "destinations"), vec!["Arches National Park"]);
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn malformed_pagination_is_a_bad_request() {
    let (status, body) = get(router(), "/api/destinations?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn destination_lookup_walks_the_fallback_chain() {
    let (status, body) = get(router(), &format!("/api/destinations/{ARCHES_ID}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Arches National Park");

    let (_, body) = get(router(), "/api/destinations/7").await;
    assert_eq!(body["name"], "Park City Main Street");

    let (_, body) = get(router(), "/api/destinations/temple-square").await;
    assert_eq!(body["name"], "Temple Square");

    let (_, body) = get(router(), "/api/destinations/old-bingham").await;
    assert_eq!(body["name"], "Old Bingham Cemetery");
}

#[tokio::test]
async fn unknown_destination_is_not_found_with_id() {
    let (status, body) = get(router(), "/api/destinations/bryce-canyon").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["id"], "bryce-canyon");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn detail_joins_sorted_gear_and_map_links() {
    let (status, body) = get(router(), "/api/destinations/arches-national-park/detail").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "affiliate_gear"), vec!["Hydration pack", "Trail map"]);
    assert_eq!(
        body["maps_link"],
        "https://www.google.com/maps/search/?api=1&query=38.73,-109.59"
    );

    let (_, body) = get(router(), "/api/destinations/temple-square/detail").await;
    assert!(body.get("maps_embed_url").is_none());
    assert_eq!(body["affiliate_gear"], json!([]));
}

#[tokio::test]
async fn discover_applies_the_pipeline() {
    let (status, body) = get(router(), "/api/discover?band=30%20minutes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "destinations"), vec!["Temple Square"]);
    assert_eq!(body["page_size"], 24);

    let (_, body) = get(router(), "/api/discover?q=park&sort=drive_time_asc").await;
    assert_eq!(
        names(&body, "destinations"),
        vec![
            "Big Cottonwood Canyon",
            "Park City Main Street",
            "Arches National Park"
        ]
    );

    let (status, body) = get(router(), "/api/discover?category=Nonexistent&band=forever").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (_, body) = get(router(), "/api/discover?sort=rating_desc&page_size=2").await;
    assert_eq!(
        names(&body, "destinations"),
        vec!["Arches National Park", "Temple Square"]
    );
}

#[tokio::test]
async fn padded_category_filters_listing_and_discovery_alike() {
    let (_, listing) = get(router(), "/api/destinations?category=%20Parks%20").await;
    let (_, discovered) = get(router(), "/api/discover?category=%20Parks%20").await;

    let expected = vec!["Arches National Park", "Big Cottonwood Canyon"];
    assert_eq!(names(&listing, "destinations"), expected);
    assert_eq!(names(&discovered, "destinations"), expected);
}

#[tokio::test]
async fn discover_accepts_query_as_an_alias_for_q() {
    let (status, body) = get(router(), "/api/discover?query=temple").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "destinations"), vec!["Temple Square"]);
}

#[tokio::test]
async fn numeric_ids_still_resolve_integer_records() {
    let (status, body) = get(router(), "/api/destinations/12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Temple Square");
}

#[tokio::test]
async fn categories_expose_distinct_values_and_bands() {
    let (status, body) = get(router(), "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!(["Landmarks", "Parks", "Towns"]));
    assert_eq!(body["bands"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["bands"][0]["label"], "30 minutes");

    let (_, body) = get(router(), "/api/categories?category=Parks").await;
    assert_eq!(body["subcategories"], json!(["Canyons", "National"]));
}

#[tokio::test]
async fn empty_search_is_not_an_error() {
    let (status, body) = get(router(), "/api/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "destinations": [], "count": 0 }));

    let (_, body) = get(router(), "/api/search?q=%20%20").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn search_matches_text_fields() {
    let (status, body) = get(router(), "/api/search?q=LANDMARK").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body, "destinations"),
        vec!["Old Bingham Cemetery", "Temple Square"]
    );
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn todays_picks_follow_the_injected_calendar() {
    let (_, october) = get(router_with(memory_store(), october_20).0, "/api/todays-picks").await;
    assert_eq!(october["date"], "2025-10-20");
    assert_eq!(october["count"], 5);
    assert_eq!(names(&october, "destinations")[0], "Old Bingham Cemetery");

    let (_, march) = get(router_with(memory_store(), march_20).0, "/api/todays-picks").await;
    assert_eq!(names(&march, "destinations")[0], "Arches National Park");
    assert_eq!(march["destinations"][0]["score"], 4.9);
}

#[tokio::test]
async fn stats_count_destinations() {
    let (status, body) = get(router(), "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destinations"], 5);
}

#[tokio::test]
async fn tripkit_detail_gates_paid_content() {
    let (status, body) = get(router(), "/api/tripkits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = get(router(), "/api/tripkits/haunted-utah").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_access"], false);
    assert_eq!(body["total_destinations"], 2);
    assert_eq!(names(&body, "destinations"), vec!["Old Bingham Cemetery"]);

    let (status, _) = get(router(), "/api/tripkits/unknown-kit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subscribe_enforces_consent_gate() {
    let (status, body) = post_json(
        router(),
        "/api/tripkits/subscribe",
        json!({ "email": "reader@example.com", "tripkit_id": "tk-haunted", "consent_given": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = post_json(
        router(),
        "/api/tripkits/subscribe",
        json!({ "email": "reader@example.com", "consent_given": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        router(),
        "/api/tripkits/subscribe",
        json!({ "email": "nope", "tripkit_id": "tk-haunted", "consent_given": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn subscribe_records_consenting_subscribers() {
    let (router, service) = router_with(memory_store(), october_20);
    let (status, body) = post_json(
        router,
        "/api/tripkits/subscribe",
        json!({
            "email": "Reader@Example.com",
            "tripkit_id": "tk-haunted",
            "consent_given": true,
            "source": "homepage",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let subscribers = service.store().subscribers().expect("store readable");
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].email, "reader@example.com");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::post("/api/tripkits/subscribe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("request builds");
    let (status, _, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn checkout_grants_free_kits_and_defers_paid_ones() {
    let (status, body) = post_json(
        router(),
        "/api/tripkits/checkout",
        json!({ "tripkit_id": "salt-lake-starter", "email": "reader@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checkout_required"], false);
    assert_eq!(body["tripkit"]["slug"], "salt-lake-starter");

    let (status, body) = post_json(
        router(),
        "/api/tripkits/checkout",
        json!({ "tripkit_id": "tk-haunted", "email": "reader@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service Unavailable");

    let (status, _) = post_json(
        router(),
        "/api/tripkits/checkout",
        json!({ "email": "reader@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_proxies_with_cache_header() {
    let request = Request::get("/api/weather?lat=40.76&lon=-111.89")
        .body(Body::empty())
        .expect("request builds");
    let (status, headers, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("public, max-age=600")
    );
    assert_eq!(body["coord"]["lat"], 40.76);
}

#[tokio::test]
async fn weather_requires_valid_coordinates() {
    let (status, body) = get(router(), "/api/weather?lat=40.76").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().contains("lon"));

    let (status, _) = get(router(), "/api/weather?lat=north&lon=-111.89").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(router(), "/api/weather?lat=95&lon=-111.89").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unwired_methods_are_rejected_with_json() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/destinations")
        .body(Body::empty())
        .expect("request builds");
    let (status, _, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let request = Request::get("/api/tripkits/subscribe")
        .body(Body::empty())
        .expect("request builds");
    let (status, _, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn database_failures_surface_as_internal_errors() {
    let (status, body) = get(unreachable_router(), "/api/discover").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("connection refused"));

    let (status, _) = get(unreachable_router(), "/api/destinations/temple-square").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Blank-query search never reaches the store.
    let (status, _) = get(unreachable_router(), "/api/search?q=").await;
    assert_eq!(status, StatusCode::OK);
}
