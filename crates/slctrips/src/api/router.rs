use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::service::CatalogService;
use crate::catalog::{CheckoutRequest, DiscoveryQuery, SubscribeRequest};
use crate::error::AppError;
use crate::store::{DestinationStore, ListQuery, TripKitStore};
use crate::weather::WeatherProvider;

type Shared<S, W> = State<Arc<CatalogService<S, W>>>;

const WEATHER_CACHE_CONTROL: &str = "public, max-age=600";

/// Router exposing the catalog API. Each path answers only its wired method;
/// anything else gets a JSON 405.
pub fn catalog_router<S, W>(service: Arc<CatalogService<S, W>>) -> Router
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Router::new()
        .route(
            "/api/destinations",
            get(list_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/destinations/:id",
            get(destination_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/destinations/:id/detail",
            get(destination_detail_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/discover",
            get(discover_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/categories",
            get(facets_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/search",
            get(search_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/stats",
            get(stats_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/todays-picks",
            get(todays_picks_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/tripkits",
            get(tripkits_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/tripkits/subscribe",
            post(subscribe_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/tripkits/checkout",
            post(checkout_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/tripkits/:slug",
            get(tripkit_handler::<S, W>).fallback(method_not_allowed),
        )
        .route(
            "/api/weather",
            get(weather_handler::<S, W>).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub(crate) async fn list_handler<S, W>(
    State(service): Shared<S, W>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let query = query_params(query)?;
    Ok(Json(service.list(&query).await?).into_response())
}

pub(crate) async fn destination_handler<S, W>(
    State(service): Shared<S, W>,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.destination(&id).await?).into_response())
}

pub(crate) async fn destination_detail_handler<S, W>(
    State(service): Shared<S, W>,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.destination_detail(&id).await?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DiscoverParams {
    #[serde(default, alias = "query")]
    q: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    band: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    page_size: Option<usize>,
}

pub(crate) async fn discover_handler<S, W>(
    State(service): Shared<S, W>,
    params: Result<Query<DiscoverParams>, QueryRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let params = query_params(params)?;
    let criteria = DiscoveryQuery {
        query: params.q,
        category: params.category,
        subcategory: params.subcategory,
        band: params.band,
        sort: params.sort,
    };
    Ok(Json(service.discover(&criteria, params.page_size).await?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FacetParams {
    #[serde(default)]
    category: Option<String>,
}

pub(crate) async fn facets_handler<S, W>(
    State(service): Shared<S, W>,
    params: Result<Query<FacetParams>, QueryRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let params = query_params(params)?;
    Ok(Json(service.facets(params.category.as_deref()).await?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

pub(crate) async fn search_handler<S, W>(
    State(service): Shared<S, W>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let params = query_params(params)?;
    let response = service.search(params.q.as_deref(), params.limit).await?;
    Ok(Json(response).into_response())
}

pub(crate) async fn stats_handler<S, W>(State(service): Shared<S, W>) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.stats().await?).into_response())
}

pub(crate) async fn todays_picks_handler<S, W>(
    State(service): Shared<S, W>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.todays_picks().await?).into_response())
}

pub(crate) async fn tripkits_handler<S, W>(
    State(service): Shared<S, W>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.tripkits().await?).into_response())
}

pub(crate) async fn tripkit_handler<S, W>(
    State(service): Shared<S, W>,
    Path(slug): Path<String>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    Ok(Json(service.tripkit(&slug).await?).into_response())
}

pub(crate) async fn subscribe_handler<S, W>(
    State(service): Shared<S, W>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let request = json_body(body)?;
    Ok(Json(service.subscribe(request).await?).into_response())
}

pub(crate) async fn checkout_handler<S, W>(
    State(service): Shared<S, W>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let request = json_body(body)?;
    Ok(Json(service.checkout(request).await?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WeatherParams {
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
}

fn coordinate(raw: Option<&str>, name: &str, bound: f64) -> Result<f64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))?;

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= bound => Ok(value),
        _ => Err(AppError::BadRequest(format!(
            "{name} must be a number between -{bound} and {bound}"
        ))),
    }
}

pub(crate) async fn weather_handler<S, W>(
    State(service): Shared<S, W>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Response, AppError>
where
    S: DestinationStore + TripKitStore + 'static,
    W: WeatherProvider + 'static,
{
    let params = query_params(params)?;
    let latitude = coordinate(params.lat.as_deref(), "lat", 90.0)?;
    let longitude = coordinate(params.lon.as_deref(), "lon", 180.0)?;

    let conditions = service.weather(latitude, longitude).await?;
    Ok((
        [(header::CACHE_CONTROL, WEATHER_CACHE_CONTROL)],
        Json(conditions),
    )
        .into_response())
}
