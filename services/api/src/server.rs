use crate::cli::ServeArgs;
use crate::infra::{seeded_store, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use slctrips::api::{catalog_router, CatalogService};
use slctrips::config::AppConfig;
use slctrips::error::AppError;
use slctrips::store::{DestinationStore, SupabaseStore, TripKitStore};
use slctrips::telemetry;
use slctrips::weather::OpenWeatherClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    match args.seed.take() {
        Some(path) => serve(config, Arc::new(seeded_store(&path)?)).await,
        None => {
            let store = SupabaseStore::from_config(&config.supabase)?;
            info!("catalog backed by hosted database");
            serve(config, Arc::new(store)).await
        }
    }
}

async fn serve<S>(config: AppConfig, store: Arc<S>) -> Result<(), AppError>
where
    S: DestinationStore + TripKitStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let weather = Arc::new(OpenWeatherClient::new(config.weather.clone()));
    let catalog = Arc::new(CatalogService::new(store, weather, config.discovery));

    let app = with_service_routes(catalog_router(catalog))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "slctrips catalog ready");

    axum::serve(listener, app).await?;
    Ok(())
}
