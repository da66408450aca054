use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use slctrips::catalog::load_destinations;
use slctrips::error::AppError;
use slctrips::store::MemoryStore;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// In-memory catalog backed by a fixture file.
pub(crate) fn seeded_store(path: &Path) -> Result<MemoryStore, AppError> {
    let destinations = load_destinations(path)?;
    info!(seed = %path.display(), destinations = destinations.len(), "fixture catalog loaded");
    Ok(MemoryStore::new(destinations))
}
