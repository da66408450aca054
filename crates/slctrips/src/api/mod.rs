//! HTTP surface for the catalog: listing, lookup, discovery, picks, TripKits
//! and the weather proxy.

pub mod router;
pub mod service;

pub use router::catalog_router;
pub use service::{local_today, CatalogService};
