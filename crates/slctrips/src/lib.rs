//! Destination catalog, discovery pipeline and HTTP API for the SLCTrips
//! travel guide.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod weather;
