//! Infrastructure layer: the shared catalog store, persistence, reports,
//! locale formatting and configuration.

pub mod catalog;
pub mod config;
pub mod i18n;

mod integration_tests;

pub use catalog::{Catalog, CatalogEntry, SnapshotHandle};
pub use config::CatalogConfig;
pub use i18n::{Formatters, ReportFormatter};
