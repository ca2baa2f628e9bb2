//! Campaign performance dashboard: a filterable campaign table, simulated
//! KPI cards and insight widgets, a canned analytics assistant, CSV export
//! and a theme preference, served through a CLI and an embedded web UI.

pub mod activity;
pub mod assistant;
pub mod campaign;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod insights;
pub mod metrics;
pub mod table;
pub mod theme;
pub mod web;
