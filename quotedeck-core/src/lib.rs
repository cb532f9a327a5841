//! QuoteDeck Core: market data, uploaded tables, statistics and charts.
//!
//! This crate holds everything the dashboard front ends share:
//! - Domain types (price bars, series, date ranges, sampling intervals)
//! - Market data providers behind a trait, plus a bounded memo cache
//! - Uploaded CSV tables (polars) and descriptive statistics
//! - Bar and line chart aggregation with PNG rendering
//! - The session update function driven by dashboard events

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod flow;
pub mod format;
pub mod session;
pub mod stats;
pub mod table;

pub use config::DashboardConfig;
pub use session::{DashboardEvent, Recomputed, Session};
