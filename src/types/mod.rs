//! Type definitions for the dashboard API.
//!
//! The wire payload decodes into [`DashboardResponse`]. Its nested
//! collections become the links and chart points published to observers.

pub mod chart;
pub mod common;
pub mod dashboard;
pub mod link;

pub use chart::ChartPoint;
pub use common::ListId;
pub use dashboard::{DashboardData, DashboardResponse};
pub use link::Link;
