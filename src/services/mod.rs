//! Service implementations for the dashboard API.

mod dashboard;

pub use dashboard::DashboardService;
