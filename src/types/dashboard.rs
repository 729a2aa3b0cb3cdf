//! Dashboard response envelope.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::chart::ChartPoint;
use super::link::Link;
use crate::errors::DashboardResult;

/// Top-level dashboard payload.
///
/// Decoding is strict: every non-optional field must be present with the
/// right type, including `data`, or the whole response is rejected.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardResponse {
    /// Backend success flag.
    pub status: bool,

    /// Backend status code.
    #[serde(rename = "statusCode")]
    pub status_code: i64,

    /// Backend status message.
    pub message: String,

    /// Support contact number.
    pub support_whatsapp_number: String,

    /// Extra income earned.
    pub extra_income: f64,

    /// Number of links owned by the account.
    pub total_links: i64,

    /// Lifetime clicks across all links.
    pub total_clicks: i64,

    /// Clicks recorded today.
    pub today_clicks: i64,

    /// Traffic source with the most clicks.
    pub top_source: String,

    /// Location with the most clicks.
    pub top_location: String,

    /// Start time of the reporting window.
    #[serde(rename = "startTime")]
    pub start_time: String,

    /// Links created today.
    pub links_created_today: i64,

    /// Number of applied campaigns.
    pub applied_campaign: i64,

    /// Nested link and chart collections.
    pub data: DashboardData,
}

impl DashboardResponse {
    /// Decodes a response body.
    pub fn from_slice(body: &[u8]) -> DashboardResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Link collections and the chart breakdown.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardData {
    /// Most recently created links, in backend order.
    pub recent_links: Vec<Link>,

    /// Most clicked links, in backend order.
    pub top_links: Vec<Link>,

    /// Click counts keyed by chart bucket label.
    pub overall_url_chart: HashMap<String, i64>,
}

impl DashboardData {
    /// Projects the chart breakdown into display points.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        ChartPoint::from_breakdown(&self.overall_url_chart)
    }
}
