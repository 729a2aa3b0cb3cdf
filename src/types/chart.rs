//! Chart points derived from the click breakdown.

use serde::Serialize;
use std::collections::HashMap;

use super::common::ListId;

/// A label/value pair ready for a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Synthetic list identity, minted at projection time.
    pub id: ListId,
    /// Category label (the chart bucket key).
    pub label: String,
    /// Bucket count.
    pub value: f64,
}

impl ChartPoint {
    /// Creates a chart point with a fresh identity.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            id: ListId::new(),
            label: label.into(),
            value,
        }
    }

    /// Projects every entry of a chart breakdown into a point.
    ///
    /// The breakdown is unordered, so neither is the result.
    pub fn from_breakdown(breakdown: &HashMap<String, i64>) -> Vec<Self> {
        breakdown
            .iter()
            .map(|(label, count)| Self::new(label.clone(), *count as f64))
            .collect()
    }
}
