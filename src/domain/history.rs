// ============================================================
// Layer 3 - Training History
// ============================================================
// What a trainer hands back after a run: named per-epoch
// series (losses, scores, anything numeric) plus wall-clock
// timings. The coordinator persists it as JSON next to the
// weights.
//
// Example JSON:
//   {
//     "series": { "rec_loss": [0.41, 0.22], "kld": [3.1, 1.7] },
//     "per_epoch_time": [12.4, 12.1],
//     "total_time": 24.5
//   }

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainHistory {
    /// Named value series, one entry appended per epoch
    pub series: BTreeMap<String, Vec<f64>>,

    /// Seconds spent in each finished epoch
    pub per_epoch_time: Vec<f64>,

    /// Sum of `per_epoch_time`
    pub total_time: f64,
}

impl TrainHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the series called `name`, creating it if needed.
    pub fn record(&mut self, name: &str, value: f64) {
        self.series.entry(name.to_string()).or_default().push(value);
    }

    /// Close an epoch that took `seconds`.
    pub fn end_epoch(&mut self, seconds: f64) {
        self.per_epoch_time.push(seconds);
        self.total_time += seconds;
    }

    /// Number of finished epochs
    pub fn epochs(&self) -> usize {
        self.per_epoch_time.len()
    }

    /// Most recent value of a series
    pub fn last(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|s| s.last().copied())
    }
}
