//! Suggestion run metrics
//!
//! Per-run counters and timings, reported through `tracing` at the end of
//! each run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use super::models::{SuggestionSource, UserId};

/// Metrics for a single suggestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionMetrics {
    pub user_id: UserId,
    pub run_id: String,
    pub timestamp: i64,
    pub total_duration_ms: u64,
    pub limit: usize,
    pub returned: usize,
    /// Sources consulted before the list filled up
    pub sources_consulted: usize,
    /// source -> number of articles it contributed
    pub by_source: HashMap<SuggestionSource, usize>,
}

impl SuggestionMetrics {
    pub fn new(user_id: UserId, limit: usize) -> Self {
        Self {
            user_id,
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            total_duration_ms: 0,
            limit,
            returned: 0,
            sources_consulted: 0,
            by_source: HashMap::new(),
        }
    }

    pub fn record(&mut self, source: SuggestionSource, added: usize) {
        self.sources_consulted += 1;
        self.returned += added;
        if added > 0 {
            *self.by_source.entry(source).or_insert(0) += added;
        }
    }

    pub fn log(&self) {
        let breakdown = SuggestionSource::ALL
            .iter()
            .filter_map(|s| self.by_source.get(s).map(|n| format!("{}={}", s, n)))
            .collect::<Vec<_>>()
            .join(",");

        tracing::info!(
            user_id = self.user_id,
            run_id = %self.run_id,
            returned = self.returned,
            limit = self.limit,
            sources_consulted = self.sources_consulted,
            duration_ms = self.total_duration_ms,
            "Suggestions computed [{}]",
            breakdown
        );

        if self.returned < self.limit {
            tracing::warn!(
                user_id = self.user_id,
                "Only {} of {} suggestions available",
                self.returned,
                self.limit
            );
        }
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: String,
}

impl PerformanceTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn log_if_slow(&self, threshold_ms: u64) {
        let elapsed = self.elapsed_ms();
        if elapsed > threshold_ms {
            tracing::warn!(
                "Slow operation: {} took {}ms (threshold: {}ms)",
                self.label,
                elapsed,
                threshold_ms
            );
        }
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        tracing::debug!("{} completed in {}ms", self.label, self.elapsed_ms());
    }
}
