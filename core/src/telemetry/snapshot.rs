//! telemetry/snapshot.rs
//! Immutable telemetry snapshot returned by the `*_with_telemetry` pipelines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::DerivationStats;
use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

/// Counters, ratios, stage timings and elapsed time of one pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub records: u64,
    pub bytes_plaintext: u64,
    pub bytes_padding: u64,
    pub bytes_ciphertext: u64,
    pub bytes_overhead: u64,
    /// Envelope bytes per plaintext byte; 0 for empty plaintext.
    pub expansion_ratio: f64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    pub derivations: DerivationStats,
}

impl TelemetrySnapshot {
    pub fn from(
        counters: &TelemetryCounters,
        timer: &TelemetryTimer,
        derivations: DerivationStats,
    ) -> Self {
        let elapsed = timer.elapsed();

        let expansion_ratio = if counters.bytes_plaintext > 0 {
            (counters.bytes_plaintext + counters.bytes_overhead) as f64
                / counters.bytes_plaintext as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            records: counters.records,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_padding: counters.bytes_padding,
            bytes_ciphertext: counters.bytes_ciphertext,
            bytes_overhead: counters.bytes_overhead,
            expansion_ratio,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            derivations,
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Internal consistency: ciphertext covers plaintext, padding and one tag
    /// per record, and stage time never exceeds wall time.
    pub fn sanity_check(&self) -> bool {
        let tags = self.records * crate::constants::TAG_LEN as u64;
        self.bytes_ciphertext == self.bytes_plaintext + self.bytes_padding + tags
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
