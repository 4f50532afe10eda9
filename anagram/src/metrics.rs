use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks how many lines and candidates flow through the pipeline.
///
/// Cloning shares the counters, so producers and workers can each hold a copy.
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    // Producer stage
    chunks: Arc<AtomicU64>,
    lines_scanned: Arc<AtomicU64>,
    candidates_queued: Arc<AtomicU64>,

    // Verification stage
    candidates_decoded: Arc<AtomicU64>,
    decode_failures: Arc<AtomicU64>,
    matches: Arc<AtomicU64>,
}

impl PipelineMetrics {
    /// Creates a new PipelineMetrics instance
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            candidates_queued: Arc::new(AtomicU64::new(0)),
            candidates_decoded: Arc::new(AtomicU64::new(0)),
            decode_failures: Arc::new(AtomicU64::new(0)),
            matches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one chunk handed to a producer
    pub fn record_chunk(&self, bytes: usize) {
        let total = self.chunks.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Chunk #{} dispatched: {} bytes", total, bytes);
    }

    /// Records the outcome of scanning one chunk
    pub fn record_scan(&self, lines: u64, queued: u64) {
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.candidates_queued.fetch_add(queued, Ordering::Relaxed);
    }

    pub fn record_decoded(&self) {
        self.candidates_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            chunks: self.chunks.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            candidates_queued: self.candidates_queued.load(Ordering::Relaxed),
            candidates_decoded: self.candidates_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Pipeline stats:\n\
             Chunks: {}\n\
             Lines scanned: {}\n\
             Candidates queued/decoded: {}/{}\n\
             Decode failures: {}\n\
             Matches: {}",
            stats.chunks,
            stats.lines_scanned,
            stats.candidates_queued,
            stats.candidates_decoded,
            stats.decode_failures,
            stats.matches
        );
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`PipelineMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub chunks: u64,
    pub lines_scanned: u64,
    pub candidates_queued: u64,
    pub candidates_decoded: u64,
    pub decode_failures: u64,
    pub matches: u64,
}
