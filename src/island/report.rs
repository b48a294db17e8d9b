//! Per-generation reporting.
//!
//! After every generation each island hands a [`GenerationReport`] for its
//! current best individual to a [`Reporter`]. Reporters are shared by all
//! island threads, hence the `Sync` bound.

use std::sync::Mutex;

use crate::error::IslandId;

/// Snapshot of one island's best individual after one generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    /// Run index, `0..runs`.
    pub run: usize,
    /// Reporting island.
    pub island: IslandId,
    /// Generation just completed, 1-based.
    pub generation: usize,
    /// Genes of the island's best individual.
    pub genes: Vec<f64>,
    /// Its objective value.
    pub result: f64,
    /// Its fitness.
    pub fitness: f64,
}

/// Sink for generation reports.
pub trait Reporter: Sync {
    /// Called once per island per generation.
    fn on_generation(&self, report: &GenerationReport);
}

/// Emits every report as a `tracing` event at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn on_generation(&self, report: &GenerationReport) {
        tracing::info!(
            run = report.run,
            island = report.island,
            generation = report.generation,
            genes = ?report.genes,
            result = report.result,
            fitness = report.fitness,
            "generation complete"
        );
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_generation(&self, _report: &GenerationReport) {}
}

/// Keeps every report in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<GenerationReport>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all reports received so far.
    pub fn take(&self) -> Vec<GenerationReport> {
        let mut reports = self.reports.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *reports)
    }

    /// Number of reports held.
    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no reports are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reporter for MemoryReporter {
    fn on_generation(&self, report: &GenerationReport) {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(island: IslandId, generation: usize) -> GenerationReport {
        GenerationReport {
            run: 0,
            island,
            generation,
            genes: vec![0.0, 1.0],
            result: 1.0,
            fitness: -1.0,
        }
    }

    #[test]
    fn test_memory_reporter_collects_and_drains() {
        let reporter = MemoryReporter::new();
        reporter.on_generation(&report(0, 1));
        reporter.on_generation(&report(1, 1));
        assert_eq!(reporter.len(), 2);

        let taken = reporter.take();
        assert_eq!(taken[1].island, 1);
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_memory_reporter_across_threads() {
        let reporter = MemoryReporter::new();
        std::thread::scope(|s| {
            for island in 0..4 {
                let reporter = &reporter;
                s.spawn(move || {
                    for g in 1..=10 {
                        reporter.on_generation(&report(island, g));
                    }
                });
            }
        });
        assert_eq!(reporter.len(), 40);
    }

    #[test]
    fn test_tracing_reporter_does_not_panic_without_subscriber() {
        TracingReporter.on_generation(&report(0, 1));
        NullReporter.on_generation(&report(0, 1));
    }
}
