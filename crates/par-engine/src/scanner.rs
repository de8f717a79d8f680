//! Batch scanning with per-gene failure isolation and cancellation

use crate::analyzer::{GeneAnalysis, GeneAnalyzer};
use par_core::{ErrorKind, GeneSeries, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Shared flag a caller sets to stop a running scan
///
/// Checked before each gene starts; genes already in progress finish.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result for one gene of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeneOutcome {
    Analyzed(Box<GeneAnalysis>),
    #[serde(rename_all = "camelCase")]
    Failed {
        index: usize,
        gene_id: String,
        kind: ErrorKind,
        message: String,
    },
}

impl GeneOutcome {
    /// Position of the gene in the scanned batch
    pub fn index(&self) -> usize {
        match self {
            Self::Analyzed(analysis) => analysis.index,
            Self::Failed { index, .. } => *index,
        }
    }

    pub fn gene_id(&self) -> &str {
        match self {
            Self::Analyzed(analysis) => &analysis.gene_id,
            Self::Failed { gene_id, .. } => gene_id,
        }
    }

    pub fn analysis(&self) -> Option<&GeneAnalysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis),
            Self::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Outcomes in ascending gene index, one per gene that was started
    pub outcomes: Vec<GeneOutcome>,
    pub requested: usize,
    pub cancelled: bool,
}

impl ScanReport {
    pub fn analyses(&self) -> impl Iterator<Item = &GeneAnalysis> {
        self.outcomes.iter().filter_map(GeneOutcome::analysis)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GeneOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, GeneOutcome::Failed { .. }))
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.outcomes.len() == self.requested
    }

    /// Number of leading genes that finished
    ///
    /// A cancelled scan can be resumed from this index. Parallel scans may
    /// also hold outcomes past it.
    pub fn resume_from(&self) -> usize {
        self.outcomes
            .iter()
            .enumerate()
            .take_while(|(position, outcome)| outcome.index() == *position)
            .count()
    }

    /// Indices of genes that were never started
    pub fn skipped(&self) -> Vec<usize> {
        let mut done = self.outcomes.iter().map(GeneOutcome::index).peekable();
        (0..self.requested)
            .filter(|&index| {
                if done.peek() == Some(&index) {
                    done.next();
                    false
                } else {
                    true
                }
            })
            .collect()
    }
}

/// How a scan distributes genes over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    #[default]
    Sequential,
    /// Rayon fan-out; sequential when the `parallel` feature is off
    Parallel,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Run one gene's analysis, turning errors and panics into `Failed`
fn isolate<F>(index: usize, gene_id: &str, analysis: F) -> GeneOutcome
where
    F: FnOnce() -> Result<GeneAnalysis>,
{
    let failed = |kind: ErrorKind, message: String| {
        warn!(gene = %gene_id, index, %kind, "gene failed: {message}");
        GeneOutcome::Failed {
            index,
            gene_id: gene_id.to_string(),
            kind,
            message,
        }
    };
    match panic::catch_unwind(AssertUnwindSafe(analysis)) {
        Ok(Ok(analysis)) => GeneOutcome::Analyzed(Box::new(analysis)),
        Ok(Err(e)) => failed(e.kind(), e.to_string()),
        Err(payload) => failed(
            ErrorKind::Other,
            format!("analysis panicked: {}", panic_message(&*payload)),
        ),
    }
}

#[derive(Debug, Clone)]
pub struct BatchScanner {
    analyzer: GeneAnalyzer,
    strategy: ExecutionStrategy,
}

impl BatchScanner {
    pub fn new(analyzer: GeneAnalyzer) -> Self {
        Self {
            analyzer,
            strategy: ExecutionStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn analyzer(&self) -> &GeneAnalyzer {
        &self.analyzer
    }

    fn analyze_one<P>(&self, index: usize, gene: &GeneSeries, token: &CancellationToken, progress: &P) -> Option<GeneOutcome>
    where
        P: Fn(&GeneOutcome) + Sync,
    {
        if token.is_cancelled() {
            return None;
        }
        let outcome = isolate(index, &gene.gene_id, || self.analyzer.analyze(gene, index));
        progress(&outcome);
        Some(outcome)
    }

    /// Analyze every gene, isolating failures
    ///
    /// Each gene's random stream depends only on the engine seed and its
    /// position, so both strategies produce identical outcomes.
    pub fn scan(&self, genes: &[GeneSeries], token: &CancellationToken) -> ScanReport {
        self.scan_with_progress(genes, token, |_| {})
    }

    /// [`scan`](Self::scan), calling `progress` as each gene finishes
    ///
    /// Under [`ExecutionStrategy::Parallel`] the callback runs on worker
    /// threads in completion order.
    #[instrument(skip_all, fields(genes = genes.len(), strategy = ?self.strategy))]
    pub fn scan_with_progress<P>(&self, genes: &[GeneSeries], token: &CancellationToken, progress: P) -> ScanReport
    where
        P: Fn(&GeneOutcome) + Sync,
    {
        let outcomes = match self.strategy {
            ExecutionStrategy::Parallel => self.scan_parallel(genes, token, &progress),
            ExecutionStrategy::Sequential => {
                let mut outcomes = Vec::with_capacity(genes.len());
                for (index, gene) in genes.iter().enumerate() {
                    let Some(outcome) = self.analyze_one(index, gene, token, &progress) else {
                        debug!(completed = index, "scan cancelled");
                        break;
                    };
                    outcomes.push(outcome);
                }
                outcomes
            }
        };

        let report = ScanReport {
            cancelled: outcomes.len() < genes.len() && token.is_cancelled(),
            requested: genes.len(),
            outcomes,
        };
        info!(
            analyzed = report.analyses().count(),
            failed = report.failures().count(),
            cancelled = report.cancelled,
            resume_from = report.resume_from(),
            "scan finished"
        );
        report
    }

    #[cfg(feature = "parallel")]
    fn scan_parallel<P>(&self, genes: &[GeneSeries], token: &CancellationToken, progress: &P) -> Vec<GeneOutcome>
    where
        P: Fn(&GeneOutcome) + Sync,
    {
        use rayon::prelude::*;
        let started: Vec<Option<GeneOutcome>> = genes
            .par_iter()
            .enumerate()
            .map(|(index, gene)| self.analyze_one(index, gene, token, progress))
            .collect();
        started.into_iter().flatten().collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_parallel<P>(&self, genes: &[GeneSeries], token: &CancellationToken, progress: &P) -> Vec<GeneOutcome>
    where
        P: Fn(&GeneOutcome) + Sync,
    {
        genes
            .iter()
            .enumerate()
            .map_while(|(index, gene)| self.analyze_one(index, gene, token, progress))
            .collect()
    }
}
