//! Single-gene analysis

use par_ar::{fit_ar2, ArFit, ArOrder};
use par_core::{EngineConfig, Error, GeneCategory, GeneSeries, Mulberry32, Result};
use par_diagnostics::{Diagnostics, DiagnosticsReport};
use par_resample::{BlockBootstrap, EigenvalueBootstrap};
use par_stability::{StabilityAssessment, StabilityClassifier};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything the engine reports about one gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneAnalysis {
    /// Position of the gene in the scanned batch
    pub index: usize,
    pub gene_id: String,
    pub category: GeneCategory,
    pub length: usize,
    pub fit: ArFit,
    pub assessment: StabilityAssessment,
    pub diagnostics: DiagnosticsReport,
    pub bootstrap: Option<EigenvalueBootstrap>,
    /// Oscillation period in hours, for complex dominant roots
    pub period_hours: Option<f64>,
    pub half_life_samples: Option<f64>,
}

impl GeneAnalysis {
    pub fn raw_modulus(&self) -> f64 {
        self.assessment.raw_modulus
    }
}

#[derive(Debug, Clone)]
pub struct GeneAnalyzer {
    seed: u32,
    classifier: StabilityClassifier,
    diagnostics: Diagnostics,
    bootstrap: Option<BlockBootstrap>,
}

impl GeneAnalyzer {
    /// Analyzer without bootstrap intervals
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            seed: config.seed,
            classifier: StabilityClassifier::from_config(config)?,
            diagnostics: Diagnostics::from_config(config)?,
            bootstrap: None,
        })
    }

    /// Also compute a block-bootstrap interval for every gene
    pub fn with_bootstrap(mut self, config: &EngineConfig) -> Result<Self> {
        self.bootstrap = Some(BlockBootstrap::from_config(config)?);
        Ok(self)
    }

    pub fn classifier(&self) -> &StabilityClassifier {
        &self.classifier
    }

    /// Analyze the `index`-th gene of a batch
    ///
    /// Invalid or too-short input is an error. A degenerate fit is not: it
    /// is reported through its status, grade and diagnostic flags. The
    /// bootstrap stream depends only on the engine seed and `index`.
    pub fn analyze(&self, series: &GeneSeries, index: usize) -> Result<GeneAnalysis> {
        series.validate()?;
        Error::check_length(series.len(), ArOrder::Two.min_length())?;

        let fit = fit_ar2(&series.values);
        let assessment = self.classifier.assess(&fit);
        let diagnostics = self.diagnostics.run_with_fit(&series.values, &fit);

        let bootstrap = match &self.bootstrap {
            Some(bootstrap) if fit.is_ok() => {
                let seed = Mulberry32::for_stream(self.seed, index).next_u32();
                match bootstrap.clone().with_seed(seed).eigenvalue_interval(&series.values) {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warn!(gene = %series.gene_id, error = %e, "bootstrap interval unavailable");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(GeneAnalysis {
            index,
            gene_id: series.gene_id.clone(),
            category: series.category,
            length: series.len(),
            period_hours: fit.period(series.sampling_interval_hours),
            half_life_samples: fit.half_life(),
            fit,
            assessment,
            diagnostics,
            bootstrap,
        })
    }
}
