use serde::{Deserialize, Serialize};

use super::super::results::AnalysisModule;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Fixed contribution of each module to the composite score. Thresholds in
/// [`SynthesisConfig`] assume these sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub financial: f64,
    pub market: f64,
    pub management: f64,
    pub compliance: f64,
    pub risk: f64,
}

impl ScoreWeights {
    pub fn weight_for(&self, module: AnalysisModule) -> f64 {
        match module {
            AnalysisModule::Financial => self.financial,
            AnalysisModule::Market => self.market,
            AnalysisModule::Management => self.management,
            AnalysisModule::Compliance => self.compliance,
            AnalysisModule::Risk => self.risk,
        }
    }

    pub fn total(&self) -> f64 {
        self.financial + self.market + self.management + self.compliance + self.risk
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            financial: 0.30,
            market: 0.25,
            management: 0.20,
            compliance: 0.10,
            risk: 0.15,
        }
    }
}

/// Rubric for turning module scores into a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub weights: ScoreWeights,
    /// Composite score needed for `approve` / `ready_to_submit`.
    pub approve_threshold: f64,
    /// Composite score needed for `conditional_approve` / `needs_minor_improvements`.
    pub conditional_threshold: f64,
    /// Compliance completeness below this blocks every favorable verdict.
    pub compliance_gate: f64,
    /// Raw investor risk score must stay below this to approve.
    pub approve_risk_ceiling: f64,
    pub conditional_risk_ceiling: f64,
    /// Substituted whenever a module leaves its score field empty.
    pub default_sub_score: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            approve_threshold: 75.0,
            conditional_threshold: 60.0,
            compliance_gate: 70.0,
            approve_risk_ceiling: 40.0,
            conditional_risk_ceiling: 60.0,
            default_sub_score: 50.0,
        }
    }
}

impl SynthesisConfig {
    pub fn validate(&self) -> Result<(), SynthesisConfigError> {
        let weights = [
            self.weights.financial,
            self.weights.market,
            self.weights.management,
            self.weights.compliance,
            self.weights.risk,
        ];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(SynthesisConfigError::NegativeWeight);
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SynthesisConfigError::WeightsDoNotSumToOne { total });
        }

        if self.conditional_threshold > self.approve_threshold {
            return Err(SynthesisConfigError::InvertedThresholds {
                approve: self.approve_threshold,
                conditional: self.conditional_threshold,
            });
        }

        if !(0.0..=100.0).contains(&self.default_sub_score) {
            return Err(SynthesisConfigError::DefaultOutOfRange(self.default_sub_score));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisConfigError {
    #[error("module weights must sum to 1.0 (found {total:.4})")]
    WeightsDoNotSumToOne { total: f64 },
    #[error("module weights must be finite and non-negative")]
    NegativeWeight,
    #[error("approve threshold {approve} is below conditional threshold {conditional}")]
    InvertedThresholds { approve: f64, conditional: f64 },
    #[error("default sub-score {0} is outside 0..=100")]
    DefaultOutOfRange(f64),
}
