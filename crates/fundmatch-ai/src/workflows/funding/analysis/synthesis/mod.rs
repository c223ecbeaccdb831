mod config;
mod policy;
mod rules;

pub use config::{ScoreWeights, SynthesisConfig, SynthesisConfigError};
pub use policy::{
    ApplicationReadiness, InvestmentRecommendation, InvestorVerdict, SmeVerdict, Verdict,
};

use serde::{Deserialize, Serialize};

use super::domain::AnalysisMode;
use super::results::{AnalysisModule, ModuleResults};

/// Reduces the five module results into a composite score and verdict.
#[derive(Debug, Clone, Default)]
pub struct ScoreSynthesizer {
    config: SynthesisConfig,
}

impl ScoreSynthesizer {
    pub fn new(config: SynthesisConfig) -> Result<Self, SynthesisConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn synthesize(&self, mode: AnalysisMode, modules: &ModuleResults) -> Synthesis {
        let (components, overall_score, signals) = rules::score_modules(modules, &self.config);
        let verdict = policy::build_verdict(mode, overall_score, modules, &signals, &self.config);
        let rationale = policy::rationale(mode, overall_score, modules, &signals, &self.config);

        Synthesis {
            overall_score,
            components,
            verdict,
            rationale,
        }
    }
}

/// Weighted contribution of one module, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub module: AnalysisModule,
    pub score: f64,
    pub weight: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub overall_score: u8,
    pub components: Vec<ScoreComponent>,
    pub verdict: Verdict,
    pub rationale: String,
}
