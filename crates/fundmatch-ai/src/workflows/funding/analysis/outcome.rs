use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisMode, ApplicationId};
use super::results::{
    AnalysisModule, ComplianceAnalysis, FinancialHealthAnalysis, ManagementAnalysis,
    MarketPositionAnalysis, ModuleSource, RiskAnalysis,
};
use super::synthesis::{ScoreComponent, Verdict};

/// Final output of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveAnalysis {
    pub application_id: ApplicationId,
    pub mode: AnalysisMode,
    pub financial_health: FinancialHealthAnalysis,
    pub market_position: MarketPositionAnalysis,
    pub management: ManagementAnalysis,
    pub compliance: ComplianceAnalysis,
    pub risk: RiskAnalysis,
    pub overall_score: u8,
    pub score_components: Vec<ScoreComponent>,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub rationale: String,
    pub confidence_score: u8,
    pub module_sources: BTreeMap<AnalysisModule, ModuleSource>,
    /// One line per module that fell back, with the underlying failure.
    pub diagnostics: Vec<String>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
    pub analyzed_at: DateTime<Utc>,
}

impl ComprehensiveAnalysis {
    pub fn fallback_modules(&self) -> Vec<AnalysisModule> {
        self.module_sources
            .iter()
            .filter(|(_, source)| **source == ModuleSource::Fallback)
            .map(|(module, _)| *module)
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
