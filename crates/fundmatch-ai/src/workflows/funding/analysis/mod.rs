//! Multi-module funding analysis.
//!
//! Four remote-backed modules (financial, market, management, risk) and one local compliance
//! check run per request. Failed remote calls are replaced with deterministic fallbacks, and
//! the collected results are synthesized into a weighted score and a mode-specific verdict.

pub mod compliance;
pub mod confidence;
pub mod domain;
pub mod fallback;
pub mod invoker;
pub mod outcome;
pub(crate) mod payload;
pub mod progress;
pub mod results;
pub mod router;
pub mod service;
pub mod synthesis;

#[cfg(test)]
mod tests;

pub use compliance::{ComplianceChecker, CompliancePolicy, CANONICAL_DOCUMENTS};
pub use confidence::{aggregate_confidence, confidence_warnings, LOW_CONFIDENCE_WARNING};
pub use domain::{
    AnalysisMode, AnalysisRequest, ApplicationContext, ApplicationId, BusinessAssessment,
    BusinessProfile, DocumentDescriptor, DocumentSections, FinancialPeriod, FinancialProfile,
    ManagementStructure, MarketIntelligence, TeamMember,
};
pub use invoker::{
    HttpModuleInvoker, InvokeError, ModuleInvoker, OfflineModuleInvoker, RemoteCapability,
};
pub use outcome::ComprehensiveAnalysis;
pub use progress::{AnalysisStage, ChannelProgress, NoProgress, ProgressReporter, ProgressUpdate};
pub use results::{
    AnalysisModule, ComplianceAnalysis, DocumentQuality, FinancialHealthAnalysis,
    ManagementAnalysis, MarketPositionAnalysis, ModuleResults, ModuleSource, RiskAnalysis,
    RiskLevel, VerificationStatus,
};
pub use router::analysis_router;
pub use service::{AnalysisError, AnalysisSettings, ModularAnalysisService};
pub use synthesis::{
    ApplicationReadiness, InvestmentRecommendation, ScoreComponent, ScoreSynthesizer,
    ScoreWeights, Synthesis, SynthesisConfig, SynthesisConfigError, Verdict,
};
