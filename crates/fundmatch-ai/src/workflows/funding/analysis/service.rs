use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::compliance::ComplianceChecker;
use super::confidence::{aggregate_confidence, confidence_warnings};
use super::domain::{AnalysisMode, AnalysisRequest, BusinessAssessment, ManagementStructure};
use super::fallback;
use super::invoker::{decode_envelope, InvokeError, ModuleInvoker, RemoteCapability};
use super::outcome::ComprehensiveAnalysis;
use super::payload;
use super::progress::{AnalysisStage, ProgressReporter};
use super::results::{AnalysisModule, ModeTagged, ModuleResults, ModuleSource};
use super::synthesis::ScoreSynthesizer;
use crate::config::AnalysisConfig;

/// Orchestrator tuning shared by every request handled by one service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub module_timeout: Duration,
    pub confidence_threshold: u8,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            module_timeout: config.module_timeout,
            confidence_threshold: config.confidence_threshold,
        }
    }
}

/// Per-run record of where each module result came from.
#[derive(Debug, Default)]
struct ModuleLedger {
    sources: BTreeMap<AnalysisModule, ModuleSource>,
    diagnostics: Vec<String>,
}

impl ModuleLedger {
    fn record(&mut self, module: AnalysisModule, source: ModuleSource) {
        self.sources.insert(module, source);
    }

    fn record_failure(&mut self, module: AnalysisModule, error: &InvokeError) {
        self.sources.insert(module, ModuleSource::Fallback);
        self.diagnostics
            .push(format!("{} analysis failed: {}", module.title(), error));
    }

    fn fallback_modules(&self) -> Vec<AnalysisModule> {
        self.sources
            .iter()
            .filter(|(_, source)| **source == ModuleSource::Fallback)
            .map(|(module, _)| *module)
            .collect()
    }
}

/// Service running the five analysis modules and synthesizing their results.
pub struct ModularAnalysisService<I> {
    invoker: Arc<I>,
    checker: ComplianceChecker,
    synthesizer: ScoreSynthesizer,
    settings: AnalysisSettings,
}

impl<I> ModularAnalysisService<I>
where
    I: ModuleInvoker + 'static,
{
    pub fn new(invoker: Arc<I>, settings: AnalysisSettings) -> Self {
        Self::with_components(
            invoker,
            ComplianceChecker::default(),
            ScoreSynthesizer::default(),
            settings,
        )
    }

    pub fn with_components(
        invoker: Arc<I>,
        checker: ComplianceChecker,
        synthesizer: ScoreSynthesizer,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            invoker,
            checker,
            synthesizer,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Run every module, substituting fallbacks for failed remote calls, and synthesize the
    /// final verdict. Only a request that cannot be analysed at all returns an error.
    pub async fn analyze<P>(
        &self,
        request: &AnalysisRequest,
        progress: &P,
    ) -> Result<ComprehensiveAnalysis, AnalysisError>
    where
        P: ProgressReporter + ?Sized,
    {
        let started = Instant::now();
        let mode = request.mode;
        let profile = &request.profile;

        progress.report(AnalysisStage::Initializing.into());
        info!(
            application_id = %request.application.id.0,
            mode = mode.label(),
            "starting comprehensive analysis"
        );

        let financials = profile
            .financial_profile
            .as_ref()
            .ok_or_else(|| AnalysisError::Failed("financial profile is required".to_string()))?;
        let empty_assessment = BusinessAssessment::default();
        let assessment = profile
            .business_assessment
            .as_ref()
            .unwrap_or(&empty_assessment);
        let empty_structure = ManagementStructure::default();
        let structure = profile
            .management_structure
            .as_ref()
            .unwrap_or(&empty_structure);

        let mut ledger = ModuleLedger::default();

        progress.report(AnalysisStage::Financial.into());
        let financial_health = self
            .attempt_with_fallback(
                AnalysisModule::Financial,
                RemoteCapability::AnalyzeFinancials,
                payload::financial(financials, profile, mode),
                mode,
                &mut ledger,
                || fallback::financial_health(financials, mode),
            )
            .await;

        progress.report(AnalysisStage::Compliance.into());
        let compliance = self.checker.check(&profile.document_sections);
        ledger.record(AnalysisModule::Compliance, ModuleSource::Local);

        progress.report(AnalysisStage::Management.into());
        let management = self
            .attempt_with_fallback(
                AnalysisModule::Management,
                RemoteCapability::AnalyzeManagement,
                payload::management(structure, mode),
                mode,
                &mut ledger,
                || fallback::management(structure, mode),
            )
            .await;

        progress.report(AnalysisStage::Market.into());
        let market_position = self
            .attempt_with_fallback(
                AnalysisModule::Market,
                RemoteCapability::AnalyzeMarketPosition,
                payload::market(
                    assessment,
                    profile,
                    request.market_intelligence.as_ref(),
                    mode,
                ),
                mode,
                &mut ledger,
                || fallback::market_position(assessment, mode),
            )
            .await;

        progress.report(AnalysisStage::Risk.into());
        let risk = self
            .attempt_with_fallback(
                AnalysisModule::Risk,
                RemoteCapability::AnalyzeRiskProfile,
                payload::risk(financials, assessment, structure, &request.application, mode),
                mode,
                &mut ledger,
                || fallback::risk(financials, mode),
            )
            .await;

        progress.report(AnalysisStage::Synthesizing.into());
        let modules = ModuleResults {
            financial_health,
            compliance,
            management,
            market_position,
            risk,
        };

        let synthesis = self.synthesizer.synthesize(mode, &modules);
        let confidence_score = aggregate_confidence(&modules.confidences());
        let warnings = confidence_warnings(
            confidence_score,
            self.settings.confidence_threshold,
            &ledger.fallback_modules(),
        );

        let ModuleResults {
            financial_health,
            compliance,
            management,
            market_position,
            risk,
        } = modules;

        let analysis = ComprehensiveAnalysis {
            application_id: request.application.id.clone(),
            mode,
            financial_health,
            market_position,
            management,
            compliance,
            risk,
            overall_score: synthesis.overall_score,
            score_components: synthesis.components,
            verdict: synthesis.verdict,
            rationale: synthesis.rationale,
            confidence_score,
            module_sources: ledger.sources,
            diagnostics: ledger.diagnostics,
            warnings,
            processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            analyzed_at: Utc::now(),
        };

        progress.report(AnalysisStage::Complete.into());
        info!(
            application_id = %analysis.application_id.0,
            overall_score = analysis.overall_score,
            verdict = analysis.verdict.label(),
            confidence = analysis.confidence_score,
            fallbacks = analysis.diagnostics.len(),
            "comprehensive analysis complete"
        );

        Ok(analysis)
    }

    /// Same as [`analyze`](Self::analyze) but abandons the run once `token` is cancelled.
    /// In-flight module calls are dropped; they have no side effects.
    pub async fn analyze_with_cancellation<P>(
        &self,
        request: &AnalysisRequest,
        progress: &P,
        token: &CancellationToken,
    ) -> Result<ComprehensiveAnalysis, AnalysisError>
    where
        P: ProgressReporter + ?Sized,
    {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(application_id = %request.application.id.0, "analysis cancelled by caller");
                Err(AnalysisError::Cancelled)
            }
            result = self.analyze(request, progress) => result,
        }
    }

    async fn attempt_with_fallback<T, F>(
        &self,
        module: AnalysisModule,
        capability: RemoteCapability,
        payload: Value,
        mode: AnalysisMode,
        ledger: &mut ModuleLedger,
        fallback: F,
    ) -> T
    where
        T: DeserializeOwned + ModeTagged,
        F: FnOnce() -> T,
    {
        let call = async {
            let response = self.invoker.invoke(capability, payload).await?;
            decode_envelope::<T>(response, mode)
        };

        match within(self.settings.module_timeout, call).await {
            Ok(result) => {
                debug!(module = module.label(), "module analysis returned remote result");
                ledger.record(module, ModuleSource::Remote);
                result
            }
            Err(error) => {
                warn!(
                    module = module.label(),
                    function = capability.function_name(),
                    error = %error,
                    "module analysis failed, using fallback"
                );
                ledger.record_failure(module, &error);
                fallback()
            }
        }
    }
}

async fn within<T, F>(limit: Duration, future: F) -> Result<T, InvokeError>
where
    F: Future<Output = Result<T, InvokeError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(InvokeError::Timeout(limit)),
    }
}

/// Error raised when an analysis cannot be produced at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis failed: {0}")]
    Failed(String),
    #[error("Analysis cancelled")]
    Cancelled,
}
