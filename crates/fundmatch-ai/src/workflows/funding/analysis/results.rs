//! Per-module analysis results.
//!
//! Every remote-backed module carries a `view` tagged by `analysisMode`, so a result produced
//! for one perspective cannot expose the other perspective's fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::AnalysisMode;

/// The five analysis facets, in orchestration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisModule {
    Financial,
    Compliance,
    Management,
    Market,
    Risk,
}

impl AnalysisModule {
    pub const ORDER: [AnalysisModule; 5] = [
        AnalysisModule::Financial,
        AnalysisModule::Compliance,
        AnalysisModule::Management,
        AnalysisModule::Market,
        AnalysisModule::Risk,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AnalysisModule::Financial => "financial",
            AnalysisModule::Compliance => "compliance",
            AnalysisModule::Management => "management",
            AnalysisModule::Market => "market",
            AnalysisModule::Risk => "risk",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            AnalysisModule::Financial => "Financial health",
            AnalysisModule::Compliance => "Document compliance",
            AnalysisModule::Management => "Management capability",
            AnalysisModule::Market => "Market position",
            AnalysisModule::Risk => "Risk profile",
        }
    }
}

/// Where a module's result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleSource {
    Remote,
    Fallback,
    Local,
}

/// Results that know which perspective they were produced for.
pub trait ModeTagged {
    fn mode(&self) -> AnalysisMode;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealthAnalysis {
    #[serde(default)]
    pub overall_score: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub view: FinancialView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysisMode", rename_all = "snake_case")]
pub enum FinancialView {
    Investor(FinancialInvestorView),
    Sme(FinancialSmeView),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialInvestorView {
    pub investment_grade: Option<String>,
    pub return_potential: Option<String>,
    pub financial_risks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialSmeView {
    pub funding_readiness_score: Option<f64>,
    pub improvement_areas: Vec<String>,
    pub action_items: Vec<String>,
}

impl ModeTagged for FinancialHealthAnalysis {
    fn mode(&self) -> AnalysisMode {
        match self.view {
            FinancialView::Investor(_) => AnalysisMode::Investor,
            FinancialView::Sme(_) => AnalysisMode::Sme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPositionAnalysis {
    pub confidence: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
    #[serde(flatten)]
    pub view: MarketView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysisMode", rename_all = "snake_case")]
pub enum MarketView {
    Investor(MarketInvestorView),
    Sme(MarketSmeView),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketInvestorView {
    /// Free-form grade, normally `strong`, `moderate`, or `weak`.
    pub competitive_strength: Option<String>,
    pub differentiation_score: Option<f64>,
    pub market_risks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketSmeView {
    pub market_appeal_score: Option<f64>,
    pub positioning_advice: Vec<String>,
    pub action_items: Vec<String>,
}

impl ModeTagged for MarketPositionAnalysis {
    fn mode(&self) -> AnalysisMode {
        match self.view {
            MarketView::Investor(_) => AnalysisMode::Investor,
            MarketView::Sme(_) => AnalysisMode::Sme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementAnalysis {
    #[serde(default)]
    pub team_score: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub view: ManagementView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysisMode", rename_all = "snake_case")]
pub enum ManagementView {
    Investor(ManagementInvestorView),
    Sme(ManagementSmeView),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagementInvestorView {
    pub leadership_risk: Option<String>,
    pub execution_capability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagementSmeView {
    pub development_priorities: Vec<String>,
    pub action_items: Vec<String>,
}

impl ModeTagged for ManagementAnalysis {
    fn mode(&self) -> AnalysisMode {
        match self.view {
            ManagementView::Investor(_) => AnalysisMode::Investor,
            ManagementView::Sme(_) => AnalysisMode::Sme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub confidence: f64,
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub mitigations: Vec<String>,
    #[serde(flatten)]
    pub view: RiskView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysisMode", rename_all = "snake_case")]
pub enum RiskView {
    Investor(RiskInvestorView),
    Sme(RiskSmeView),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskInvestorView {
    /// Higher is riskier.
    pub overall_risk_score: Option<f64>,
    pub risk_level: Option<String>,
    pub deal_breakers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskSmeView {
    /// Higher is better.
    pub application_readiness_score: Option<f64>,
    pub risk_reduction_steps: Vec<String>,
}

impl ModeTagged for RiskAnalysis {
    fn mode(&self) -> AnalysisMode {
        match self.view {
            RiskView::Investor(_) => AnalysisMode::Investor,
            RiskView::Sme(_) => AnalysisMode::Sme,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentQuality {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Missing,
}

/// Locally computed document checklist result; identical for both modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAnalysis {
    pub completeness_score: f64,
    pub document_quality: DocumentQuality,
    pub compliance_risk: RiskLevel,
    pub verification_status: BTreeMap<String, VerificationStatus>,
    pub missing_documents: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
}

/// The five module results collected by one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResults {
    pub financial_health: FinancialHealthAnalysis,
    pub compliance: ComplianceAnalysis,
    pub management: ManagementAnalysis,
    pub market_position: MarketPositionAnalysis,
    pub risk: RiskAnalysis,
}

impl ModuleResults {
    /// Confidence values in orchestration order.
    pub fn confidences(&self) -> [f64; 5] {
        [
            self.financial_health.confidence,
            self.compliance.confidence,
            self.management.confidence,
            self.market_position.confidence,
            self.risk.confidence,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sme_market_payload_parses_into_sme_view() {
        let analysis: MarketPositionAnalysis = serde_json::from_value(json!({
            "analysisMode": "sme",
            "confidence": 82,
            "strengths": ["Loyal customer base"],
            "marketAppealScore": 71.5,
            "actionItems": ["Publish case studies"],
        }))
        .expect("market analysis parses");

        assert_eq!(analysis.mode(), AnalysisMode::Sme);
        match analysis.view {
            MarketView::Sme(view) => {
                assert_eq!(view.market_appeal_score, Some(71.5));
                assert_eq!(view.action_items, vec!["Publish case studies".to_string()]);
            }
            other => panic!("expected sme view, got {other:?}"),
        }
    }

    #[test]
    fn investor_view_serializes_without_sme_fields() {
        let analysis = RiskAnalysis {
            confidence: 75.0,
            key_risks: vec!["Customer concentration".to_string()],
            mitigations: Vec::new(),
            view: RiskView::Investor(RiskInvestorView {
                overall_risk_score: Some(35.0),
                risk_level: Some("low".to_string()),
                deal_breakers: Vec::new(),
            }),
        };

        let value = serde_json::to_value(&analysis).expect("serializes");
        assert_eq!(value["analysisMode"], json!("investor"));
        assert_eq!(value["overallRiskScore"], json!(35.0));
        assert!(value.get("applicationReadinessScore").is_none());
        assert!(value.get("riskReductionSteps").is_none());
    }

    #[test]
    fn missing_mode_tag_is_rejected() {
        let parsed = serde_json::from_value::<FinancialHealthAnalysis>(json!({
            "overallScore": 70,
            "confidence": 80,
        }));
        assert!(parsed.is_err());
    }
}
