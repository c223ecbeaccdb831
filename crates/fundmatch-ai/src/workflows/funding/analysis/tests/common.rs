use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::workflows::funding::analysis::compliance::{ComplianceChecker, CANONICAL_DOCUMENTS};
use crate::workflows::funding::analysis::domain::{
    AnalysisMode, AnalysisRequest, ApplicationContext, ApplicationId, BusinessAssessment,
    BusinessProfile, DocumentSections, FinancialPeriod, FinancialProfile, ManagementStructure,
    TeamMember,
};
use crate::workflows::funding::analysis::invoker::{InvokeError, ModuleInvoker, RemoteCapability};
use crate::workflows::funding::analysis::results::{
    ComplianceAnalysis, DocumentQuality, FinancialHealthAnalysis, FinancialInvestorView,
    FinancialSmeView, FinancialView, ManagementAnalysis, ManagementInvestorView,
    ManagementSmeView, ManagementView, MarketInvestorView, MarketPositionAnalysis, MarketSmeView,
    MarketView, ModuleResults, RiskAnalysis, RiskInvestorView, RiskLevel, RiskSmeView, RiskView,
};
use crate::workflows::funding::analysis::service::{AnalysisSettings, ModularAnalysisService};

pub(super) fn member(name: &str, role: &str) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        role: role.to_string(),
        years_experience: Some(12),
    }
}

pub(super) fn financial_profile() -> FinancialProfile {
    FinancialProfile {
        monthly_revenue: Some(150_000.0),
        annual_revenue: Some(1_800_000.0),
        gross_margin: Some(0.42),
        net_margin: Some(0.11),
        debt_to_equity: Some(0.6),
        current_ratio: Some(1.4),
        historical_financials: vec![FinancialPeriod {
            period: "FY2024".to_string(),
            revenue: 1_650_000.0,
            expenses: Some(1_480_000.0),
            net_income: Some(170_000.0),
        }],
        projected_financials: vec![FinancialPeriod {
            period: "FY2026".to_string(),
            revenue: 2_400_000.0,
            expenses: None,
            net_income: None,
        }],
    }
}

pub(super) fn assessment() -> BusinessAssessment {
    BusinessAssessment {
        business_model: Some("B2B subscription".to_string()),
        value_proposition: Some("Solar monitoring for commercial rooftops".to_string()),
        target_markets: vec!["Gauteng".to_string(), "Western Cape".to_string()],
        competitive_advantages: vec![
            "Proprietary monitoring hardware".to_string(),
            "Three year maintenance contracts".to_string(),
        ],
        key_performance_indicators: BTreeMap::from([("churn".to_string(), 0.04)]),
    }
}

pub(super) fn management_structure() -> ManagementStructure {
    ManagementStructure {
        executive_team: vec![member("Thandi", "CEO"), member("Pieter", "CFO")],
        management_team: vec![member("Lerato", "Operations")],
        board_of_directors: vec![member("Sipho", "Chair")],
        advisors: vec![member("Anika", "Legal")],
    }
}

pub(super) fn all_documents() -> DocumentSections {
    CANONICAL_DOCUMENTS
        .iter()
        .fold(DocumentSections::default(), |sections, key| {
            sections.with(key, true)
        })
}

pub(super) fn business_profile() -> BusinessProfile {
    BusinessProfile {
        financial_profile: Some(financial_profile()),
        business_assessment: Some(assessment()),
        management_structure: Some(management_structure()),
        document_sections: all_documents(),
        industry: Some("Renewable energy".to_string()),
    }
}

pub(super) fn request(mode: AnalysisMode) -> AnalysisRequest {
    AnalysisRequest {
        application: ApplicationContext {
            id: ApplicationId("app-001".to_string()),
            requested_amount: Some(2_500_000.0),
            funding_type: Some("growth".to_string()),
            documents: Vec::new(),
            extra: BTreeMap::new(),
        },
        profile: business_profile(),
        mode,
        market_intelligence: None,
    }
}

fn merge(base: &mut Value, extra: Value) {
    if let (Value::Object(base), Value::Object(extra)) = (base, extra) {
        base.extend(extra);
    }
}

pub(super) fn financial_response(mode: AnalysisMode, score: f64) -> Value {
    let mut analysis = json!({
        "analysisMode": mode,
        "overallScore": score,
        "confidence": 88,
        "strengths": ["Consistent revenue growth", "Healthy gross margin", "Low leverage"],
        "concerns": ["Thin cash buffer", "Customer concentration"],
        "recommendations": ["Build a three month cash reserve"],
    });
    match mode {
        AnalysisMode::Investor => merge(
            &mut analysis,
            json!({
                "investmentGrade": "B+",
                "returnPotential": "high",
                "financialRisks": ["Working capital pressure"],
            }),
        ),
        AnalysisMode::Sme => merge(
            &mut analysis,
            json!({
                "fundingReadinessScore": score,
                "improvementAreas": ["Debtor days"],
                "actionItems": ["Tighten debtor collection", "Prepare audited statements"],
            }),
        ),
    }
    json!({ "analysis": analysis })
}

pub(super) fn market_response(mode: AnalysisMode, score: f64) -> Value {
    let mut analysis = json!({
        "analysisMode": mode,
        "confidence": 80,
        "strengths": ["Growing addressable market", "Recurring contracts"],
        "opportunities": ["Municipal tenders"],
        "threats": ["Low-cost imports"],
    });
    match mode {
        AnalysisMode::Investor => merge(
            &mut analysis,
            json!({
                "competitiveStrength": "moderate",
                "differentiationScore": score,
                "marketRisks": ["Price competition"],
            }),
        ),
        AnalysisMode::Sme => merge(
            &mut analysis,
            json!({
                "marketAppealScore": score,
                "positioningAdvice": ["Lead with uptime guarantees"],
                "actionItems": ["Quantify market size", "Collect customer references"],
            }),
        ),
    }
    json!({ "analysis": analysis })
}

pub(super) fn management_response(mode: AnalysisMode, score: f64) -> Value {
    let mut analysis = json!({
        "analysisMode": mode,
        "teamScore": score,
        "confidence": 82,
        "strengths": ["Experienced finance lead"],
        "gaps": ["No dedicated sales executive"],
        "recommendations": ["Hire a sales lead"],
    });
    match mode {
        AnalysisMode::Investor => merge(
            &mut analysis,
            json!({ "leadershipRisk": "low", "executionCapability": "proven" }),
        ),
        AnalysisMode::Sme => merge(
            &mut analysis,
            json!({
                "developmentPriorities": ["Sales leadership"],
                "actionItems": ["Recruit a head of sales"],
            }),
        ),
    }
    json!({ "analysis": analysis })
}

/// `score` is the raw risk score for investors and the readiness score for SMEs.
pub(super) fn risk_response(mode: AnalysisMode, score: f64) -> Value {
    let mut analysis = json!({
        "analysisMode": mode,
        "confidence": 78,
        "keyRisks": ["Single supplier dependency", "FX exposure"],
        "mitigations": ["Qualify a second supplier", "Hedge hardware imports"],
    });
    match mode {
        AnalysisMode::Investor => merge(
            &mut analysis,
            json!({
                "overallRiskScore": score,
                "riskLevel": "medium",
                "dealBreakers": [],
            }),
        ),
        AnalysisMode::Sme => merge(
            &mut analysis,
            json!({
                "applicationReadinessScore": score,
                "riskReductionSteps": ["Document supplier contingency"],
            }),
        ),
    }
    json!({ "analysis": analysis })
}

/// Invoker replaying canned responses per capability and recording every call.
#[derive(Default)]
pub(super) struct ScriptedInvoker {
    responses: HashMap<RemoteCapability, Result<Value, InvokeError>>,
    delays: HashMap<RemoteCapability, Duration>,
    calls: Mutex<Vec<(RemoteCapability, Value)>>,
}

impl ScriptedInvoker {
    pub(super) fn respond(mut self, capability: RemoteCapability, response: Value) -> Self {
        self.responses.insert(capability, Ok(response));
        self
    }

    pub(super) fn fail(mut self, capability: RemoteCapability, error: InvokeError) -> Self {
        self.responses.insert(capability, Err(error));
        self
    }

    pub(super) fn delay(mut self, capability: RemoteCapability, delay: Duration) -> Self {
        self.delays.insert(capability, delay);
        self
    }

    pub(super) fn calls(&self) -> Vec<(RemoteCapability, Value)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl ModuleInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        payload: Value,
    ) -> Result<Value, InvokeError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((capability, payload));

        if let Some(delay) = self.delays.get(&capability) {
            tokio::time::sleep(*delay).await;
        }

        self.responses.get(&capability).cloned().unwrap_or_else(|| {
            Err(InvokeError::Transport(format!(
                "no scripted response for {}",
                capability.function_name()
            )))
        })
    }
}

/// Scripted invoker where all four remote modules succeed with the given scores.
pub(super) fn successful_invoker(
    mode: AnalysisMode,
    financial: f64,
    market: f64,
    management: f64,
    risk: f64,
) -> ScriptedInvoker {
    ScriptedInvoker::default()
        .respond(
            RemoteCapability::AnalyzeFinancials,
            financial_response(mode, financial),
        )
        .respond(
            RemoteCapability::AnalyzeMarketPosition,
            market_response(mode, market),
        )
        .respond(
            RemoteCapability::AnalyzeManagement,
            management_response(mode, management),
        )
        .respond(RemoteCapability::AnalyzeRiskProfile, risk_response(mode, risk))
}

pub(super) fn build_service(
    invoker: ScriptedInvoker,
) -> (ModularAnalysisService<ScriptedInvoker>, Arc<ScriptedInvoker>) {
    let invoker = Arc::new(invoker);
    let service = ModularAnalysisService::new(invoker.clone(), AnalysisSettings::default());
    (service, invoker)
}

pub(super) fn compliance_with_score(completeness: f64) -> ComplianceAnalysis {
    let mut analysis = ComplianceChecker::default().check(&all_documents());
    analysis.completeness_score = completeness;
    if completeness < 100.0 {
        analysis.document_quality = DocumentQuality::Medium;
        analysis.compliance_risk = RiskLevel::Medium;
        analysis.missing_documents = vec!["taxCompliance".to_string()];
        analysis.recommendations =
            vec!["Provide a valid SARS tax clearance certificate".to_string()];
    }
    analysis
}

fn narrative(prefix: &str) -> Vec<String> {
    (1..=3).map(|index| format!("{prefix} {index}")).collect()
}

/// Directly constructed module results for synthesis tests. `risk` is the raw risk score in
/// investor mode and the readiness score in sme mode; `market` feeds the differentiation or
/// market appeal score.
pub(super) fn module_results(
    mode: AnalysisMode,
    financial: f64,
    market: f64,
    management: f64,
    compliance: f64,
    risk: f64,
) -> ModuleResults {
    let financial_view = match mode {
        AnalysisMode::Investor => FinancialView::Investor(FinancialInvestorView::default()),
        AnalysisMode::Sme => FinancialView::Sme(FinancialSmeView {
            funding_readiness_score: Some(financial),
            improvement_areas: Vec::new(),
            action_items: narrative("financial action"),
        }),
    };
    let market_view = match mode {
        AnalysisMode::Investor => MarketView::Investor(MarketInvestorView {
            competitive_strength: None,
            differentiation_score: Some(market),
            market_risks: narrative("market risk"),
        }),
        AnalysisMode::Sme => MarketView::Sme(MarketSmeView {
            market_appeal_score: Some(market),
            positioning_advice: Vec::new(),
            action_items: narrative("market action"),
        }),
    };
    let management_view = match mode {
        AnalysisMode::Investor => ManagementView::Investor(ManagementInvestorView::default()),
        AnalysisMode::Sme => ManagementView::Sme(ManagementSmeView {
            development_priorities: Vec::new(),
            action_items: narrative("management action"),
        }),
    };
    let risk_view = match mode {
        AnalysisMode::Investor => RiskView::Investor(RiskInvestorView {
            overall_risk_score: Some(risk),
            risk_level: None,
            deal_breakers: Vec::new(),
        }),
        AnalysisMode::Sme => RiskView::Sme(RiskSmeView {
            application_readiness_score: Some(risk),
            risk_reduction_steps: narrative("risk step"),
        }),
    };

    ModuleResults {
        financial_health: FinancialHealthAnalysis {
            overall_score: Some(financial),
            confidence: 80.0,
            strengths: narrative("financial strength"),
            concerns: narrative("financial concern"),
            recommendations: narrative("financial recommendation"),
            view: financial_view,
        },
        compliance: compliance_with_score(compliance),
        management: ManagementAnalysis {
            team_score: Some(management),
            confidence: 80.0,
            strengths: narrative("management strength"),
            gaps: narrative("management gap"),
            recommendations: narrative("management recommendation"),
            view: management_view,
        },
        market_position: MarketPositionAnalysis {
            confidence: 80.0,
            strengths: narrative("market strength"),
            opportunities: narrative("market opportunity"),
            threats: narrative("market threat"),
            view: market_view,
        },
        risk: RiskAnalysis {
            confidence: 80.0,
            key_risks: narrative("key risk"),
            mitigations: narrative("mitigation"),
            view: risk_view,
        },
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}
