use crate::infra::parse_mode;
use async_trait::async_trait;
use clap::Args;
use fundmatch_ai::error::AppError;
use fundmatch_ai::workflows::funding::analysis::{
    AnalysisMode, AnalysisRequest, AnalysisSettings, ApplicationContext, ApplicationId,
    BusinessAssessment, BusinessProfile, ComprehensiveAnalysis, DocumentSections,
    FinancialPeriod, FinancialProfile, InvokeError, ManagementStructure, ModularAnalysisService,
    ModuleInvoker, ProgressUpdate, RemoteCapability, TeamMember, Verdict, CANONICAL_DOCUMENTS,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Perspective to analyze from (investor|sme)
    #[arg(long, value_parser = parse_mode, default_value = "sme")]
    pub(crate) mode: AnalysisMode,
    /// Print the full JSON payload after the summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { mode, json } = args;

    println!("Funding analysis demo ({} perspective)", mode.label());
    println!("Market position function is simulated as unavailable.\n");

    let service =
        ModularAnalysisService::new(Arc::new(DemoInvoker), AnalysisSettings::default());
    let request = demo_request(mode);

    let progress = |update: ProgressUpdate| {
        println!("  [{:>3}%] {}", update.percent, update.label);
    };
    let analysis = service.analyze(&request, &progress).await?;

    println!();
    render_analysis(&analysis);

    if json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(payload) => println!("\nFull payload:\n{}", payload),
            Err(err) => println!("\nFull payload unavailable: {}", err),
        }
    }

    Ok(())
}

pub(crate) fn render_analysis(analysis: &ComprehensiveAnalysis) {
    println!(
        "Application {} -> {} (overall {}/100, confidence {}%)",
        analysis.application_id.0,
        analysis.verdict.summary(),
        analysis.overall_score,
        analysis.confidence_score
    );
    println!("{}", analysis.rationale);

    println!("\nScore components");
    for component in &analysis.score_components {
        let source = analysis
            .module_sources
            .get(&component.module)
            .map(|source| format!("{source:?}").to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "- {}: {:.0} x {:.2} [{}] {}",
            component.module.title(),
            component.score,
            component.weight,
            source,
            component.notes
        );
    }

    match &analysis.verdict {
        Verdict::Investor(verdict) => {
            print_list("Key strengths", &verdict.key_strengths);
            print_list("Key concerns", &verdict.key_concerns);
            print_list("Conditions", &verdict.conditions);
        }
        Verdict::Sme(verdict) => {
            print_list("Competitive advantages", &verdict.competitive_advantages);
            print_list("Improvement priorities", &verdict.improvement_priorities);
            print_list("Next steps", &verdict.next_steps);
        }
    }

    if !analysis.compliance.missing_documents.is_empty() {
        println!(
            "\nMissing documents: {}",
            analysis.compliance.missing_documents.join(", ")
        );
    }
    print_list("Diagnostics", &analysis.diagnostics);
    print_list("Warnings", &analysis.warnings);
    println!("\nProcessed in {} ms", analysis.processing_time_ms);
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{heading}");
    for item in items {
        println!("- {item}");
    }
}

fn member(name: &str, role: &str, years: u8) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        role: role.to_string(),
        years_experience: Some(years),
    }
}

pub(crate) fn demo_request(mode: AnalysisMode) -> AnalysisRequest {
    let document_sections = CANONICAL_DOCUMENTS
        .iter()
        .fold(DocumentSections::default(), |sections, key| {
            sections.with(key, true)
        });

    AnalysisRequest {
        application: ApplicationContext {
            id: ApplicationId("demo-app-0042".to_string()),
            requested_amount: Some(3_000_000.0),
            funding_type: Some("expansion".to_string()),
            documents: Vec::new(),
            extra: BTreeMap::new(),
        },
        profile: BusinessProfile {
            financial_profile: Some(FinancialProfile {
                monthly_revenue: Some(185_000.0),
                annual_revenue: Some(2_220_000.0),
                gross_margin: Some(0.38),
                net_margin: Some(0.09),
                debt_to_equity: Some(0.8),
                current_ratio: Some(1.3),
                historical_financials: vec![FinancialPeriod {
                    period: "FY2024".to_string(),
                    revenue: 1_960_000.0,
                    expenses: Some(1_790_000.0),
                    net_income: Some(170_000.0),
                }],
                projected_financials: Vec::new(),
            }),
            business_assessment: Some(BusinessAssessment {
                business_model: Some("Cold-chain logistics for fresh produce".to_string()),
                value_proposition: Some("Same-day delivery from farm to retailer".to_string()),
                target_markets: vec!["Western Cape".to_string()],
                competitive_advantages: vec!["Owned refrigerated fleet".to_string()],
                key_performance_indicators: BTreeMap::new(),
            }),
            management_structure: Some(ManagementStructure {
                executive_team: vec![
                    member("Ayanda", "CEO", 14),
                    member("Marius", "COO", 11),
                ],
                management_team: vec![member("Fatima", "Fleet manager", 8)],
                board_of_directors: vec![member("Grace", "Chair", 22)],
                advisors: Vec::new(),
            }),
            document_sections,
            industry: Some("Logistics".to_string()),
        },
        mode,
        market_intelligence: None,
    }
}

/// Canned module responses keyed off the payload's `analysisMode`; market position always fails.
#[derive(Debug, Default)]
pub(crate) struct DemoInvoker;

#[async_trait]
impl ModuleInvoker for DemoInvoker {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        payload: Value,
    ) -> Result<Value, InvokeError> {
        let mode = payload
            .get("analysisMode")
            .and_then(Value::as_str)
            .unwrap_or("sme");
        let investor = mode == AnalysisMode::Investor.label();

        let analysis = match capability {
            RemoteCapability::AnalyzeMarketPosition => {
                return Err(InvokeError::Status {
                    status: 503,
                    body: "market data provider unavailable".to_string(),
                })
            }
            RemoteCapability::AnalyzeFinancials if investor => json!({
                "analysisMode": mode,
                "overallScore": 74,
                "confidence": 86,
                "strengths": ["Revenue up 13% year on year", "Positive net margin"],
                "concerns": ["Fuel costs squeeze margins"],
                "recommendations": ["Hedge diesel exposure"],
                "investmentGrade": "B",
                "returnPotential": "moderate",
                "financialRisks": ["Fuel price volatility"],
            }),
            RemoteCapability::AnalyzeFinancials => json!({
                "analysisMode": mode,
                "overallScore": 74,
                "confidence": 86,
                "strengths": ["Revenue up 13% year on year", "Positive net margin"],
                "concerns": ["Fuel costs squeeze margins"],
                "recommendations": ["Hedge diesel exposure"],
                "fundingReadinessScore": 72,
                "improvementAreas": ["Cost visibility"],
                "actionItems": ["Break out fuel costs per route"],
            }),
            RemoteCapability::AnalyzeManagement if investor => json!({
                "analysisMode": mode,
                "teamScore": 72,
                "confidence": 80,
                "strengths": ["Operators with long logistics careers"],
                "gaps": ["No finance executive"],
                "recommendations": ["Appoint a CFO before scaling"],
                "leadershipRisk": "medium",
                "executionCapability": "proven",
            }),
            RemoteCapability::AnalyzeManagement => json!({
                "analysisMode": mode,
                "teamScore": 72,
                "confidence": 80,
                "strengths": ["Operators with long logistics careers"],
                "gaps": ["No finance executive"],
                "developmentPriorities": ["Finance leadership"],
                "actionItems": ["Recruit a part-time financial director"],
            }),
            RemoteCapability::AnalyzeRiskProfile if investor => json!({
                "analysisMode": mode,
                "confidence": 78,
                "keyRisks": ["Customer concentration in two retailers"],
                "mitigations": ["Sign a third anchor customer"],
                "overallRiskScore": 35,
                "riskLevel": "medium",
                "dealBreakers": [],
            }),
            RemoteCapability::AnalyzeRiskProfile => json!({
                "analysisMode": mode,
                "confidence": 78,
                "keyRisks": ["Customer concentration in two retailers"],
                "mitigations": ["Sign a third anchor customer"],
                "applicationReadinessScore": 70,
                "riskReductionSteps": ["Show signed offtake agreements"],
            }),
        };

        Ok(json!({ "analysis": analysis }))
    }
}
