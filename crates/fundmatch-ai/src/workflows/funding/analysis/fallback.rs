//! Deterministic stand-in results for modules whose remote call failed.
//!
//! Each generator is a pure function of the profile slice and mode: bounded scores, fixed
//! degraded confidence, and narrative lists that are never empty.

use super::domain::{
    AnalysisMode, BusinessAssessment, FinancialProfile, ManagementStructure,
};
use super::results::{
    FinancialHealthAnalysis, FinancialInvestorView, FinancialSmeView, FinancialView,
    ManagementAnalysis, ManagementInvestorView, ManagementSmeView, ManagementView,
    MarketInvestorView, MarketPositionAnalysis, MarketSmeView, MarketView, RiskAnalysis,
    RiskInvestorView, RiskSmeView, RiskView,
};

const FINANCIAL_CONFIDENCE: f64 = 60.0;
const MARKET_CONFIDENCE: f64 = 65.0;
const MANAGEMENT_CONFIDENCE: f64 = 65.0;
const RISK_CONFIDENCE: f64 = 70.0;

const REVENUE_THRESHOLD: f64 = 100_000.0;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn financial_health(profile: &FinancialProfile, mode: AnalysisMode) -> FinancialHealthAnalysis {
    let established = profile
        .effective_monthly_revenue()
        .map(|revenue| revenue > REVENUE_THRESHOLD)
        .unwrap_or(false);
    let score: f64 = if established { 60.0 } else { 40.0 };
    let score = score.clamp(30.0, 70.0);

    let strengths = if established {
        lines(&["Monthly revenue above R100k indicates an established trading base"])
    } else {
        lines(&["Business is trading and has captured financial information"])
    };

    let mut concerns = Vec::new();
    if profile.historical_financials.is_empty() {
        concerns.push("No historical financial statements were captured".to_string());
    }
    if !established {
        concerns.push("Revenue is below the level most funders look for".to_string());
    }
    if concerns.is_empty() {
        concerns.push("Detailed financial analysis was unavailable".to_string());
    }

    let recommendations = lines(&[
        "Provide detailed financial statements for a full assessment",
        "Include cash flow projections for the next 12 months",
    ]);

    let view = match mode {
        AnalysisMode::Investor => FinancialView::Investor(FinancialInvestorView {
            investment_grade: Some(if established { "C+" } else { "C" }.to_string()),
            return_potential: Some("moderate".to_string()),
            financial_risks: lines(&["Limited financial analysis available"]),
        }),
        AnalysisMode::Sme => FinancialView::Sme(FinancialSmeView {
            funding_readiness_score: Some(score),
            improvement_areas: lines(&["Financial documentation", "Cash flow visibility"]),
            action_items: lines(&[
                "Prepare management accounts for the last 12 months",
                "Build a 12 month cash flow forecast",
            ]),
        }),
    };

    FinancialHealthAnalysis {
        overall_score: Some(score),
        confidence: FINANCIAL_CONFIDENCE,
        strengths,
        concerns,
        recommendations,
        view,
    }
}

pub fn market_position(
    assessment: &BusinessAssessment,
    mode: AnalysisMode,
) -> MarketPositionAnalysis {
    let has_advantages = !assessment.competitive_advantages.is_empty();

    let mut strengths: Vec<String> = assessment
        .competitive_advantages
        .iter()
        .take(2)
        .cloned()
        .collect();
    if strengths.is_empty() {
        strengths.push("Business operates in an identifiable market".to_string());
    }

    let opportunities = if assessment.target_markets.is_empty() {
        lines(&["Define target market segments to sharpen positioning"])
    } else {
        assessment
            .target_markets
            .iter()
            .take(2)
            .map(|market| format!("Growth potential in {market}"))
            .collect()
    };

    let threats = lines(&["Competitive landscape could not be assessed in detail"]);

    let view = match mode {
        AnalysisMode::Investor => {
            let (strength, score) = if has_advantages {
                ("moderate", 65.0)
            } else {
                ("weak", 35.0)
            };
            MarketView::Investor(MarketInvestorView {
                competitive_strength: Some(strength.to_string()),
                differentiation_score: Some(score),
                market_risks: lines(&["Market data unavailable for independent validation"]),
            })
        }
        AnalysisMode::Sme => MarketView::Sme(MarketSmeView {
            market_appeal_score: Some(if has_advantages { 65.0 } else { 55.0 }),
            positioning_advice: lines(&["Articulate what sets the business apart from competitors"]),
            action_items: lines(&[
                "Document market size and target customer segments",
                "Gather customer testimonials or letters of intent",
            ]),
        }),
    };

    MarketPositionAnalysis {
        confidence: MARKET_CONFIDENCE,
        strengths,
        opportunities,
        threats,
        view,
    }
}

pub fn management(structure: &ManagementStructure, mode: AnalysisMode) -> ManagementAnalysis {
    let executives = structure.executive_team.len() as f64;
    let managers = structure.management_team.len() as f64;
    let board = structure.board_of_directors.len().min(2) as f64;
    let advisors = structure.advisors.len().min(2) as f64;
    let score = (40.0 + 8.0 * executives + 4.0 * managers + 5.0 * board + 3.0 * advisors)
        .clamp(30.0, 80.0);

    let mut strengths = Vec::new();
    if !structure.executive_team.is_empty() {
        strengths.push(format!(
            "Executive team of {} in place",
            structure.executive_team.len()
        ));
    }
    if !structure.board_of_directors.is_empty() {
        strengths.push("Board oversight established".to_string());
    }
    if strengths.is_empty() {
        strengths.push("Founder-led business with direct operational control".to_string());
    }

    let mut gaps = Vec::new();
    if structure.board_of_directors.is_empty() {
        gaps.push("No board of directors or formal oversight".to_string());
    }
    if structure.advisors.is_empty() {
        gaps.push("No external advisors listed".to_string());
    }
    if gaps.is_empty() {
        gaps.push("Depth of management experience could not be verified".to_string());
    }

    let recommendations = lines(&["Document roles, responsibilities, and relevant experience"]);

    let view = match mode {
        AnalysisMode::Investor => ManagementView::Investor(ManagementInvestorView {
            leadership_risk: Some(if score >= 60.0 { "medium" } else { "high" }.to_string()),
            execution_capability: Some("unverified".to_string()),
        }),
        AnalysisMode::Sme => ManagementView::Sme(ManagementSmeView {
            development_priorities: lines(&["Strengthen governance structures"]),
            action_items: lines(&[
                "Add CVs for key management to the application",
                "Consider appointing an independent advisor",
            ]),
        }),
    };

    ManagementAnalysis {
        team_score: Some(score),
        confidence: MANAGEMENT_CONFIDENCE,
        strengths,
        gaps,
        recommendations,
        view,
    }
}

pub fn risk(profile: &FinancialProfile, mode: AnalysisMode) -> RiskAnalysis {
    let risk_score: f64 = if profile.historical_financials.is_empty() {
        55.0
    } else {
        50.0
    };

    let key_risks = if profile.historical_financials.is_empty() {
        lines(&["Limited trading history to evidence performance"])
    } else {
        lines(&["Risk profile could not be assessed in detail"])
    };
    let mitigations = lines(&["Provide collateral or guarantees where available"]);

    let view = match mode {
        AnalysisMode::Investor => RiskView::Investor(RiskInvestorView {
            overall_risk_score: Some(risk_score),
            risk_level: Some("medium".to_string()),
            deal_breakers: Vec::new(),
        }),
        AnalysisMode::Sme => RiskView::Sme(RiskSmeView {
            application_readiness_score: Some(100.0 - risk_score),
            risk_reduction_steps: lines(&[
                "Address documentation gaps before submitting",
                "Prepare answers on key business risks",
            ]),
        }),
    };

    RiskAnalysis {
        confidence: RISK_CONFIDENCE,
        key_risks,
        mitigations,
        view,
    }
}
