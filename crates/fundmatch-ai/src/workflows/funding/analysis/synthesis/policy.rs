use serde::{Deserialize, Serialize};

use super::super::domain::AnalysisMode;
use super::super::results::{
    FinancialHealthAnalysis, FinancialView, ManagementAnalysis, ManagementView,
    MarketPositionAnalysis, MarketView, ModuleResults, RiskAnalysis, RiskView,
};
use super::config::SynthesisConfig;
use super::rules::ScoreSignals;

const NARRATIVE_CAP: usize = 5;
const CONDITIONS_CAP: usize = 4;

/// Investor-facing verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentRecommendation {
    Approve,
    ConditionalApprove,
    Reject,
    RequestMoreInfo,
}

impl InvestmentRecommendation {
    pub const fn label(self) -> &'static str {
        match self {
            InvestmentRecommendation::Approve => "approve",
            InvestmentRecommendation::ConditionalApprove => "conditional_approve",
            InvestmentRecommendation::Reject => "reject",
            InvestmentRecommendation::RequestMoreInfo => "request_more_info",
        }
    }
}

/// Applicant-facing verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationReadiness {
    ReadyToSubmit,
    NeedsMinorImprovements,
    RequiresMajorWork,
}

impl ApplicationReadiness {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationReadiness::ReadyToSubmit => "ready_to_submit",
            ApplicationReadiness::NeedsMinorImprovements => "needs_minor_improvements",
            ApplicationReadiness::RequiresMajorWork => "requires_major_work",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorVerdict {
    pub recommendation: InvestmentRecommendation,
    pub key_strengths: Vec<String>,
    pub key_concerns: Vec<String>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmeVerdict {
    pub application_readiness: ApplicationReadiness,
    pub competitive_advantages: Vec<String>,
    pub improvement_priorities: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Mode-specific verdict plus its supporting narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Verdict {
    Investor(InvestorVerdict),
    Sme(SmeVerdict),
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Investor(verdict) => verdict.recommendation.label(),
            Verdict::Sme(verdict) => verdict.application_readiness.label(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Verdict::Investor(verdict) => {
                if verdict.conditions.is_empty() {
                    format!("recommendation: {}", verdict.recommendation.label())
                } else {
                    format!(
                        "recommendation: {} ({})",
                        verdict.recommendation.label(),
                        verdict.conditions.join("; ")
                    )
                }
            }
            Verdict::Sme(verdict) => {
                format!("readiness: {}", verdict.application_readiness.label())
            }
        }
    }
}

pub(crate) fn decide_recommendation(
    overall: u8,
    signals: &ScoreSignals,
    config: &SynthesisConfig,
) -> InvestmentRecommendation {
    if signals.compliance_completeness < config.compliance_gate {
        return InvestmentRecommendation::RequestMoreInfo;
    }

    let overall = f64::from(overall);
    let risk = signals.raw_risk.unwrap_or(config.default_sub_score);

    if overall >= config.approve_threshold && risk < config.approve_risk_ceiling {
        InvestmentRecommendation::Approve
    } else if overall >= config.conditional_threshold && risk < config.conditional_risk_ceiling {
        InvestmentRecommendation::ConditionalApprove
    } else {
        InvestmentRecommendation::Reject
    }
}

pub(crate) fn decide_readiness(
    overall: u8,
    signals: &ScoreSignals,
    config: &SynthesisConfig,
) -> ApplicationReadiness {
    if signals.compliance_completeness < config.compliance_gate {
        return ApplicationReadiness::RequiresMajorWork;
    }

    let overall = f64::from(overall);
    if overall >= config.approve_threshold {
        ApplicationReadiness::ReadyToSubmit
    } else if overall >= config.conditional_threshold {
        ApplicationReadiness::NeedsMinorImprovements
    } else {
        ApplicationReadiness::RequiresMajorWork
    }
}

/// Concatenates the first `take` entries of each source, skipping repeats, up to `cap`.
fn bounded_narrative(sources: &[(&[String], usize)], cap: usize) -> Vec<String> {
    let mut collected: Vec<String> = Vec::new();
    for (items, take) in sources {
        for item in items.iter().take(*take) {
            if !collected.contains(item) {
                collected.push(item.clone());
            }
        }
    }
    collected.truncate(cap);
    collected
}

fn financial_actions(analysis: &FinancialHealthAnalysis) -> &[String] {
    match &analysis.view {
        FinancialView::Sme(view) if !view.action_items.is_empty() => &view.action_items,
        _ => &analysis.recommendations,
    }
}

fn market_actions(analysis: &MarketPositionAnalysis) -> &[String] {
    match &analysis.view {
        MarketView::Sme(view) if !view.action_items.is_empty() => &view.action_items,
        MarketView::Sme(view) => &view.positioning_advice,
        MarketView::Investor(view) => &view.market_risks,
    }
}

fn management_actions(analysis: &ManagementAnalysis) -> &[String] {
    match &analysis.view {
        ManagementView::Sme(view) if !view.action_items.is_empty() => &view.action_items,
        _ => &analysis.recommendations,
    }
}

fn risk_steps(analysis: &RiskAnalysis) -> &[String] {
    match &analysis.view {
        RiskView::Sme(view) if !view.risk_reduction_steps.is_empty() => &view.risk_reduction_steps,
        _ => &analysis.mitigations,
    }
}

fn compliance_gaps(modules: &ModuleResults) -> &[String] {
    if modules.compliance.missing_documents.is_empty() {
        &[]
    } else {
        &modules.compliance.recommendations
    }
}

pub(crate) fn build_verdict(
    mode: AnalysisMode,
    overall: u8,
    modules: &ModuleResults,
    signals: &ScoreSignals,
    config: &SynthesisConfig,
) -> Verdict {
    let strengths = bounded_narrative(
        &[
            (modules.financial_health.strengths.as_slice(), 2),
            (modules.market_position.strengths.as_slice(), 2),
            (modules.management.strengths.as_slice(), 1),
        ],
        NARRATIVE_CAP,
    );

    match mode {
        AnalysisMode::Investor => {
            let recommendation = decide_recommendation(overall, signals, config);
            let key_concerns = bounded_narrative(
                &[
                    (modules.financial_health.concerns.as_slice(), 2),
                    (modules.risk.key_risks.as_slice(), 2),
                    (modules.management.gaps.as_slice(), 1),
                ],
                NARRATIVE_CAP,
            );
            let conditions = match recommendation {
                InvestmentRecommendation::Approve => Vec::new(),
                _ => bounded_narrative(
                    &[
                        (compliance_gaps(modules), CONDITIONS_CAP),
                        (modules.risk.mitigations.as_slice(), 2),
                    ],
                    CONDITIONS_CAP,
                ),
            };

            Verdict::Investor(InvestorVerdict {
                recommendation,
                key_strengths: strengths,
                key_concerns,
                conditions,
            })
        }
        AnalysisMode::Sme => {
            let application_readiness = decide_readiness(overall, signals, config);
            let improvement_priorities = bounded_narrative(
                &[
                    (financial_actions(&modules.financial_health), 2),
                    (market_actions(&modules.market_position), 2),
                    (management_actions(&modules.management), 2),
                ],
                NARRATIVE_CAP,
            );
            let mut next_steps = bounded_narrative(
                &[
                    (compliance_gaps(modules), CONDITIONS_CAP),
                    (risk_steps(&modules.risk), 2),
                ],
                CONDITIONS_CAP,
            );
            if application_readiness == ApplicationReadiness::ReadyToSubmit
                && next_steps.len() < CONDITIONS_CAP
            {
                next_steps.push("Submit the application to matched funders".to_string());
            }

            Verdict::Sme(SmeVerdict {
                application_readiness,
                competitive_advantages: strengths,
                improvement_priorities,
                next_steps,
            })
        }
    }
}

pub(crate) fn rationale(
    mode: AnalysisMode,
    overall: u8,
    modules: &ModuleResults,
    signals: &ScoreSignals,
    config: &SynthesisConfig,
) -> String {
    let score = f64::from(overall);
    let tier = if score >= config.approve_threshold {
        0
    } else if score >= config.conditional_threshold {
        1
    } else {
        2
    };

    let mut text = match (mode, tier) {
        (AnalysisMode::Investor, 0) => format!(
            "Strong investment opportunity with an overall score of {overall}/100. \
             The business shows solid fundamentals across the analysed modules."
        ),
        (AnalysisMode::Investor, 1) => format!(
            "Moderate investment opportunity with an overall score of {overall}/100. \
             Funding should proceed only once the listed conditions are met."
        ),
        (AnalysisMode::Investor, _) => format!(
            "High-risk investment with an overall score of {overall}/100. \
             The concerns identified outweigh the strengths of the business."
        ),
        (AnalysisMode::Sme, 0) => format!(
            "Your application is well prepared with an overall score of {overall}/100 \
             and is ready for funder review."
        ),
        (AnalysisMode::Sme, 1) => format!(
            "Your application scores {overall}/100. A few targeted improvements will \
             strengthen it before submission."
        ),
        (AnalysisMode::Sme, _) => format!(
            "Your application scores {overall}/100 and needs significant work before it \
             is competitive."
        ),
    };

    if signals.compliance_completeness < config.compliance_gate {
        let missing = modules.compliance.missing_documents.join(", ");
        match mode {
            AnalysisMode::Investor => text.push_str(&format!(
                " Documentation is incomplete (missing: {missing}), so more information is \
                 required before a decision."
            )),
            AnalysisMode::Sme => text.push_str(&format!(
                " Complete the missing documents ({missing}) before submitting."
            )),
        }
    } else if let (AnalysisMode::Investor, Some(risk)) = (mode, signals.raw_risk) {
        if tier == 0 && risk >= config.approve_risk_ceiling {
            text.push_str(&format!(
                " A risk score of {risk:.0} is above the approval ceiling of {:.0}.",
                config.approve_risk_ceiling
            ));
        }
    }

    text
}
