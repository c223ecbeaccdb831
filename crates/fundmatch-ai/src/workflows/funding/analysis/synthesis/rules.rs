use super::super::results::{AnalysisModule, MarketView, ModuleResults, RiskView};
use super::config::SynthesisConfig;
use super::ScoreComponent;

pub(crate) struct ScoreSignals {
    pub compliance_completeness: f64,
    /// Investor-mode raw risk (higher is riskier); `None` in sme mode.
    pub raw_risk: Option<f64>,
}

pub(crate) fn competitive_strength_score(strength: &str) -> f64 {
    match strength.trim().to_ascii_lowercase().as_str() {
        "strong" => 85.0,
        "moderate" => 65.0,
        "weak" => 35.0,
        _ => 50.0,
    }
}

fn bounded(value: Option<f64>, config: &SynthesisConfig) -> f64 {
    value
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(0.0, 100.0))
        .unwrap_or(config.default_sub_score)
}

pub(crate) fn score_modules(
    modules: &ModuleResults,
    config: &SynthesisConfig,
) -> (Vec<ScoreComponent>, u8, ScoreSignals) {
    let mut components = Vec::with_capacity(AnalysisModule::ORDER.len());

    let financial = bounded(modules.financial_health.overall_score, config);
    components.push(ScoreComponent {
        module: AnalysisModule::Financial,
        score: financial,
        weight: config.weights.weight_for(AnalysisModule::Financial),
        notes: match modules.financial_health.overall_score {
            Some(_) => format!("financial health score {financial:.0}"),
            None => format!("financial score missing, defaulted to {financial:.0}"),
        },
    });

    let compliance = bounded(Some(modules.compliance.completeness_score), config);
    components.push(ScoreComponent {
        module: AnalysisModule::Compliance,
        score: compliance,
        weight: config.weights.weight_for(AnalysisModule::Compliance),
        notes: format!(
            "{} of {} required documents present",
            modules
                .compliance
                .verification_status
                .len()
                .saturating_sub(modules.compliance.missing_documents.len()),
            modules.compliance.verification_status.len()
        ),
    });

    let management = bounded(modules.management.team_score, config);
    components.push(ScoreComponent {
        module: AnalysisModule::Management,
        score: management,
        weight: config.weights.weight_for(AnalysisModule::Management),
        notes: match modules.management.team_score {
            Some(_) => format!("management team score {management:.0}"),
            None => format!("team score missing, defaulted to {management:.0}"),
        },
    });

    let (market, market_notes) = match &modules.market_position.view {
        MarketView::Sme(view) => {
            let score = bounded(view.market_appeal_score, config);
            (score, format!("market appeal score {score:.0}"))
        }
        MarketView::Investor(view) => match (&view.competitive_strength, view.differentiation_score) {
            (Some(strength), _) => {
                let score = competitive_strength_score(strength);
                (score, format!("competitive strength '{strength}' mapped to {score:.0}"))
            }
            (None, Some(differentiation)) => {
                let score = bounded(Some(differentiation), config);
                (score, format!("differentiation score {score:.0}"))
            }
            (None, None) => {
                let score = config.default_sub_score;
                (score, format!("market strength missing, defaulted to {score:.0}"))
            }
        },
    };
    components.push(ScoreComponent {
        module: AnalysisModule::Market,
        score: market,
        weight: config.weights.weight_for(AnalysisModule::Market),
        notes: market_notes,
    });

    let (risk, raw_risk, risk_notes) = match &modules.risk.view {
        RiskView::Investor(view) => {
            let raw = bounded(view.overall_risk_score, config);
            let goodness = 100.0 - raw;
            (
                goodness,
                Some(raw),
                format!("risk score {raw:.0} inverted to {goodness:.0}"),
            )
        }
        RiskView::Sme(view) => {
            let score = bounded(view.application_readiness_score, config);
            (score, None, format!("application readiness score {score:.0}"))
        }
    };
    components.push(ScoreComponent {
        module: AnalysisModule::Risk,
        score: risk,
        weight: config.weights.weight_for(AnalysisModule::Risk),
        notes: risk_notes,
    });

    let weighted = financial * config.weights.financial
        + market * config.weights.market
        + management * config.weights.management
        + compliance * config.weights.compliance
        + risk * config.weights.risk;
    let overall = weighted.round().clamp(0.0, 100.0) as u8;

    let signals = ScoreSignals {
        compliance_completeness: compliance,
        raw_risk,
    };

    (components, overall, signals)
}
