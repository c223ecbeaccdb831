use super::common::module_results;
use crate::workflows::funding::analysis::domain::AnalysisMode;
use crate::workflows::funding::analysis::results::{AnalysisModule, MarketView};
use crate::workflows::funding::analysis::synthesis::{
    ApplicationReadiness, InvestmentRecommendation, ScoreSynthesizer, ScoreWeights,
    SynthesisConfig, SynthesisConfigError, Verdict,
};

fn recommendation(verdict: &Verdict) -> InvestmentRecommendation {
    match verdict {
        Verdict::Investor(verdict) => verdict.recommendation,
        other => panic!("expected investor verdict, got {other:?}"),
    }
}

fn readiness(verdict: &Verdict) -> ApplicationReadiness {
    match verdict {
        Verdict::Sme(verdict) => verdict.application_readiness,
        other => panic!("expected sme verdict, got {other:?}"),
    }
}

#[test]
fn overall_score_is_the_weighted_sum() {
    let synthesizer = ScoreSynthesizer::default();
    let cases = [
        ((80.0, 70.0, 75.0, 90.0, 65.0), 75),
        ((100.0, 100.0, 100.0, 100.0, 100.0), 100),
        ((0.0, 0.0, 0.0, 0.0, 0.0), 0),
        ((50.0, 60.0, 70.0, 100.0, 40.0), 60),
        ((90.0, 40.0, 55.0, 75.0, 85.0), 68),
    ];

    for ((financial, market, management, compliance, risk), expected) in cases {
        let modules = module_results(
            AnalysisMode::Sme,
            financial,
            market,
            management,
            compliance,
            risk,
        );
        let synthesis = synthesizer.synthesize(AnalysisMode::Sme, &modules);
        assert_eq!(
            synthesis.overall_score, expected,
            "scores {financial}/{market}/{management}/{compliance}/{risk}"
        );
    }
}

#[test]
fn investor_risk_is_inverted_before_weighting() {
    // 0.30*80 + 0.25*70 + 0.20*75 + 0.10*100 + 0.15*(100-30)
    let modules = module_results(AnalysisMode::Investor, 80.0, 70.0, 75.0, 100.0, 30.0);

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Investor, &modules);

    assert_eq!(synthesis.overall_score, 77);
    let risk = synthesis
        .components
        .iter()
        .find(|component| component.module == AnalysisModule::Risk)
        .expect("risk component");
    assert_eq!(risk.score, 70.0);
    assert_eq!(risk.weight, 0.15);
    assert!(risk.notes.contains("inverted"));
}

#[test]
fn components_cover_every_module_with_weights_summing_to_one() {
    let modules = module_results(AnalysisMode::Sme, 60.0, 60.0, 60.0, 100.0, 60.0);

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Sme, &modules);

    assert_eq!(synthesis.components.len(), 5);
    for module in AnalysisModule::ORDER {
        assert!(synthesis
            .components
            .iter()
            .any(|component| component.module == module));
    }
    let total: f64 = synthesis.components.iter().map(|component| component.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn incomplete_compliance_overrides_perfect_scores() {
    let synthesizer = ScoreSynthesizer::default();

    let sme = module_results(AnalysisMode::Sme, 100.0, 100.0, 100.0, 50.0, 100.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Sme, &sme);
    assert_eq!(synthesis.overall_score, 95);
    assert_eq!(
        readiness(&synthesis.verdict),
        ApplicationReadiness::RequiresMajorWork
    );
    assert!(synthesis.rationale.contains("taxCompliance"));

    // raw risk 0 is the investor equivalent of a perfect risk score
    let investor = module_results(AnalysisMode::Investor, 100.0, 100.0, 100.0, 50.0, 0.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Investor, &investor);
    assert_eq!(
        recommendation(&synthesis.verdict),
        InvestmentRecommendation::RequestMoreInfo
    );
    match &synthesis.verdict {
        Verdict::Investor(verdict) => assert!(verdict
            .conditions
            .contains(&"Provide a valid SARS tax clearance certificate".to_string())),
        other => panic!("expected investor verdict, got {other:?}"),
    }
}

#[test]
fn score_components_carry_their_module_weight() {
    let weights = ScoreWeights::default();
    let synthesis = ScoreSynthesizer::default().synthesize(
        AnalysisMode::Sme,
        &module_results(AnalysisMode::Sme, 80.0, 70.0, 75.0, 90.0, 65.0),
    );

    assert_eq!(synthesis.components.len(), AnalysisModule::ORDER.len());
    for component in &synthesis.components {
        assert_eq!(component.weight, weights.weight_for(component.module));
    }
    assert_eq!(weights.weight_for(AnalysisModule::Financial), 0.30);
    assert_eq!(weights.weight_for(AnalysisModule::Risk), 0.15);
}

#[test]
fn approval_needs_both_score_and_low_risk() {
    let synthesizer = ScoreSynthesizer::default();

    let low_risk = module_results(AnalysisMode::Investor, 100.0, 100.0, 100.0, 100.0, 20.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Investor, &low_risk);
    assert_eq!(synthesis.overall_score, 97);
    assert_eq!(
        recommendation(&synthesis.verdict),
        InvestmentRecommendation::Approve
    );
    match &synthesis.verdict {
        Verdict::Investor(verdict) => assert!(verdict.conditions.is_empty()),
        other => panic!("expected investor verdict, got {other:?}"),
    }
    assert_eq!(synthesis.verdict.summary(), "recommendation: approve");

    let elevated_risk = module_results(AnalysisMode::Investor, 100.0, 100.0, 100.0, 100.0, 45.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Investor, &elevated_risk);
    assert!(synthesis.overall_score >= 75);
    assert_eq!(
        recommendation(&synthesis.verdict),
        InvestmentRecommendation::ConditionalApprove
    );
    assert!(synthesis.rationale.contains("approval ceiling"));
    assert!(synthesis
        .verdict
        .summary()
        .starts_with("recommendation: conditional_approve"));

    let high_risk = module_results(AnalysisMode::Investor, 100.0, 100.0, 100.0, 100.0, 80.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Investor, &high_risk);
    assert_eq!(synthesis.overall_score, 88);
    assert_eq!(
        recommendation(&synthesis.verdict),
        InvestmentRecommendation::Reject
    );
}

#[test]
fn sme_readiness_follows_score_tiers() {
    let synthesizer = ScoreSynthesizer::default();

    let ready = module_results(AnalysisMode::Sme, 80.0, 70.0, 75.0, 90.0, 65.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Sme, &ready);
    assert_eq!(synthesis.overall_score, 75);
    assert_eq!(
        readiness(&synthesis.verdict),
        ApplicationReadiness::ReadyToSubmit
    );

    let minor = module_results(AnalysisMode::Sme, 60.0, 60.0, 60.0, 100.0, 60.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Sme, &minor);
    assert_eq!(synthesis.overall_score, 64);
    assert_eq!(
        readiness(&synthesis.verdict),
        ApplicationReadiness::NeedsMinorImprovements
    );

    let major = module_results(AnalysisMode::Sme, 40.0, 40.0, 40.0, 100.0, 40.0);
    let synthesis = synthesizer.synthesize(AnalysisMode::Sme, &major);
    assert_eq!(synthesis.overall_score, 46);
    assert_eq!(
        readiness(&synthesis.verdict),
        ApplicationReadiness::RequiresMajorWork
    );
}

#[test]
fn investor_narrative_is_bounded() {
    let modules = module_results(AnalysisMode::Investor, 70.0, 70.0, 70.0, 100.0, 50.0);

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Investor, &modules);

    match synthesis.verdict {
        Verdict::Investor(verdict) => {
            assert_eq!(
                verdict.key_strengths,
                vec![
                    "financial strength 1",
                    "financial strength 2",
                    "market strength 1",
                    "market strength 2",
                    "management strength 1",
                ]
            );
            assert_eq!(
                verdict.key_concerns,
                vec![
                    "financial concern 1",
                    "financial concern 2",
                    "key risk 1",
                    "key risk 2",
                    "management gap 1",
                ]
            );
            assert_eq!(verdict.conditions, vec!["mitigation 1", "mitigation 2"]);
        }
        other => panic!("expected investor verdict, got {other:?}"),
    }
}

#[test]
fn sme_narrative_draws_on_action_items() {
    let modules = module_results(AnalysisMode::Sme, 80.0, 70.0, 75.0, 90.0, 65.0);

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Sme, &modules);

    match synthesis.verdict {
        Verdict::Sme(verdict) => {
            assert_eq!(verdict.competitive_advantages.len(), 5);
            assert_eq!(
                verdict.improvement_priorities,
                vec![
                    "financial action 1",
                    "financial action 2",
                    "market action 1",
                    "market action 2",
                    "management action 1",
                ]
            );
            assert_eq!(
                verdict.next_steps,
                vec![
                    "Provide a valid SARS tax clearance certificate",
                    "risk step 1",
                    "risk step 2",
                    "Submit the application to matched funders",
                ]
            );
        }
        other => panic!("expected sme verdict, got {other:?}"),
    }
}

#[test]
fn missing_scores_use_the_default_sub_score() {
    let mut modules = module_results(AnalysisMode::Investor, 80.0, 70.0, 75.0, 100.0, 30.0);
    modules.financial_health.overall_score = None;
    modules.management.team_score = Some(f64::NAN);
    if let MarketView::Investor(view) = &mut modules.market_position.view {
        view.differentiation_score = None;
    }

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Investor, &modules);

    let scores: Vec<f64> = synthesis
        .components
        .iter()
        .filter(|component| component.module != AnalysisModule::Compliance)
        .filter(|component| component.module != AnalysisModule::Risk)
        .map(|component| component.score)
        .collect();
    assert_eq!(scores, vec![50.0, 50.0, 50.0]);
    // 0.30*50 + 0.25*50 + 0.20*50 + 0.10*100 + 0.15*70
    assert_eq!(synthesis.overall_score, 58);
}

#[test]
fn competitive_strength_label_takes_precedence() {
    let mut modules = module_results(AnalysisMode::Investor, 80.0, 10.0, 75.0, 100.0, 30.0);
    if let MarketView::Investor(view) = &mut modules.market_position.view {
        view.competitive_strength = Some("Strong".to_string());
    }

    let synthesis = ScoreSynthesizer::default().synthesize(AnalysisMode::Investor, &modules);

    let market = synthesis
        .components
        .iter()
        .find(|component| component.module == AnalysisModule::Market)
        .expect("market component");
    assert_eq!(market.score, 85.0);
}

#[test]
fn invalid_weights_are_rejected() {
    let config = SynthesisConfig {
        weights: ScoreWeights {
            financial: 0.5,
            ..ScoreWeights::default()
        },
        ..SynthesisConfig::default()
    };
    assert!(matches!(
        ScoreSynthesizer::new(config),
        Err(SynthesisConfigError::WeightsDoNotSumToOne { .. })
    ));

    let config = SynthesisConfig {
        approve_threshold: 50.0,
        ..SynthesisConfig::default()
    };
    assert!(matches!(
        ScoreSynthesizer::new(config),
        Err(SynthesisConfigError::InvertedThresholds { .. })
    ));

    assert!(ScoreSynthesizer::new(SynthesisConfig::default()).is_ok());
}
