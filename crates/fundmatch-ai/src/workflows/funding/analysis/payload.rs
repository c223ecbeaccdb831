use serde_json::{json, Value};

use super::domain::{
    AnalysisMode, ApplicationContext, BusinessAssessment, BusinessProfile, FinancialProfile,
    ManagementStructure, MarketIntelligence,
};

pub(crate) fn financial(
    financials: &FinancialProfile,
    profile: &BusinessProfile,
    mode: AnalysisMode,
) -> Value {
    json!({
        "analysisType": "financial_health",
        "analysisMode": mode,
        "financialData": financials,
        "industry": profile.industry,
    })
}

pub(crate) fn market(
    assessment: &BusinessAssessment,
    profile: &BusinessProfile,
    intelligence: Option<&MarketIntelligence>,
    mode: AnalysisMode,
) -> Value {
    let mut payload = json!({
        "analysisType": "market_position",
        "analysisMode": mode,
        "businessData": {
            "businessModel": assessment.business_model,
            "valueProposition": assessment.value_proposition,
            "targetMarkets": assessment.target_markets,
            "competitiveAdvantages": assessment.competitive_advantages,
            "industry": profile.industry,
        },
    });

    if let (Some(intelligence), Value::Object(fields)) = (intelligence, &mut payload) {
        fields.insert("marketIntelligence".to_string(), json!(intelligence));
    }

    payload
}

pub(crate) fn management(structure: &ManagementStructure, mode: AnalysisMode) -> Value {
    json!({
        "analysisType": "management_capability",
        "analysisMode": mode,
        "managementData": structure,
        "teamSize": structure.headcount(),
    })
}

pub(crate) fn risk(
    financials: &FinancialProfile,
    assessment: &BusinessAssessment,
    structure: &ManagementStructure,
    application: &ApplicationContext,
    mode: AnalysisMode,
) -> Value {
    json!({
        "analysisType": "risk_profile",
        "analysisMode": mode,
        "financialData": financials,
        "businessData": {
            "businessModel": assessment.business_model,
            "targetMarkets": assessment.target_markets,
        },
        "managementSummary": {
            "executives": structure.executive_team.len(),
            "boardMembers": structure.board_of_directors.len(),
        },
        "applicationData": {
            "id": application.id.0,
            "requestedAmount": application.requested_amount,
            "fundingType": application.funding_type,
        },
    })
}
