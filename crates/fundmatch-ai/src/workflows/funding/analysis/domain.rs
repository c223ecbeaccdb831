use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Perspective an analysis is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Investor,
    Sme,
}

impl AnalysisMode {
    pub const fn label(self) -> &'static str {
        match self {
            AnalysisMode::Investor => "investor",
            AnalysisMode::Sme => "sme",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "investor" | "funder" => Ok(Self::Investor),
            "sme" | "applicant" => Ok(Self::Sme),
            other => Err(format!(
                "unknown analysis mode '{other}' (expected 'investor' or 'sme')"
            )),
        }
    }
}

/// Identifier wrapper for funding applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Application envelope supplied by the caller. Fields the engine does not read are carried
/// through in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationContext {
    pub id: ApplicationId,
    #[serde(default)]
    pub requested_amount: Option<f64>,
    #[serde(default)]
    pub funding_type: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentDescriptor>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Metadata for an uploaded supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub storage_key: Option<String>,
}

/// Read-only business profile owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default)]
    pub financial_profile: Option<FinancialProfile>,
    #[serde(default)]
    pub business_assessment: Option<BusinessAssessment>,
    #[serde(default)]
    pub management_structure: Option<ManagementStructure>,
    #[serde(default)]
    pub document_sections: DocumentSections,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialProfile {
    pub monthly_revenue: Option<f64>,
    pub annual_revenue: Option<f64>,
    pub gross_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub historical_financials: Vec<FinancialPeriod>,
    pub projected_financials: Vec<FinancialPeriod>,
}

impl FinancialProfile {
    /// Monthly revenue, derived from the annual figure when only that was captured.
    pub fn effective_monthly_revenue(&self) -> Option<f64> {
        self.monthly_revenue
            .or_else(|| self.annual_revenue.map(|annual| annual / 12.0))
            .filter(|revenue| revenue.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPeriod {
    pub period: String,
    pub revenue: f64,
    #[serde(default)]
    pub expenses: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessAssessment {
    pub business_model: Option<String>,
    pub value_proposition: Option<String>,
    pub target_markets: Vec<String>,
    pub competitive_advantages: Vec<String>,
    pub key_performance_indicators: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagementStructure {
    pub executive_team: Vec<TeamMember>,
    pub management_team: Vec<TeamMember>,
    pub board_of_directors: Vec<TeamMember>,
    pub advisors: Vec<TeamMember>,
}

impl ManagementStructure {
    pub fn headcount(&self) -> usize {
        self.executive_team.len()
            + self.management_team.len()
            + self.board_of_directors.len()
            + self.advisors.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub years_experience: Option<u8>,
}

/// Document presence map keyed by document type. Values are loosely shaped because the
/// upload flow stores anything from booleans to file listings; anything empty counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSections(pub BTreeMap<String, Value>);

impl DocumentSections {
    pub fn is_present(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => !text.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
            Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        }
    }

    pub fn with(mut self, key: &str, present: bool) -> Self {
        self.0.insert(key.to_string(), Value::Bool(present));
        self
    }
}

/// Optional market feed used to enrich the market-position module input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketIntelligence {
    pub industry_trends: Vec<String>,
    pub funding_trends: Vec<String>,
    pub competitive_activity: Vec<String>,
}

/// One orchestration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub application: ApplicationContext,
    pub profile: BusinessProfile,
    pub mode: AnalysisMode,
    #[serde(default)]
    pub market_intelligence: Option<MarketIntelligence>,
}
