use std::collections::BTreeMap;

use super::domain::DocumentSections;
use super::results::{ComplianceAnalysis, DocumentQuality, RiskLevel, VerificationStatus};

pub const COMPANY_REGISTRATION: &str = "companyRegistration";
pub const FINANCIAL_STATEMENTS: &str = "financialStatements";
pub const TAX_COMPLIANCE: &str = "taxCompliance";
pub const BUSINESS_PLAN: &str = "businessPlan";

/// Canonical documents every funding application must carry.
pub const CANONICAL_DOCUMENTS: [&str; 4] = [
    COMPANY_REGISTRATION,
    FINANCIAL_STATEMENTS,
    TAX_COMPLIANCE,
    BUSINESS_PLAN,
];

const CHECK_CONFIDENCE: f64 = 95.0;
const ALL_PRESENT: &str = "All required compliance documents are present";

/// Checklist backing the compliance check.
#[derive(Debug, Clone)]
pub struct CompliancePolicy {
    required_documents: Vec<String>,
}

impl CompliancePolicy {
    /// Builds a policy from an explicit checklist. An empty or blank list falls back to the
    /// canonical four so completeness never divides by zero.
    pub fn new<I, S>(required_documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut required: Vec<String> = Vec::new();
        for document in required_documents {
            let document = document.into();
            let document = document.trim();
            if !document.is_empty() && !required.iter().any(|known| known == document) {
                required.push(document.to_string());
            }
        }

        if required.is_empty() {
            return Self::default();
        }

        Self {
            required_documents: required,
        }
    }

    pub fn required_documents(&self) -> &[String] {
        &self.required_documents
    }
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            required_documents: CANONICAL_DOCUMENTS.iter().map(|key| key.to_string()).collect(),
        }
    }
}

/// Local, deterministic document-presence check. Never calls out and never fails.
#[derive(Debug, Clone, Default)]
pub struct ComplianceChecker {
    policy: CompliancePolicy,
}

impl ComplianceChecker {
    pub fn with_policy(policy: CompliancePolicy) -> Self {
        Self { policy }
    }

    pub fn check(&self, sections: &DocumentSections) -> ComplianceAnalysis {
        let required = self.policy.required_documents();
        let mut verification_status = BTreeMap::new();
        let mut missing_documents = Vec::new();

        for document in required {
            let status = if sections.is_present(document) {
                VerificationStatus::Verified
            } else {
                missing_documents.push(document.clone());
                VerificationStatus::Missing
            };
            verification_status.insert(document.clone(), status);
        }

        let total = required.len() as f64;
        let completeness_score = (total - missing_documents.len() as f64) / total * 100.0;

        let document_quality = if completeness_score > 80.0 {
            DocumentQuality::High
        } else if completeness_score > 60.0 {
            DocumentQuality::Medium
        } else {
            DocumentQuality::Low
        };

        let compliance_risk = match missing_documents.len() {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };

        let recommendations = if missing_documents.is_empty() {
            vec![ALL_PRESENT.to_string()]
        } else {
            missing_documents
                .iter()
                .map(|document| recommendation_for(document))
                .collect()
        };

        ComplianceAnalysis {
            completeness_score,
            document_quality,
            compliance_risk,
            verification_status,
            missing_documents,
            recommendations,
            confidence: CHECK_CONFIDENCE,
        }
    }
}

fn recommendation_for(document: &str) -> String {
    match document {
        COMPANY_REGISTRATION => "Provide CIPC company registration certificate".to_string(),
        FINANCIAL_STATEMENTS => {
            "Upload audited or management financial statements for the last 2 years".to_string()
        }
        TAX_COMPLIANCE => "Provide a valid SARS tax clearance certificate".to_string(),
        BUSINESS_PLAN => "Submit a detailed business plan with financial projections".to_string(),
        other => format!("Provide the required {other} document"),
    }
}
