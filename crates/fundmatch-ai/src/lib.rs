//! Funding analysis engine: runs the financial, market, management, compliance, and risk
//! modules for an SME funding application and synthesizes a mode-specific verdict.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
