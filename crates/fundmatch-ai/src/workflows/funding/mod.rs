pub mod analysis;

pub use analysis::{
    AnalysisError, AnalysisMode, AnalysisRequest, ComprehensiveAnalysis,
    ModularAnalysisService,
};
