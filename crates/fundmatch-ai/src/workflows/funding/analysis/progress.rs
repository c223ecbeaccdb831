use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Orchestration checkpoints. Percentages are fixed, not derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Initializing,
    Financial,
    Compliance,
    Management,
    Market,
    Risk,
    Synthesizing,
    Complete,
}

impl AnalysisStage {
    pub const fn percent(self) -> u8 {
        match self {
            AnalysisStage::Initializing => 10,
            AnalysisStage::Financial => 20,
            AnalysisStage::Compliance => 35,
            AnalysisStage::Management => 50,
            AnalysisStage::Market => 65,
            AnalysisStage::Risk => 80,
            AnalysisStage::Synthesizing => 90,
            AnalysisStage::Complete => 100,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AnalysisStage::Initializing => "initializing",
            AnalysisStage::Financial => "analyzing financial health",
            AnalysisStage::Compliance => "checking document compliance",
            AnalysisStage::Management => "assessing management capability",
            AnalysisStage::Market => "evaluating market position",
            AnalysisStage::Risk => "profiling risk",
            AnalysisStage::Synthesizing => "generating final recommendations",
            AnalysisStage::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,
    pub label: String,
    pub percent: u8,
}

impl From<AnalysisStage> for ProgressUpdate {
    fn from(stage: AnalysisStage) -> Self {
        Self {
            stage,
            label: stage.label().to_string(),
            percent: stage.percent(),
        }
    }
}

/// Receives progress updates from one orchestration run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Forwards updates into a channel; a dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelProgress(pub UnboundedSender<ProgressUpdate>);

impl ProgressReporter for ChannelProgress {
    fn report(&self, update: ProgressUpdate) {
        let _ = self.0.send(update);
    }
}
