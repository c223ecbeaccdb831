use async_trait::async_trait;
use fundmatch_ai::config::AnalysisConfig;
use fundmatch_ai::error::AppError;
use fundmatch_ai::workflows::funding::analysis::{
    AnalysisMode, AnalysisRequest, AnalysisSettings, HttpModuleInvoker, InvokeError,
    ModularAnalysisService, ModuleInvoker, OfflineModuleInvoker, RemoteCapability,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Invoker selected from configuration: hosted functions when a URL is set, fallbacks otherwise.
#[derive(Debug, Clone)]
pub(crate) enum ConfiguredInvoker {
    Http(HttpModuleInvoker),
    Offline(OfflineModuleInvoker),
}

impl ConfiguredInvoker {
    pub(crate) fn from_config(config: &AnalysisConfig, offline: bool) -> Result<Self, AppError> {
        match (&config.functions_url, offline) {
            (Some(url), false) => {
                info!(functions_url = %url, "remote analysis functions enabled");
                let invoker = HttpModuleInvoker::new(url.clone(), config.functions_key.clone())?;
                Ok(Self::Http(invoker))
            }
            (Some(_), true) => {
                info!("offline mode requested, remote analysis functions disabled");
                Ok(Self::Offline(OfflineModuleInvoker))
            }
            (None, _) => {
                warn!("ANALYSIS_FUNCTIONS_URL not set, every module will use fallback estimates");
                Ok(Self::Offline(OfflineModuleInvoker))
            }
        }
    }
}

#[async_trait]
impl ModuleInvoker for ConfiguredInvoker {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        payload: Value,
    ) -> Result<Value, InvokeError> {
        match self {
            ConfiguredInvoker::Http(invoker) => invoker.invoke(capability, payload).await,
            ConfiguredInvoker::Offline(invoker) => invoker.invoke(capability, payload).await,
        }
    }
}

pub(crate) fn analysis_service(
    config: &AnalysisConfig,
    offline: bool,
) -> Result<Arc<ModularAnalysisService<ConfiguredInvoker>>, AppError> {
    let invoker = Arc::new(ConfiguredInvoker::from_config(config, offline)?);
    Ok(Arc::new(ModularAnalysisService::new(
        invoker,
        AnalysisSettings::from(config),
    )))
}

pub(crate) fn parse_mode(raw: &str) -> Result<AnalysisMode, String> {
    raw.parse()
}

pub(crate) fn load_request(path: &Path) -> Result<AnalysisRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
