use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::domain::AnalysisMode;
use super::results::ModeTagged;

/// Hosted analysis functions the orchestrator can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCapability {
    AnalyzeFinancials,
    AnalyzeMarketPosition,
    AnalyzeManagement,
    AnalyzeRiskProfile,
}

impl RemoteCapability {
    pub const fn function_name(self) -> &'static str {
        match self {
            RemoteCapability::AnalyzeFinancials => "analyze-financials",
            RemoteCapability::AnalyzeMarketPosition => "analyze-market-position",
            RemoteCapability::AnalyzeManagement => "analyze-management",
            RemoteCapability::AnalyzeRiskProfile => "analyze-risk-profile",
        }
    }
}

/// Any way a remote module call can fail. The orchestrator treats all of them the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("function returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Boundary to the remote analysis capabilities.
#[async_trait]
pub trait ModuleInvoker: Send + Sync {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        payload: Value,
    ) -> Result<Value, InvokeError>;
}

/// Unwraps the `{"analysis": ...}` envelope and checks the result matches the requested mode.
pub(crate) fn decode_envelope<T>(response: Value, mode: AnalysisMode) -> Result<T, InvokeError>
where
    T: DeserializeOwned + ModeTagged,
{
    let analysis = match response {
        Value::Object(mut fields) => fields
            .remove("analysis")
            .ok_or_else(|| InvokeError::Malformed("response has no `analysis` field".to_string()))?,
        other => {
            return Err(InvokeError::Malformed(format!(
                "expected an object, received {other}"
            )))
        }
    };

    let result: T = serde_json::from_value(analysis)
        .map_err(|err| InvokeError::Malformed(err.to_string()))?;

    if result.mode() != mode {
        return Err(InvokeError::Malformed(format!(
            "expected a {mode} result, received {}",
            result.mode()
        )));
    }

    Ok(result)
}

/// Calls hosted functions at `{base_url}/functions/v1/{name}`.
#[derive(Debug, Clone)]
pub struct HttpModuleInvoker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpModuleInvoker {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, InvokeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fundmatch-ai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InvokeError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self, capability: RemoteCapability) -> String {
        format!("{}/functions/v1/{}", self.base_url, capability.function_name())
    }
}

#[async_trait]
impl ModuleInvoker for HttpModuleInvoker {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        payload: Value,
    ) -> Result<Value, InvokeError> {
        let mut request = self.client.post(self.endpoint(capability)).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| InvokeError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| InvokeError::Malformed(err.to_string()))
    }
}

/// Invoker used when no functions endpoint is configured; every module runs on its fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModuleInvoker;

#[async_trait]
impl ModuleInvoker for OfflineModuleInvoker {
    async fn invoke(
        &self,
        capability: RemoteCapability,
        _payload: Value,
    ) -> Result<Value, InvokeError> {
        Err(InvokeError::Transport(format!(
            "remote analysis disabled, {} not called",
            capability.function_name()
        )))
    }
}
