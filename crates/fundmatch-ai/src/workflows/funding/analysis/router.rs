use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::AnalysisRequest;
use super::invoker::ModuleInvoker;
use super::progress::NoProgress;
use super::service::ModularAnalysisService;

/// Router exposing the comprehensive analysis endpoint.
pub fn analysis_router<I>(service: Arc<ModularAnalysisService<I>>) -> Router
where
    I: ModuleInvoker + 'static,
{
    Router::new()
        .route("/api/v1/funding/analyses", post(analyze_handler::<I>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<I>(
    State(service): State<Arc<ModularAnalysisService<I>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    I: ModuleInvoker + 'static,
{
    match service.analyze(&request, &NoProgress).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        // `analyze` never cancels; a client disconnect drops this future instead.
        Err(error) => {
            warn!(application_id = %request.application.id.0, %error, "analysis request failed");
            let payload = json!({
                "application_id": request.application.id.0,
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
