// src/api/handlers.rs

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::infra::errors::StudioError;
use crate::studio::report::report_file_name;
use crate::studio::types::{MAX_CREATIVITY, MAX_ITERATIONS, MIN_CREATIVITY, MIN_ITERATIONS};
use crate::studio::StudioParams;

type ApiError = (StatusCode, Json<ErrorResponse>);

const PAGE: &str = include_str!("page.html");

/// Map a pipeline error to the status and body the page shows.
pub fn error_response(err: &StudioError) -> ApiError {
    let status = match err {
        StudioError::Validation(_) => StatusCode::BAD_REQUEST,
        StudioError::Auth { .. } => StatusCode::UNAUTHORIZED,
        StudioError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        StudioError::Transport { .. } | StudioError::Provider { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: err.kind().to_string(),
            hint: err.hint().map(str::to_string),
        }),
    )
}

fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
            kind: "not_found".into(),
            hint: Some("Run the studio first.".into()),
        }),
    )
}

/// GET / — The single-page UI.
pub async fn index() -> Html<&'static str> {
    Html(PAGE)
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/v1/models — Model selector entries and control bounds.
pub async fn list_models(State(state): State<ApiState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.catalog.models().to_vec(),
        default_model: state.catalog.default_model().map(|m| m.id.clone()),
        creativity: Bounds {
            min: MIN_CREATIVITY,
            max: MAX_CREATIVITY,
            default: state.defaults.creativity,
        },
        iterations: Bounds {
            min: MIN_ITERATIONS,
            max: MAX_ITERATIONS,
            default: state.defaults.iterations,
        },
    })
}

/// POST /api/v1/runs — Run the studio and return everything it produced.
///
/// Input is validated before the session is touched. The session lock is
/// held for the whole run, so concurrent requests queue behind it.
pub async fn create_run(
    State(state): State<ApiState>,
    Json(body): Json<RunRequest>,
) -> Result<Json<RunView>, ApiError> {
    let model = body
        .model
        .filter(|m| !m.trim().is_empty())
        .or_else(|| state.catalog.default_model().map(|m| m.id.clone()))
        .unwrap_or_default();
    let params = StudioParams::new(body.idea, model)
        .with_creativity(body.creativity.unwrap_or(state.defaults.creativity))
        .with_iterations(body.iterations.unwrap_or(state.defaults.iterations));

    // Invalid input leaves the previous run and its report in place.
    params.validate().map_err(|e| error_response(&e))?;

    let mut session = state.session.lock().await;
    session.reset();

    match state.studio.run(params).await {
        Ok(run) => {
            let view = RunView::from(&run);
            session.latest = Some(run);
            Ok(Json(view))
        }
        Err(e) => {
            session.last_error = Some(e.to_string());
            Err(error_response(&e))
        }
    }
}

/// GET /api/v1/runs/latest — The last successful run, if the session has one.
pub async fn latest_run(State(state): State<ApiState>) -> Result<Json<RunView>, ApiError> {
    let session = state.session.lock().await;
    match session.latest {
        Some(ref run) => Ok(Json(RunView::from(run))),
        None => Err(not_found("No run yet")),
    }
}

/// GET /api/v1/report — Download the last run's report as a text file.
pub async fn download_report(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let run = session
        .latest
        .as_ref()
        .ok_or_else(|| not_found("No report available"))?;

    let file_name = report_file_name(&run.started_at.with_timezone(&chrono::Local));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        run.report.clone(),
    )
        .into_response())
}
