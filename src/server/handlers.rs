// file: src/server/handlers.rs
// description: axum handlers for login, report generation and administration
// reference: https://docs.rs/axum/0.7/axum/extract/index.html

use crate::models::{Role, UploadLogRecord};
use crate::report::REPORT_FILE_NAME;
use crate::server::error::ApiError;
use crate::server::pages;
use crate::server::state::{AppState, expired_session_cookie, session_cookie, session_token};
use crate::session::{AuthGateway, SessionContext, View};
use crate::utils::{HealthCheck, HealthReport, HealthStatus, Validator};
use axum::Json;
use axum::extract::{Form, Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Run a database or spreadsheet operation off the async workers.
async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {e}")))?
        .map_err(ApiError::from)
}

async fn upload_history(
    state: &AppState,
    session: &SessionContext,
) -> Result<Vec<UploadLogRecord>, ApiError> {
    let pipeline = state.pipeline.clone();
    let session = session.clone();
    blocking(move || pipeline.history(&session)).await
}

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let session = state.session(&headers);

    let page = match (session.view(), session.context()) {
        (View::Admin, Some(ctx)) => {
            let logs = upload_history(&state, ctx).await?;
            pages::dashboard_page(ctx, Some(logs.as_slice()), None)
        }
        (View::Faculty, Some(ctx)) => pages::dashboard_page(ctx, None, None),
        _ => pages::login_page(None),
    };

    Ok(Html(page))
}

pub async fn health(State(state): State<AppState>) -> Response {
    let db = state.database().clone();
    let report = tokio::task::spawn_blocking(move || {
        HealthReport::new(
            vec![HealthCheck::database(&db)],
            env!("CARGO_PKG_VERSION").to_string(),
        )
    })
    .await;

    match report {
        Ok(report) => {
            let status = if report.overall_status == HealthStatus::Unhealthy {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::OK
            };
            (status, Json(report)).into_response()
        }
        Err(e) => ApiError::Internal(format!("health check failed: {e}")).into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, ApiError> {
    let db = state.database().clone();
    let result = blocking(move || {
        AuthGateway::new(&db).login(&credentials.username, &credentials.password)
    })
    .await;

    match result {
        Ok(ctx) => {
            let token = state.sessions.issue(ctx);
            Ok(([(SET_COOKIE, session_cookie(&token))], Redirect::to("/")).into_response())
        }
        Err(ApiError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some("Invalid credentials"))),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers)
        && state.sessions.revoke(&token)
    {
        info!("Session closed");
    }

    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/")).into_response()
}

async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        Validator::validate_csv_extension(Path::new(&filename))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::BadRequest("No file provided.".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    warn!("Failed to read upload: {err}");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest("Failed to read file data.".to_string())
    }
}

pub async fn download_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = state.require_session(&headers)?;
    let (filename, content) = read_upload(multipart).await?;

    let pipeline = state.pipeline.clone();
    let processed = blocking(move || pipeline.process(&session, &filename, &content)).await?;
    let xlsx = processed
        .xlsx
        .ok_or_else(|| ApiError::Internal("report was not rendered".to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        xlsx,
    )
        .into_response())
}

pub async fn preview_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = state.require_session(&headers)?;
    let (filename, content) = read_upload(multipart).await?;

    let pipeline = state.pipeline.clone();
    let processed = blocking(move || pipeline.preview(&session, &filename, &content)).await?;

    Ok(Json(processed.table).into_response())
}

pub async fn add_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<Credentials>,
) -> Result<Response, ApiError> {
    let session = state.require_admin(&headers)?;

    let db = state.database().clone();
    let actor = session.clone();
    let result = blocking(move || {
        AuthGateway::new(&db).add_user(&actor, &form.username, &form.password, Role::Faculty)
    })
    .await;

    // Rejected input is shown on the admin form rather than as a JSON error.
    let (status, message) = match result {
        Ok(created) => {
            if !created {
                info!("Add user request ignored, username already exists");
            }
            (StatusCode::OK, "User added.".to_string())
        }
        Err(ApiError::BadRequest(message)) => (StatusCode::BAD_REQUEST, message),
        Err(e) => return Err(e),
    };

    let logs = upload_history(&state, &session).await?;
    let page = pages::dashboard_page(&session, Some(logs.as_slice()), Some(message.as_str()));
    Ok((status, Html(page)).into_response())
}

pub async fn upload_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UploadLogRecord>>, ApiError> {
    let session = state.require_admin(&headers)?;
    Ok(Json(upload_history(&state, &session).await?))
}
