use crate::upload::TempUpload;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Json, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use codesage::{
    ExtractionError, GenerationError, PdfTextExtractor, QuestionGenerator, TextExtractor,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Default cap on the request body, large enough for scanned lecture notes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Liveness message returned by `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful result of `POST /upload_pdf`
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Raw model output with the generated questions and answers
    pub questions: String,
    /// Filename exactly as sent by the client
    pub filename: String,
}

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub detail: String,
}

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn TextExtractor>,
    pub generator: QuestionGenerator,
    pub temp_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(generator: QuestionGenerator, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            extractor: Arc::new(PdfTextExtractor::new()),
            generator,
            temp_dir: temp_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Application-specific error types for the API
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file provided in upload")]
    MissingFile,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Failed to read upload: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile | AppError::EmptyFile => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Io(_) | AppError::Extraction(_) | AppError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Generation(GenerationError::Timeout(_)) => StatusCode::REQUEST_TIMEOUT,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!("Request failed with {}: {}", status, detail);
        } else {
            info!("Request rejected with {}: {}", status, detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Build the application router with all routes configured
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/upload_pdf", post(upload_pdf))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness check
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "CodeSage backend is running successfully!".to_string(),
    })
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "CodeSage API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Store the uploaded PDF, extract its text and ask the model for questions.
///
/// The temporary copy is gone by the time this returns, whatever the outcome.
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut field = loop {
        match multipart.next_field().await? {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => return Err(AppError::MissingFile),
        }
    };

    // A `file` part without a filename is a plain form value, not an upload.
    let filename = field
        .file_name()
        .filter(|name| !name.trim().is_empty())
        .ok_or(AppError::MissingFile)?
        .to_string();
    let mut upload = TempUpload::create(&state.temp_dir, &filename).await?;

    while let Some(chunk) = field.chunk().await? {
        upload.write_chunk(&chunk).await?;
    }
    upload.finish().await?;

    if upload.is_empty() {
        return Err(AppError::EmptyFile);
    }

    info!("Received {} ({} bytes)", filename, upload.len());

    let extractor = Arc::clone(&state.extractor);
    let path = upload.path().to_path_buf();
    let text = tokio::task::spawn_blocking(move || extractor.extract_text(&path)).await??;

    info!("Extracted {} chars from {}", text.len(), filename);

    let questions = state.generator.generate(&text).await?;
    upload.close();

    info!("Generated questions for {}", filename);

    Ok(Json(UploadResponse {
        questions,
        filename,
    }))
}
