//! # codesage-api
//!
//! HTTP backend for CodeSage: upload a PDF, get exam questions back.
//!

mod api;
pub mod config;
pub mod upload;

pub use api::{
    app, health_check, home, upload_pdf, AppError, AppState, ErrorResponse, MessageResponse,
    UploadResponse, DEFAULT_MAX_UPLOAD_BYTES,
};
pub use config::ServiceConfig;
