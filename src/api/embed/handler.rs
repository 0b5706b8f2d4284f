// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed/image and POST /embed/caption HTTP handlers
//!
//! Both handlers hand the blocking pipeline to `spawn_blocking` and map
//! `EmbeddingError` into `ApiError` at this boundary.

use crate::api::embed::{CaptionRequest, EmbedResponse};
use crate::api::{ApiError, AppState};
use crate::pipeline::{embed_image, embed_text};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use tracing::{debug, info};

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "file";

/// POST /embed/image handler
///
/// Embeds one uploaded image with the CLIP vision encoder.
///
/// # Request
/// `multipart/form-data` with a `file` field holding the raw image bytes
/// (PNG, JPEG, WebP, GIF, BMP or TIFF). Other fields are ignored.
///
/// # Response Body
/// ```json
/// {
///   "size": 512,
///   "embedding": [0.0123, -0.0441, ...]
/// }
/// ```
///
/// # Errors
/// - 400: missing `file` field, malformed multipart body, or bytes that
///   are not a decodable image
/// - 413: body larger than the configured upload limit
/// - 500: inference failure or degenerate embedding
pub async fn image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(IMAGE_FIELD) {
            file = Some(field.bytes().await.map_err(multipart_error)?);
            break;
        }
    }

    let bytes = file.ok_or_else(|| ApiError::ValidationError {
        field: IMAGE_FIELD.to_string(),
        message: format!("multipart field '{}' is required", IMAGE_FIELD),
    })?;
    debug!(bytes = bytes.len(), "Received image upload");

    let host = state.model_host.clone();
    let result = tokio::task::spawn_blocking(move || embed_image(&host, &bytes))
        .await
        .map_err(|e| ApiError::InternalError(format!("Embedding task failed: {}", e)))??;

    info!(size = result.size, "Embedded image");
    Ok(Json(result.into()))
}

/// POST /embed/caption handler
///
/// Embeds one caption with the CLIP text encoder.
///
/// # Request Body
/// ```json
/// {
///   "caption": "a dog on the beach"
/// }
/// ```
///
/// # Response Body
/// ```json
/// {
///   "size": 512,
///   "embedding": [0.0321, 0.0107, ...]
/// }
/// ```
///
/// # Errors
/// - 400: malformed JSON, or a caption longer than the context length
/// - 500: inference failure or degenerate embedding
pub async fn caption_handler(
    State(state): State<AppState>,
    payload: Result<Json<CaptionRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!(chars = request.caption.chars().count(), "Received caption");

    let host = state.model_host.clone();
    let result = tokio::task::spawn_blocking(move || embed_text(&host, &request.caption))
        .await
        .map_err(|e| ApiError::InternalError(format!("Embedding task failed: {}", e)))??;

    info!(size = result.size, "Embedded caption");
    Ok(Json(result.into()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::InvalidRequest(err.body_text())
    }
}
