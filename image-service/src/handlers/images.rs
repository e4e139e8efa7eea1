use crate::dtos::UploadResponse;
use crate::models::ImageName;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    let name = ImageName::parse(&filename).map_err(|e| {
        tracing::warn!(filename = %filename, "Rejected upload filename: {}", e);
        AppError::BadRequest(anyhow::Error::new(e))
    })?;

    state.storage.save(&name, &data).await.map_err(|e| {
        tracing::error!("Failed to store image {}: {}", name, e);
        e
    })?;

    // Counted only once the file is in place.
    state.upload_counter.increment(1);

    tracing::info!(filename = %name, size = data.len(), "Image uploaded");

    Ok(Json(UploadResponse::uploaded(name.as_str())))
}

/// Reads the first `file` field, skipping any other form fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Uploaded file has no filename")))?
            .to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok((filename, data));
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(anyhow::anyhow!("{}", err.body_text()))
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read multipart body: {}",
            err.body_text()
        ))
    }
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, AppError> {
    let name = ImageName::parse(&filename)
        .map_err(|_| AppError::NotFound(anyhow::anyhow!("Image not found")))?;

    // Content type, conditional and range requests, and the 404 for a
    // missing file all come from ServeFile.
    let response = match ServeFile::new(state.storage.path_for(&name))
        .oneshot(request)
        .await
    {
        Ok(response) => response,
        Err(never) => match never {},
    };

    Ok(response.into_response())
}
