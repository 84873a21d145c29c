use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{Multipart, multipart::MultipartRejection};

use crate::{
    AppState,
    auth::AdminSession,
    error::ApiError,
    models::UploadResponse,
    upload::{self, IncomingFile, UploadError},
};

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// UploadForm
///
/// OpenAPI description of the form `POST /upload` reads. The handler streams
/// the multipart body itself and never deserializes into this type.
#[derive(utoipa::ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// upload_image
///
/// [Admin Route] Accepts one image in the `file` field of a multipart form,
/// validates it and stores it under a generated name.
///
/// The route's body limit sits above [`upload::MAX_UPLOAD_BYTES`], so an
/// oversized image is read in full and rejected here with a specific message.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing file, wrong type or too large"),
        (status = 401, description = "No admin session"),
        (status = 500, description = "Failed to upload file")
    )
)]
pub async fn upload_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "upload is not a multipart form");
        UploadError::Missing
    })?;

    let file = read_file_field(&mut multipart).await?;
    upload::validate(&file).inspect_err(|reason| {
        tracing::warn!(?reason, content_type = %file.content_type, "upload rejected");
    })?;

    let filename = upload::generate_filename(file.original_name.as_deref(), &file.content_type);
    let url = state.storage.put_object(&filename, &file.bytes).await?;

    Ok(Json(UploadResponse { url, filename }))
}

/// Pulls the `file` field out of the form. Other fields are skipped. An empty
/// part (a form submitted with nothing selected) counts as no file.
async fn read_file_field(multipart: &mut Multipart) -> Result<IncomingFile, UploadError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(UploadError::Missing),
            Err(e) => return Err(read_error(e.status(), &e.body_text())),
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| read_error(e.status(), &e.body_text()))?;

        if bytes.is_empty() {
            return Err(UploadError::Missing);
        }

        return Ok(IncomingFile {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
}

fn read_error(status: StatusCode, detail: &str) -> UploadError {
    tracing::debug!(%status, detail, "multipart read failed");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge(upload::MAX_UPLOAD_BYTES + 1)
    } else {
        UploadError::Missing
    }
}
