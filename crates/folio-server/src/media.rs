//! Media uploads into the bucket

use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use folio_core::{ContentType, accepts_mime, upload_path};
use serde_json::json;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::require_admin;
use crate::protocol::ApiError;
use crate::server::AppState;

struct UploadedFile {
    name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
}

fn upload_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_string()
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// POST /api/admin/media - multipart form with a `type` field and a `file` part
pub(crate) async fn api_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;
    if state.read_only {
        return Err(ApiError::read_only());
    }

    let mut content_type: Option<ContentType> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("type") => {
                content_type = Some(field.text().await?.parse()?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime = field.content_type().map(String::from);
                let bytes = field.bytes().await?.to_vec();
                file = Some(UploadedFile {
                    name: file_name,
                    mime,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let content_type = content_type.ok_or_else(|| {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Missing 'type' field")
    })?;
    let file = file
        .ok_or_else(|| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Missing 'file' part"))?;

    let mime = file.mime.as_deref().unwrap_or("application/octet-stream");
    if !accepts_mime(content_type, mime) {
        return Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("{} uploads do not accept {}", content_type, mime),
        ));
    }

    let path = upload_path(content_type, &file.name, now_millis(), &upload_token());
    state.media.upload(&path, &file.bytes).await?;
    let url = state.media.public_url(&path);

    info!("Uploaded {} ({} bytes)", path, file.bytes.len());
    Ok((StatusCode::CREATED, Json(json!({ "path": path, "url": url }))).into_response())
}
