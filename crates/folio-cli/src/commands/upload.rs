use std::path::Path;

use anyhow::{Context, Result, bail};
use folio_config::Config;
use folio_core::{ContentType, MediaStore, accepts_mime, file_extension, upload_path};
use folio_storage::BlobStore;
use time::OffsetDateTime;

/// MIME type from the file extension, enough to gate uploads by content type
fn guess_mime(file_name: &str) -> &'static str {
    match file_extension(file_name).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

pub async fn handle(config: &Config, content_type: &str, file: &Path) -> Result<()> {
    let content_type: ContentType = content_type.parse()?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("Upload path has no file name")?;

    let mime = guess_mime(file_name);
    if !accepts_mime(content_type, mime) {
        bail!("{} uploads do not accept {} ({})", content_type, file_name, mime);
    }

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let blobs = BlobStore::new(
        config.media_root(),
        &config.storage.bucket,
        &config.server.public_url,
    )?;

    let timestamp_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let token = uuid::Uuid::new_v4().simple().to_string()[..6].to_string();
    let path = upload_path(content_type, file_name, timestamp_ms, &token);

    blobs.upload(&path, &bytes).await?;

    println!("✓ Uploaded {} ({} bytes)", path, bytes.len());
    println!("  URL: {}", blobs.public_url(&path));
    Ok(())
}
