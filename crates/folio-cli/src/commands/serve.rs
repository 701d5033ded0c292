use std::sync::Arc;

use anyhow::Result;
use folio_config::Config;
use folio_server::FolioServer;
use folio_storage::{BlobStore, Storage};

pub async fn handle(
    storage: Arc<Storage>,
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    read_only: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let read_only = read_only || config.server.read_only;

    let media_root = config.media_root();
    let blobs = BlobStore::new(
        media_root.clone(),
        &config.storage.bucket,
        &config.server.public_url,
    )?;

    let server = FolioServer::new(storage.clone(), storage, Arc::new(blobs), media_root)
        .with_read_only(read_only)
        .with_max_upload_bytes(config.server.max_upload_bytes);

    println!("Starting folio on {}:{}", host, port);
    if read_only {
        println!("  Read-only: admin writes are rejected");
    }
    server.serve(&host, port).await
}
