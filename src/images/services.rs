use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::StorageClient;

pub struct UploadItem {
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: Bytes,
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Extension of the client file name, else derived from the MIME type.
fn extension(item: &UploadItem) -> String {
    item.file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .or_else(|| ext_from_mime(&item.content_type).map(str::to_string))
        .unwrap_or_else(|| "bin".into())
}

/// `public/uploads/<uuid>_<unix-seconds>.<ext>`
pub fn object_key(item: &UploadItem, now: OffsetDateTime) -> String {
    format!(
        "public/uploads/{}_{}.{}",
        Uuid::new_v4(),
        now.unix_timestamp(),
        extension(item)
    )
}

pub async fn upload_image(storage: &dyn StorageClient, item: UploadItem) -> anyhow::Result<String> {
    let key = object_key(&item, OffsetDateTime::now_utc());
    storage
        .upload(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("upload {key}"))
}
