use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// One file part pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Reads the form until the file part called `field_name`; other parts are skipped.
pub async fn read_file_field(mp: &mut Multipart, field_name: &str) -> ApiResult<Option<UploadedFile>> {
    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(ApiError::bad_request(e.body_text())),
        };
        if field.name() != Some(field_name) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        return Ok(Some(UploadedFile {
            filename,
            content_type,
            body,
        }));
    }
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "audio/webm" => Some("webm"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "audio/mpeg" => Some("mp3"),
        "audio/ogg" => Some("ogg"),
        "audio/mp4" => Some("m4a"),
        _ => None,
    }
}

impl UploadedFile {
    /// Client-supplied name, or `{stem}.{ext}` guessed from the content type.
    pub fn filename_or(&self, stem: &str) -> String {
        if self.filename.trim().is_empty() {
            format!("{}.{}", stem, ext_from_mime(&self.content_type).unwrap_or("bin"))
        } else {
            self.filename.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("audio/webm"), Some("webm"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn fills_missing_filename() {
        let mut file = UploadedFile {
            filename: String::new(),
            content_type: "audio/webm".into(),
            body: Bytes::from_static(b"x"),
        };
        assert_eq!(file.filename_or("recording"), "recording.webm");
        file.content_type = "text/plain".into();
        assert_eq!(file.filename_or("recording"), "recording.bin");
        file.filename = "clip.ogg".into();
        assert_eq!(file.filename_or("recording"), "clip.ogg");
    }
}
