use async_trait::async_trait;
use bytes::Bytes;

use super::{ImageSource, Outcome, Permission};
use crate::models::ProfileImage;

const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Image delivered in an upload request. A request without a file part is
/// treated as the user backing out of the picker.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Option<Bytes>,
    pub declared_type: Option<String>,
    pub uploads_enabled: bool,
    pub max_bytes: usize,
}

impl UploadedImage {
    pub fn resolve_type(&self, bytes: &[u8]) -> Option<&'static str> {
        let sniffed = sniff_image_type(bytes);
        match self.declared_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() && declared != "application/octet-stream" => {
                let declared = declared.to_ascii_lowercase();
                let declared = if declared == "image/jpg" {
                    "image/jpeg".to_string()
                } else {
                    declared
                };
                ACCEPTED_TYPES
                    .iter()
                    .copied()
                    .find(|t| *t == declared)
                    .filter(|t| sniffed.map_or(true, |s| s == *t))
            }
            _ => sniffed,
        }
    }
}

/// Identifies JPEG, PNG and WebP by their magic bytes.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[async_trait]
impl ImageSource for UploadedImage {
    async fn request_permission(&self) -> Permission {
        if self.uploads_enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn acquire(&self) -> Outcome<ProfileImage> {
        let Some(bytes) = self.bytes.as_ref() else {
            return Outcome::Cancelled;
        };
        if bytes.is_empty() {
            return Outcome::Failed("the uploaded file is empty".to_string());
        }
        if bytes.len() > self.max_bytes {
            return Outcome::Failed(format!(
                "the image is {} bytes, the limit is {}",
                bytes.len(),
                self.max_bytes
            ));
        }
        match self.resolve_type(bytes) {
            Some(mime) => Outcome::Success(ProfileImage::new(mime, bytes.to_vec())),
            None => Outcome::Failed("only JPEG, PNG and WebP images are supported".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    fn upload(bytes: Option<&[u8]>, declared: Option<&str>) -> UploadedImage {
        UploadedImage {
            bytes: bytes.map(Bytes::copy_from_slice),
            declared_type: declared.map(str::to_string),
            uploads_enabled: true,
            max_bytes: 64,
        }
    }

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(sniff_image_type(PNG), Some("image/png"));
        assert_eq!(sniff_image_type(JPEG), Some("image/jpeg"));
        assert_eq!(sniff_image_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_type(b"GIF89a"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_cancelled() {
        assert_eq!(upload(None, None).acquire().await, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn test_png_accepted_without_declared_type() {
        match upload(Some(PNG), None).acquire().await {
            Outcome::Success(image) => {
                assert_eq!(image.mime_type, "image/png");
                assert_eq!(image.len(), PNG.len());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_declared_type_must_match_content() {
        let outcome = upload(Some(PNG), Some("image/jpeg")).acquire().await;
        assert!(matches!(outcome, Outcome::Failed(_)));

        let outcome = upload(Some(JPEG), Some("image/jpg")).acquire().await;
        assert!(matches!(outcome, Outcome::Success(_)));
    }

    #[tokio::test]
    async fn test_oversized_and_unsupported_fail() {
        let big = vec![0xFF; 65];
        assert!(matches!(
            upload(Some(big.as_slice()), None).acquire().await,
            Outcome::Failed(_)
        ));
        assert!(matches!(
            upload(Some(&b"GIF89a"[..]), Some("image/gif")).acquire().await,
            Outcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_permission_follows_config() {
        let mut source = upload(Some(PNG), None);
        assert_eq!(source.request_permission().await, Permission::Granted);
        source.uploads_enabled = false;
        assert_eq!(source.request_permission().await, Permission::Denied);
    }
}
