use crate::models::ImageData;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("no such file: {0}")]
    NotFound(String),
    #[error("could not read image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes an image as PNG and returns it base64-encoded.
pub fn encode_png(image: &DynamicImage) -> Result<ImageData, AttachmentError> {
    let mut bytes: Vec<u8> = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(ImageData::new(BASE64_STANDARD.encode(&bytes)))
}

/// Loads a PNG, JPEG or WebP file and re-encodes it as PNG so every attached
/// image carries the same MIME type.
pub fn load_image_file(path: &Path) -> Result<ImageData, AttachmentError> {
    if !path.is_file() {
        return Err(AttachmentError::NotFound(path.display().to_string()));
    }
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    log::info!(
        "Loaded attachment {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    encode_png(&image)
}

/// Expands a leading `~` and strips surrounding quotes from a typed path.
pub fn resolve_path(input: &str) -> std::path::PathBuf {
    let trimmed = input.trim().trim_matches(|c| c == '"' || c == '\'');
    if let Some(rest) = trimmed.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return Path::new(&home).join(rest);
    }
    std::path::PathBuf::from(trimmed)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn decode(data: &ImageData) -> DynamicImage {
        let bytes = BASE64_STANDARD.decode(&data.base64).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_jpeg_is_reencoded_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work.jpg");
        RgbImage::from_pixel(8, 6, Rgb([200, 10, 10]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        let data = load_image_file(&path).unwrap();
        let decoded = decode(&data);
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 6);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AttachmentError::NotFound(_)));
    }

    #[test]
    fn test_non_image_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"2x + 3 = 7").unwrap();
        assert!(load_image_file(&path).is_err());
    }

    #[test]
    fn test_resolve_path_strips_quotes() {
        assert_eq!(
            resolve_path("  '/tmp/my work.png' "),
            std::path::PathBuf::from("/tmp/my work.png")
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/tmp/homework.png")), "homework.png");
    }
}
