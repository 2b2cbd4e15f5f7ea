//! S3-backed image store
//!
//! The upload routes hand raw image bytes to this module, which applies the
//! folder's transform, re-encodes as JPEG, uploads to the bucket, and
//! returns the public URL that gets persisted on the record. Nothing is
//! persisted by the caller unless the upload here succeeds.

use anyhow::Result;
use aws_sdk_s3::{Client, primitives::ByteStream};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::env;
use std::io::Cursor;
use tracing::info;
use uuid::Uuid;

/// Folder for artwork uploads
pub const ARTWORK_FOLDER: &str = "artworks";
/// Folder for profile pictures
pub const PROFILE_FOLDER: &str = "profiles";

/// Artworks are downscaled to this width, never upscaled
pub const ARTWORK_MAX_WIDTH: u32 = 1200;
/// Profile pictures are cover-cropped to this square
pub const PROFILE_SQUARE: u32 = 400;

/// Image store configuration
#[derive(Debug, Clone)]
pub struct ImageStoreConfig {
    /// Target S3 bucket
    pub bucket: String,
    /// Base URL under which stored keys are publicly addressable
    pub public_base_url: String,
}

impl ImageStoreConfig {
    /// Create a new ImageStoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `IMAGE_BUCKET_NAME`: S3 bucket for uploads (default: "atelier-images")
    /// - `IMAGE_PUBLIC_BASE_URL`: public base URL (default: the bucket's
    ///   s3.amazonaws.com endpoint)
    pub fn from_env() -> Result<Self> {
        let bucket =
            env::var("IMAGE_BUCKET_NAME").unwrap_or_else(|_| "atelier-images".to_string());

        let public_base_url = env::var("IMAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));

        Ok(Self {
            bucket,
            public_base_url,
        })
    }
}

/// Geometry applied to an upload before storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransform {
    /// Constrain width, preserve aspect ratio, never upscale
    FitWidth(u32),
    /// Center-crop to a square of the given side
    CoverSquare(u32),
}

/// Apply a transform to a decoded image
pub fn apply_transform(img: DynamicImage, transform: ImageTransform) -> DynamicImage {
    match transform {
        ImageTransform::FitWidth(max_width) if img.width() > max_width => {
            img.resize(max_width, u32::MAX, FilterType::Lanczos3)
        }
        ImageTransform::FitWidth(_) => img,
        ImageTransform::CoverSquare(side) => img.resize_to_fill(side, side, FilterType::Lanczos3),
    }
}

/// Re-encode as JPEG; alpha channels are flattened first since the JPEG
/// encoder rejects them
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| anyhow::anyhow!("Failed to encode image: {}", e))?;
    Ok(buf.into_inner())
}

/// S3 image store handle, constructed once and carried in the app state
#[derive(Clone)]
pub struct ImageStore {
    s3_client: Client,
    bucket: String,
    public_base_url: String,
}

impl ImageStore {
    pub fn new(s3_client: Client, config: ImageStoreConfig) -> Self {
        Self {
            s3_client,
            bucket: config.bucket,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Transform and upload an image, returning its public URL
    pub async fn store(
        &self,
        folder: &str,
        data: &[u8],
        transform: ImageTransform,
    ) -> Result<String> {
        let img = image::load_from_memory(data)
            .map_err(|e| anyhow::anyhow!("Failed to decode uploaded image: {}", e))?;

        let img = apply_transform(img, transform);
        let jpeg = encode_jpeg(&img)?;

        let key = format!("{}/{}.jpg", folder, Uuid::new_v4());
        info!("Uploading image to s3://{}/{}", self.bucket, key);

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(jpeg))
            .content_type("image/jpeg")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to upload image to S3: {}", e))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn config_derives_the_public_url_from_the_bucket() {
        unsafe {
            std::env::remove_var("IMAGE_BUCKET_NAME");
            std::env::remove_var("IMAGE_PUBLIC_BASE_URL");
        }

        let config = ImageStoreConfig::from_env().unwrap();
        assert_eq!(config.bucket, "atelier-images");
        assert_eq!(
            config.public_base_url,
            "https://atelier-images.s3.amazonaws.com"
        );
    }

    #[test]
    #[serial]
    fn config_honors_an_explicit_public_base_url() {
        unsafe {
            std::env::set_var("IMAGE_BUCKET_NAME", "gallery-media");
            std::env::set_var("IMAGE_PUBLIC_BASE_URL", "https://cdn.example.com/");
        }

        let config = ImageStoreConfig::from_env().unwrap();
        assert_eq!(config.bucket, "gallery-media");
        assert_eq!(config.public_base_url, "https://cdn.example.com/");

        unsafe {
            std::env::remove_var("IMAGE_BUCKET_NAME");
            std::env::remove_var("IMAGE_PUBLIC_BASE_URL");
        }
    }

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
    }

    #[test]
    fn wide_artworks_are_downscaled_to_the_width_cap() {
        let resized = apply_transform(blank(2400, 1200), ImageTransform::FitWidth(1200));
        assert_eq!((resized.width(), resized.height()), (1200, 600));
    }

    #[test]
    fn small_artworks_are_never_upscaled() {
        let resized = apply_transform(blank(800, 400), ImageTransform::FitWidth(1200));
        assert_eq!((resized.width(), resized.height()), (800, 400));
    }

    #[test]
    fn profile_pictures_are_cropped_to_a_square() {
        let resized = apply_transform(blank(1600, 900), ImageTransform::CoverSquare(400));
        assert_eq!((resized.width(), resized.height()), (400, 400));
    }

    #[test]
    fn encoded_output_is_valid_jpeg() {
        let jpeg = encode_jpeg(&blank(32, 32)).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn alpha_uploads_are_flattened_before_encoding() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::new(16, 16));
        assert!(encode_jpeg(&rgba).is_ok());
    }
}
