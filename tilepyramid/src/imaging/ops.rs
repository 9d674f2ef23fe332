//! ImageOps trait for the image primitives the pyramid builder needs.
//!
//! The builder never touches an image library directly. Workers call
//! decode, resize, composite and encode through this trait, so the backend
//! can be swapped (or mocked) without changing orchestration.

use crate::error::PyramidResult;
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;

/// Basic facts about an image on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Channel count of the stored image (3 for RGB, 4 for RGBA, ...)
    pub channels: u8,
}

/// One image placed onto a canvas at a pixel offset.
#[derive(Debug, Clone)]
pub struct Placement {
    pub image: RgbaImage,
    /// Offset from the canvas top edge
    pub top: u32,
    /// Offset from the canvas left edge
    pub left: u32,
}

/// Image primitives used by tile workers.
///
/// Implementations must be thread-safe (`Send + Sync`); a single instance is
/// shared by every worker in the pool.
pub trait ImageOps: Send + Sync {
    /// Read dimensions and channel count.
    ///
    /// # Errors
    ///
    /// Returns `PyramidError::Decode` for unreadable or corrupt input.
    fn decode_metadata(&self, path: &Path) -> PyramidResult<ImageMetadata>;

    /// Decode an image into RGBA.
    fn load(&self, path: &Path) -> PyramidResult<RgbaImage>;

    /// Resize to exactly `width` × `height`. Only downscaling is required.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;

    /// Create a fully transparent canvas and overlay each placement in order.
    ///
    /// Later placements win where they overlap earlier ones.
    fn composite_on_transparent_canvas(
        &self,
        width: u32,
        height: u32,
        placements: &[Placement],
    ) -> RgbaImage;

    /// Encode an image as PNG.
    fn encode_png(&self, image: &RgbaImage) -> PyramidResult<Vec<u8>>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}

impl<T: ImageOps + ?Sized> ImageOps for Arc<T> {
    fn decode_metadata(&self, path: &Path) -> PyramidResult<ImageMetadata> {
        (**self).decode_metadata(path)
    }

    fn load(&self, path: &Path) -> PyramidResult<RgbaImage> {
        (**self).load(path)
    }

    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        (**self).resize(image, width, height)
    }

    fn composite_on_transparent_canvas(
        &self,
        width: u32,
        height: u32,
        placements: &[Placement],
    ) -> RgbaImage {
        (**self).composite_on_transparent_canvas(width, height, placements)
    }

    fn encode_png(&self, image: &RgbaImage) -> PyramidResult<Vec<u8>> {
        (**self).encode_png(image)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
