//! [`ImageOps`] backed by the `image` crate.

use super::ops::{ImageMetadata, ImageOps, Placement};
use crate::error::{PyramidError, PyramidResult};
use image::imageops::{self, FilterType};
use image::{ImageDecoder, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Production image backend using pure-Rust codecs.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateOps {
    filter: FilterType,
}

impl ImageCrateOps {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl Default for ImageCrateOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageOps for ImageCrateOps {
    fn decode_metadata(&self, path: &Path) -> PyramidResult<ImageMetadata> {
        // Header only; pixel data is not decoded
        let decoder = open_reader(path)?
            .into_decoder()
            .map_err(|e| PyramidError::decode(path, e))?;
        let (width, height) = decoder.dimensions();
        Ok(ImageMetadata {
            width,
            height,
            channels: decoder.color_type().channel_count(),
        })
    }

    fn load(&self, path: &Path) -> PyramidResult<RgbaImage> {
        let img = open_reader(path)?
            .decode()
            .map_err(|e| PyramidError::decode(path, e))?;
        Ok(img.to_rgba8())
    }

    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        imageops::resize(image, width, height, self.filter)
    }

    fn composite_on_transparent_canvas(
        &self,
        width: u32,
        height: u32,
        placements: &[Placement],
    ) -> RgbaImage {
        // RgbaImage::new zero-fills, which is fully transparent black
        let mut canvas = RgbaImage::new(width, height);
        for placement in placements {
            imageops::overlay(
                &mut canvas,
                &placement.image,
                placement.left as i64,
                placement.top as i64,
            );
        }
        canvas
    }

    fn encode_png(&self, image: &RgbaImage) -> PyramidResult<Vec<u8>> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| PyramidError::Encode(e.to_string()))?;
        Ok(buffer)
    }

    fn name(&self) -> &str {
        "image-rs"
    }
}

/// Open an image, choosing the decoder from the file content rather than
/// its extension.
fn open_reader(path: &Path) -> PyramidResult<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PyramidError::io(path, e))
}
