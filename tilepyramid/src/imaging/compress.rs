//! Lossy tile compression.
//!
//! Every finished tile passes through a [`TileCompressor`] before it is
//! written. The default [`PosterizeCompressor`] reduces each color channel to
//! a fixed number of levels (a palette reduction that shrinks PNG output
//! considerably) and re-encodes with maximum deflate effort.

use crate::error::{PyramidError, PyramidResult};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default significant bits kept per color channel.
pub const DEFAULT_POSTERIZE_BITS: u8 = 6;

/// Size-reduction pass applied to encoded tile bytes.
///
/// Implementations must tolerate their own output as input: running the
/// compressor twice must not corrupt the image.
pub trait TileCompressor: Send + Sync {
    /// Compress an encoded image, returning the new encoded bytes.
    fn compress(&self, data: &[u8]) -> PyramidResult<Vec<u8>>;

    /// Human-readable compressor name for logs.
    fn name(&self) -> &str;
}

impl<T: TileCompressor + ?Sized> TileCompressor for Arc<T> {
    fn compress(&self, data: &[u8]) -> PyramidResult<Vec<u8>> {
        (**self).compress(data)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Writes tiles unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompressor;

impl TileCompressor for PassthroughCompressor {
    fn compress(&self, data: &[u8]) -> PyramidResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Posterizes RGB channels to `2^bits` levels and re-encodes as PNG.
///
/// Alpha is left exact so transparent quadrants stay transparent.
/// Levels are spread over the full 0–255 range, so pure black and white
/// survive, and quantizing an already-quantized image is a no-op.
#[derive(Debug, Clone)]
pub struct PosterizeCompressor {
    bits: u8,
    lookup: [u8; 256],
}

impl PosterizeCompressor {
    /// Create a compressor keeping `bits` significant bits per channel.
    ///
    /// # Errors
    ///
    /// Returns `PyramidError::Config` unless `1 <= bits <= 8`.
    pub fn new(bits: u8) -> PyramidResult<Self> {
        if !(1..=8).contains(&bits) {
            return Err(PyramidError::Config(format!(
                "posterize bits must be between 1 and 8, got {}",
                bits
            )));
        }
        Ok(Self {
            bits,
            lookup: build_lookup(bits),
        })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    fn posterize(&self, image: &mut RgbaImage) {
        for pixel in image.pixels_mut() {
            for channel in pixel.0.iter_mut().take(3) {
                *channel = self.lookup[*channel as usize];
            }
        }
    }
}

impl Default for PosterizeCompressor {
    fn default() -> Self {
        Self {
            bits: DEFAULT_POSTERIZE_BITS,
            lookup: build_lookup(DEFAULT_POSTERIZE_BITS),
        }
    }
}

fn build_lookup(bits: u8) -> [u8; 256] {
    let levels = (1u32 << bits) - 1;
    let mut lookup = [0u8; 256];
    if levels == 0 {
        return lookup;
    }
    for (value, slot) in lookup.iter_mut().enumerate() {
        let level = (value as u32 * levels + 127) / 255;
        *slot = ((level * 255 + levels / 2) / levels) as u8;
    }
    lookup
}

impl TileCompressor for PosterizeCompressor {
    fn compress(&self, data: &[u8]) -> PyramidResult<Vec<u8>> {
        let mut image = image::load_from_memory(data)
            .map_err(PyramidError::decode_buffer)?
            .to_rgba8();
        self.posterize(&mut image);
        encode_png_best(&image)
    }

    fn name(&self) -> &str {
        "posterize"
    }
}

/// Encode with maximum deflate effort and adaptive filtering.
fn encode_png_best(image: &RgbaImage) -> PyramidResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| PyramidError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Which compressor a build uses, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionKind {
    /// Write tiles as produced
    None,
    /// Posterize color channels and re-encode
    #[default]
    Posterize,
}

impl CompressionKind {
    /// Build the compressor for this kind.
    pub fn build(self, posterize_bits: u8) -> PyramidResult<Arc<dyn TileCompressor>> {
        Ok(match self {
            CompressionKind::None => Arc::new(PassthroughCompressor),
            CompressionKind::Posterize => Arc::new(PosterizeCompressor::new(posterize_bits)?),
        })
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionKind::None => write!(f, "none"),
            CompressionKind::Posterize => write!(f, "posterize"),
        }
    }
}

impl FromStr for CompressionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CompressionKind::None),
            "posterize" => Ok(CompressionKind::Posterize),
            other => Err(format!(
                "unknown compression '{}', expected one of: none, posterize",
                other
            )),
        }
    }
}
