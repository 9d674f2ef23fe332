//! Image operation adapter.
//!
//! Narrow interface between the pyramid workers and the image library:
//!
//! ```text
//! ┌──────────────────────────┐     ┌───────────────────────────┐
//! │        ImageOps          │     │      TileCompressor       │
//! │ decode / resize /        │     │ compress(bytes) -> bytes  │
//! │ composite / encode_png   │     │                           │
//! └────────────┬─────────────┘     └─────────────┬─────────────┘
//!              ▼                                 ▼
//! ┌──────────────────────────┐     ┌───────────────────────────┐
//! │      ImageCrateOps       │     │ PosterizeCompressor       │
//! │      (`image` crate)     │     │ PassthroughCompressor     │
//! └──────────────────────────┘     └───────────────────────────┘
//! ```

mod compress;
mod image_ops;
mod ops;

pub use compress::{
    CompressionKind, PassthroughCompressor, PosterizeCompressor, TileCompressor,
    DEFAULT_POSTERIZE_BITS,
};
pub use image_ops::ImageCrateOps;
pub use ops::{ImageMetadata, ImageOps, Placement};
