//! Decoded heightmap images

use std::path::Path;

use image::RgbaImage;
use tracing::info;

use crate::error::{Result, TerrainError};

/// A decoded heightmap: dimensions plus a row-major RGBA byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightmapImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl HeightmapImage {
    /// Wrap an already decoded buffer
    ///
    /// The buffer length is not checked here; the sampler rejects buffers
    /// shorter than `4 * width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert an `image` crate RGBA buffer
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Decode a heightmap from disk, converting any pixel format to RGBA8
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(TerrainError::Decode)?;
        let image = Self::from_rgba(decoded.to_rgba8());
        info!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "Decoded heightmap"
        );
        Ok(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, four per pixel
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
