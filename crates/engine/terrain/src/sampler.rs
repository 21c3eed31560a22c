//! Heightmap sampling
//!
//! Converts an RGBA pixel buffer into a [`HeightGrid`]. Each cell reads three
//! bytes from the buffer, divides each by [`BYTE_SCALE`] and sums them. Which
//! three bytes are read is a [`SamplingStrategy`]; the observed heightmap
//! variants disagree on the offsets, so all of them are kept selectable.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TerrainError};
use crate::grid::HeightGrid;
use crate::image_source::HeightmapImage;

/// Divisor applied to every sampled byte
pub const BYTE_SCALE: f32 = 128.0;

/// Byte offsets read for each grid cell
///
/// `i = z * width + x` is the cell's linear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Bytes `i`, `i + 1`, `i + 2`
    ///
    /// Walks the buffer one byte per cell, so neighbouring cells share bytes
    /// and channels bleed into each other. Never reads past `width * height + 1`.
    #[default]
    ByteOffset,

    /// Red channel of pixels `i`, `i + 1`, `i + 2` (byte offsets `4 * (i + k)`)
    ///
    /// The last two cells of the grid read beyond the buffer; those reads are
    /// non-finite and the cell is coerced to `0.0`.
    NeighborRed,

    /// Red, green and blue of pixel `i` (byte offsets `4 * i + k`)
    Channels,
}

impl SamplingStrategy {
    /// Byte offsets for the cell with linear index `index`
    #[inline]
    fn offsets(self, index: usize) -> [usize; 3] {
        match self {
            SamplingStrategy::ByteOffset => [index, index + 1, index + 2],
            SamplingStrategy::NeighborRed => [4 * index, 4 * (index + 1), 4 * (index + 2)],
            SamplingStrategy::Channels => [4 * index, 4 * index + 1, 4 * index + 2],
        }
    }
}

/// Samples RGBA pixel buffers into height grids
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightmapSampler {
    strategy: SamplingStrategy,
}

impl HeightmapSampler {
    /// Create a sampler using the given strategy
    pub fn new(strategy: SamplingStrategy) -> Self {
        Self { strategy }
    }

    /// The strategy this sampler reads with
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Sample a decoded heightmap image
    pub fn sample_image(&self, image: &HeightmapImage) -> Result<HeightGrid> {
        self.sample(image.pixels(), image.width(), image.height())
    }

    /// Sample a raw RGBA buffer of `width * height` pixels
    ///
    /// Heights are the raw sums of the three scaled bytes; they are not
    /// renormalized against the grid maximum.
    ///
    /// # Errors
    /// * [`TerrainError::InvalidDimensions`] if either dimension is zero
    /// * [`TerrainError::OutOfRange`] if `pixels.len() < 4 * width * height`
    pub fn sample(&self, pixels: &[u8], width: u32, height: u32) -> Result<HeightGrid> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }

        let cells = width as usize * height as usize;
        let needed = cells * 4;
        if pixels.len() < needed {
            return Err(TerrainError::OutOfRange {
                needed,
                len: pixels.len(),
            });
        }

        let mut heights = Vec::with_capacity(cells);
        for index in 0..cells {
            heights.push(self.sample_cell(pixels, index));
        }

        let grid = HeightGrid::new(width, height, heights)?;
        debug!(
            width,
            height,
            strategy = ?self.strategy,
            highest_y = grid.highest_y(),
            "Sampled heightmap"
        );
        Ok(grid)
    }

    fn sample_cell(&self, pixels: &[u8], index: usize) -> f32 {
        self.strategy
            .offsets(index)
            .iter()
            .map(|&offset| match pixels.get(offset) {
                Some(&byte) => byte as f32 / BYTE_SCALE,
                None => f32::NAN,
            })
            .sum()
    }
}
