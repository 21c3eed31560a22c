use crate::error::{Result, TerrainError};

/// Row-major grid of terrain heights
///
/// `heights[z * width + x]` is the elevation of grid cell `(x, z)`. Every
/// stored value is finite: non-finite inputs are replaced by `0.0` at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: u32,
    height: u32,
    heights: Vec<f32>,
    highest_y: f32,
}

impl HeightGrid {
    /// Create a grid from raw heights
    ///
    /// # Errors
    /// * [`TerrainError::InvalidDimensions`] if `width` or `height` is zero
    /// * [`TerrainError::HeightCountMismatch`] if `heights.len() != width * height`
    pub fn new(width: u32, height: u32, mut heights: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize;
        if heights.len() != expected {
            return Err(TerrainError::HeightCountMismatch {
                expected,
                actual: heights.len(),
            });
        }

        let mut highest_y = 0.0_f32;
        for y in heights.iter_mut() {
            if !y.is_finite() {
                *y = 0.0;
            }
            if *y > highest_y {
                highest_y = *y;
            }
        }

        Ok(Self {
            width,
            height,
            heights,
            highest_y,
        })
    }

    /// Create a grid where every cell has the same elevation
    pub fn flat(width: u32, height: u32, y: f32) -> Result<Self> {
        Self::new(width, height, vec![y; width as usize * height as usize])
    }

    /// Number of cells along X
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along Z
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false for a constructed grid; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// All heights in row-major order
    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Elevation at `(x, z)`, or `None` outside the grid
    pub fn get(&self, x: u32, z: u32) -> Option<f32> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.heights
            .get(z as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Highest elevation in the grid (never below zero)
    ///
    /// Exposed for consumers such as color ramps; heights are not
    /// renormalized against it.
    #[inline]
    pub fn highest_y(&self) -> f32 {
        self.highest_y
    }
}
