// Pixel Surface - Off-screen RGBA buffer the text renderer draws into
//
// Pixels are packed 32-bit values in 0xRRGGBBAA order. A surface has a fixed
// size for its whole lifetime; a resolution change allocates a new one.

use super::error::DisplayError;
use super::palette::packed_to_rgba;

/// Bytes per pixel in the RGBA output format
pub const BYTES_PER_PIXEL: usize = 4;

/// CPU-addressable pixel buffer of fixed size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Pixel data, row-major, `width * height` entries
    pixels: Vec<u32>,
}

impl PixelSurface {
    /// Allocate a new surface cleared to transparent black
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    ///
    /// # Returns
    /// `DisplayError::Allocation` if the pixel count overflows or memory
    /// cannot be reserved
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                DisplayError::Allocation(format!("surface {}x{} is too large", width, height))
            })?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            DisplayError::Allocation(format!("surface {}x{}: {}", width, height, e))
        })?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the surface has no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Set a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Get a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u32) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }

        let stride = self.width as usize;
        for row in y as usize..y_end as usize {
            let start = row * stride;
            self.pixels[start + x as usize..start + x_end as usize].fill(color);
        }
    }

    /// Clear the whole surface to a color
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Raw packed pixels
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable raw packed pixels
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// One row of packed pixels
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Mutable access to one row of packed pixels
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        let end = start + self.width as usize;
        Some(&mut self.pixels[start..end])
    }

    /// Convert the surface to RGBA bytes
    ///
    /// # Arguments
    /// * `output` - Output buffer (must be at least `len() * 4` bytes)
    ///
    /// # Panics
    /// Panics if output buffer is too small
    pub fn to_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= self.pixels.len() * BYTES_PER_PIXEL,
            "Output buffer too small for RGBA conversion"
        );

        for (dst, &packed) in output
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(self.pixels.iter())
        {
            dst.copy_from_slice(&packed_to_rgba(packed));
        }
    }
}
