use crate::foundation::core::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Row-major ARGB8888 raster, one `u32` per pixel, no row padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl RasterSurface {
    /// Black surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width as usize * height as usize],
        }
    }

    /// Black surface the size of the display.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Row `y`.
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Set every pixel to `argb`.
    pub fn fill(&mut self, argb: u32) {
        self.pixels.fill(argb);
    }

    /// Overwrite this surface with `other`. Both must have the same size.
    pub fn copy_from(&mut self, other: &RasterSurface) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }
}

/// Bytes per pixel of [`PresentationImage`].
pub const PRESENTATION_BPP: usize = 3;

/// Display-native image: packed 24-bit RGB, `R, G, B` byte order, no alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentationImage {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl PresentationImage {
    /// Zeroed image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; width as usize * height as usize * PRESENTATION_BPP],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Regenerate every byte from `raster`, dropping alpha.
    ///
    /// Sizes are synchronized first, so the invariant "dimensions match the raster" holds even
    /// if a caller hands in a surface of another size.
    pub fn derive_from(&mut self, raster: &RasterSurface) {
        if (self.width, self.height) != (raster.width(), raster.height()) {
            *self = Self::new(raster.width(), raster.height());
        }
        for (out, &px) in self
            .bytes
            .chunks_exact_mut(PRESENTATION_BPP)
            .zip(raster.pixels())
        {
            out[0] = (px >> 16) as u8;
            out[1] = (px >> 8) as u8;
            out[2] = px as u8;
        }
    }

    /// Copy into an [`image::RgbImage`] for screenshots.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.bytes.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/surface.rs"]
mod tests;
