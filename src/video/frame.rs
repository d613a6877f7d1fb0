use crate::foundation::core::PixelFormat;
use crate::foundation::error::{DriverError, DriverResult};

/// Read-only view of a frame emitted by the frontend.
///
/// Construction validates the geometry against the buffer, so the converter can index rows
/// without further checks.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
}

impl<'a> Frame<'a> {
    /// Wrap `data` as a `width`x`height` frame with `pitch` bytes per row.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        pitch: usize,
        format: PixelFormat,
    ) -> DriverResult<Self> {
        if width == 0 || height == 0 {
            return Err(DriverError::malformed_frame(format!(
                "empty frame {width}x{height}"
            )));
        }
        let bpp = format.bytes_per_pixel();
        if !pitch.is_multiple_of(bpp) {
            return Err(DriverError::malformed_frame(format!(
                "pitch {pitch} is not a multiple of {bpp} bytes"
            )));
        }
        let row_bytes = (width as usize)
            .checked_mul(bpp)
            .ok_or_else(|| DriverError::malformed_frame("row size overflow"))?;
        if pitch < row_bytes {
            return Err(DriverError::malformed_frame(format!(
                "pitch {pitch} shorter than a {width}-pixel row"
            )));
        }
        let needed = pitch
            .checked_mul(height as usize - 1)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or_else(|| DriverError::malformed_frame("frame size overflow"))?;
        if data.len() < needed {
            return Err(DriverError::malformed_frame(format!(
                "buffer holds {} bytes, {width}x{height} at pitch {pitch} needs {needed}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            pitch,
            format,
        })
    }

    /// Tightly packed frame (`pitch == width * bpp`).
    pub fn packed(data: &'a [u8], width: u32, height: u32, format: PixelFormat) -> DriverResult<Self> {
        Self::new(
            data,
            width,
            height,
            width as usize * format.bytes_per_pixel(),
            format,
        )
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between row starts.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixel encoding.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes of row `y`, exactly `width * bpp` long.
    pub(crate) fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.pitch;
        let len = self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..start + len]
    }
}
