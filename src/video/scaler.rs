//! Pixel conversion and resampling into the display raster.
//!
//! Sampling is pixel-center aligned: destination index `d` maps to source coordinate
//! `(d + 0.5) * src / dst - 0.5`. Per-size sampling tables and the decoded source copy live in
//! the [`ScalerContext`], so a steady stream of same-sized frames never allocates.

use crate::foundation::core::PixelFormat;
use crate::foundation::math::{lerp_argb, rgb565_to_argb, rgba4444_to_argb};
use crate::video::frame::Frame;
use crate::video::surface::RasterSurface;

/// Resampling filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleFilter {
    /// Nearest neighbour.
    Point,
    /// Two-tap linear in each direction.
    Bilinear,
}

impl ScaleFilter {
    /// Filter selected by the "smooth" setting.
    pub fn from_smooth(smooth: bool) -> Self {
        if smooth { Self::Bilinear } else { Self::Point }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tap {
    i0: u32,
    i1: u32,
    // Weight of `i1` in 1/256 units, 0..=255.
    w: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TableKey {
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    filter: ScaleFilter,
}

/// Resampling configuration plus the scratch state it needs.
#[derive(Debug, Clone)]
pub struct ScalerContext {
    source_format: PixelFormat,
    filter: ScaleFilter,
    key: Option<TableKey>,
    cols: Vec<Tap>,
    rows: Vec<Tap>,
    decoded: Vec<u32>,
}

impl ScalerContext {
    /// Context converting `source_format` to ARGB8888 with `filter`.
    pub fn new(source_format: PixelFormat, filter: ScaleFilter) -> Self {
        Self {
            source_format,
            filter,
            key: None,
            cols: Vec::new(),
            rows: Vec::new(),
            decoded: Vec::new(),
        }
    }

    /// Encoding of incoming frames.
    pub fn source_format(&self) -> PixelFormat {
        self.source_format
    }

    /// Encoding written to the destination; always ARGB8888.
    pub fn dest_format(&self) -> PixelFormat {
        PixelFormat::Argb8888
    }

    /// Active filter.
    pub fn filter(&self) -> ScaleFilter {
        self.filter
    }

    /// Switch filters; tables are rebuilt lazily on the next conversion.
    pub fn set_filter(&mut self, filter: ScaleFilter) {
        self.filter = filter;
    }

    /// Switch source encodings.
    pub fn set_source_format(&mut self, format: PixelFormat) {
        self.source_format = format;
    }

    /// Release cached tables and scratch memory.
    pub fn reset(&mut self) {
        self.key = None;
        self.cols = Vec::new();
        self.rows = Vec::new();
        self.decoded = Vec::new();
    }

    fn prepare(&mut self, key: TableKey) {
        if self.key == Some(key) {
            return;
        }
        tracing::debug!(
            src_w = key.src_w,
            src_h = key.src_h,
            dst_w = key.dst_w,
            dst_h = key.dst_h,
            filter = ?key.filter,
            "rebuilding scaler tables"
        );
        build_taps(&mut self.cols, key.src_w, key.dst_w, key.filter);
        build_taps(&mut self.rows, key.src_h, key.dst_h, key.filter);
        self.key = Some(key);
    }
}

fn build_taps(out: &mut Vec<Tap>, src_n: u32, dst_n: u32, filter: ScaleFilter) {
    out.clear();
    let src_n64 = u64::from(src_n);
    let dst_n64 = u64::from(dst_n);
    let last = src_n - 1;
    for d in 0..u64::from(dst_n) {
        let tap = match filter {
            ScaleFilter::Point => {
                let i = (((2 * d + 1) * src_n64) / (2 * dst_n64)).min(u64::from(last)) as u32;
                Tap { i0: i, i1: i, w: 0 }
            }
            ScaleFilter::Bilinear => {
                let pos = (((2 * d + 1) * src_n64) << 16) / (2 * dst_n64);
                let pos = pos as i64 - (1 << 15);
                if pos <= 0 {
                    Tap { i0: 0, i1: 0, w: 0 }
                } else {
                    let i0 = (pos >> 16) as u32;
                    if i0 >= last {
                        Tap {
                            i0: last,
                            i1: last,
                            w: 0,
                        }
                    } else {
                        Tap {
                            i0,
                            i1: i0 + 1,
                            w: ((pos >> 8) & 0xFF) as u32,
                        }
                    }
                }
            }
        };
        out.push(tap);
    }
}

fn decode_row(row: &[u8], format: PixelFormat, out: &mut [u32]) {
    match format {
        PixelFormat::Argb8888 => {
            for (o, b) in out.iter_mut().zip(row.chunks_exact(4)) {
                *o = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            }
        }
        PixelFormat::Rgb565 => {
            for (o, b) in out.iter_mut().zip(row.chunks_exact(2)) {
                *o = rgb565_to_argb(u16::from_le_bytes([b[0], b[1]]));
            }
        }
        PixelFormat::Rgba4444 => {
            for (o, b) in out.iter_mut().zip(row.chunks_exact(2)) {
                *o = rgba4444_to_argb(u16::from_le_bytes([b[0], b[1]]));
            }
        }
    }
}

/// Resample `src` into the whole of `dst`, converting to ARGB8888.
///
/// If the frame's encoding differs from the context's, the context follows the frame.
pub fn convert(dst: &mut RasterSurface, src: &Frame<'_>, ctx: &mut ScalerContext) {
    if src.format() != ctx.source_format {
        tracing::debug!(from = ?ctx.source_format, to = ?src.format(), "scaler source format changed");
        ctx.source_format = src.format();
    }
    let (src_w, src_h) = (src.width(), src.height());
    let (dst_w, dst_h) = (dst.width(), dst.height());
    if dst_w == 0 || dst_h == 0 {
        return;
    }
    ctx.prepare(TableKey {
        src_w,
        src_h,
        dst_w,
        dst_h,
        filter: ctx.filter,
    });

    let sw = src_w as usize;
    ctx.decoded.resize(sw * src_h as usize, 0);
    for (y, line) in ctx.decoded.chunks_exact_mut(sw).enumerate() {
        decode_row(src.row(y as u32), ctx.source_format, line);
    }

    let decoded = &ctx.decoded;
    let cols = &ctx.cols;
    let filter = ctx.filter;
    for (out_row, ty) in dst.pixels_mut().chunks_exact_mut(dst_w as usize).zip(&ctx.rows) {
        let r0 = &decoded[ty.i0 as usize * sw..][..sw];
        let r1 = &decoded[ty.i1 as usize * sw..][..sw];
        match filter {
            ScaleFilter::Point => {
                for (o, tx) in out_row.iter_mut().zip(cols) {
                    *o = r0[tx.i0 as usize];
                }
            }
            ScaleFilter::Bilinear => {
                for (o, tx) in out_row.iter_mut().zip(cols) {
                    let top = lerp_argb(r0[tx.i0 as usize], r0[tx.i1 as usize], tx.w);
                    let bottom = lerp_argb(r1[tx.i0 as usize], r1[tx.i1 as usize], tx.w);
                    *o = lerp_argb(top, bottom, ty.w);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/scaler.rs"]
mod tests;
