use crate::foundation::core::Rgb8;
use crate::foundation::math::blend_argb;
use crate::video::font::GlyphAtlas;
use crate::video::surface::RasterSurface;

/// Net pen movement produced by one [`composite`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PenAdvance {
    /// Horizontal displacement in pixels.
    pub x: i32,
    /// Vertical displacement in pixels.
    pub y: i32,
}

/// Blend `text` onto `dst` in `color`, starting at a normalized anchor.
///
/// `anchor_x` is measured from the left edge, `anchor_y` from the bottom edge, both as
/// fractions of the surface size. Glyph rectangles are clipped on all four edges; characters
/// missing from the atlas are skipped without moving the pen. Without an atlas nothing is drawn.
pub fn composite(
    dst: &mut RasterSurface,
    atlas: Option<&GlyphAtlas>,
    text: &str,
    anchor_x: f32,
    anchor_y: f32,
    color: Rgb8,
) -> PenAdvance {
    let Some(atlas) = atlas else {
        return PenAdvance::default();
    };

    let width = dst.width().min(i32::MAX as u32) as i32;
    let height = dst.height().min(i32::MAX as u32) as i32;
    let start_x = (anchor_x * width as f32) as i32;
    let start_y = ((1.0 - anchor_y) * height as f32) as i32;
    let (mut pen_x, mut pen_y) = (start_x, start_y);

    let (fg_r, fg_g, fg_b) = (u32::from(color.r), u32::from(color.g), u32::from(color.b));
    let atlas_stride = atlas.width() as usize;
    let dst_stride = dst.width() as usize;

    for ch in text.chars() {
        let Some(g) = atlas.glyph(ch) else {
            continue;
        };

        let mut glyph_w = g.width as i32;
        let mut glyph_h = g.height as i32;
        let mut base_x = pen_x.saturating_add(g.draw_offset_x);
        let mut base_y = pen_y.saturating_add(g.draw_offset_y);
        let mut src_x = g.atlas_offset_x as i32;
        let mut src_y = g.atlas_offset_y as i32;

        if base_x < 0 {
            src_x = src_x.saturating_sub(base_x);
            glyph_w = glyph_w.saturating_add(base_x);
            base_x = 0;
        }
        if base_y < 0 {
            src_y = src_y.saturating_sub(base_y);
            glyph_h = glyph_h.saturating_add(base_y);
            base_y = 0;
        }

        let max_w = width - base_x;
        let max_h = height - base_y;
        if max_w > 0 && max_h > 0 && glyph_w > 0 && glyph_h > 0 {
            let glyph_w = glyph_w.min(max_w) as usize;
            let glyph_h = glyph_h.min(max_h) as usize;
            let weights = atlas.buffer();
            let pixels = dst.pixels_mut();

            for row in 0..glyph_h {
                let src = &weights[(src_y as usize + row) * atlas_stride + src_x as usize..]
                    [..glyph_w];
                let out = &mut pixels[(base_y as usize + row) * dst_stride + base_x as usize..]
                    [..glyph_w];
                for (o, &alpha) in out.iter_mut().zip(src) {
                    if alpha != 0 {
                        *o = blend_argb(*o, fg_r, fg_g, fg_b, u32::from(alpha));
                    }
                }
            }
        }

        pen_x = pen_x.saturating_add(g.advance_x);
        pen_y = pen_y.saturating_add(g.advance_y);
    }

    PenAdvance {
        x: pen_x - start_x,
        y: pen_y - start_y,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/glyph.rs"]
mod tests;
