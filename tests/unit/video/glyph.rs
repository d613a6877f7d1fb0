use std::collections::HashMap;

use super::*;
use crate::foundation::math::blend_channel;
use crate::video::font::GlyphMetrics;

const BG: u32 = 0xFF20_4060;

/// 'A': 4x4 ramp of weights, drawn above the baseline.
/// 'B': 2x2 solid, drawn below the baseline with a vertical advance.
/// ' ': empty, advance only.
fn test_atlas() -> GlyphAtlas {
    let width = 8u32;
    let height = 4u32;
    let mut buffer = vec![0u8; (width * height) as usize];
    for y in 0..4u32 {
        for x in 0..4u32 {
            buffer[(y * width + x) as usize] = (x * 16 + y * 64 + 15) as u8;
        }
    }
    for y in 0..2u32 {
        for x in 4..6u32 {
            buffer[(y * width + x) as usize] = 0xFF;
        }
    }
    let mut glyphs = HashMap::new();
    glyphs.insert(
        'A',
        GlyphMetrics {
            atlas_offset_x: 0,
            atlas_offset_y: 0,
            width: 4,
            height: 4,
            draw_offset_x: 1,
            draw_offset_y: -4,
            advance_x: 5,
            advance_y: 0,
        },
    );
    glyphs.insert(
        'B',
        GlyphMetrics {
            atlas_offset_x: 4,
            atlas_offset_y: 0,
            width: 2,
            height: 2,
            draw_offset_x: 0,
            draw_offset_y: 0,
            advance_x: 3,
            advance_y: 1,
        },
    );
    glyphs.insert(
        ' ',
        GlyphMetrics {
            advance_x: 2,
            ..GlyphMetrics::default()
        },
    );
    GlyphAtlas::from_parts(width, height, buffer, glyphs).unwrap()
}

/// Per-pixel bounds-checked reference blend.
fn reference(
    dst: &mut RasterSurface,
    atlas: &GlyphAtlas,
    text: &str,
    anchor_x: f32,
    anchor_y: f32,
    color: Rgb8,
) {
    let (w, h) = (dst.width() as i32, dst.height() as i32);
    let mut pen_x = (anchor_x * w as f32) as i32;
    let mut pen_y = ((1.0 - anchor_y) * h as f32) as i32;
    for ch in text.chars() {
        let Some(g) = atlas.glyph(ch) else { continue };
        for by in 0..g.height as i32 {
            for bx in 0..g.width as i32 {
                let x = pen_x + g.draw_offset_x + bx;
                let y = pen_y + g.draw_offset_y + by;
                if x < 0 || y < 0 || x >= w || y >= h {
                    continue;
                }
                let a = atlas.buffer()[((g.atlas_offset_y as i32 + by) * atlas.width() as i32
                    + g.atlas_offset_x as i32
                    + bx) as usize];
                let idx = (y * w + x) as usize;
                let p = dst.pixels()[idx];
                dst.pixels_mut()[idx] = blend_argb(
                    p,
                    u32::from(color.r),
                    u32::from(color.g),
                    u32::from(color.b),
                    u32::from(a),
                );
            }
        }
        pen_x += g.advance_x;
        pen_y += g.advance_y;
    }
}

fn surface(w: u32, h: u32) -> RasterSurface {
    let mut s = RasterSurface::new(w, h);
    s.fill(BG);
    s
}

#[test]
fn without_atlas_nothing_is_drawn() {
    let mut dst = surface(16, 16);
    let adv = composite(&mut dst, None, "AAA", 0.5, 0.5, Rgb8::new(255, 0, 0));
    assert_eq!(adv, PenAdvance::default());
    assert!(dst.pixels().iter().all(|&p| p == BG));
}

#[test]
fn anchor_y_is_measured_from_the_bottom() {
    let atlas = test_atlas();
    let mut dst = surface(16, 16);
    // Pen at (4, 12); glyph 'B' sits at the pen with no offset.
    composite(&mut dst, Some(&atlas), "B", 0.25, 0.25, Rgb8::new(9, 8, 7));
    assert_eq!(dst.pixel(4, 12), Some(0xFF09_0807));
    assert_eq!(dst.pixel(5, 13), Some(0xFF09_0807));
    assert_eq!(dst.pixel(4, 3), Some(BG));
    assert_eq!(dst.pixel(6, 12), Some(BG));
}

#[test]
fn blend_formula_is_exact_at_the_extremes() {
    let atlas = test_atlas();
    let color = Rgb8::new(200, 10, 250);
    let mut dst = surface(16, 16);
    composite(&mut dst, Some(&atlas), "A", 0.0, 0.5, color);

    // Pen (0, 8): 'A' covers x 1..5, y 4..8.
    for by in 0..4u32 {
        for bx in 0..4u32 {
            let a = atlas.buffer()[(by * atlas.width() + bx) as usize] as u32;
            let got = dst.pixel(1 + bx, 4 + by).unwrap();
            let want_r = blend_channel(0x20, 200, a);
            let want_g = blend_channel(0x40, 10, a);
            let want_b = blend_channel(0x60, 250, a);
            assert_eq!(got, 0xFF00_0000 | (want_r << 16) | (want_g << 8) | want_b);
        }
    }
    assert_eq!(dst.pixel(0, 4), Some(BG));
}

#[test]
fn pen_advance_sums_advances_of_present_glyphs() {
    let atlas = test_atlas();
    let mut dst = surface(16, 16);
    // '~' is missing and does not advance.
    let adv = composite(&mut dst, Some(&atlas), "A B~A", 0.1, 0.9, Rgb8::new(1, 2, 3));
    assert_eq!(adv, PenAdvance { x: 5 + 2 + 3 + 5, y: 1 });
}

#[test]
fn pen_advances_through_fully_clipped_glyphs() {
    let atlas = test_atlas();
    let mut dst = surface(8, 8);
    let before = dst.clone();
    let adv = composite(&mut dst, Some(&atlas), "AAAA", 2.0, 0.5, Rgb8::new(255, 255, 255));
    assert_eq!(adv.x, 20);
    assert_eq!(dst, before);

    let adv = composite(&mut dst, Some(&atlas), "AAAA", -3.0, 0.5, Rgb8::new(255, 255, 255));
    assert_eq!(adv.x, 20);
    assert_eq!(dst, before);
}

#[test]
fn clipped_glyph_does_not_wrap_into_the_next_row() {
    let atlas = test_atlas();
    let mut dst = surface(8, 8);
    // Pen x = 6: 'A' spans x 7..11, only column 7 is visible.
    composite(&mut dst, Some(&atlas), "A", 0.75, 0.5, Rgb8::new(255, 255, 255));
    for y in 0..8 {
        for x in 0..7 {
            assert_eq!(dst.pixel(x, y), Some(BG), "({x},{y})");
        }
    }
    assert_ne!(dst.pixel(7, 0), Some(BG));
}

#[test]
fn clipped_output_matches_reference_for_all_anchors() {
    let atlas = test_atlas();
    let color = Rgb8::new(250, 128, 3);
    let text = "AB A~BA";
    for ix in -12..=28 {
        for iy in -12..=28 {
            let ax = ix as f32 / 16.0;
            let ay = iy as f32 / 16.0;
            let mut got = surface(16, 16);
            let mut want = surface(16, 16);
            composite(&mut got, Some(&atlas), text, ax, ay, color);
            reference(&mut want, &atlas, text, ax, ay, color);
            assert_eq!(got, want, "anchor ({ax}, {ay})");
        }
    }
}

#[test]
fn clipped_pixels_match_an_unclipped_render() {
    let atlas = test_atlas();
    let color = Rgb8::new(0, 255, 0);
    // Small surface: pen (-2, 2) clips 'A' on the left and top.
    let mut small = surface(16, 16);
    composite(&mut small, Some(&atlas), "A", -2.0 / 16.0, 1.0 - 2.0 / 16.0, color);
    // Large surface with the same glyph shifted by (8, 8), fully visible.
    let mut large = surface(32, 32);
    composite(&mut large, Some(&atlas), "A", 6.0 / 32.0, 1.0 - 10.0 / 32.0, color);

    for y in 0..16u32 {
        for x in 0..16u32 {
            assert_eq!(small.pixel(x, y), large.pixel(x + 8, y + 8), "({x},{y})");
        }
    }
}
