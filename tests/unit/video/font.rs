use super::*;

#[test]
fn builtin_scales_with_font_size() {
    let small = GlyphAtlas::builtin(8.0).unwrap();
    let big = GlyphAtlas::builtin(16.0).unwrap();
    let a = small.glyph('A').unwrap();
    let b = big.glyph('A').unwrap();
    assert_eq!((a.width, a.height, a.advance_x), (8, 8, 8));
    assert_eq!((b.width, b.height, b.advance_x), (16, 16, 16));
    assert_eq!(b.draw_offset_y, -16);
    assert_eq!(big.height(), 16);
}

#[test]
fn builtin_never_scales_below_one() {
    let tiny = GlyphAtlas::builtin(1.0).unwrap();
    assert_eq!(tiny.glyph('Z').unwrap().width, 8);
}

#[test]
fn builtin_lowercase_shares_uppercase_shape() {
    let atlas = GlyphAtlas::builtin(8.0).unwrap();
    assert_eq!(atlas.glyph('q'), atlas.glyph('Q'));
    assert!(atlas.glyph('~').is_none());
    assert!(atlas.glyph(' ').is_some());
}

#[test]
fn builtin_bitmap_matches_rows() {
    let atlas = GlyphAtlas::builtin(8.0).unwrap();
    let g = *atlas.glyph('-').unwrap();
    let w = atlas.width() as usize;
    let at = |x: u32, y: u32| atlas.buffer()[(g.atlas_offset_y + y) as usize * w + (g.atlas_offset_x + x) as usize];
    // Row 3 of '-' is 0x7E: pixels 1..=6 set.
    assert_eq!(at(0, 3), 0);
    assert_eq!(at(1, 3), 0xFF);
    assert_eq!(at(6, 3), 0xFF);
    assert_eq!(at(7, 3), 0);
    assert_eq!(at(3, 0), 0);
}

#[test]
fn from_parts_rejects_glyphs_outside_the_bitmap() {
    let mut glyphs = HashMap::new();
    glyphs.insert(
        'x',
        GlyphMetrics {
            atlas_offset_x: 3,
            width: 2,
            height: 1,
            ..GlyphMetrics::default()
        },
    );
    let err = GlyphAtlas::from_parts(4, 1, vec![0; 4], glyphs).unwrap_err();
    assert!(matches!(err, DriverError::Font(_)));
}

#[test]
fn from_parts_rejects_wrong_buffer_size() {
    assert!(GlyphAtlas::from_parts(4, 4, vec![0; 3], HashMap::new()).is_err());
}

#[test]
fn garbage_font_data_is_a_font_error() {
    let err = GlyphAtlas::from_font_bytes(b"definitely not a font", 16.0).unwrap_err();
    assert!(matches!(err, DriverError::Font(_)));
}

#[test]
fn load_respects_font_enable() {
    let settings = VideoSettings {
        font_enable: false,
        ..VideoSettings::default()
    };
    assert!(GlyphAtlas::load(&settings).unwrap().is_none());
    assert!(
        GlyphAtlas::load(&VideoSettings::default())
            .unwrap()
            .is_some()
    );
}

#[test]
fn load_reports_missing_font_file() {
    let settings = VideoSettings {
        font_path: Some("/nonexistent/psx-drivers/font.ttf".into()),
        ..VideoSettings::default()
    };
    let err = GlyphAtlas::load(&settings).unwrap_err();
    assert!(err.to_string().contains("failed to read font"));
}

#[test]
fn shelf_packer_wraps_rows() {
    let mut p = ShelfPacker::new(10);
    assert_eq!(p.pack(6, 3), Some((0, 0)));
    assert_eq!(p.pack(6, 2), Some((0, 4)));
    assert_eq!(p.pack(2, 5), Some((7, 4)));
    assert_eq!(p.used_height(), 9);
    assert_eq!(p.pack(11, 1), None);
}

static DEJAVU_SANS: &[u8] = include_bytes!("../../fixtures/fonts/DejaVuSans.ttf");

fn lit_rows(surface: &crate::video::surface::RasterSurface) -> Vec<u32> {
    (0..surface.height())
        .filter(|&y| surface.row(y).iter().any(|&p| p != 0xFF00_0000))
        .collect()
}

#[test]
fn font_file_packs_printable_ascii() {
    let atlas = GlyphAtlas::from_font_bytes(DEJAVU_SANS, 16.0).unwrap();
    assert_eq!(atlas.width(), FONT_ATLAS_WIDTH);
    assert!(atlas.len() >= 90, "{} glyphs", atlas.len());

    for ch in (0x21u8..=0x7E).map(char::from) {
        let g = atlas.glyph(ch).unwrap();
        assert!(g.atlas_offset_x + g.width <= atlas.width(), "{ch:?}");
        assert!(g.atlas_offset_y + g.height <= atlas.height(), "{ch:?}");
        assert!(g.advance_x > 0, "{ch:?}");
    }
}

#[test]
fn font_file_glyphs_sit_on_the_baseline() {
    let atlas = GlyphAtlas::from_font_bytes(DEJAVU_SANS, 16.0).unwrap();
    let a = *atlas.glyph('A').unwrap();
    assert!(a.height > 0);
    assert!(a.draw_offset_y < 0);
    assert!(a.draw_offset_y + a.height as i32 <= 1);

    let g = *atlas.glyph('g').unwrap();
    assert!(g.draw_offset_y + g.height as i32 > 0, "descender reaches below the pen");
}

#[test]
fn font_file_bitmaps_are_copied_into_the_atlas() {
    let atlas = GlyphAtlas::from_font_bytes(DEJAVU_SANS, 16.0).unwrap();
    let w = atlas.width() as usize;
    for ch in ['A', 'm', '@'] {
        let g = *atlas.glyph(ch).unwrap();
        let covered = (0..g.height as usize).any(|row| {
            let start = (g.atlas_offset_y as usize + row) * w + g.atlas_offset_x as usize;
            atlas.buffer()[start..start + g.width as usize]
                .iter()
                .any(|&v| v != 0)
        });
        assert!(covered, "{ch:?} has no coverage");
    }
}

#[test]
fn font_file_message_draws_above_the_pen() {
    use crate::foundation::core::Rgb8;
    use crate::video::glyph::composite;
    use crate::video::surface::RasterSurface;

    let atlas = GlyphAtlas::from_font_bytes(DEJAVU_SANS, 16.0).unwrap();
    // Pen baseline at y = (1 - 0.25) * 32 = 24.
    let mut caps = RasterSurface::new(96, 32);
    let pen = composite(&mut caps, Some(&atlas), "HELLO", 0.0, 0.25, Rgb8::new(255, 255, 255));
    assert!(pen.x > 0);
    let rows = lit_rows(&caps);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|&y| y <= 24), "{rows:?}");

    let mut desc = RasterSurface::new(96, 32);
    composite(&mut desc, Some(&atlas), "gy", 0.0, 0.25, Rgb8::new(255, 255, 255));
    let rows = lit_rows(&desc);
    assert!(rows.iter().any(|&y| y < 24));
    assert!(rows.iter().any(|&y| y > 24));
}

#[test]
fn oversized_font_sizes_are_font_errors() {
    for size in [1e9, MAX_FONT_SIZE + 1.0, f32::NAN, f32::INFINITY, 0.0] {
        let err = GlyphAtlas::builtin(size).unwrap_err();
        assert!(matches!(err, DriverError::Font(_)), "builtin {size}");
        let err = GlyphAtlas::from_font_bytes(DEJAVU_SANS, size).unwrap_err();
        assert!(matches!(err, DriverError::Font(_)), "font file {size}");
    }
    let largest = GlyphAtlas::builtin(MAX_FONT_SIZE).unwrap();
    assert_eq!(largest.height(), MAX_FONT_SIZE as u32);
}
