//! Glyph atlases for the message overlay.
//!
//! Two sources: a built-in 8x8 bitmap font scaled by an integer factor, and TrueType/OpenType
//! files rasterized with `fontdue`. Both produce the same [`GlyphAtlas`]: one blend-weight
//! bitmap plus per-character metrics relative to a baseline pen position.

use std::collections::HashMap;
use std::path::Path;

use crate::config::VideoSettings;
use crate::foundation::error::{DriverError, DriverResult};

/// Placement of one character inside the atlas and relative to the pen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Left edge of the bitmap in the atlas.
    pub atlas_offset_x: u32,
    /// Top edge of the bitmap in the atlas.
    pub atlas_offset_y: u32,
    /// Bitmap width.
    pub width: u32,
    /// Bitmap height.
    pub height: u32,
    /// Bitmap left edge relative to the pen.
    pub draw_offset_x: i32,
    /// Bitmap top edge relative to the pen (negative is above the baseline).
    pub draw_offset_y: i32,
    /// Horizontal pen advance.
    pub advance_x: i32,
    /// Vertical pen advance.
    pub advance_y: i32,
}

/// Immutable glyph bitmap plus character map.
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    glyphs: HashMap<char, GlyphMetrics>,
}

impl GlyphAtlas {
    /// Assemble an atlas, checking every glyph rectangle lies inside the bitmap.
    pub fn from_parts(
        width: u32,
        height: u32,
        buffer: Vec<u8>,
        glyphs: HashMap<char, GlyphMetrics>,
    ) -> DriverResult<Self> {
        if buffer.len() != width as usize * height as usize {
            return Err(DriverError::font(format!(
                "atlas buffer holds {} bytes, expected {width}x{height}",
                buffer.len()
            )));
        }
        for (ch, g) in &glyphs {
            let right = u64::from(g.atlas_offset_x) + u64::from(g.width);
            let bottom = u64::from(g.atlas_offset_y) + u64::from(g.height);
            if right > u64::from(width) || bottom > u64::from(height) {
                return Err(DriverError::font(format!(
                    "glyph {ch:?} lies outside the {width}x{height} atlas"
                )));
            }
        }
        Ok(Self {
            width,
            height,
            buffer,
            glyphs,
        })
    }

    /// Load the atlas the settings ask for.
    ///
    /// `Ok(None)` when messages are disabled. A configured font file that cannot be loaded is an
    /// error; the caller decides whether to degrade.
    pub fn load(settings: &VideoSettings) -> DriverResult<Option<Self>> {
        if !settings.font_enable {
            return Ok(None);
        }
        match settings.font_path.as_deref() {
            Some(path) => Self::from_font_file(path, settings.font_size).map(Some),
            None => Self::builtin(settings.font_size).map(Some),
        }
    }

    /// Built-in bitmap font scaled to roughly `font_size` pixels.
    pub fn builtin(font_size: f32) -> DriverResult<Self> {
        check_font_size(font_size)?;
        let scale = ((font_size / BUILTIN_CELL as f32).round() as u32).max(1);
        let count = BUILTIN_GLYPHS.len() as u32;
        let (cell, width) = BUILTIN_CELL
            .checked_mul(scale)
            .and_then(|cell| Some((cell, cell.checked_mul(count)?)))
            .ok_or_else(|| {
                DriverError::font(format!("font size {font_size} overflows the atlas"))
            })?;
        let mut buffer = vec![0u8; width as usize * cell as usize];
        let mut glyphs = HashMap::with_capacity(BUILTIN_GLYPHS.len() + 26);

        for (i, (ch, rows)) in BUILTIN_GLYPHS.iter().enumerate() {
            let ox = i as u32 * cell;
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..BUILTIN_CELL {
                    if bits & (0x80 >> rx) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        let y = ry as u32 * scale + sy;
                        let start = (y * width + ox + rx * scale) as usize;
                        buffer[start..start + scale as usize].fill(0xFF);
                    }
                }
            }
            let metrics = GlyphMetrics {
                atlas_offset_x: ox,
                atlas_offset_y: 0,
                width: cell,
                height: cell,
                draw_offset_x: 0,
                draw_offset_y: -(cell as i32),
                advance_x: cell as i32,
                advance_y: 0,
            };
            glyphs.insert(*ch, metrics);
            if ch.is_ascii_uppercase() {
                glyphs.insert(ch.to_ascii_lowercase(), metrics);
            }
        }

        Ok(Self {
            width,
            height: cell,
            buffer,
            glyphs,
        })
    }

    /// Rasterize printable ASCII from a font file.
    pub fn from_font_file(path: &Path, size: f32) -> DriverResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            DriverError::font(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(&data, size)
            .map_err(|e| DriverError::font(format!("'{}': {e}", path.display())))
    }

    /// Rasterize printable ASCII from in-memory font data.
    pub fn from_font_bytes(data: &[u8], size: f32) -> DriverResult<Self> {
        check_font_size(size)?;
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| DriverError::font(e.to_string()))?;

        let mut packer = ShelfPacker::new(FONT_ATLAS_WIDTH);
        let mut placed = Vec::new();
        for ch in (0x20u8..=0x7E).map(char::from) {
            if ch != ' ' && !font.has_glyph(ch) {
                continue;
            }
            let (m, bitmap) = font.rasterize(ch, size);
            let (w, h) = (m.width as u32, m.height as u32);
            let Some((x, y)) = packer.pack(w, h) else {
                return Err(DriverError::font(format!(
                    "glyph {ch:?} ({w}x{h}) does not fit a {FONT_ATLAS_WIDTH}-wide atlas"
                )));
            };
            let metrics = GlyphMetrics {
                atlas_offset_x: x,
                atlas_offset_y: y,
                width: w,
                height: h,
                draw_offset_x: m.xmin,
                draw_offset_y: -(m.ymin + m.height as i32),
                advance_x: m.advance_width.round() as i32,
                advance_y: m.advance_height.round() as i32,
            };
            placed.push((ch, metrics, bitmap));
        }

        let (width, height) = (FONT_ATLAS_WIDTH, packer.used_height().max(1));
        let mut buffer = vec![0u8; width as usize * height as usize];
        let mut glyphs = HashMap::with_capacity(placed.len());
        for (ch, g, bitmap) in placed {
            for row in 0..g.height as usize {
                let src = &bitmap[row * g.width as usize..][..g.width as usize];
                let start = (g.atlas_offset_y as usize + row) * width as usize
                    + g.atlas_offset_x as usize;
                buffer[start..start + g.width as usize].copy_from_slice(src);
            }
            glyphs.insert(ch, g);
        }
        Self::from_parts(width, height, buffer, glyphs)
    }

    /// Atlas width; also the row stride of [`GlyphAtlas::buffer`].
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Atlas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Blend weights, row-major.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Metrics of `ch`, if the font has it.
    pub fn glyph(&self, ch: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&ch)
    }

    /// Number of mapped characters.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no characters are mapped.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Largest accepted font size in pixels.
pub const MAX_FONT_SIZE: f32 = 256.0;

fn check_font_size(size: f32) -> DriverResult<()> {
    if size.is_finite() && size > 0.0 && size <= MAX_FONT_SIZE {
        Ok(())
    } else {
        Err(DriverError::font(format!(
            "font size {size} outside 0..={MAX_FONT_SIZE}"
        )))
    }
}

const FONT_ATLAS_WIDTH: u32 = 512;
const SHELF_PADDING: u32 = 1;

/// Row-by-row packer: glyphs fill a shelf left to right, a new shelf opens below when full.
struct ShelfPacker {
    width: u32,
    x: u32,
    y: u32,
    shelf_h: u32,
}

impl ShelfPacker {
    fn new(width: u32) -> Self {
        Self {
            width,
            x: 0,
            y: 0,
            shelf_h: 0,
        }
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w > self.width {
            return None;
        }
        if self.x + w > self.width {
            self.y += self.shelf_h + SHELF_PADDING;
            self.x = 0;
            self.shelf_h = 0;
        }
        let pos = (self.x, self.y);
        self.x += w + SHELF_PADDING;
        self.shelf_h = self.shelf_h.max(h);
        Some(pos)
    }

    fn used_height(&self) -> u32 {
        self.y + self.shelf_h
    }
}

const BUILTIN_CELL: u32 = 8;

// One byte per row, MSB is the leftmost pixel. Lowercase letters reuse the uppercase shapes.
#[rustfmt::skip]
static BUILTIN_GLYPHS: [(char, [u8; 8]); 58] = [
    ('A', [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00]),
    ('B', [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00]),
    ('C', [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00]),
    ('D', [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00]),
    ('E', [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x7E, 0x00]),
    ('F', [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x60, 0x00]),
    ('G', [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00]),
    ('H', [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00]),
    ('I', [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00]),
    ('J', [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x6C, 0x38, 0x00]),
    ('K', [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00]),
    ('L', [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00]),
    ('M', [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00]),
    ('N', [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00]),
    ('O', [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    ('P', [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00]),
    ('Q', [0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x0E, 0x00]),
    ('R', [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00]),
    ('S', [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00]),
    ('T', [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00]),
    ('U', [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    ('V', [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00]),
    ('W', [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00]),
    ('X', [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00]),
    ('Y', [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00]),
    ('Z', [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00]),
    ('0', [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00]),
    ('1', [0x18, 0x38, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00]),
    ('2', [0x3C, 0x66, 0x06, 0x0C, 0x30, 0x60, 0x7E, 0x00]),
    ('3', [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00]),
    ('4', [0x06, 0x0E, 0x1E, 0x66, 0x7F, 0x06, 0x06, 0x00]),
    ('5', [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00]),
    ('6', [0x3C, 0x66, 0x60, 0x7C, 0x66, 0x66, 0x3C, 0x00]),
    ('7', [0x7E, 0x66, 0x0C, 0x18, 0x18, 0x18, 0x18, 0x00]),
    ('8', [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00]),
    ('9', [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00]),
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30]),
    (':', [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00]),
    (';', [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x30, 0x00]),
    ('!', [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00]),
    ('?', [0x3C, 0x66, 0x06, 0x0C, 0x18, 0x00, 0x18, 0x00]),
    ('\'', [0x18, 0x18, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('"', [0x66, 0x66, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('/', [0x02, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00]),
    ('+', [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00]),
    ('=', [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00]),
    ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7E, 0x00]),
    ('(', [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00]),
    (')', [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00]),
    ('[', [0x3C, 0x30, 0x30, 0x30, 0x30, 0x30, 0x3C, 0x00]),
    (']', [0x3C, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x3C, 0x00]),
    ('<', [0x0C, 0x18, 0x30, 0x60, 0x30, 0x18, 0x0C, 0x00]),
    ('>', [0x30, 0x18, 0x0C, 0x06, 0x0C, 0x18, 0x30, 0x00]),
    ('%', [0x62, 0x66, 0x0C, 0x18, 0x30, 0x66, 0x46, 0x00]),
    ('#', [0x24, 0x24, 0x7E, 0x24, 0x7E, 0x24, 0x24, 0x00]),
];

#[cfg(test)]
#[path = "../../tests/unit/video/font.rs"]
mod tests;
