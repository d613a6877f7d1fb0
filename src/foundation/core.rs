/// Width of the display raster in pixels.
pub const SCREEN_WIDTH: u32 = 640;
/// Height of the display raster in pixels.
pub const SCREEN_HEIGHT: u32 = 480;
/// Height of the draw environment in VRAM lines (the display uses the first 480).
pub const DRAW_ENV_HEIGHT: u32 = 512;

/// Packed pixel encodings accepted from the frontend.
///
/// All encodings are little-endian packed words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 16-bit `RRRRRGGG_GGGBBBBB`.
    Rgb565,
    /// 32-bit `AARRGGBB`.
    Argb8888,
    /// 16-bit `RRRRGGGG_BBBBAAAA`, used by 16-bit menu textures.
    Rgba4444,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 | Self::Rgba4444 => 2,
            Self::Argb8888 => 4,
        }
    }

    /// Format of game frames given the frontend's "rgb32" flag.
    pub fn for_game(rgb32: bool) -> Self {
        if rgb32 { Self::Argb8888 } else { Self::Rgb565 }
    }

    /// Format of menu textures given the frontend's "rgb32" flag.
    pub fn for_menu(rgb32: bool) -> Self {
        if rgb32 { Self::Argb8888 } else { Self::Rgba4444 }
    }
}

/// Straight (non-premultiplied) 8-bit RGB triplet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert unit-range float channels, clamping each into `0..=255`.
    pub fn from_unit([r, g, b]: [f32; 3]) -> Self {
        fn to_u8(x: f32) -> u8 {
            // Truncates like the frontend's `int` conversion; NaN maps to 0.
            (x * 255.0).clamp(0.0, 255.0) as u8
        }
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Pack as opaque `0xFFRRGGBB`.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Visible rectangle reported to the frontend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Physical output width.
    pub full_width: u32,
    /// Physical output height.
    pub full_height: u32,
}

impl Viewport {
    /// The only viewport this target has.
    pub const fn fixed() -> Self {
        Self {
            x: 0,
            y: 0,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            full_width: SCREEN_WIDTH,
            full_height: SCREEN_HEIGHT,
        }
    }
}
