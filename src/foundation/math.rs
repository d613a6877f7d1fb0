/// Linear alpha blend of one 8-bit channel: `(bg * (255 - a) + fg * a) / 255`.
#[inline]
pub(crate) fn blend_channel(bg: u32, fg: u32, alpha: u32) -> u32 {
    (bg * (255 - alpha) + fg * alpha) / 255
}

/// Blend an opaque foreground over an ARGB word, keeping the destination alpha byte.
#[inline]
pub(crate) fn blend_argb(dst: u32, fg_r: u32, fg_g: u32, fg_b: u32, alpha: u32) -> u32 {
    let r = blend_channel((dst >> 16) & 0xFF, fg_r, alpha);
    let g = blend_channel((dst >> 8) & 0xFF, fg_g, alpha);
    let b = blend_channel(dst & 0xFF, fg_b, alpha);
    (dst & 0xFF00_0000) | (r << 16) | (g << 8) | b
}

/// Interpolate two ARGB words with an 8-bit weight `w` in `0..=255` toward `b`.
#[inline]
pub(crate) fn lerp_argb(a: u32, b: u32, w: u32) -> u32 {
    if w == 0 {
        return a;
    }
    let iw = 256 - w;
    let mut out = 0u32;
    for shift in [0u32, 8, 16, 24] {
        let ca = (a >> shift) & 0xFF;
        let cb = (b >> shift) & 0xFF;
        out |= (((ca * iw + cb * w) >> 8) & 0xFF) << shift;
    }
    out
}

/// Expand a little-endian RGB565 word to opaque ARGB8888 by bit replication.
#[inline]
pub(crate) fn rgb565_to_argb(px: u16) -> u32 {
    let px = u32::from(px);
    let r5 = (px >> 11) & 0x1F;
    let g6 = (px >> 5) & 0x3F;
    let b5 = px & 0x1F;
    let r = (r5 << 3) | (r5 >> 2);
    let g = (g6 << 2) | (g6 >> 4);
    let b = (b5 << 3) | (b5 >> 2);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// Expand a little-endian RGBA4444 word to ARGB8888 (each nibble times 17).
#[inline]
pub(crate) fn rgba4444_to_argb(px: u16) -> u32 {
    let px = u32::from(px);
    let r = ((px >> 12) & 0xF) * 17;
    let g = ((px >> 8) & 0xF) * 17;
    let b = ((px >> 4) & 0xF) * 17;
    let a = (px & 0xF) * 17;
    (a << 24) | (r << 16) | (g << 8) | b
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
