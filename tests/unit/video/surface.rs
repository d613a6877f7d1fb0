use super::*;

#[test]
fn new_surface_is_opaque_black() {
    let s = RasterSurface::new(3, 2);
    assert!(s.pixels().iter().all(|&p| p == 0xFF00_0000));
    assert_eq!(s.pixel(3, 0), None);
    assert_eq!(s.pixel(2, 1), Some(0xFF00_0000));
}

#[test]
fn presentation_uses_row_major_stride() {
    let mut raster = RasterSurface::new(4, 3);
    for y in 0..3u32 {
        for x in 0..4u32 {
            raster.pixels_mut()[(y * 4 + x) as usize] = 0xFF00_0000 | (x << 16) | (y << 8) | 0x7F;
        }
    }
    let mut img = PresentationImage::new(4, 3);
    img.derive_from(&raster);

    for y in 0..3u32 {
        for x in 0..4u32 {
            let i = ((y * 4 + x) as usize) * PRESENTATION_BPP;
            assert_eq!(&img.as_bytes()[i..i + 3], &[x as u8, y as u8, 0x7F]);
        }
    }
}

#[test]
fn presentation_drops_alpha() {
    let mut raster = RasterSurface::new(1, 1);
    raster.fill(0x0011_2233);
    let mut img = PresentationImage::new(1, 1);
    img.derive_from(&raster);
    assert_eq!(img.as_bytes(), &[0x11, 0x22, 0x33]);
}

#[test]
fn presentation_follows_raster_size() {
    let raster = RasterSurface::new(5, 2);
    let mut img = PresentationImage::new(1, 1);
    img.derive_from(&raster);
    assert_eq!((img.width(), img.height()), (5, 2));
    assert_eq!(img.as_bytes().len(), 5 * 2 * PRESENTATION_BPP);
}

#[test]
fn screenshot_matches_bytes() {
    let mut raster = RasterSurface::new(2, 1);
    raster.pixels_mut().copy_from_slice(&[0xFFFF_0000, 0xFF00_00FF]);
    let mut img = PresentationImage::new(2, 1);
    img.derive_from(&raster);
    let shot = img.to_rgb_image().unwrap();
    assert_eq!(shot.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(shot.get_pixel(1, 0).0, [0, 0, 255]);
}
