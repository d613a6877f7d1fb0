use std::path::PathBuf;

use super::*;
use crate::hal::{HalEvent, ImageMode, SoftwareConsole};

fn argb_frame(argb: u32, w: u32, h: u32) -> Vec<u8> {
    (0..w * h).flat_map(|_| argb.to_le_bytes()).collect()
}

fn rgb32_settings() -> VideoSettings {
    VideoSettings {
        rgb32: true,
        ..VideoSettings::default()
    }
}

#[test]
fn init_programs_display_then_nothing_else() {
    let mut hal = SoftwareConsole::new();
    let video = PsxVideo::init(&mut hal, &VideoSettings::default());
    drop(video);

    assert_eq!(
        hal.events(),
        &[
            HalEvent::VideoMode(VideoMode {
                width: 640,
                height: 480,
                standard: VideoStandard::Ntsc,
                interlaced: true,
            }),
            HalEvent::DispEnv(DispEnv { x: 0, y: 0 }),
            HalEvent::DrawEnv(DrawEnv {
                x: 0,
                y: 0,
                w: 640,
                h: 512,
                dither: false,
                draw_on_display: true,
                ignore_mask: false,
                set_mask: false,
            }),
        ]
    );
}

#[test]
fn missing_font_file_disables_messages_only() {
    let settings = VideoSettings {
        font_path: Some(PathBuf::from("/nonexistent/psx-drivers/font.ttf")),
        ..rgb32_settings()
    };
    let mut video = PsxVideo::init(SoftwareConsole::new(), &settings);
    assert!(video.atlas().is_none());

    let px = argb_frame(0xFF10_2030, 4, 4);
    let frame = FrameSubmission::new(&px, 4, 4, 16, PixelFormat::Argb8888).with_message("HELLO");
    assert!(video.render(&frame));
    assert!(video.raster().pixels().iter().all(|&p| p == 0xFF10_2030));
}

#[test]
fn oversized_font_disables_messages_only() {
    let settings = VideoSettings {
        font_size: 1e9,
        ..rgb32_settings()
    };
    assert!(
        crate::DriverConfig {
            video: settings.clone(),
            ..Default::default()
        }
        .validate()
        .is_err()
    );

    let mut video = PsxVideo::init(SoftwareConsole::new(), &settings);
    assert!(video.atlas().is_none());
    let px = argb_frame(0xFF40_4040, 4, 4);
    let frame = FrameSubmission::new(&px, 4, 4, 16, PixelFormat::Argb8888).with_message("HELLO");
    assert!(video.render(&frame));
    assert!(video.raster().pixels().iter().all(|&p| p == 0xFF40_4040));
}

#[test]
fn disabled_font_loads_no_atlas() {
    let settings = VideoSettings {
        font_enable: false,
        ..VideoSettings::default()
    };
    let video = PsxVideo::init(SoftwareConsole::new(), &settings);
    assert!(video.atlas().is_none());
}

#[test]
fn render_uploads_packed_rgb() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &rgb32_settings());
    assert!(video.read_frame().is_none());

    let px = argb_frame(0xFF11_2233, 2, 2);
    assert!(video.render(&FrameSubmission::new(&px, 2, 2, 8, PixelFormat::Argb8888)));

    let hal = video.hal();
    assert_eq!(hal.upload_count(), 1);
    let desc = hal.last_upload().unwrap();
    assert_eq!(desc.mode, ImageMode::Rgb24);
    assert_eq!((desc.w, desc.h), (640, 480));
    assert_eq!(hal.vram().len(), 640 * 480 * 3);
    assert!(hal.vram().chunks_exact(3).all(|c| c == [0x11, 0x22, 0x33]));

    let shot = video.read_frame().unwrap();
    assert_eq!(shot.dimensions(), (640, 480));
    assert_eq!(shot.get_pixel(639, 479).0, [0x11, 0x22, 0x33]);
}

#[test]
fn malformed_frame_is_rejected_without_upload() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &rgb32_settings());
    let px = argb_frame(0xFFFF_FFFF, 4, 4);

    // Pitch shorter than a row.
    assert!(!video.render(&FrameSubmission::new(&px, 4, 4, 8, PixelFormat::Argb8888)));
    // Buffer too small for the height.
    assert!(!video.render(&FrameSubmission::new(&px, 4, 8, 16, PixelFormat::Argb8888)));
    // Pitch not a whole number of pixels.
    assert!(!video.render(&FrameSubmission::new(&px, 2, 2, 10, PixelFormat::Argb8888)));

    assert_eq!(video.hal().upload_count(), 0);
    assert!(video.raster().pixels().iter().all(|&p| p == 0xFF00_0000));
}

#[test]
fn menu_ignores_even_malformed_frames() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &rgb32_settings());
    video.set_texture(&argb_frame(0xFFFF_0000, 2, 2), true, 2, 2, 1.0);
    video.set_texture_enabled(true);

    assert!(video.render(&FrameSubmission::new(&[0; 3], 4, 4, 16, PixelFormat::Argb8888)));
    assert!(video.hal().vram().chunks_exact(3).all(|c| c == [0xFF, 0, 0]));
}

#[test]
fn dupe_presents_previous_frame_again() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &rgb32_settings());
    let px = argb_frame(0xFF12_3456, 3, 3);
    assert!(video.render(&FrameSubmission::new(&px, 3, 3, 12, PixelFormat::Argb8888)));
    assert!(video.render(&FrameSubmission::dupe()));

    let fingerprints: Vec<u64> = video
        .hal()
        .events()
        .iter()
        .filter_map(|e| match e {
            HalEvent::Upload { fingerprint, .. } => Some(*fingerprint),
            _ => None,
        })
        .collect();
    assert_eq!(fingerprints.len(), 2);
    assert_eq!(fingerprints[0], fingerprints[1]);
}

#[test]
fn message_uses_configured_color_and_explicit_anchor() {
    let settings = VideoSettings {
        font_size: 8.0,
        msg_color: [0.0, 0.0, 1.0],
        ..rgb32_settings()
    };
    let mut video = PsxVideo::init(SoftwareConsole::new(), &settings);
    let px = argb_frame(0xFF00_0000, 1, 1);
    let frame =
        FrameSubmission::new(&px, 1, 1, 4, PixelFormat::Argb8888).with_message_at("#", 0.5, 0.5);
    assert!(video.render(&frame));

    let raster = video.raster();
    let blue = raster.pixels().iter().filter(|&&p| p == 0xFF00_00FF).count();
    assert!(blue > 0);
    // Glyph box is 8x8 above the pen at (320, 240).
    for y in 0..480 {
        for x in 0..640 {
            let inside = (320..328).contains(&x) && (232..240).contains(&y);
            if !inside {
                assert_eq!(raster.pixel(x, y), Some(0xFF00_0000), "({x},{y})");
            }
        }
    }
}

#[test]
fn reload_font_keeps_current_atlas_on_error() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &VideoSettings::default());
    assert!(video.atlas().is_some());

    let bad = VideoSettings {
        font_path: Some(PathBuf::from("/nonexistent/psx-drivers/font.otf")),
        ..VideoSettings::default()
    };
    assert!(video.reload_font(&bad).is_err());
    assert!(video.atlas().is_some());

    let off = VideoSettings {
        font_enable: false,
        ..VideoSettings::default()
    };
    video.reload_font(&off).unwrap();
    assert!(video.atlas().is_none());
}

#[test]
fn fixed_queries() {
    let mut video = PsxVideo::init(SoftwareConsole::new(), &VideoSettings::default());
    assert_eq!(video.viewport(), Viewport::fixed());
    assert_eq!(video.capabilities(), VideoCaps::SCREENSHOTS);
    assert!(video.alive());
    assert!(video.focused());
    assert!(video.has_windowed());
    assert!(!video.suspend_screensaver(true));
    assert!(!video.set_shader(Some(Path::new("crt.slangp"))));
    video.set_nonblock_state(true);
    assert!(video.nonblock());
    video.show_mouse(true);
    video.grab_mouse_toggle();
    video.apply_state_changes();
    assert_eq!(video.hal().upload_count(), 0);
}

#[test]
fn freed_handle_is_a_successful_no_op() {
    let mut hal = SoftwareConsole::new();
    {
        let mut handle = VideoHandle::init(&mut hal, &VideoSettings::default());
        assert!(handle.is_alive());
        handle.free();
        handle.free();
        assert!(!handle.is_alive());

        let px = argb_frame(0, 2, 2);
        assert!(handle.render(&FrameSubmission::new(&px, 2, 2, 4, PixelFormat::Rgb565)));
        assert!(handle.render(&FrameSubmission::dupe()));
        handle.set_texture(&px, true, 1, 1, 1.0);
        handle.set_texture_enabled(true);
        handle.set_smooth(true);
        assert!(handle.read_frame().is_none());
        assert_eq!(handle.viewport(), Viewport::fixed());
        assert!(handle.reload_font(&VideoSettings::default()).is_ok());
    }
    assert_eq!(hal.upload_count(), 0);
}

#[test]
fn handle_forwards_to_live_driver() {
    let mut handle = VideoHandle::init(SoftwareConsole::new(), &rgb32_settings());
    let px = argb_frame(0xFF00_FF00, 2, 2);
    assert!(handle.render(&FrameSubmission::new(&px, 2, 2, 8, PixelFormat::Argb8888)));
    assert_eq!(handle.capabilities(), VideoCaps::SCREENSHOTS);
    assert!(handle.alive());
    let driver = handle.driver().unwrap();
    assert_eq!(driver.hal().upload_count(), 1);
    assert_eq!(driver.present_surface().upload_count(), 1);
}
