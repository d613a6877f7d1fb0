//! Frontend-facing video driver.
//!
//! [`PsxVideo`] owns every buffer and context the pipeline needs and is created once per
//! session. [`VideoHandle`] is what the frontend keeps: it outlives teardown and turns calls on
//! a released driver into successful no-ops.

use std::path::Path;

use crate::config::VideoSettings;
use crate::foundation::core::{
    DRAW_ENV_HEIGHT, PixelFormat, Rgb8, SCREEN_HEIGHT, SCREEN_WIDTH, Viewport,
};
use crate::foundation::error::DriverResult;
use crate::hal::{DispEnv, DisplayHal, DrawEnv, VideoMode, VideoStandard};
use crate::video::assembler::{FrameAssembler, Message};
use crate::video::font::GlyphAtlas;
use crate::video::frame::Frame;
use crate::video::present::PresentationSurface;
use crate::video::surface::{PresentationImage, RasterSurface};

bitflags::bitflags! {
    /// Optional video features a driver may report.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VideoCaps: u32 {
        /// The last presented frame can be read back.
        const SCREENSHOTS = 1 << 0;
    }
}

/// One frame handed over by the frontend.
#[derive(Clone, Copy, Debug)]
pub struct FrameSubmission<'a> {
    /// Pixel data, or `None` to re-present the previous frame.
    pub data: Option<&'a [u8]>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes between row starts.
    pub pitch: usize,
    /// Encoding of `data`.
    pub format: PixelFormat,
    /// On-screen message; empty for none.
    pub message: &'a str,
    /// Horizontal message anchor; the configured default when `None`.
    pub message_x: Option<f32>,
    /// Vertical message anchor; the configured default when `None`.
    pub message_y: Option<f32>,
}

impl<'a> FrameSubmission<'a> {
    /// Submission of `data` with no message.
    pub fn new(data: &'a [u8], width: u32, height: u32, pitch: usize, format: PixelFormat) -> Self {
        Self {
            data: Some(data),
            width,
            height,
            pitch,
            format,
            message: "",
            message_x: None,
            message_y: None,
        }
    }

    /// Submission without pixel data: the previous frame is shown again.
    pub fn dupe() -> Self {
        Self {
            data: None,
            width: 0,
            height: 0,
            pitch: 0,
            format: PixelFormat::Argb8888,
            message: "",
            message_x: None,
            message_y: None,
        }
    }

    /// Attach an on-screen message at the configured position.
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }

    /// Attach an on-screen message at an explicit anchor.
    pub fn with_message_at(mut self, message: &'a str, x: f32, y: f32) -> Self {
        self.message = message;
        self.message_x = Some(x);
        self.message_y = Some(y);
        self
    }
}

/// Operations the frontend performs on a video driver.
pub trait VideoDriver {
    /// Present one frame. Returns whether the submission was accepted.
    fn render(&mut self, frame: &FrameSubmission<'_>) -> bool;
    /// Replace the menu texture. `alpha` is the frontend's menu opacity.
    fn set_texture(&mut self, data: &[u8], rgb32: bool, width: u32, height: u32, alpha: f32);
    /// Show the menu texture instead of game frames.
    fn set_texture_enabled(&mut self, enabled: bool);
    /// Bilinear (`true`) or point filtering of game frames.
    fn set_smooth(&mut self, smooth: bool);
    /// Output rectangle.
    fn viewport(&self) -> Viewport;
    /// Feature bits.
    fn capabilities(&self) -> VideoCaps;
    /// Whether the output is still open.
    fn alive(&self) -> bool;
    /// Whether the output has input focus.
    fn focused(&self) -> bool;
    /// Ask the platform to suppress the screensaver. Returns whether it did.
    fn suspend_screensaver(&mut self, enable: bool) -> bool;
    /// Whether the output can run in a window.
    fn has_windowed(&self) -> bool;
    /// Load a shader preset. Returns whether it was applied.
    fn set_shader(&mut self, path: Option<&Path>) -> bool;
    /// Toggle vsync-free presentation.
    fn set_nonblock_state(&mut self, nonblock: bool);
    fn show_mouse(&mut self, visible: bool);
    fn grab_mouse_toggle(&mut self);
    fn apply_state_changes(&mut self);
    /// Copy of the last presented frame.
    fn read_frame(&self) -> Option<image::RgbImage>;
}

/// Video driver for the console display.
#[derive(Debug)]
pub struct PsxVideo<H: DisplayHal> {
    present: PresentationSurface<H>,
    assembler: FrameAssembler,
    raster: RasterSurface,
    image: PresentationImage,
    atlas: Option<GlyphAtlas>,
    msg_color: Rgb8,
    msg_pos: (f32, f32),
    presented: bool,
    nonblock: bool,
}

impl<H: DisplayHal> PsxVideo<H> {
    /// Program the display and allocate the pipeline.
    ///
    /// A font that fails to load only disables the message overlay.
    #[tracing::instrument(skip(hal, settings), fields(smooth = settings.smooth, rgb32 = settings.rgb32))]
    pub fn init(mut hal: H, settings: &VideoSettings) -> Self {
        tracing::info!(
            width = SCREEN_WIDTH,
            height = SCREEN_HEIGHT,
            "initializing video"
        );
        hal.set_video_mode(VideoMode {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            standard: VideoStandard::Ntsc,
            interlaced: true,
        });
        hal.set_disp_env(DispEnv { x: 0, y: 0 });
        hal.set_draw_env(DrawEnv {
            x: 0,
            y: 0,
            w: SCREEN_WIDTH,
            h: DRAW_ENV_HEIGHT,
            dither: false,
            draw_on_display: true,
            ignore_mask: false,
            set_mask: false,
        });

        let atlas = match GlyphAtlas::load(settings) {
            Ok(atlas) => atlas,
            Err(err) => {
                tracing::warn!(%err, "could not initialize fonts, messages disabled");
                None
            }
        };

        Self {
            present: PresentationSurface::new(hal),
            assembler: FrameAssembler::new(
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
                settings.smooth,
                settings.rgb32,
            ),
            raster: RasterSurface::screen(),
            image: PresentationImage::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            atlas,
            msg_color: settings.message_color(),
            msg_pos: (settings.msg_pos_x, settings.msg_pos_y),
            presented: false,
            nonblock: false,
        }
    }

    /// Rebuild the glyph atlas and message style from `settings`.
    ///
    /// On error the current font stays in place.
    pub fn reload_font(&mut self, settings: &VideoSettings) -> DriverResult<()> {
        let atlas = GlyphAtlas::load(settings)?;
        tracing::debug!(glyphs = atlas.as_ref().map_or(0, GlyphAtlas::len), "font reloaded");
        self.atlas = atlas;
        self.msg_color = settings.message_color();
        self.msg_pos = (settings.msg_pos_x, settings.msg_pos_y);
        Ok(())
    }

    /// Loaded glyph atlas, if any.
    pub fn atlas(&self) -> Option<&GlyphAtlas> {
        self.atlas.as_ref()
    }

    /// Current display raster.
    pub fn raster(&self) -> &RasterSurface {
        &self.raster
    }

    /// Image handed to the display by the last upload.
    pub fn presentation(&self) -> &PresentationImage {
        &self.image
    }

    /// Game/menu selection state and scaler contexts.
    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    /// Upload path, with its upload and idle-poll counters.
    pub fn present_surface(&self) -> &PresentationSurface<H> {
        &self.present
    }

    /// Display capability the driver owns.
    pub fn hal(&self) -> &H {
        self.present.hal()
    }

    /// Mutable access to the display capability.
    pub fn hal_mut(&mut self) -> &mut H {
        self.present.hal_mut()
    }

    /// Last value passed to `set_nonblock_state`.
    pub fn nonblock(&self) -> bool {
        self.nonblock
    }
}

impl<H: DisplayHal> VideoDriver for PsxVideo<H> {
    fn render(&mut self, submission: &FrameSubmission<'_>) -> bool {
        let frame = match submission.data {
            Some(data) if !self.assembler.menu_active() => {
                match Frame::new(
                    data,
                    submission.width,
                    submission.height,
                    submission.pitch,
                    submission.format,
                ) {
                    Ok(frame) => Some(frame),
                    Err(err) => {
                        tracing::warn!(%err, "frame rejected");
                        return false;
                    }
                }
            }
            _ => None,
        };

        let message = Message {
            text: submission.message,
            x: submission.message_x.unwrap_or(self.msg_pos.0),
            y: submission.message_y.unwrap_or(self.msg_pos.1),
            color: self.msg_color,
        };
        let assembled = self.assembler.assemble(
            &mut self.raster,
            frame.as_ref(),
            Some(message),
            self.atlas.as_ref(),
        );

        self.image.derive_from(&self.raster);
        self.present.upload(&self.image);
        self.presented = true;
        tracing::trace!(?assembled, "frame presented");
        true
    }

    fn set_texture(&mut self, data: &[u8], rgb32: bool, width: u32, height: u32, alpha: f32) {
        tracing::trace!(width, height, rgb32, alpha, "menu texture pushed");
        if let Err(err) = self
            .assembler
            .push_menu_texture(data, rgb32, width, height)
        {
            tracing::warn!(%err, "menu texture rejected, keeping previous image");
        }
    }

    fn set_texture_enabled(&mut self, enabled: bool) {
        self.assembler.set_menu_active(enabled);
    }

    fn set_smooth(&mut self, smooth: bool) {
        self.assembler.set_smooth(smooth);
    }

    fn viewport(&self) -> Viewport {
        Viewport::fixed()
    }

    fn capabilities(&self) -> VideoCaps {
        VideoCaps::SCREENSHOTS
    }

    fn alive(&self) -> bool {
        true
    }

    fn focused(&self) -> bool {
        true
    }

    fn suspend_screensaver(&mut self, _enable: bool) -> bool {
        false
    }

    fn has_windowed(&self) -> bool {
        true
    }

    fn set_shader(&mut self, path: Option<&Path>) -> bool {
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "shaders are not supported");
        }
        false
    }

    fn set_nonblock_state(&mut self, nonblock: bool) {
        self.nonblock = nonblock;
    }

    fn show_mouse(&mut self, _visible: bool) {}

    fn grab_mouse_toggle(&mut self) {}

    fn apply_state_changes(&mut self) {}

    fn read_frame(&self) -> Option<image::RgbImage> {
        if !self.presented {
            return None;
        }
        self.image.to_rgb_image()
    }
}

impl<H: DisplayHal> Drop for PsxVideo<H> {
    fn drop(&mut self) {
        self.assembler.release();
        tracing::info!(
            uploads = self.present.upload_count(),
            font = self.atlas.is_some(),
            "video driver released"
        );
    }
}

/// Handle the frontend holds on to across driver teardown.
///
/// Once [`free`](Self::free) has run, every operation is a no-op that reports success.
#[derive(Debug)]
pub struct VideoHandle<H: DisplayHal> {
    inner: Option<PsxVideo<H>>,
}

impl<H: DisplayHal> VideoHandle<H> {
    /// Initialize a driver on `hal` and wrap it.
    pub fn init(hal: H, settings: &VideoSettings) -> Self {
        Self::new(PsxVideo::init(hal, settings))
    }

    /// Wrap an existing driver.
    pub fn new(video: PsxVideo<H>) -> Self {
        Self { inner: Some(video) }
    }

    /// Tear the driver down. Safe to call more than once.
    pub fn free(&mut self) {
        if self.inner.take().is_none() {
            tracing::debug!("video driver already released");
        }
    }

    /// Whether a driver is still attached.
    pub fn is_alive(&self) -> bool {
        self.inner.is_some()
    }

    /// The attached driver, `None` after [`VideoHandle::free`].
    pub fn driver(&self) -> Option<&PsxVideo<H>> {
        self.inner.as_ref()
    }

    /// Mutable access to the attached driver.
    pub fn driver_mut(&mut self) -> Option<&mut PsxVideo<H>> {
        self.inner.as_mut()
    }

    /// Rebuild the font of the attached driver; a no-op after teardown.
    pub fn reload_font(&mut self, settings: &VideoSettings) -> DriverResult<()> {
        match self.inner.as_mut() {
            Some(video) => video.reload_font(settings),
            None => Ok(()),
        }
    }
}

impl<H: DisplayHal> VideoDriver for VideoHandle<H> {
    fn render(&mut self, frame: &FrameSubmission<'_>) -> bool {
        self.inner.as_mut().is_none_or(|v| v.render(frame))
    }

    fn set_texture(&mut self, data: &[u8], rgb32: bool, width: u32, height: u32, alpha: f32) {
        if let Some(v) = self.inner.as_mut() {
            v.set_texture(data, rgb32, width, height, alpha);
        }
    }

    fn set_texture_enabled(&mut self, enabled: bool) {
        if let Some(v) = self.inner.as_mut() {
            v.set_texture_enabled(enabled);
        }
    }

    fn set_smooth(&mut self, smooth: bool) {
        if let Some(v) = self.inner.as_mut() {
            v.set_smooth(smooth);
        }
    }

    fn viewport(&self) -> Viewport {
        self.inner
            .as_ref()
            .map_or_else(Viewport::fixed, VideoDriver::viewport)
    }

    fn capabilities(&self) -> VideoCaps {
        self.inner
            .as_ref()
            .map_or(VideoCaps::empty(), VideoDriver::capabilities)
    }

    fn alive(&self) -> bool {
        self.inner.as_ref().is_some_and(VideoDriver::alive)
    }

    fn focused(&self) -> bool {
        self.inner.as_ref().is_some_and(VideoDriver::focused)
    }

    fn suspend_screensaver(&mut self, enable: bool) -> bool {
        self.inner
            .as_mut()
            .is_some_and(|v| v.suspend_screensaver(enable))
    }

    fn has_windowed(&self) -> bool {
        self.inner.as_ref().is_some_and(VideoDriver::has_windowed)
    }

    fn set_shader(&mut self, path: Option<&Path>) -> bool {
        self.inner.as_mut().is_some_and(|v| v.set_shader(path))
    }

    fn set_nonblock_state(&mut self, nonblock: bool) {
        if let Some(v) = self.inner.as_mut() {
            v.set_nonblock_state(nonblock);
        }
    }

    fn show_mouse(&mut self, visible: bool) {
        if let Some(v) = self.inner.as_mut() {
            v.show_mouse(visible);
        }
    }

    fn grab_mouse_toggle(&mut self) {
        if let Some(v) = self.inner.as_mut() {
            v.grab_mouse_toggle();
        }
    }

    fn apply_state_changes(&mut self) {
        if let Some(v) = self.inner.as_mut() {
            v.apply_state_changes();
        }
    }

    fn read_frame(&self) -> Option<image::RgbImage> {
        self.inner.as_ref().and_then(VideoDriver::read_frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/driver.rs"]
mod tests;
