//! Console SDK capabilities consumed by the drivers.
//!
//! The drivers never touch hardware directly; they call through these traits. On target the
//! implementation forwards to the SDK, on a host [`SoftwareConsole`] stands in for it.

mod software;

pub use software::{EVENT_LOG_CAPACITY, HalEvent, SoftwareConsole};

/// Television standard for the display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoStandard {
    /// 60 Hz.
    Ntsc,
    /// 50 Hz.
    Pal,
}

/// Display mode programmed once at init.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMode {
    /// Horizontal resolution.
    pub width: u32,
    /// Vertical resolution.
    pub height: u32,
    /// Refresh standard.
    pub standard: VideoStandard,
    /// Interlaced scan-out, required for 480 lines.
    pub interlaced: bool,
}

/// Top-left of the displayed VRAM region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispEnv {
    /// VRAM x.
    pub x: u32,
    /// VRAM y.
    pub y: u32,
}

/// Drawing area and draw-time flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawEnv {
    /// VRAM x.
    pub x: u32,
    /// VRAM y.
    pub y: u32,
    /// Drawing area width.
    pub w: u32,
    /// Drawing area height.
    pub h: u32,
    /// Ordered dithering of 24-bit sources.
    pub dither: bool,
    /// Allow drawing into the displayed area.
    pub draw_on_display: bool,
    /// Ignore the mask bit when drawing.
    pub ignore_mask: bool,
    /// Set the mask bit on drawn pixels.
    pub set_mask: bool,
}

/// Pixel mode of an uploaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMode {
    /// 24-bit packed RGB, no palette.
    Rgb24,
}

/// Header describing an image transfer into VRAM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    /// Pixel layout of the payload.
    pub mode: ImageMode,
    /// Destination x in VRAM.
    pub x: u32,
    /// Destination y in VRAM.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

/// Display controller.
pub trait DisplayHal {
    /// Program resolution and scan mode.
    fn set_video_mode(&mut self, mode: VideoMode);
    /// Program the displayed region.
    fn set_disp_env(&mut self, env: DispEnv);
    /// Program the drawing region.
    fn set_draw_env(&mut self, env: DrawEnv);
    /// Start an asynchronous transfer of `pixels` into VRAM.
    fn upload_image(&mut self, desc: &ImageDesc, pixels: &[u8]);
    /// Whether the last transfer is still in flight.
    fn is_drawing(&mut self) -> bool;
}

/// Maximum SPU voice volume.
pub const SPU_MAX_VOLUME: u16 = 0x3FFF;
/// First SPU RAM address available for sample data.
pub const SPU_DATA_BASE_ADDR: u32 = 0x1010;

/// SPU sample descriptor, modeled after the SDK's VAG header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleVoice {
    /// Header version.
    pub version: u32,
    /// Payload size in bytes.
    pub data_size: usize,
    /// Playback rate in Hz.
    pub sample_rate: u32,
    /// Sample name.
    pub name: [u8; 8],
    /// SPU RAM address of the payload.
    pub spu_addr: u32,
    /// Voice index the sample plays on.
    pub voice: u8,
}

/// Sound processing unit.
pub trait SoundHal {
    /// Copy sample data into SPU RAM at `voice.spu_addr`.
    fn upload_samples(&mut self, voice: &SampleVoice, samples: &[u8]);
    /// Start playback with per-side volume.
    fn play(&mut self, voice: &SampleVoice, left: u16, right: u16);
    /// Stop playback.
    fn stop(&mut self, voice: &SampleVoice);
}

bitflags::bitflags! {
    /// Raw button bits reported by the pad controller.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PadButtons: u16 {
        /// Select.
        const SELECT = 1 << 0;
        /// Left stick click.
        const L3 = 1 << 1;
        /// Right stick click.
        const R3 = 1 << 2;
        /// Start.
        const START = 1 << 3;
        /// D-pad up.
        const UP = 1 << 4;
        /// D-pad right.
        const RIGHT = 1 << 5;
        /// D-pad down.
        const DOWN = 1 << 6;
        /// D-pad left.
        const LEFT = 1 << 7;
        /// L2.
        const L2 = 1 << 8;
        /// R2.
        const R2 = 1 << 9;
        /// L1.
        const L1 = 1 << 10;
        /// R1.
        const R1 = 1 << 11;
        /// Triangle.
        const TRIANGLE = 1 << 12;
        /// Circle.
        const CIRCLE = 1 << 13;
        /// Cross.
        const CROSS = 1 << 14;
        /// Square.
        const SQUARE = 1 << 15;
    }
}

/// One pad poll result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadState {
    /// Held buttons.
    pub buttons: PadButtons,
    /// Raw stick bytes, `[left, right]` then `[x, y]`; 0x80 is centered.
    pub analog: [[u8; 2]; 2],
}

impl Default for PadState {
    fn default() -> Self {
        Self {
            buttons: PadButtons::empty(),
            analog: [[0x80; 2]; 2],
        }
    }
}

/// Pad controller.
pub trait PadHal {
    /// Read the current state of a physical port.
    fn poll_pad(&mut self, port: usize) -> PadState;
}

impl<T: DisplayHal + ?Sized> DisplayHal for &mut T {
    fn set_video_mode(&mut self, mode: VideoMode) {
        (**self).set_video_mode(mode);
    }

    fn set_disp_env(&mut self, env: DispEnv) {
        (**self).set_disp_env(env);
    }

    fn set_draw_env(&mut self, env: DrawEnv) {
        (**self).set_draw_env(env);
    }

    fn upload_image(&mut self, desc: &ImageDesc, pixels: &[u8]) {
        (**self).upload_image(desc, pixels);
    }

    fn is_drawing(&mut self) -> bool {
        (**self).is_drawing()
    }
}

impl<T: SoundHal + ?Sized> SoundHal for &mut T {
    fn upload_samples(&mut self, voice: &SampleVoice, samples: &[u8]) {
        (**self).upload_samples(voice, samples);
    }

    fn play(&mut self, voice: &SampleVoice, left: u16, right: u16) {
        (**self).play(voice, left, right);
    }

    fn stop(&mut self, voice: &SampleVoice) {
        (**self).stop(voice);
    }
}

impl<T: PadHal + ?Sized> PadHal for &mut T {
    fn poll_pad(&mut self, port: usize) -> PadState {
        (**self).poll_pad(port)
    }
}
