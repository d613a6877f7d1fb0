//! Platform drivers that present an emulation frontend's audio, video and input on a fixed
//! 640x480 console target.
//!
//! The video driver is the substantial part:
//! - [`video::scaler`] resamples frontend frames into the display raster,
//! - [`video::glyph`] blends on-screen messages from a [`GlyphAtlas`],
//! - [`video::assembler`] chooses between game frames and the menu texture every tick,
//! - [`video::present`] uploads the packed 24-bit result and waits for the display.
//!
//! Hardware access goes through the [`hal`] traits; [`SoftwareConsole`] implements them in
//! memory for hosts and tests.
#![forbid(unsafe_code)]

mod foundation;

pub mod audio;
pub mod config;
pub mod hal;
pub mod joypad;
pub mod platform;
pub mod video;

pub use audio::{AudioDriver, PsxAudio};
pub use config::{AudioSettings, DriverConfig, InputSettings, VideoSettings};
pub use foundation::core::{
    DRAW_ENV_HEIGHT, PixelFormat, Rgb8, SCREEN_HEIGHT, SCREEN_WIDTH, Viewport,
};
pub use foundation::error::{DriverError, DriverResult};
pub use hal::{DisplayHal, HalEvent, PadHal, SoftwareConsole, SoundHal};
pub use joypad::{AxisBinding, Bind, JoypadDriver, PsxJoypad, RetroButton};
pub use platform::{DefaultDirs, MountInfo, VBlankCounter};
pub use video::assembler::{FrameAssembler, FrameSource};
pub use video::driver::{FrameSubmission, PsxVideo, VideoCaps, VideoDriver, VideoHandle};
pub use video::font::{GlyphAtlas, GlyphMetrics};
pub use video::frame::Frame;
pub use video::glyph::{PenAdvance, composite};
pub use video::present::PresentationSurface;
pub use video::scaler::{ScaleFilter, ScalerContext, convert};
pub use video::surface::{PresentationImage, RasterSurface};
