//! Video presentation pipeline.
//!
//! Per tick: [`assembler`] picks the game frame or the menu texture, [`scaler`] resamples it
//! into the display raster, [`glyph`] blends the on-screen message, and [`present`] uploads the
//! packed 24-bit image to the display controller.

pub mod assembler;
pub mod driver;
pub mod font;
pub mod frame;
pub mod glyph;
pub mod present;
pub mod scaler;
pub mod surface;
