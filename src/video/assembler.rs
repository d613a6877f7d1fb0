use crate::foundation::core::{PixelFormat, Rgb8};
use crate::foundation::error::DriverResult;
use crate::video::font::GlyphAtlas;
use crate::video::frame::Frame;
use crate::video::glyph::composite;
use crate::video::scaler::{ScaleFilter, ScalerContext, convert};
use crate::video::surface::RasterSurface;

/// Producer selected for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSource {
    /// Emulated game output, optionally with a message overlay.
    Game,
    /// The last pushed menu texture.
    Menu,
}

/// Text overlay requested alongside a game frame.
#[derive(Clone, Copy, Debug)]
pub struct Message<'a> {
    /// Text to draw; empty means no overlay.
    pub text: &'a str,
    /// Horizontal anchor, fraction of the width from the left.
    pub x: f32,
    /// Vertical anchor, fraction of the height from the bottom.
    pub y: f32,
    /// Text color.
    pub color: Rgb8,
}

/// What a single tick wrote into the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assembled {
    /// A game frame was converted.
    Game,
    /// The previous raster was kept.
    Dupe,
    /// The menu staging buffer was copied.
    Menu,
}

/// Builds the display raster for each tick from either the game frame or the menu texture.
///
/// The menu path converts at push time into its own staging surface, so a menu tick is a copy.
#[derive(Debug)]
pub struct FrameAssembler {
    game_ctx: ScalerContext,
    menu_ctx: ScalerContext,
    menu_staging: RasterSurface,
    menu_active: bool,
}

impl FrameAssembler {
    /// Assembler for `width`x`height` output.
    pub fn new(width: u32, height: u32, smooth: bool, rgb32: bool) -> Self {
        Self {
            game_ctx: ScalerContext::new(
                PixelFormat::for_game(rgb32),
                ScaleFilter::from_smooth(smooth),
            ),
            menu_ctx: ScalerContext::new(PixelFormat::for_menu(true), ScaleFilter::Bilinear),
            menu_staging: RasterSurface::new(width, height),
            menu_active: false,
        }
    }

    /// Producer the next tick will use.
    pub fn source(&self) -> FrameSource {
        if self.menu_active {
            FrameSource::Menu
        } else {
            FrameSource::Game
        }
    }

    /// Whether menu ticks are selected.
    pub fn menu_active(&self) -> bool {
        self.menu_active
    }

    /// Select or deselect the menu producer.
    pub fn set_menu_active(&mut self, active: bool) {
        if active != self.menu_active {
            tracing::debug!(active, "menu texture toggled");
        }
        self.menu_active = active;
    }

    /// Filter of the game path; the menu path always filters bilinearly.
    pub fn set_smooth(&mut self, smooth: bool) {
        let filter = ScaleFilter::from_smooth(smooth);
        if filter != self.game_ctx.filter() {
            tracing::debug!(?filter, "game scaler filter changed");
            self.game_ctx.set_filter(filter);
        }
    }

    /// Game-path scaler configuration.
    pub fn game_context(&self) -> &ScalerContext {
        &self.game_ctx
    }

    /// Menu-path scaler configuration.
    pub fn menu_context(&self) -> &ScalerContext {
        &self.menu_ctx
    }

    /// Converted menu image.
    pub fn menu_staging(&self) -> &RasterSurface {
        &self.menu_staging
    }

    /// Convert a menu texture into the staging surface.
    ///
    /// On error the previous staging contents are kept.
    pub fn push_menu_texture(
        &mut self,
        data: &[u8],
        rgb32: bool,
        width: u32,
        height: u32,
    ) -> DriverResult<()> {
        let frame = Frame::packed(data, width, height, PixelFormat::for_menu(rgb32))?;
        convert(&mut self.menu_staging, &frame, &mut self.menu_ctx);
        Ok(())
    }

    /// Fill `raster` for one tick.
    ///
    /// Menu ticks ignore `frame` and `message`. A game tick without a frame keeps the raster
    /// as it is; the overlay already blended into it is not drawn a second time.
    pub fn assemble(
        &mut self,
        raster: &mut RasterSurface,
        frame: Option<&Frame<'_>>,
        message: Option<Message<'_>>,
        atlas: Option<&GlyphAtlas>,
    ) -> Assembled {
        if self.menu_active {
            raster.copy_from(&self.menu_staging);
            return Assembled::Menu;
        }

        let Some(frame) = frame else {
            return Assembled::Dupe;
        };
        convert(raster, frame, &mut self.game_ctx);

        if let Some(msg) = message.filter(|m| !m.text.is_empty()) {
            let adv = composite(raster, atlas, msg.text, msg.x, msg.y, msg.color);
            tracing::trace!(text = msg.text, advance = adv.x, "message composited");
        }
        Assembled::Game
    }

    /// Release scaler tables and scratch memory.
    pub fn release(&mut self) {
        self.game_ctx.reset();
        self.menu_ctx.reset();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/assembler.rs"]
mod tests;
