use crate::hal::{DisplayHal, ImageDesc, ImageMode};
use crate::video::surface::PresentationImage;

/// Synchronous hand-off of presentation images to the display controller.
///
/// At most one transfer is in flight: [`upload`](Self::upload) waits for the previous one
/// before issuing and for its own before returning.
#[derive(Debug)]
pub struct PresentationSurface<H> {
    hal: H,
    uploads: u64,
    idle_polls: u64,
}

impl<H: DisplayHal> PresentationSurface<H> {
    /// Take ownership of the display capability.
    pub fn new(hal: H) -> Self {
        Self {
            hal,
            uploads: 0,
            idle_polls: 0,
        }
    }

    /// Spin until the display reports no transfer in flight. Returns the polls spent.
    pub fn wait_idle(&mut self) -> u64 {
        let mut polls = 0u64;
        while self.hal.is_drawing() {
            polls += 1;
            std::hint::spin_loop();
        }
        self.idle_polls += polls;
        polls
    }

    /// Copy `image` to VRAM at the origin and block until the transfer completes.
    pub fn upload(&mut self, image: &PresentationImage) {
        self.wait_idle();
        let desc = ImageDesc {
            mode: ImageMode::Rgb24,
            x: 0,
            y: 0,
            w: image.width(),
            h: image.height(),
        };
        self.hal.upload_image(&desc, image.as_bytes());
        self.uploads += 1;
        let polls = self.wait_idle();
        tracing::trace!(upload = self.uploads, polls, "frame uploaded");
    }

    /// Transfers issued so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Busy polls spent waiting for completion so far.
    pub fn idle_polls(&self) -> u64 {
        self.idle_polls
    }

    /// Display capability being uploaded to.
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Mutable access to the display capability.
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Give the display capability back.
    pub fn into_hal(self) -> H {
        self.hal
    }
}
