use super::{
    DispEnv, DisplayHal, DrawEnv, ImageDesc, PadHal, PadState, SampleVoice, SoundHal, VideoMode,
};

/// Observable side effect recorded by [`SoftwareConsole`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HalEvent {
    /// Display mode programmed.
    VideoMode(VideoMode),
    /// Display environment programmed.
    DispEnv(DispEnv),
    /// Draw environment programmed.
    DrawEnv(DrawEnv),
    /// Image transfer started.
    Upload {
        /// Transfer header.
        desc: ImageDesc,
        /// xxh3 of the payload.
        fingerprint: u64,
    },
    /// Samples copied to SPU RAM.
    SamplesUploaded {
        /// Payload length in bytes.
        len: usize,
    },
    /// Voice started.
    Play {
        /// Left volume.
        left: u16,
        /// Right volume.
        right: u16,
    },
    /// Voice stopped.
    Stop,
}

/// Most events [`SoftwareConsole`] keeps before discarding old ones.
pub const EVENT_LOG_CAPACITY: usize = 4096;

/// In-memory console used on hosts and in tests.
///
/// Image transfers complete after a configurable number of `is_drawing` polls. Uploads issued
/// while a transfer is still in flight are counted as overlaps. The event log keeps at most
/// [`EVENT_LOG_CAPACITY`] entries; once full, the oldest half is discarded.
#[derive(Debug, Default)]
pub struct SoftwareConsole {
    events: Vec<HalEvent>,
    uploads: usize,
    vram: Vec<u8>,
    last_desc: Option<ImageDesc>,
    busy_polls_per_upload: u32,
    pending_polls: u32,
    overlapped_uploads: u32,
    pads: [PadState; 2],
    playing: bool,
}

impl SoftwareConsole {
    /// Console whose transfers complete immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose transfers stay busy for `polls` completion polls.
    pub fn with_busy_polls(polls: u32) -> Self {
        Self {
            busy_polls_per_upload: polls,
            ..Self::default()
        }
    }

    fn record(&mut self, event: HalEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            self.events.drain(..EVENT_LOG_CAPACITY / 2);
        }
        self.events.push(event);
    }

    /// What the drivers did, oldest first, within the log capacity.
    pub fn events(&self) -> &[HalEvent] {
        &self.events
    }

    /// Drop recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of image transfers issued, including ones no longer in the event log.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Transfers issued before the previous one completed.
    pub fn overlapped_uploads(&self) -> u32 {
        self.overlapped_uploads
    }

    /// Payload of the most recent transfer.
    pub fn vram(&self) -> &[u8] {
        &self.vram
    }

    /// Header of the most recent transfer.
    pub fn last_upload(&self) -> Option<ImageDesc> {
        self.last_desc
    }

    /// Whether a voice is currently playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Set what the next poll of `port` returns. Ports other than 0 and 1 are ignored.
    pub fn set_pad(&mut self, port: usize, state: PadState) {
        if let Some(slot) = self.pads.get_mut(port) {
            *slot = state;
        }
    }
}

impl DisplayHal for SoftwareConsole {
    fn set_video_mode(&mut self, mode: VideoMode) {
        self.record(HalEvent::VideoMode(mode));
    }

    fn set_disp_env(&mut self, env: DispEnv) {
        self.record(HalEvent::DispEnv(env));
    }

    fn set_draw_env(&mut self, env: DrawEnv) {
        self.record(HalEvent::DrawEnv(env));
    }

    fn upload_image(&mut self, desc: &ImageDesc, pixels: &[u8]) {
        if self.pending_polls > 0 {
            self.overlapped_uploads += 1;
        }
        self.vram.clear();
        self.vram.extend_from_slice(pixels);
        self.last_desc = Some(*desc);
        self.pending_polls = self.busy_polls_per_upload;
        self.uploads += 1;
        self.record(HalEvent::Upload {
            desc: *desc,
            fingerprint: xxhash_rust::xxh3::xxh3_64(pixels),
        });
    }

    fn is_drawing(&mut self) -> bool {
        if self.pending_polls == 0 {
            return false;
        }
        self.pending_polls -= 1;
        true
    }
}

impl SoundHal for SoftwareConsole {
    fn upload_samples(&mut self, _voice: &SampleVoice, samples: &[u8]) {
        self.record(HalEvent::SamplesUploaded { len: samples.len() });
    }

    fn play(&mut self, _voice: &SampleVoice, left: u16, right: u16) {
        self.playing = true;
        self.record(HalEvent::Play { left, right });
    }

    fn stop(&mut self, _voice: &SampleVoice) {
        self.playing = false;
        self.record(HalEvent::Stop);
    }
}

impl PadHal for SoftwareConsole {
    fn poll_pad(&mut self, port: usize) -> PadState {
        self.pads.get(port).copied().unwrap_or_default()
    }
}
