//! Audio driver: hands sample buffers to the sound unit as they arrive.
//!
//! No mixing and no resampling happen here; the frontend already produces interleaved 16-bit
//! stereo at the configured rate.

use crate::config::AudioSettings;
use crate::foundation::error::{DriverError, DriverResult};
use crate::hal::{SPU_DATA_BASE_ADDR, SPU_MAX_VOLUME, SampleVoice, SoundHal};

/// Size of the sample buffer in bytes.
pub const AUDIO_BUFFER_SIZE: usize = 128 * 1024;
/// Interleaved channels per frame.
pub const AUDIO_CHANNELS: u32 = 2;
/// Bits per sample.
pub const AUDIO_BITS: u32 = 16;

const VOICE_NAME: [u8; 8] = *b"PSXAUDIO";

/// Operations the frontend performs on an audio driver.
pub trait AudioDriver {
    /// Queue `samples` (interleaved bytes). Returns the number of bytes consumed.
    fn write(&mut self, samples: &[u8]) -> DriverResult<usize>;
    /// Stop playback.
    fn stop(&mut self) -> bool;
    /// Resume accepting samples.
    fn start(&mut self, is_shutdown: bool) -> bool;
    /// Whether samples are being accepted.
    fn alive(&self) -> bool;
    fn set_nonblock_state(&mut self, nonblock: bool);
    /// Bytes that can be written without blocking.
    fn write_avail(&self) -> usize;
    /// Total buffer size in bytes.
    fn buffer_size(&self) -> usize;
    /// Whether the driver wants `f32` samples.
    fn use_float(&self) -> bool;
}

/// Audio driver for the console sound unit. Starts stopped.
#[derive(Debug)]
pub struct PsxAudio<S: SoundHal> {
    hal: S,
    voice: SampleVoice,
    running: bool,
    nonblock: bool,
}

impl<S: SoundHal> PsxAudio<S> {
    /// Describe the output voice for `settings.rate`.
    pub fn init(hal: S, settings: &AudioSettings) -> Self {
        tracing::info!(
            rate = settings.rate,
            latency_ms = settings.latency_ms,
            "initializing audio"
        );
        Self {
            hal,
            voice: SampleVoice {
                version: 1,
                data_size: AUDIO_BUFFER_SIZE,
                sample_rate: settings.rate,
                name: VOICE_NAME,
                spu_addr: SPU_DATA_BASE_ADDR,
                voice: 0,
            },
            running: false,
            nonblock: false,
        }
    }

    /// Descriptor of the output voice.
    pub fn voice(&self) -> &SampleVoice {
        &self.voice
    }

    /// Last value passed to `set_nonblock_state`.
    pub fn nonblock(&self) -> bool {
        self.nonblock
    }

    pub fn hal(&self) -> &S {
        &self.hal
    }
}

impl<S: SoundHal> AudioDriver for PsxAudio<S> {
    fn write(&mut self, samples: &[u8]) -> DriverResult<usize> {
        if !self.running {
            return Err(DriverError::AudioStopped);
        }
        self.voice.data_size = samples.len();
        self.hal.upload_samples(&self.voice, samples);
        self.hal.play(&self.voice, SPU_MAX_VOLUME, SPU_MAX_VOLUME);
        tracing::trace!(bytes = samples.len(), "samples queued");
        Ok(samples.len())
    }

    fn stop(&mut self) -> bool {
        self.hal.stop(&self.voice);
        self.running = false;
        true
    }

    fn start(&mut self, _is_shutdown: bool) -> bool {
        self.running = true;
        true
    }

    fn alive(&self) -> bool {
        self.running
    }

    fn set_nonblock_state(&mut self, nonblock: bool) {
        self.nonblock = nonblock;
    }

    fn write_avail(&self) -> usize {
        if self.running { AUDIO_BUFFER_SIZE } else { 0 }
    }

    fn buffer_size(&self) -> usize {
        AUDIO_BUFFER_SIZE
    }

    fn use_float(&self) -> bool {
        false
    }
}

impl<S: SoundHal> Drop for PsxAudio<S> {
    fn drop(&mut self) {
        self.running = false;
        self.hal.stop(&self.voice);
        tracing::info!("audio driver released");
    }
}
