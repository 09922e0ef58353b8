//! Core audio data types
//!
//! An upload enters as [`UploadedAudio`], is decoded into an [`AudioBuffer`],
//! denoised into another `AudioBuffer` with identical metadata, and leaves as
//! WAV bytes.

use std::time::Duration;

/// Raw upload as received from the multipart `file` field
#[derive(Debug, Clone, Default)]
pub struct UploadedAudio {
    /// File bytes, format unknown until detected
    pub data: Vec<u8>,
    /// Client-supplied file name, used only as a format hint
    pub file_name: Option<String>,
    /// Client-supplied MIME type, used only as a format hint
    pub content_type: Option<String>,
}

impl UploadedAudio {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    /// Lower-case file extension of `file_name`, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Storage format of a sample in the source and in the re-encoded WAV.
///
/// The width is what the response preserves; float sources decoded from lossy
/// codecs are stored as `S16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 8-bit PCM (unsigned in WAV)
    U8,
    S16,
    S24,
    S32,
    /// 32-bit IEEE float
    F32,
}

impl SampleFormat {
    /// Sample width in bytes
    pub fn width(self) -> u16 {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::S16 => 2,
            SampleFormat::S24 => 3,
            SampleFormat::S32 | SampleFormat::F32 => 4,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        self.width() * 8
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleFormat::F32)
    }

    /// Integer format for a known bit depth; `None` for unusual depths
    pub fn from_int_bits(bits: u32) -> Option<Self> {
        match bits {
            1..=8 => Some(SampleFormat::U8),
            9..=16 => Some(SampleFormat::S16),
            17..=24 => Some(SampleFormat::S24),
            25..=32 => Some(SampleFormat::S32),
            _ => None,
        }
    }
}

/// Decoded PCM audio.
///
/// **Format:**
/// - Samples are f32 in [-1.0, 1.0]
/// - Interleaved: [c0, c1, ..., c0, c1, ...]
/// - `samples.len()` is always a multiple of `channels`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_format: SampleFormat,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        debug_assert!(channels > 0);
        debug_assert_eq!(samples.len() % channels as usize, 0);
        Self {
            samples,
            sample_rate,
            channels,
            sample_format,
        }
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Same metadata, new sample values
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self::new(samples, self.sample_rate, self.channels, self.sample_format)
    }
}
