//! Audio Test Fixture Generator
//!
//! Builds in-memory WAV files: a 440 Hz tone with deterministic white noise
//! added, optionally with a noise-only lead-in.

use std::io::Cursor;

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Peak amplitude of the added noise (0.0-1.0)
    pub noise_amplitude: f32,
    /// Seconds of noise-only audio before the tone starts
    pub lead_in_seconds: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 2.0,
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 16,
            noise_amplitude: 0.05,
            lead_in_seconds: 1.0,
        }
    }
}

/// Generate WAV bytes with the given configuration
pub fn generate_noisy_wav(config: &AudioConfig) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let total_frames = (config.duration_seconds * config.sample_rate as f64) as usize;
    let lead_in_frames = (config.lead_in_seconds * config.sample_rate as f64) as usize;
    let full_scale = (1i64 << (config.bits_per_sample - 1)) as f32 - 1.0;
    let mut rng_state = 0x2545_f491_4f6c_dd1du64;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();

        for frame in 0..total_frames {
            let t = frame as f32 / config.sample_rate as f32;
            let tone = if frame >= lead_in_frames {
                0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            } else {
                0.0
            };

            for _ in 0..config.channels {
                rng_state ^= rng_state << 13;
                rng_state ^= rng_state >> 7;
                rng_state ^= rng_state << 17;
                let unit = (rng_state >> 40) as f32 / (1u64 << 24) as f32;
                let noise = (unit * 2.0 - 1.0) * config.noise_amplitude;

                let sample = ((tone + noise) * full_scale) as i32;
                writer.write_sample(sample).unwrap();
            }
        }

        writer.finalize().unwrap();
    }

    cursor.into_inner()
}

/// Read back a WAV produced by the service
pub fn read_wav(bytes: &[u8]) -> (hound::WavSpec, Vec<i32>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).expect("valid WAV");
    let spec = reader.spec();
    let samples = reader.samples::<i32>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_wav() {
        let bytes = generate_noisy_wav(&AudioConfig::default());
        let (spec, samples) = read_wav(&bytes);

        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 1);
        assert_eq!(samples.len(), 88200);
    }
}
