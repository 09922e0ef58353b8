//! WAV encoding with hound
//!
//! Quantisation uses the same full-scale factors symphonia uses when it
//! converts integer PCM to f32, so unchanged samples round-trip exactly.

use std::io::Cursor;

use hound::{WavSpec, WavWriter};

use super::types::{AudioBuffer, SampleFormat};
use crate::error::AudioError;

/// Encode `buffer` as a RIFF/WAVE file in memory.
///
/// Samples outside [-1.0, 1.0] are clamped.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: buffer.sample_format.bits_per_sample(),
        sample_format: if buffer.sample_format.is_float() {
            hound::SampleFormat::Float
        } else {
            hound::SampleFormat::Int
        },
    };

    let width = buffer.sample_format.width() as usize;
    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.samples.len() * width));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;

        match buffer.sample_format {
            SampleFormat::U8 => {
                // hound stores i8 as unsigned 8-bit
                for &s in &buffer.samples {
                    writer.write_sample(quantize(s, 128.0) as i8)?;
                }
            }
            SampleFormat::S16 => {
                let mut samples = writer.get_i16_writer(buffer.samples.len() as u32);
                for &s in &buffer.samples {
                    samples.write_sample(quantize(s, 32768.0) as i16);
                }
                samples.flush()?;
            }
            SampleFormat::S24 => {
                for &s in &buffer.samples {
                    writer.write_sample(quantize(s, 8_388_608.0) as i32)?;
                }
            }
            SampleFormat::S32 => {
                for &s in &buffer.samples {
                    writer.write_sample(quantize(s, 2_147_483_648.0) as i32)?;
                }
            }
            SampleFormat::F32 => {
                for &s in &buffer.samples {
                    writer.write_sample(s.clamp(-1.0, 1.0))?;
                }
            }
        }

        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Scale to integer full range, rounding and clamping to `[-scale, scale - 1]`
fn quantize(sample: f32, scale: f64) -> i64 {
    let scaled = (f64::from(sample) * scale).round();
    scaled.clamp(-scale, scale - 1.0) as i64
}
