//! Decode → denoise → encode
//!
//! Synchronous and CPU-bound; HTTP handlers run it on the blocking pool.

use std::time::Instant;

use tracing::info;

use crate::audio::{decode_upload, encode_wav, reduce_noise, UploadedAudio};
use crate::error::AudioError;

/// Output of a successful run
#[derive(Debug)]
pub struct DenoisedWav {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
}

/// Run the full pipeline on one upload
pub fn denoise_upload(upload: UploadedAudio) -> Result<DenoisedWav, AudioError> {
    let started = Instant::now();
    let input_bytes = upload.data.len();

    let decoded = decode_upload(upload)?;
    let cleaned = reduce_noise(&decoded)?;
    let bytes = encode_wav(&cleaned)?;

    info!(
        input_bytes,
        output_bytes = bytes.len(),
        sample_rate = cleaned.sample_rate,
        channels = cleaned.channels,
        frames = cleaned.frames(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Denoised upload"
    );

    Ok(DenoisedWav {
        bytes,
        sample_rate: cleaned.sample_rate,
        channels: cleaned.channels,
        frames: cleaned.frames(),
    })
}
