//! Audio decoder using symphonia
//!
//! Decodes an in-memory upload (WAV, MP3, OGG/Vorbis, M4A/AAC, FLAC) into an
//! interleaved f32 [`AudioBuffer`], keeping the source sample rate, channel
//! count and sample width.

use std::io::Cursor;

use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{
    CodecParameters, CodecType, DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_PCM_ALAW,
    CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F32LE, CODEC_TYPE_PCM_F64BE, CODEC_TYPE_PCM_F64LE,
    CODEC_TYPE_PCM_MULAW, CODEC_TYPE_PCM_S16BE, CODEC_TYPE_PCM_S16LE, CODEC_TYPE_PCM_S24BE,
    CODEC_TYPE_PCM_S24LE, CODEC_TYPE_PCM_S32BE, CODEC_TYPE_PCM_S32LE, CODEC_TYPE_PCM_S8,
    CODEC_TYPE_PCM_U8,
};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use super::types::{AudioBuffer, SampleFormat, UploadedAudio};
use crate::error::AudioError;

/// Decode an upload into PCM.
///
/// The container is detected from content; the file name extension and MIME
/// type only act as hints.
///
/// # Errors
/// - [`AudioError::EmptyUpload`] for zero bytes
/// - [`AudioError::Unsupported`] when no format or codec matches
/// - [`AudioError::NoAudioTrack`] when the container has no audio
/// - [`AudioError::Corrupt`] when the stream cannot be read
/// - [`AudioError::NoFrames`] when nothing decodes
pub fn decode_upload(upload: UploadedAudio) -> Result<AudioBuffer, AudioError> {
    if upload.data.is_empty() {
        return Err(AudioError::EmptyUpload);
    }

    let mut hint = Hint::new();
    if let Some(extension) = upload.extension() {
        hint.with_extension(&extension);
    }
    if let Some(content_type) = upload.content_type.as_deref() {
        hint.mime_type(content_type);
    }

    let byte_len = upload.data.len();
    let mss = MediaSourceStream::new(Box::new(Cursor::new(upload.data)), Default::default());

    let detected = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(msg) => AudioError::Unsupported(msg.to_string()),
            other => AudioError::Corrupt(other.to_string()),
        })?;

    let mut format = detected.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoAudioTrack)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_format = storage_format(&codec_params);

    debug!(
        bytes = byte_len,
        sample_rate = ?codec_params.sample_rate,
        channels = ?codec_params.channels.map(|c| c.count()),
        format = ?sample_format,
        "Detected upload format"
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Unsupported(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut stream_spec: Option<SignalSpec> = None;
    let mut sample_buf: Option<(SampleBuffer<f32>, usize)> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) if !samples.is_empty() => {
                warn!("Stopping decode after read error: {}", e);
                break;
            }
            Err(e) => return Err(AudioError::Corrupt(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                // Recoverable: drop the packet
                debug!("Skipping undecodable packet: {}", msg);
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(AudioError::Corrupt(e.to_string())),
        };

        let spec = *decoded.spec();
        match stream_spec {
            None => stream_spec = Some(spec),
            Some(first) if first.channels != spec.channels || first.rate != spec.rate => {
                return Err(AudioError::Corrupt(
                    "signal layout changed mid-stream".to_string(),
                ));
            }
            Some(_) => {}
        }

        let frames_needed = decoded.capacity();
        let needs_alloc = sample_buf
            .as_ref()
            .map_or(true, |(_, capacity)| *capacity < frames_needed);
        if needs_alloc {
            sample_buf = Some((SampleBuffer::<f32>::new(frames_needed as u64, spec), frames_needed));
        }

        if let Some((buf, _)) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if skipped_packets > 0 {
        warn!(skipped_packets, "Some packets could not be decoded and were dropped");
    }

    let spec = match stream_spec {
        Some(spec) if !samples.is_empty() => spec,
        _ => return Err(AudioError::NoFrames),
    };

    let channels = u16::try_from(spec.channels.count())
        .map_err(|_| AudioError::Unsupported("too many channels".to_string()))?;
    if channels == 0 || spec.rate == 0 {
        return Err(AudioError::Corrupt("invalid signal spec".to_string()));
    }

    let buffer = AudioBuffer::new(samples, spec.rate, channels, sample_format);

    debug!(
        sample_rate = buffer.sample_rate,
        channels = buffer.channels,
        frames = buffer.frames(),
        duration_seconds = format!("{:.2}", buffer.duration().as_secs_f64()),
        "Audio decoding complete"
    );

    Ok(buffer)
}

/// Sample format to re-encode with, derived from the source codec
fn storage_format(params: &CodecParameters) -> SampleFormat {
    let codec: CodecType = params.codec;

    if codec == CODEC_TYPE_PCM_U8 || codec == CODEC_TYPE_PCM_S8 {
        SampleFormat::U8
    } else if [CODEC_TYPE_PCM_S16LE, CODEC_TYPE_PCM_S16BE, CODEC_TYPE_PCM_ALAW, CODEC_TYPE_PCM_MULAW]
        .contains(&codec)
    {
        SampleFormat::S16
    } else if codec == CODEC_TYPE_PCM_S24LE || codec == CODEC_TYPE_PCM_S24BE {
        SampleFormat::S24
    } else if codec == CODEC_TYPE_PCM_S32LE || codec == CODEC_TYPE_PCM_S32BE {
        SampleFormat::S32
    } else if [CODEC_TYPE_PCM_F32LE, CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F64LE, CODEC_TYPE_PCM_F64BE]
        .contains(&codec)
    {
        SampleFormat::F32
    } else {
        // Lossless codecs report their bit depth; lossy ones do not
        params
            .bits_per_sample
            .and_then(SampleFormat::from_int_bits)
            .unwrap_or(SampleFormat::S16)
    }
}
