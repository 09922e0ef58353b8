//! Audio codec and signal-processing layer

pub mod decoder;
pub mod denoise;
pub mod encoder;
pub mod types;

pub use decoder::decode_upload;
pub use denoise::{reduce_noise, SpectralGate};
pub use encoder::encode_wav;
pub use types::{AudioBuffer, SampleFormat, UploadedAudio};
