//! Stationary spectral-gate noise reduction
//!
//! Estimates a per-frequency noise threshold from the quietest frames of the
//! signal, then attenuates every STFT bin that does not rise clearly above it.
//!
//! **Algorithm:**
//! 1. Hann-windowed STFT, FFT size chosen from the sample rate, 75% overlap
//! 2. Noise profile: mean and standard deviation of bin magnitude over the
//!    10% lowest-energy frames
//! 3. Threshold per bin: `mean + 1.5 * std`
//! 4. Gain per bin: `1 - (threshold / |X|)^2`, clamped to [0, 1]
//! 5. Gains smoothed over neighbouring bins and frames
//! 6. Inverse STFT with overlap-add and window-squared normalisation
//!
//! The transform is deterministic and length-preserving. Only the samples and
//! the sample rate drive it; there are no caller-visible tunables.

use std::collections::VecDeque;
use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use tracing::debug;

use super::types::AudioBuffer;
use crate::error::AudioError;

/// Analysis window length target, in seconds (1024 samples at 44.1 kHz)
const TARGET_WINDOW_SECONDS: f64 = 0.023;
const MIN_FFT_SIZE: usize = 64;
const MAX_FFT_SIZE: usize = 4096;
/// Fraction of frames used for the noise profile
const QUIET_FRAME_FRACTION: f64 = 0.1;
/// Standard deviations above the noise mean before a bin passes
const NOISE_STD_THRESHOLD: f32 = 1.5;
/// Time smoothing reaches this many frames either side
const TIME_SMOOTH_RADIUS: usize = 2;
const TIME_KERNEL: [f32; 2 * TIME_SMOOTH_RADIUS + 1] = [1.0, 2.0, 3.0, 2.0, 1.0];
const FREQ_KERNEL: [f32; 3] = [0.25, 0.5, 0.25];

/// Denoise every channel of `buffer`, keeping its metadata.
pub fn reduce_noise(buffer: &AudioBuffer) -> Result<AudioBuffer, AudioError> {
    let channels = buffer.channels as usize;
    let frames = buffer.frames();

    let Some(mut gate) = SpectralGate::for_signal(buffer.sample_rate, frames) else {
        debug!(frames, "Signal too short for noise reduction, passing through");
        return Ok(buffer.clone());
    };

    let mut output = vec![0.0f32; buffer.samples.len()];
    let mut channel = Vec::with_capacity(frames);

    for ch in 0..channels {
        channel.clear();
        channel.extend(buffer.samples.iter().skip(ch).step_by(channels).copied());

        let cleaned = gate.process(&channel)?;

        for (frame, sample) in cleaned.into_iter().enumerate() {
            output[frame * channels + ch] = sample;
        }
    }

    Ok(buffer.with_samples(output))
}

/// Per-frame state kept while gains are smoothed over time
struct Frame {
    start: usize,
    spectrum: Vec<Complex<f32>>,
    gains: Vec<f32>,
}

/// FFT-based spectral gate
pub struct SpectralGate {
    fft_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    forward_fft: Arc<dyn RealToComplex<f32>>,
    inverse_fft: Arc<dyn ComplexToReal<f32>>,
}

impl SpectralGate {
    /// Gate sized for `sample_rate`, shrunk to fit `len` samples.
    ///
    /// Returns `None` when the signal is shorter than the smallest FFT.
    pub fn for_signal(sample_rate: u32, len: usize) -> Option<Self> {
        let target = (sample_rate as f64 * TARGET_WINDOW_SECONDS).round() as usize;
        let mut fft_size = target
            .max(MIN_FFT_SIZE)
            .next_power_of_two()
            .min(MAX_FFT_SIZE);

        while fft_size > len && fft_size > MIN_FFT_SIZE {
            fft_size /= 2;
        }

        (len >= fft_size).then(|| Self::new(fft_size))
    }

    /// `fft_size` must be a power of two of at least 4
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let forward_fft = planner.plan_fft_forward(fft_size);
        let inverse_fft = planner.plan_fft_inverse(fft_size);

        // Periodic Hann
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos()))
            .collect();

        Self {
            fft_size,
            hop_size: fft_size / 4,
            window,
            forward_fft,
            inverse_fft,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Denoise one channel; output has the same length as `input`.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>, AudioError> {
        if input.len() < self.fft_size || input.iter().all(|s| *s == 0.0) {
            return Ok(input.to_vec());
        }

        let padded = self.pad(input);
        let frame_count = (padded.len() - self.fft_size) / self.hop_size + 1;
        let thresholds = self.noise_thresholds(&padded, input.len(), frame_count)?;

        let mut output = vec![0.0f32; padded.len()];
        let mut window_sum = vec![0.0f32; padded.len()];
        let mut pending: VecDeque<Frame> = VecDeque::with_capacity(2 * TIME_SMOOTH_RADIUS + 1);
        let mut front_index = 0usize;
        let mut next_emit = 0usize;

        for index in 0..frame_count {
            let start = index * self.hop_size;
            let spectrum = self.analyze(&padded[start..start + self.fft_size])?;
            let gains = bin_gains(&spectrum, &thresholds);
            pending.push_back(Frame { start, spectrum, gains });

            while next_emit + TIME_SMOOTH_RADIUS <= index {
                self.emit(&mut pending, front_index, next_emit, &mut output, &mut window_sum)?;
                next_emit += 1;
                while front_index + TIME_SMOOTH_RADIUS < next_emit {
                    pending.pop_front();
                    front_index += 1;
                }
            }
        }

        while next_emit < frame_count {
            self.emit(&mut pending, front_index, next_emit, &mut output, &mut window_sum)?;
            next_emit += 1;
        }

        let pad = self.fft_size / 2;
        Ok(output[pad..pad + input.len()]
            .iter()
            .zip(&window_sum[pad..pad + input.len()])
            .map(|(&s, &w)| if w > 1e-6 { s / w } else { 0.0 })
            .collect())
    }

    /// Zero-pad by half a window each side, extended so the last frame ends
    /// exactly at the buffer end.
    fn pad(&self, input: &[f32]) -> Vec<f32> {
        let pad = self.fft_size / 2;
        let min_len = input.len() + 2 * pad;
        let hops = (min_len - self.fft_size).div_ceil(self.hop_size);
        let total = self.fft_size + hops * self.hop_size;

        let mut padded = vec![0.0f32; total];
        padded[pad..pad + input.len()].copy_from_slice(input);
        padded
    }

    fn analyze(&self, frame: &[f32]) -> Result<Vec<Complex<f32>>, AudioError> {
        let mut buffer: Vec<f32> = frame.iter().zip(&self.window).map(|(s, w)| s * w).collect();
        let mut spectrum = self.forward_fft.make_output_vec();
        self.forward_fft
            .process(&mut buffer, &mut spectrum)
            .map_err(|e| AudioError::Transform(e.to_string()))?;
        Ok(spectrum)
    }

    /// Per-bin threshold from the quietest frames lying fully inside the signal
    fn noise_thresholds(
        &self,
        padded: &[f32],
        signal_len: usize,
        frame_count: usize,
    ) -> Result<Vec<f32>, AudioError> {
        let pad = self.fft_size / 2;
        let interior: Vec<usize> = (0..frame_count)
            .filter(|i| {
                let start = i * self.hop_size;
                start >= pad && start + self.fft_size <= pad + signal_len
            })
            .collect();
        let candidates = if interior.is_empty() {
            (0..frame_count).collect()
        } else {
            interior
        };

        let mut energies: Vec<(usize, f32)> = candidates
            .into_iter()
            .map(|i| {
                let start = i * self.hop_size;
                let energy = padded[start..start + self.fft_size].iter().map(|s| s * s).sum();
                (i, energy)
            })
            .collect();
        // Stable order on ties keeps the result deterministic
        energies.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let quiet_count = ((energies.len() as f64 * QUIET_FRAME_FRACTION) as usize).max(1);
        let bins = self.fft_size / 2 + 1;
        let mut sum = vec![0.0f64; bins];
        let mut sum_sq = vec![0.0f64; bins];

        for &(index, _) in energies.iter().take(quiet_count) {
            let start = index * self.hop_size;
            let spectrum = self.analyze(&padded[start..start + self.fft_size])?;
            for (k, c) in spectrum.iter().enumerate() {
                let mag = f64::from(c.norm());
                sum[k] += mag;
                sum_sq[k] += mag * mag;
            }
        }

        let n = quiet_count as f64;
        Ok(sum
            .iter()
            .zip(&sum_sq)
            .map(|(&s, &sq)| {
                let mean = s / n;
                let std = (sq / n - mean * mean).max(0.0).sqrt();
                (mean + f64::from(NOISE_STD_THRESHOLD) * std) as f32
            })
            .collect())
    }

    /// Smooth gains of frame `index` over time, apply them, and overlap-add
    fn emit(
        &self,
        pending: &mut VecDeque<Frame>,
        front_index: usize,
        index: usize,
        output: &mut [f32],
        window_sum: &mut [f32],
    ) -> Result<(), AudioError> {
        let bins = self.fft_size / 2 + 1;
        let mut smoothed = vec![0.0f32; bins];
        let mut weight_total = 0.0f32;

        for (offset, weight) in TIME_KERNEL.iter().enumerate() {
            let Some(neighbor) = (index + offset)
                .checked_sub(TIME_SMOOTH_RADIUS)
                .and_then(|i| i.checked_sub(front_index))
                .and_then(|i| pending.get(i))
            else {
                continue;
            };
            for (acc, g) in smoothed.iter_mut().zip(&neighbor.gains) {
                *acc += weight * g;
            }
            weight_total += weight;
        }

        let frame = pending
            .get_mut(index - front_index)
            .ok_or_else(|| AudioError::Transform(format!("frame {index} not buffered")))?;

        for (c, g) in frame.spectrum.iter_mut().zip(&smoothed) {
            *c *= g / weight_total;
        }
        // DC and Nyquist must stay real for the inverse transform
        frame.spectrum[0].im = 0.0;
        frame.spectrum[bins - 1].im = 0.0;

        let mut time = self.inverse_fft.make_output_vec();
        self.inverse_fft
            .process(&mut frame.spectrum, &mut time)
            .map_err(|e| AudioError::Transform(e.to_string()))?;

        let norm = 1.0 / self.fft_size as f32;
        for (i, (sample, w)) in time.iter().zip(&self.window).enumerate() {
            output[frame.start + i] += sample * norm * w;
            window_sum[frame.start + i] += w * w;
        }

        Ok(())
    }
}

/// Raw gate gains for one frame, smoothed across neighbouring bins
fn bin_gains(spectrum: &[Complex<f32>], thresholds: &[f32]) -> Vec<f32> {
    let raw: Vec<f32> = spectrum
        .iter()
        .zip(thresholds)
        .map(|(c, &threshold)| {
            let mag = c.norm();
            if mag <= f32::EPSILON {
                0.0
            } else {
                let ratio = threshold / mag;
                (1.0 - ratio * ratio).clamp(0.0, 1.0)
            }
        })
        .collect();

    let last = raw.len() - 1;
    (0..raw.len())
        .map(|k| {
            let below = raw[k.saturating_sub(1)];
            let above = raw[(k + 1).min(last)];
            FREQ_KERNEL[0] * below + FREQ_KERNEL[1] * raw[k] + FREQ_KERNEL[2] * above
        })
        .collect()
}
