use std::time::Duration;

use super::wav::AudioSource;

/// Starting energy threshold before any ambient audio is observed.
const INITIAL_ENERGY_THRESHOLD: f32 = 300.0;
/// How quickly the threshold forgets its previous value, per second.
const DAMPING: f32 = 0.15;
/// Headroom applied above the measured ambient energy.
const ENERGY_RATIO: f32 = 1.5;
/// Frames examined per adjustment step.
const CHUNK_FRAMES: usize = 1024;

/// Estimate the ambient-noise energy threshold from the start of the stream.
///
/// Consumes up to `window` of audio from `source`; a later `record()` captures
/// only the remainder. The threshold converges on chunk RMS energy (in the
/// 16-bit sample domain) times `ENERGY_RATIO`, with exponential damping so a
/// single loud chunk cannot swing it.
pub fn adjust_for_ambient_noise(source: &mut AudioSource, window: Duration) -> f32 {
    let sample_rate = source.sample_rate().max(1);
    let seconds_per_chunk = CHUNK_FRAMES as f32 / sample_rate as f32;
    let mut frames_left = (window.as_secs_f32() * sample_rate as f32) as usize;
    let mut threshold = INITIAL_ENERGY_THRESHOLD;

    while frames_left > 0 {
        let want = CHUNK_FRAMES.min(frames_left);
        let Some(chunk) = source.take_chunk(want) else {
            break;
        };
        frames_left -= chunk.len();

        let energy = rms_energy(chunk);
        let damping = DAMPING.powf(seconds_per_chunk);
        let target = energy * ENERGY_RATIO;
        threshold = threshold * damping + target * (1.0 - damping);
    }

    threshold
}

/// Root-mean-square energy of a chunk, scaled to the i16 sample domain so the
/// threshold constants line up with 16-bit PCM levels.
fn rms_energy(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = chunk.iter().map(|s| (s * 32768.0).powi(2)).sum();
    (sum_squares / chunk.len() as f32).sqrt()
}
