use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WavDecodeError {
    #[error("WAV decode error: {0}")]
    Malformed(#[from] hound::Error),
}

/// In-memory audio stream decoded from WAV bytes.
///
/// Samples are mono f32 in [-1.0, 1.0]; multi-channel input is downmixed by
/// channel averaging. Reading (calibration, record) advances a cursor so the
/// stream is consumed once, front to back.
pub struct AudioSource {
    samples: Vec<f32>,
    sample_rate: u32,
    cursor: usize,
}

/// One captured audio segment, ready for submission to the recognizer.
#[derive(Debug, Clone)]
pub struct AudioRecord {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSource {
    /// Decode a WAV byte stream entirely in memory.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, WavDecodeError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
        };

        let samples = if spec.channels > 1 {
            samples
                .chunks(spec.channels as usize)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        } else {
            samples
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            cursor: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames not yet consumed by calibration or record.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.cursor
    }

    /// Read up to `frames` frames, advancing the cursor. Returns `None` once
    /// the stream is exhausted.
    pub(crate) fn take_chunk(&mut self, frames: usize) -> Option<&[f32]> {
        if self.cursor >= self.samples.len() {
            return None;
        }
        let end = (self.cursor + frames).min(self.samples.len());
        let chunk = &self.samples[self.cursor..end];
        self.cursor = end;
        Some(chunk)
    }

    /// Capture everything left in the stream as one record.
    pub fn record(&mut self) -> AudioRecord {
        let samples = self.samples.split_off(self.cursor);
        self.cursor = self.samples.len();
        AudioRecord {
            samples,
            sample_rate: self.sample_rate,
        }
    }
}

impl AudioRecord {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Encode as raw signed 16-bit little-endian PCM, the body format the
    /// recognition service accepts as `audio/l16`.
    pub fn to_l16_le(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for &sample in &self.samples {
            let value = (sample * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write an in-memory 16-bit PCM WAV for tests.
    pub(crate) fn wav_bytes_i16(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_i16_mono() {
        let bytes = wav_bytes_i16(&[0, i16::MAX, i16::MIN, 0], 16000, 1);
        let source = AudioSource::from_wav_bytes(&bytes).unwrap();
        assert_eq!(source.sample_rate(), 16000);
        assert_eq!(source.remaining(), 4);
    }

    #[test]
    fn test_decode_stereo_downmixes() {
        // Interleaved L/R pairs average to a single mono frame each.
        let bytes = wav_bytes_i16(&[1000, 3000, -2000, -4000], 44100, 2);
        let mut source = AudioSource::from_wav_bytes(&bytes).unwrap();
        assert_eq!(source.remaining(), 2);
        let record = source.record();
        let restored: Vec<i16> = record
            .to_l16_le()
            .chunks(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(restored[0], 2000);
        assert_eq!(restored[1], -3000);
    }

    #[test]
    fn test_decode_float_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [0.0f32, 0.5, -0.5] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let source = AudioSource::from_wav_bytes(&cursor.into_inner()).unwrap();
        assert_eq!(source.remaining(), 3);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = AudioSource::from_wav_bytes(&[0, 1, 2, 3]);
        assert!(matches!(result, Err(WavDecodeError::Malformed(_))));
    }

    #[test]
    fn test_record_drains_stream() {
        let bytes = wav_bytes_i16(&[100; 320], 16000, 1);
        let mut source = AudioSource::from_wav_bytes(&bytes).unwrap();
        source.take_chunk(120);
        let record = source.record();
        assert_eq!(record.to_l16_le().len(), 200 * 2);
        assert_eq!(source.remaining(), 0);
        assert!(source.record().is_empty());
    }

    #[test]
    fn test_l16_round_trip() {
        let original = [0i16, 1000, -1000, i16::MAX];
        let bytes = wav_bytes_i16(&original, 16000, 1);
        let mut source = AudioSource::from_wav_bytes(&bytes).unwrap();
        let encoded = source.record().to_l16_le();
        let restored: Vec<i16> = encoded
            .chunks(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        for (a, b) in original.iter().zip(&restored) {
            assert!((a - b).abs() <= 1, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_duration() {
        let bytes = wav_bytes_i16(&[0; 8000], 16000, 1);
        let mut source = AudioSource::from_wav_bytes(&bytes).unwrap();
        assert_eq!(source.record().duration_ms(), 500);
    }
}
