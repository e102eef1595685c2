pub mod calibration;
pub mod wav;

pub use calibration::adjust_for_ambient_noise;
pub use wav::{AudioRecord, AudioSource, WavDecodeError};
