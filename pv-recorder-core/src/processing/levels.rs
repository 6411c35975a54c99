use crate::models::audio_models::AudioLevels;

const FULL_SCALE: f32 = 32768.0;

/// Compute RMS level of 16-bit samples, normalized to 0.0–1.0.
pub fn rms_level(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / FULL_SCALE as f64;
            v * v
        })
        .sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Compute peak absolute level of 16-bit samples, normalized to 0.0–1.0.
pub fn peak_level(samples: &[i16]) -> f32 {
    // unsigned_abs keeps i16::MIN from overflowing
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    peak as f32 / FULL_SCALE
}

/// RMS and peak for one frame.
pub fn measure(samples: &[i16]) -> AudioLevels {
    AudioLevels {
        rms: rms_level(samples),
        peak: peak_level(samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rms_level_silence() {
        assert_eq!(rms_level(&[0, 0, 0]), 0.0);
    }

    #[test]
    fn rms_level_empty() {
        assert_eq!(rms_level(&[]), 0.0);
        assert_eq!(peak_level(&[]), 0.0);
    }

    #[test]
    fn rms_level_full_scale() {
        let rms = rms_level(&[i16::MIN, i16::MIN, i16::MIN]);
        assert_relative_eq!(rms, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn peak_level_basic() {
        assert_relative_eq!(peak_level(&[1000, -16384, 3000]), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn peak_level_handles_min_value() {
        assert_relative_eq!(peak_level(&[i16::MIN]), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn measure_square_wave() {
        let levels = measure(&[16384, -16384, 16384, -16384]);
        assert_relative_eq!(levels.rms, 0.5, epsilon = 1e-6);
        assert_relative_eq!(levels.peak, 0.5, epsilon = 1e-6);
    }
}
