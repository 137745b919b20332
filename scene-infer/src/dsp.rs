//! Waveform preparation for the model window.

/// Scale factor mapping 16-bit PCM to `[-1.0, 1.0]`.
pub const PCM16_NORMALIZER: f32 = 1.0 / i16::MAX as f32;

/// Convert 16-bit PCM samples to normalized floats.
pub fn normalize_pcm16(pcm: &[i16]) -> Vec<f32> {
    pcm.iter().map(|&s| s as f32 * PCM16_NORMALIZER).collect()
}

/// Copy a recording into a zero-filled window of exactly `expected`
/// samples. Shorter input is zero-padded, longer input is truncated.
/// `valid_samples` bounds how much of the buffer is real signal; zero
/// means the whole buffer.
pub fn fit_to_window(buffer: &[f32], valid_samples: usize, expected: usize) -> Vec<f32> {
    let mut window = vec![0.0_f32; expected];
    let usable = if valid_samples > 0 {
        valid_samples.min(buffer.len())
    } else {
        buffer.len()
    };
    let copy_len = usable.min(expected);
    window[..copy_len].copy_from_slice(&buffer[..copy_len]);
    window
}

/// Mean absolute amplitude, used as the silence gate metric.
pub fn mean_abs(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|v| v.abs()).sum::<f32>() / samples.len() as f32
}

/// Fixed-capacity overwrite buffer holding the most recent window of
/// samples.
pub struct RingBuffer {
    samples: Vec<f32>,
    write_pos: usize,
    filled: bool,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            samples: vec![0.0; capacity],
            write_pos: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// True once a full window has been written.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn push(&mut self, chunk: &[f32]) {
        for &value in chunk {
            self.samples[self.write_pos] = value;
            self.write_pos = (self.write_pos + 1) % self.samples.len();
            if self.write_pos == 0 {
                self.filled = true;
            }
        }
    }

    /// Copy of the buffer in chronological order, oldest sample first.
    pub fn snapshot(&self) -> Vec<f32> {
        let len = self.samples.len();
        let mut out = Vec::with_capacity(len);
        let mut idx = self.write_pos;
        for _ in 0..len {
            out.push(self.samples[idx]);
            idx = (idx + 1) % len;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_short_input_with_zeros() {
        let window = fit_to_window(&[0.5, -0.5], 2, 5);
        assert_eq!(window, vec![0.5, -0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn fit_truncates_long_input() {
        let buffer: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let window = fit_to_window(&buffer, buffer.len(), 4);
        assert_eq!(window, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn fit_honors_valid_samples() {
        let buffer = [0.1, 0.2, 0.3, 0.4];
        let window = fit_to_window(&buffer, 2, 4);
        assert_eq!(window, vec![0.1, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn fit_with_zero_valid_uses_whole_buffer() {
        let window = fit_to_window(&[0.1, 0.2], 0, 3);
        assert_eq!(window, vec![0.1, 0.2, 0.0]);
    }

    #[test]
    fn normalize_maps_full_scale_to_one() {
        let samples = normalize_pcm16(&[i16::MAX, 0, -i16::MAX]);
        assert_eq!(samples, vec![1.0, 0.0, -1.0]);
    }

    #[test]
    fn mean_abs_of_silence_is_zero() {
        assert_eq!(mean_abs(&[0.0; 64]), 0.0);
        assert_eq!(mean_abs(&[]), 0.0);
    }

    #[test]
    fn mean_abs_ignores_sign() {
        let value = mean_abs(&[0.5, -0.5, 0.5, -0.5]);
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ring_buffer_fills_and_overwrites() {
        let mut ring = RingBuffer::new(4);
        assert!(!ring.is_filled());

        ring.push(&[1.0, 2.0, 3.0]);
        assert!(!ring.is_filled());

        ring.push(&[4.0, 5.0]);
        assert!(ring.is_filled());
        // Oldest first: 5.0 overwrote 1.0.
        assert_eq!(ring.snapshot(), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn ring_buffer_snapshot_is_chronological_after_wrap() {
        let mut ring = RingBuffer::new(3);
        ring.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(ring.snapshot(), vec![5.0, 6.0, 7.0]);
    }
}
