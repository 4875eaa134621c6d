use std::sync::{Arc, Mutex};

use crate::constants::FFT_SIZE;

/// Rolling window of the most recent mono output samples
pub struct Analyser {
    ring: Vec<f32>,
    write_pos: usize,
}

/// Analyser shared between the audio callback (writer) and the UI (reader)
pub type SharedAnalyser = Arc<Mutex<Analyser>>;

impl Analyser {
    pub fn new() -> Self {
        Self::with_fft_size(FFT_SIZE)
    }

    pub fn with_fft_size(fft_size: usize) -> Self {
        Self {
            ring: vec![0.0; fft_size.max(1)],
            write_pos: 0,
        }
    }

    pub fn shared() -> SharedAnalyser {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.ring.len() / 2
    }

    pub fn push(&mut self, samples: &[f32]) {
        let size = self.ring.len();
        for &s in samples {
            self.ring[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % size;
        }
    }

    /// Copy the most recent `out.len()` samples (at most the window size) in
    /// chronological order, mapped to bytes with silence at 128.
    ///
    /// A browser `AnalyserNode` fills a short array from the oldest end of its
    /// window instead; this keeps the newest samples so the trace tracks the key.
    pub fn byte_time_domain_data(&self, out: &mut [u8]) {
        let size = self.ring.len();
        let n = out.len().min(size);
        let start = (self.write_pos + size - n) % size;
        for (i, slot) in out.iter_mut().take(n).enumerate() {
            *slot = sample_to_byte(self.ring[(start + i) % size]);
        }
    }
}

pub fn sample_to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}
