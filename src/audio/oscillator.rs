use std::f64::consts::TAU;

use crate::settings::Waveform;

/// Naive phase-accumulating oscillator, phase in [0, 1)
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: u32) -> Self {
        Self {
            waveform,
            frequency: frequency as f64,
            phase: 0.0,
            sample_rate: sample_rate as f64,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = shape(self.waveform, self.phase);
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }
}

/// One cycle of `waveform` evaluated at `phase` (0..1), starting at zero for
/// the symmetric shapes.
pub fn shape(waveform: Waveform, phase: f64) -> f32 {
    let p = phase;
    let v = match waveform {
        Waveform::Sine => (p * TAU).sin(),
        Waveform::Square => {
            if p < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => {
            // rises from 0 to +1, jumps to -1 at half cycle
            if p < 0.5 {
                2.0 * p
            } else {
                2.0 * p - 2.0
            }
        }
        Waveform::Triangle => {
            if p < 0.25 {
                4.0 * p
            } else if p < 0.75 {
                2.0 - 4.0 * p
            } else {
                4.0 * p - 4.0
            }
        }
    };
    v as f32
}
