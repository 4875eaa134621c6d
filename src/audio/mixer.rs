use std::f32::consts::FRAC_PI_2;

/// Output stage shared by every tone: master gain into a stereo panner
pub struct MasterBus {
    pub gain: f32,
    pub pan: f32,
}

impl MasterBus {
    pub fn new() -> Self {
        Self { gain: 1.0, pan: 0.0 }
    }

    /// Equal-power (left_gain, right_gain) for a mono source
    pub fn pan_gains(&self) -> (f32, f32) {
        let x = (self.pan.clamp(-1.0, 1.0) + 1.0) / 2.0;
        ((x * FRAC_PI_2).cos(), (x * FRAC_PI_2).sin())
    }

    /// Apply gain and pan to the summed tone signal
    pub fn process(&self, sample: f32) -> (f32, f32) {
        let (gl, gr) = self.pan_gains();
        let s = sample * self.gain;
        (s * gl, s * gr)
    }
}
