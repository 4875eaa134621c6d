use crate::audio::automation::GainParam;
use crate::audio::oscillator::Oscillator;
use crate::constants::RELEASE_SECS;
use crate::settings::Waveform;

/// An oscillator feeding its own gain stage, started and optionally stopped
/// at fixed graph times.
pub struct Voice {
    osc: Oscillator,
    gain: GainParam,
    start: f64,
    stop: Option<f64>,
}

impl Voice {
    pub fn render(&mut self, now: f64) -> f32 {
        if now < self.start || self.is_finished(now) {
            return 0.0;
        }
        self.osc.next_sample() * self.gain.value_at(now)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.stop.is_some_and(|stop| now >= stop)
    }

    pub fn is_released(&self) -> bool {
        self.stop.is_some()
    }

    #[cfg(test)]
    pub fn gain(&self) -> &GainParam {
        &self.gain
    }

    #[cfg(test)]
    pub fn stop_time(&self) -> Option<f64> {
        self.stop
    }

    /// Ramp to silence over `release` seconds from `now` and stop at the same deadline.
    pub fn release(&mut self, now: f64, release: f64) -> f64 {
        let deadline = now + release;
        self.gain
            .cancel_and_hold_at_time(now)
            .linear_ramp_to_value_at_time(0.0, deadline);
        self.stop = Some(deadline);
        deadline
    }
}

/// Build a fixed-length tone: full gain until 50 ms before the end, then a
/// linear fade reaching zero exactly at `now + duration`, where it stops.
pub fn tone(
    now: f64,
    duration: f32,
    frequency: f32,
    waveform: Waveform,
    sample_rate: u32,
) -> Voice {
    let duration = (duration.max(0.0)) as f64;
    let end = now + duration;
    let fade_start = (end - RELEASE_SECS).max(now);

    let mut gain = GainParam::new(1.0);
    gain.set_value_at_time(1.0, now)
        .set_value_at_time(1.0, fade_start)
        .linear_ramp_to_value_at_time(0.0, end);

    Voice {
        osc: Oscillator::new(waveform, frequency, sample_rate),
        gain,
        start: now,
        stop: Some(end),
    }
}

/// Build a sustained tone that plays until [`Voice::release`] is called.
pub fn sustained(now: f64, frequency: f32, waveform: Waveform, sample_rate: u32) -> Voice {
    let mut gain = GainParam::new(1.0);
    gain.set_value_at_time(1.0, now);
    Voice {
        osc: Oscillator::new(waveform, frequency, sample_rate),
        gain,
        start: now,
        stop: None,
    }
}
