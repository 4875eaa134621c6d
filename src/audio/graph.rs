use crate::audio::analyser::SharedAnalyser;
use crate::audio::mixer::MasterBus;
use crate::audio::scheduler::{self, Voice};
use crate::constants::RELEASE_SECS;
use crate::messages::AudioCmd;

/// Per-tone gain → master gain → panner → analyser → output.
///
/// Lives entirely inside the output callback; time is the rendered frame count.
pub struct AudioGraph {
    sample_rate: u32,
    frames: u64,
    voices: Vec<Voice>,
    keyed: Option<Voice>,
    master: MasterBus,
    analyser: SharedAnalyser,
    scope_scratch: Vec<f32>,
}

impl AudioGraph {
    pub fn new(sample_rate: u32, analyser: SharedAnalyser) -> Self {
        Self {
            sample_rate,
            frames: 0,
            voices: Vec::with_capacity(32),
            keyed: None,
            master: MasterBus::new(),
            analyser,
            scope_scratch: Vec::with_capacity(4096),
        }
    }

    /// Current graph time in seconds
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len() + usize::from(self.keyed.is_some())
    }

    #[cfg(test)]
    pub fn keyed_voice(&self) -> Option<&Voice> {
        self.keyed.as_ref()
    }

    pub fn handle(&mut self, cmd: AudioCmd) {
        let now = self.now();
        match cmd {
            AudioCmd::Tone {
                duration,
                frequency,
                waveform,
            } => {
                self.voices.push(scheduler::tone(
                    now,
                    duration,
                    frequency,
                    waveform,
                    self.sample_rate,
                ));
            }
            AudioCmd::KeyOn {
                frequency,
                waveform,
            } => {
                // A still-sounding keyed voice becomes an ordinary fading voice
                if let Some(mut old) = self.keyed.take() {
                    if !old.is_released() {
                        old.release(now, RELEASE_SECS);
                    }
                    self.voices.push(old);
                }
                self.keyed = Some(scheduler::sustained(
                    now,
                    frequency,
                    waveform,
                    self.sample_rate,
                ));
            }
            AudioCmd::KeyOff => {
                if let Some(mut voice) = self.keyed.take() {
                    voice.release(now, RELEASE_SECS);
                    self.voices.push(voice);
                }
            }
            AudioCmd::SetGain(gain) => self.master.gain = gain.clamp(0.0, 1.0),
            AudioCmd::SetPan(pan) => self.master.pan = pan.clamp(-1.0, 1.0),
        }
    }

    /// Render interleaved frames with `channels` channels.
    pub fn process(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks_mut(channels) {
            let now = self.now();
            let mut sum = 0.0f32;
            for voice in &mut self.voices {
                sum += voice.render(now);
            }
            if let Some(voice) = self.keyed.as_mut() {
                sum += voice.render(now);
            }

            let (left, right) = self.master.process(sum);
            let (left, right) = (left.clamp(-1.0, 1.0), right.clamp(-1.0, 1.0));
            if frame.len() == 1 {
                frame[0] = (left + right) * 0.5;
            } else {
                frame[0] = left;
                frame[1] = right;
                for extra in frame.iter_mut().skip(2) {
                    *extra = 0.0;
                }
            }
            self.scope_scratch.push((left + right) * 0.5);
            self.frames += 1;
        }

        let now = self.now();
        self.voices.retain(|v| !v.is_finished(now));

        // Never block the callback; a contended frame just misses the scope.
        if let Ok(mut analyser) = self.analyser.try_lock() {
            analyser.push(&self.scope_scratch);
        }
        self.scope_scratch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analyser::Analyser;
    use crate::settings::Waveform;

    const SR: u32 = 1_000;

    fn graph() -> AudioGraph {
        AudioGraph::new(SR, Analyser::shared())
    }

    fn render(graph: &mut AudioGraph, frames: usize) -> Vec<f32> {
        let mut buf = vec![0.0f32; frames * 2];
        graph.process(&mut buf, 2);
        buf
    }

    #[test]
    fn silent_without_tones() {
        let mut g = graph();
        assert!(render(&mut g, 100).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn tone_ends_at_its_duration() {
        let mut g = graph();
        g.handle(AudioCmd::Tone {
            duration: 0.2,
            frequency: 250.0,
            waveform: Waveform::Square,
        });
        let out = render(&mut g, 300);
        // first frame: square at full gain, centre pan
        assert!((out[0] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        // nothing after 200 ms
        assert!(out[2 * 201..].iter().all(|&s| s == 0.0));
        assert_eq!(g.active_voices(), 0);
    }

    #[test]
    fn overlapping_tones_sum() {
        let mut g = graph();
        g.handle(AudioCmd::SetGain(0.25));
        for _ in 0..2 {
            g.handle(AudioCmd::Tone {
                duration: 1.0,
                frequency: 250.0,
                waveform: Waveform::Square,
            });
        }
        assert_eq!(g.active_voices(), 2);
        let out = render(&mut g, 1);
        let expected = 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        assert!((out[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn key_off_fades_and_stops_keyed_voice() {
        let mut g = graph();
        g.handle(AudioCmd::KeyOn {
            frequency: 250.0,
            waveform: Waveform::Square,
        });
        render(&mut g, 500);
        assert!(g.keyed_voice().is_some());
        g.handle(AudioCmd::KeyOff);
        assert!(g.keyed_voice().is_none());
        assert_eq!(g.active_voices(), 1);
        let out = render(&mut g, 100);
        assert!(out[2 * 52..].iter().all(|&s| s == 0.0));
        assert_eq!(g.active_voices(), 0);
    }

    #[test]
    fn key_on_during_fade_hands_old_voice_over() {
        let mut g = graph();
        let key_on = || AudioCmd::KeyOn {
            frequency: 250.0,
            waveform: Waveform::Square,
        };
        g.handle(key_on());
        render(&mut g, 100);
        g.handle(AudioCmd::KeyOff);
        render(&mut g, 20);
        g.handle(key_on());
        assert!(g.keyed_voice().is_some());
        assert_eq!(g.active_voices(), 2);
        // released at 0.1 s, silent from 0.15 s
        render(&mut g, 40);
        assert!(g.keyed_voice().is_some());
        assert_eq!(g.active_voices(), 1);
    }

    #[test]
    fn key_on_while_held_releases_previous_voice() {
        let mut g = graph();
        let key_on = || AudioCmd::KeyOn {
            frequency: 250.0,
            waveform: Waveform::Square,
        };
        g.handle(key_on());
        render(&mut g, 10);
        g.handle(key_on());
        assert_eq!(g.active_voices(), 2);
        render(&mut g, 60);
        assert!(g.keyed_voice().is_some());
        assert_eq!(g.active_voices(), 1);
    }

    #[test]
    fn pan_moves_signal_between_channels() {
        let mut g = graph();
        g.handle(AudioCmd::SetPan(1.0));
        g.handle(AudioCmd::Tone {
            duration: 0.5,
            frequency: 250.0,
            waveform: Waveform::Square,
        });
        let out = render(&mut g, 1);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn output_reaches_analyser() {
        let analyser = Analyser::shared();
        let mut g = AudioGraph::new(SR, analyser.clone());
        g.handle(AudioCmd::Tone {
            duration: 1.0,
            frequency: 250.0,
            waveform: Waveform::Square,
        });
        render(&mut g, 10);
        let mut bytes = [0u8; 10];
        analyser.lock().unwrap().byte_time_domain_data(&mut bytes);
        assert!(bytes.iter().any(|&b| b != 128));
    }
}
