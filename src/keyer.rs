use std::time::{Duration, Instant};

use crate::constants::RELEASE_SECS;
use crate::messages::AudioCmd;
use crate::settings::ToneProfile;

/// Lifecycle of the single hold-to-key oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTone {
    Off,
    On,
    /// Released and fading out; returns to `Off` once `until` has passed
    Queued { until: Instant },
}

impl KeyTone {
    pub fn label(self) -> &'static str {
        match self {
            KeyTone::Off => "OFF",
            KeyTone::On => "ON",
            KeyTone::Queued { .. } => "QUEUED",
        }
    }
}

/// Off → On → Queued → Off.
///
/// Key-downs while `On` or `Queued` are ignored, so at most one keyed
/// oscillator is ever requested at a time.
pub struct Keyer {
    state: KeyTone,
    release: Duration,
}

impl Keyer {
    pub fn new() -> Self {
        Self {
            state: KeyTone::Off,
            release: Duration::from_secs_f64(RELEASE_SECS),
        }
    }

    pub fn state(&self) -> KeyTone {
        self.state
    }

    pub fn key_down(&mut self, profile: &ToneProfile) -> Option<AudioCmd> {
        match self.state {
            KeyTone::Off => {
                self.state = KeyTone::On;
                Some(AudioCmd::KeyOn {
                    frequency: profile.frequency,
                    waveform: profile.waveform,
                })
            }
            KeyTone::On | KeyTone::Queued { .. } => None,
        }
    }

    pub fn key_up(&mut self, now: Instant) -> Option<AudioCmd> {
        match self.state {
            KeyTone::On => {
                self.state = KeyTone::Queued {
                    until: now + self.release,
                };
                Some(AudioCmd::KeyOff)
            }
            KeyTone::Off | KeyTone::Queued { .. } => None,
        }
    }

    /// Returns true when a queued release has completed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            KeyTone::Queued { until } if now >= until => {
                self.state = KeyTone::Off;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Waveform;

    fn profile() -> ToneProfile {
        ToneProfile {
            frequency: 700.0,
            waveform: Waveform::Triangle,
            duration: 0.1,
        }
    }

    #[test]
    fn full_cycle() {
        let mut keyer = Keyer::new();
        let t0 = Instant::now();
        assert_eq!(
            keyer.key_down(&profile()),
            Some(AudioCmd::KeyOn {
                frequency: 700.0,
                waveform: Waveform::Triangle
            })
        );
        assert_eq!(keyer.state(), KeyTone::On);
        assert_eq!(keyer.key_up(t0), Some(AudioCmd::KeyOff));
        assert!(matches!(keyer.state(), KeyTone::Queued { .. }));
        assert!(!keyer.tick(t0 + Duration::from_millis(10)));
        assert!(keyer.tick(t0 + Duration::from_millis(51)));
        assert_eq!(keyer.state(), KeyTone::Off);
    }

    #[test]
    fn key_down_while_on_is_ignored() {
        let mut keyer = Keyer::new();
        assert!(keyer.key_down(&profile()).is_some());
        for _ in 0..5 {
            assert_eq!(keyer.key_down(&profile()), None);
        }
        assert_eq!(keyer.state(), KeyTone::On);
    }

    #[test]
    fn key_down_while_queued_is_ignored() {
        let mut keyer = Keyer::new();
        let t0 = Instant::now();
        keyer.key_down(&profile());
        keyer.key_up(t0);
        assert_eq!(keyer.key_down(&profile()), None);
        assert!(matches!(keyer.state(), KeyTone::Queued { .. }));
        keyer.tick(t0 + Duration::from_millis(60));
        assert!(keyer.key_down(&profile()).is_some());
    }

    #[test]
    fn key_up_without_key_down_is_ignored() {
        let mut keyer = Keyer::new();
        assert_eq!(keyer.key_up(Instant::now()), None);
        assert_eq!(keyer.state(), KeyTone::Off);
    }
}
