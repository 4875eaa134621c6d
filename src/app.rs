use std::time::Instant;

use crossbeam_channel::Sender;

use crate::keyer::{KeyTone, Keyer};
use crate::messages::{AudioCmd, AudioMsg};
use crate::morse::{Element, MorseSender};
use crate::settings::{
    MasterParams, SettingValue, Settings, SettingsError, SettingsStore, ToneProfile, Waveform,
};

/// Longest duration shown as a full slider; longer values are still accepted
const DURATION_DISPLAY_MAX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Volume,
    Pan,
    DitFrequency,
    DitWaveform,
    DitDuration,
    DahFrequency,
    DahWaveform,
    DahDuration,
    Link,
    Ridiculous,
    LetterBreak,
    WordBreak,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Number { fine: f32, coarse: f32 },
    Waveform,
    Flag,
}

impl Control {
    pub const ALL: [Control; 12] = [
        Control::Volume,
        Control::Pan,
        Control::DitFrequency,
        Control::DitWaveform,
        Control::DitDuration,
        Control::DahFrequency,
        Control::DahWaveform,
        Control::DahDuration,
        Control::Link,
        Control::Ridiculous,
        Control::LetterBreak,
        Control::WordBreak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Volume => "Volume",
            Control::Pan => "Pan",
            Control::DitFrequency => "Dit freq",
            Control::DitWaveform => "Dit wave",
            Control::DitDuration => "Dit length",
            Control::DahFrequency => "Dah freq",
            Control::DahWaveform => "Dah wave",
            Control::DahDuration => "Dah length",
            Control::Link => "Link dit→dah",
            Control::Ridiculous => "Ridiculous",
            Control::LetterBreak => "Letter break",
            Control::WordBreak => "Word break",
        }
    }

    /// Settings path this control writes to
    pub fn path(self) -> &'static str {
        match self {
            Control::Volume => "gain",
            Control::Pan => "pan",
            Control::DitFrequency => "dit.frequency",
            Control::DitWaveform => "dit.waveform",
            Control::DitDuration => "dit.duration",
            Control::DahFrequency => "dah.frequency",
            Control::DahWaveform => "dah.waveform",
            Control::DahDuration => "dah.duration",
            Control::Link => "link",
            Control::Ridiculous => "ridiculous",
            Control::LetterBreak => "letter_break",
            Control::WordBreak => "word_break",
        }
    }

    pub fn kind(self) -> ControlKind {
        match self {
            Control::Volume => ControlKind::Number {
                fine: 0.01,
                coarse: 0.1,
            },
            Control::Pan => ControlKind::Number {
                fine: 0.05,
                coarse: 0.25,
            },
            Control::DitFrequency | Control::DahFrequency => ControlKind::Number {
                fine: 10.0,
                coarse: 100.0,
            },
            Control::DitDuration
            | Control::DahDuration
            | Control::LetterBreak
            | Control::WordBreak => ControlKind::Number {
                fine: 0.01,
                coarse: 0.05,
            },
            Control::DitWaveform | Control::DahWaveform => ControlKind::Waveform,
            Control::Link | Control::Ridiculous => ControlKind::Flag,
        }
    }

    /// Dah controls are driven from dit while linked
    pub fn is_derived(self, settings: &Settings) -> bool {
        settings.link
            && matches!(
                self,
                Control::DahFrequency | Control::DahWaveform | Control::DahDuration
            )
    }

    fn number(self, s: &Settings) -> f32 {
        match self {
            Control::Volume => s.gain,
            Control::Pan => s.pan,
            Control::DitFrequency => s.dit.frequency,
            Control::DitDuration => s.dit.duration,
            Control::DahFrequency => s.dah.frequency,
            Control::DahDuration => s.dah.duration,
            Control::LetterBreak => s.letter_break,
            Control::WordBreak => s.word_break,
            _ => 0.0,
        }
    }

    fn waveform(self, s: &Settings) -> Waveform {
        match self {
            Control::DahWaveform => s.dah.waveform,
            _ => s.dit.waveform,
        }
    }

    fn flag(self, s: &Settings) -> bool {
        match self {
            Control::Link => s.link,
            Control::Ridiculous => s.ridiculous,
            _ => false,
        }
    }

    pub fn value_label(self, s: &Settings) -> String {
        match self {
            Control::Volume => format!("{:.0}%", s.gain * 100.0),
            Control::Pan => pan_label(s.pan),
            Control::DitFrequency | Control::DahFrequency => {
                format!("{:.0} Hz", self.number(s))
            }
            Control::DitWaveform | Control::DahWaveform => self.waveform(s).to_string(),
            Control::Link | Control::Ridiculous => {
                let on = self.flag(s);
                (if on { "on" } else { "off" }).to_string()
            }
            _ => format!("{:.2} s", self.number(s)),
        }
    }

    /// Slider position in 0..=1, or `None` for controls without a range
    pub fn fraction(self, s: &Settings) -> Option<f32> {
        let f = match self {
            Control::Volume => s.gain,
            Control::Pan => (s.pan + 1.0) / 2.0,
            Control::DitFrequency | Control::DahFrequency => {
                let (lo, hi) = s.frequency_range();
                (self.number(s) - lo) / (hi - lo)
            }
            Control::DitDuration
            | Control::DahDuration
            | Control::LetterBreak
            | Control::WordBreak => self.number(s) / DURATION_DISPLAY_MAX,
            _ => return None,
        };
        Some(f.clamp(0.0, 1.0))
    }
}

pub fn pan_label(pan: f32) -> String {
    let pct = (pan * 100.0).round() as i32;
    match pct {
        0 => "C".to_string(),
        p if p < 0 => format!("L {}", -p),
        p => format!("R {}", p),
    }
}

/// The single UI-thread owner of settings, keying and sending state
pub struct Controller {
    store: SettingsStore,
    keyer: Keyer,
    morse: MorseSender,
    cmd_tx: Sender<AudioCmd>,
    pub selected: usize,
    pub master_level: (f32, f32),
    pub active_voices: usize,
    /// Text being typed for sending, when the entry line is open
    pub text_entry: Option<String>,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl Controller {
    pub fn new(settings: Settings, cmd_tx: Sender<AudioCmd>) -> Self {
        let store = SettingsStore::new(settings);
        let mut controller = Self {
            store,
            keyer: Keyer::new(),
            morse: MorseSender::new(),
            cmd_tx,
            selected: 0,
            master_level: (0.0, 0.0),
            active_voices: 0,
            text_entry: None,
            status: None,
            should_quit: false,
        };
        let s = controller.store.settings();
        let params = MasterParams {
            gain: s.gain,
            pan: s.pan,
        };
        controller.push_master(params);
        controller
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn keytone(&self) -> KeyTone {
        self.keyer.state()
    }

    pub fn is_sending(&self) -> bool {
        self.morse.is_sending()
    }

    pub fn selected_control(&self) -> Control {
        Control::ALL[self.selected % Control::ALL.len()]
    }

    /// Play the dit preset now
    pub fn dit(&self) {
        let profile = self.settings().dit;
        self.tone(&profile);
    }

    /// Play the dah preset now
    pub fn dah(&self) {
        let profile = self.settings().dah;
        self.tone(&profile);
    }

    pub fn tone(&self, profile: &ToneProfile) {
        self.send(AudioCmd::Tone {
            duration: profile.duration,
            frequency: profile.frequency,
            waveform: profile.waveform,
        });
    }

    pub fn key_down(&mut self) {
        let profile = self.settings().dit;
        if let Some(cmd) = self.keyer.key_down(&profile) {
            self.send(cmd);
        }
    }

    pub fn key_up(&mut self, now: Instant) {
        if let Some(cmd) = self.keyer.key_up(now) {
            self.send(cmd);
        }
    }

    /// Advance timers: the keyer's queued release and any pending Morse elements.
    pub fn tick(&mut self, now: Instant) {
        self.keyer.tick(now);
        let was_sending = self.morse.is_sending();
        for element in self.morse.due(now) {
            match element {
                Element::Dit => self.dit(),
                Element::Dah => self.dah(),
            }
        }
        if was_sending && !self.morse.is_sending() {
            self.status = Some("sent".to_string());
        }
    }

    /// Path-addressed settings change followed by a single apply step.
    pub fn change_setting(
        &mut self,
        path: &str,
        value: impl Into<SettingValue>,
    ) -> Result<(), SettingsError> {
        let params = self.store.set(path, value)?;
        self.push_master(params);
        Ok(())
    }

    pub fn select(&mut self, delta: i32) {
        let n = Control::ALL.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(n) as usize;
    }

    pub fn adjust_selected(&mut self, direction: i32, coarse: bool) {
        let control = self.selected_control();
        let result = match control.kind() {
            ControlKind::Number { fine, coarse: big } => {
                let step = if coarse { big } else { fine };
                let value = control.number(self.settings()) + step * direction.signum() as f32;
                self.change_setting(control.path(), round_to_step(value, fine))
            }
            ControlKind::Waveform => {
                let current = control.waveform(self.settings());
                let next = if direction < 0 {
                    current.prev()
                } else {
                    current.next()
                };
                self.change_setting(control.path(), next)
            }
            ControlKind::Flag => {
                let current = control.flag(self.settings());
                self.change_setting(control.path(), !current)
            }
        };
        if let Err(e) = result {
            log::warn!("{}", e);
        }
    }

    /// Enter on a control: toggle flags, cycle waveforms
    pub fn activate_selected(&mut self) {
        match self.selected_control().kind() {
            ControlKind::Waveform | ControlKind::Flag => self.adjust_selected(1, false),
            ControlKind::Number { .. } => {}
        }
    }

    pub fn send_text(&mut self, text: &str, now: Instant) {
        let count = self.morse.send(text, self.store.settings(), now);
        log::info!("sending {:?} ({} elements)", text, count);
        self.status = Some(if count == 0 {
            "nothing to send".to_string()
        } else {
            format!("sending: {}", text.trim())
        });
        self.tick(now);
    }

    pub fn cancel_send(&mut self) {
        if self.morse.is_sending() {
            self.morse.cancel();
            self.status = Some("send cancelled".to_string());
        }
    }

    pub fn begin_text(&mut self) {
        self.text_entry = Some(String::new());
    }

    pub fn push_text(&mut self, c: char) {
        if let Some(text) = self.text_entry.as_mut() {
            text.push(c);
        }
    }

    pub fn backspace_text(&mut self) {
        if let Some(text) = self.text_entry.as_mut() {
            text.pop();
        }
    }

    pub fn submit_text(&mut self, now: Instant) {
        if let Some(text) = self.text_entry.take() {
            self.send_text(&text, now);
        }
    }

    pub fn cancel_text(&mut self) {
        self.text_entry = None;
    }

    pub fn apply_audio_msg(&mut self, msg: AudioMsg) {
        match msg {
            AudioMsg::MasterLevel(l, r) => self.master_level = (l, r),
            AudioMsg::ActiveVoices(n) => self.active_voices = n,
        }
    }

    fn push_master(&self, params: MasterParams) {
        self.send(AudioCmd::SetGain(params.gain));
        self.send(AudioCmd::SetPan(params.pan));
    }

    fn send(&self, cmd: AudioCmd) {
        // Full or disconnected queue: the audio side is gone or stalled, drop it
        let _ = self.cmd_tx.try_send(cmd);
    }
}

fn round_to_step(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, Receiver};
    use std::time::Duration;

    fn controller() -> (Controller, Receiver<AudioCmd>) {
        let (tx, rx) = bounded(64);
        let c = Controller::new(Settings::default(), tx);
        rx.try_iter().for_each(drop);
        (c, rx)
    }

    fn drain(rx: &Receiver<AudioCmd>) -> Vec<AudioCmd> {
        rx.try_iter().collect()
    }

    #[test]
    fn new_pushes_master_params() {
        let (tx, rx) = bounded(8);
        let _c = Controller::new(Settings::default(), tx);
        assert_eq!(drain(&rx), vec![AudioCmd::SetGain(1.0), AudioCmd::SetPan(0.0)]);
    }

    #[test]
    fn dit_and_dah_use_their_presets() {
        let (c, rx) = controller();
        c.dit();
        c.dah();
        assert_eq!(
            drain(&rx),
            vec![
                AudioCmd::Tone {
                    duration: 0.15,
                    frequency: 641.0,
                    waveform: Waveform::Sine
                },
                AudioCmd::Tone {
                    duration: 0.45,
                    frequency: 641.0,
                    waveform: Waveform::Sine
                },
            ]
        );
    }

    #[test]
    fn repeated_key_down_starts_one_oscillator() {
        let (mut c, rx) = controller();
        let t0 = Instant::now();
        c.key_down();
        c.key_down();
        c.key_down();
        c.key_up(t0);
        c.key_down();
        let cmds = drain(&rx);
        let key_ons = cmds
            .iter()
            .filter(|cmd| matches!(cmd, AudioCmd::KeyOn { .. }))
            .count();
        assert_eq!(key_ons, 1);
        assert_eq!(cmds.last(), Some(&AudioCmd::KeyOff));

        c.tick(t0 + Duration::from_millis(60));
        assert_eq!(c.keytone(), KeyTone::Off);
        c.key_down();
        assert!(matches!(drain(&rx).as_slice(), [AudioCmd::KeyOn { .. }]));
    }

    #[test]
    fn adjusting_frequency_clamps_at_bound() {
        let (mut c, _rx) = controller();
        c.selected = Control::ALL
            .iter()
            .position(|&ctl| ctl == Control::DitFrequency)
            .unwrap();
        for _ in 0..100 {
            c.adjust_selected(1, true);
        }
        assert_eq!(c.settings().dit.frequency, 4000.0);
        for _ in 0..100 {
            c.adjust_selected(-1, true);
        }
        assert_eq!(c.settings().dit.frequency, 100.0);
    }

    #[test]
    fn gain_change_reaches_audio() {
        let (mut c, rx) = controller();
        c.change_setting("gain", 0.4).unwrap();
        assert_eq!(drain(&rx), vec![AudioCmd::SetGain(0.4), AudioCmd::SetPan(0.0)]);
    }

    #[test]
    fn activating_link_derives_dah() {
        let (mut c, _rx) = controller();
        c.change_setting("dit.duration", 0.1).unwrap();
        c.selected = Control::ALL.iter().position(|&ctl| ctl == Control::Link).unwrap();
        c.activate_selected();
        assert!(c.settings().link);
        assert!((c.settings().dah.duration - 0.3).abs() < 1e-6);
        assert!(Control::DahDuration.is_derived(c.settings()));
    }

    #[test]
    fn waveform_control_cycles_both_ways() {
        let (mut c, _rx) = controller();
        c.selected = Control::ALL
            .iter()
            .position(|&ctl| ctl == Control::DahWaveform)
            .unwrap();
        c.adjust_selected(1, false);
        assert_eq!(c.settings().dah.waveform, Waveform::Square);
        c.adjust_selected(-1, false);
        c.adjust_selected(-1, false);
        assert_eq!(c.settings().dah.waveform, Waveform::Triangle);
    }

    #[test]
    fn selection_wraps() {
        let (mut c, _rx) = controller();
        c.select(-1);
        assert_eq!(c.selected_control(), Control::WordBreak);
        c.select(1);
        assert_eq!(c.selected_control(), Control::Volume);
    }

    #[test]
    fn sending_text_triggers_timed_dits() {
        let (mut c, rx) = controller();
        let t0 = Instant::now();
        c.begin_text();
        for ch in "ee".chars() {
            c.push_text(ch);
        }
        c.submit_text(t0);
        assert!(c.text_entry.is_none());
        assert_eq!(drain(&rx).len(), 1);
        assert!(c.is_sending());
        c.tick(t0 + Duration::from_millis(700));
        assert_eq!(drain(&rx).len(), 1);
        assert!(!c.is_sending());
        assert_eq!(c.status.as_deref(), Some("sent"));
    }

    #[test]
    fn value_labels() {
        let mut s = Settings::default();
        s.pan = -0.5;
        assert_eq!(Control::Volume.value_label(&s), "100%");
        assert_eq!(Control::Pan.value_label(&s), "L 50");
        assert_eq!(Control::DitFrequency.value_label(&s), "641 Hz");
        assert_eq!(Control::DahDuration.value_label(&s), "0.45 s");
        assert_eq!(Control::DitWaveform.value_label(&s), "sine");
        assert_eq!(Control::Link.value_label(&s), "off");
        assert_eq!(pan_label(0.0), "C");
        assert_eq!(pan_label(1.0), "R 100");
    }
}
