use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{FREQUENCY_RANGE, MAX_SECONDS, RIDICULOUS_FREQUENCY_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    pub fn next(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Square,
            Waveform::Square => Waveform::Sawtooth,
            Waveform::Sawtooth => Waveform::Triangle,
            Waveform::Triangle => Waveform::Sine,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Triangle,
            Waveform::Square => Waveform::Sine,
            Waveform::Sawtooth => Waveform::Square,
            Waveform::Triangle => Waveform::Sawtooth,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Waveform {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownWaveform(s.to_string()))
    }
}

/// Parameters of one triggered tone preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneProfile {
    /// Hz
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
}

impl Default for ToneProfile {
    fn default() -> Self {
        Self {
            frequency: 641.0,
            waveform: Waveform::Sine,
            duration: 0.15,
        }
    }
}

impl ToneProfile {
    pub fn dah() -> Self {
        Self {
            duration: 0.45,
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct ProfileFields {
    frequency: Option<f32>,
    waveform: Option<Waveform>,
    duration: Option<f32>,
}

/// A partial `dah` object fills its gaps from the dah preset, not the dit one.
fn deserialize_dah<'de, D>(deserializer: D) -> Result<ToneProfile, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = ProfileFields::deserialize(deserializer)?;
    let base = ToneProfile::dah();
    Ok(ToneProfile {
        frequency: fields.frequency.unwrap_or(base.frequency),
        waveform: fields.waveform.unwrap_or(base.waveform),
        duration: fields.duration.unwrap_or(base.duration),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gain: f32,
    pub pan: f32,
    pub dit: ToneProfile,
    #[serde(deserialize_with = "deserialize_dah")]
    pub dah: ToneProfile,
    /// Widens the frequency bounds to 30..15000 Hz
    pub ridiculous: bool,
    /// Derive dah's parameters from dit
    pub link: bool,
    /// Seconds of silence between letters when sending text
    pub letter_break: f32,
    /// Seconds of silence between words when sending text
    pub word_break: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gain: 1.0,
            pan: 0.0,
            dit: ToneProfile::default(),
            dah: ToneProfile::dah(),
            ridiculous: false,
            link: false,
            letter_break: 0.45,
            word_break: 1.05,
        }
    }
}

impl Settings {
    pub fn frequency_range(&self) -> (f32, f32) {
        if self.ridiculous {
            RIDICULOUS_FREQUENCY_RANGE
        } else {
            FREQUENCY_RANGE
        }
    }
}

/// Value carried by a path-addressed settings change
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Number(f32),
    Flag(bool),
    Text(String),
}

impl SettingValue {
    fn number(&self, path: &str) -> Result<f32, SettingsError> {
        match self {
            SettingValue::Number(n) => Ok(*n),
            SettingValue::Text(t) => t.trim().parse().map_err(|_| SettingsError::WrongKind {
                path: path.to_string(),
                expected: "number",
            }),
            SettingValue::Flag(_) => Err(SettingsError::WrongKind {
                path: path.to_string(),
                expected: "number",
            }),
        }
    }

    fn flag(&self, path: &str) -> Result<bool, SettingsError> {
        match self {
            SettingValue::Flag(b) => Ok(*b),
            _ => Err(SettingsError::WrongKind {
                path: path.to_string(),
                expected: "flag",
            }),
        }
    }

    fn waveform(&self, path: &str) -> Result<Waveform, SettingsError> {
        match self {
            SettingValue::Text(t) => t.parse(),
            _ => Err(SettingsError::WrongKind {
                path: path.to_string(),
                expected: "waveform name",
            }),
        }
    }
}

impl From<f32> for SettingValue {
    fn from(v: f32) -> Self {
        SettingValue::Number(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Flag(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<Waveform> for SettingValue {
    fn from(v: Waveform) -> Self {
        SettingValue::Text(v.label().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    UnknownPath(String),
    WrongKind { path: String, expected: &'static str },
    UnknownWaveform(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownPath(path) => write!(f, "unknown setting '{}'", path),
            SettingsError::WrongKind { path, expected } => {
                write!(f, "setting '{}' expects a {}", path, expected)
            }
            SettingsError::UnknownWaveform(name) => write!(f, "unknown waveform '{}'", name),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Master-bus values the audio graph must follow after an apply step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterParams {
    pub gain: f32,
    pub pan: f32,
}

pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        let mut store = Self { settings };
        store.apply();
        store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set a field by dotted path (e.g. `"dit.frequency"`), then apply once.
    ///
    /// A rejected change leaves the record untouched.
    pub fn set(
        &mut self,
        path: &str,
        value: impl Into<SettingValue>,
    ) -> Result<MasterParams, SettingsError> {
        let value = value.into();
        let s = &mut self.settings;
        match path.split_once('.') {
            Some(("dit", field)) => set_profile_field(&mut s.dit, path, field, &value)?,
            Some(("dah", field)) => set_profile_field(&mut s.dah, path, field, &value)?,
            Some(_) => return Err(SettingsError::UnknownPath(path.to_string())),
            None => match path {
                "gain" => s.gain = value.number(path)?,
                "pan" => s.pan = value.number(path)?,
                "ridiculous" => s.ridiculous = value.flag(path)?,
                "link" => s.link = value.flag(path)?,
                "letter_break" => s.letter_break = value.number(path)?,
                "word_break" => s.word_break = value.number(path)?,
                _ => return Err(SettingsError::UnknownPath(path.to_string())),
            },
        }
        log::debug!("set {} = {:?}", path, value);
        Ok(self.apply())
    }

    /// Recompute derived fields and clamp ranges.
    pub fn apply(&mut self) -> MasterParams {
        let s = &mut self.settings;
        let range = s.frequency_range();

        s.gain = if s.gain.is_nan() { 0.0 } else { s.gain.clamp(0.0, 1.0) };
        s.pan = if s.pan.is_nan() { 0.0 } else { s.pan.clamp(-1.0, 1.0) };

        s.dit.frequency = clamp_frequency(s.dit.frequency, range);
        s.dit.duration = sanitize_seconds(s.dit.duration);

        if s.link {
            s.dit.duration = s.dit.duration.min(MAX_SECONDS / 3.0);
            s.dah.frequency = s.dit.frequency;
            s.dah.waveform = s.dit.waveform;
            s.dah.duration = s.dit.duration * 3.0;
        }
        s.dah.frequency = clamp_frequency(s.dah.frequency, range);
        s.dah.duration = sanitize_seconds(s.dah.duration);

        s.letter_break = sanitize_seconds(s.letter_break);
        s.word_break = sanitize_seconds(s.word_break);

        MasterParams {
            gain: s.gain,
            pan: s.pan,
        }
    }
}

fn set_profile_field(
    profile: &mut ToneProfile,
    path: &str,
    field: &str,
    value: &SettingValue,
) -> Result<(), SettingsError> {
    match field {
        "frequency" => profile.frequency = value.number(path)?,
        "waveform" => profile.waveform = value.waveform(path)?,
        "duration" => profile.duration = value.number(path)?,
        _ => return Err(SettingsError::UnknownPath(path.to_string())),
    }
    Ok(())
}

pub fn clamp_frequency(frequency: f32, (lo, hi): (f32, f32)) -> f32 {
    if frequency.is_nan() {
        lo
    } else {
        frequency.clamp(lo, hi)
    }
}

fn sanitize_seconds(secs: f32) -> f32 {
    if secs.is_nan() {
        0.0
    } else if secs > 0.0 {
        secs.min(MAX_SECONDS)
    } else {
        0.0
    }
}
