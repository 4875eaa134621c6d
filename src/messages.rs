use crate::settings::Waveform;

/// Messages from input handling → Controller
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Trigger a fixed-length dit tone
    Dit,
    /// Trigger a fixed-length dah tone
    Dah,
    /// Straight key pressed (or auto-repeat while held)
    KeyDown,
    /// Straight key released
    KeyUp,
    /// Move the control selection by the given offset
    SelectControl(i32),
    /// Nudge the selected control: (direction, coarse)
    Adjust(i32, bool),
    /// Toggle a flag or cycle a waveform
    Activate,
    /// Open the text line for sending Morse
    BeginText,
    TextChar(char),
    TextBackspace,
    SubmitText,
    CancelText,
    /// Stop an in-progress text send
    CancelSend,
    Quit,
}

/// Messages from Controller → Audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Schedule a fixed-length tone starting now
    Tone {
        duration: f32,
        frequency: f32,
        waveform: Waveform,
    },
    /// Start the sustained keyed oscillator
    KeyOn { frequency: f32, waveform: Waveform },
    /// Fade the keyed oscillator out and stop it
    KeyOff,
    SetGain(f32),
    SetPan(f32),
}

/// Messages from Audio thread → Controller
#[derive(Debug, Clone)]
pub enum AudioMsg {
    MasterLevel(f32, f32),
    ActiveVoices(usize),
}
