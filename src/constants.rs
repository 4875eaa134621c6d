pub const SAMPLE_RATE: u32 = 44_100;
/// Analyser window, matching the browser AnalyserNode default used by the page
pub const FFT_SIZE: usize = 2048;
/// Bytes sampled per frame for the scope
pub const FREQUENCY_BIN_COUNT: usize = FFT_SIZE / 2;
/// Fade-out length for both triggered and keyed tones (seconds)
pub const RELEASE_SECS: f64 = 0.05;
/// UI refresh rate target
pub const UI_FPS: u64 = 60;
/// Channel capacity for inter-thread messages
pub const CHANNEL_CAPACITY: usize = 1024;
/// Audio → UI report rate
pub const REPORTS_PER_SEC: usize = 30;

/// Upper bound for tone durations and text gaps (seconds)
pub const MAX_SECONDS: f32 = 60.0;

pub const FREQUENCY_RANGE: (f32, f32) = (100.0, 4000.0);
pub const RIDICULOUS_FREQUENCY_RANGE: (f32, f32) = (30.0, 15_000.0);

/// Hold time after the last press/repeat when the terminal cannot report key releases
pub const KEY_RELEASE_FALLBACK_MS: u64 = 550;
