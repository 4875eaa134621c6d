//! Command-line arguments and startup settings.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "ditdah")]
#[command(about = "Dit/dah tone generator with a live oscilloscope", long_about = None)]
pub struct Args {
    /// JSON file with initial settings (missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Send this text as Morse once the audio is running
    #[arg(long, value_name = "TEXT")]
    pub send: Option<String>,

    /// Master gain, 0 to 1
    #[arg(long, value_name = "GAIN")]
    pub gain: Option<f32>,

    /// Stereo pan, -1 (left) to 1 (right)
    #[arg(long, value_name = "PAN", allow_hyphen_values = true)]
    pub pan: Option<f32>,

    /// Allow frequencies from 30 Hz to 15 kHz
    #[arg(long)]
    pub ridiculous: bool,

    /// Derive dah from dit (same pitch and waveform, three times as long)
    #[arg(long)]
    pub link: bool,
}

impl Args {
    /// Settings from `--config` (or defaults) with command-line overrides applied.
    ///
    /// Range clamping happens when the settings store is built.
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("invalid settings in {}", path.display()))?
            }
            None => Settings::default(),
        };

        if let Some(gain) = self.gain {
            settings.gain = gain;
        }
        if let Some(pan) = self.pan {
            settings.pan = pan;
        }
        if self.ridiculous {
            settings.ridiculous = true;
        }
        if self.link {
            settings.link = true;
        }
        Ok(settings)
    }
}
