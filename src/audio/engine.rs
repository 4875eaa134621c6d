use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use crossbeam_channel::{Receiver, Sender};

use crate::audio::analyser::{Analyser, SharedAnalyser};
use crate::audio::graph::AudioGraph;
use crate::constants::{REPORTS_PER_SEC, SAMPLE_RATE};
use crate::messages::{AudioCmd, AudioMsg};

const CHANNELS: u16 = 2;

struct LevelMeter {
    sum_sq: f32,
    count: usize,
}

impl LevelMeter {
    fn new() -> Self {
        Self {
            sum_sq: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, sample: f32) {
        self.sum_sq += sample * sample;
        self.count += 1;
    }

    fn take_rms(&mut self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        let rms = (self.sum_sq / self.count as f32).sqrt();
        self.sum_sq = 0.0;
        self.count = 0;
        rms
    }
}

pub struct AudioEngine {
    pub analyser: SharedAnalyser,
}

impl AudioEngine {
    pub fn new() -> Self {
        Self {
            analyser: Analyser::shared(),
        }
    }

    /// Open the default output device and move the audio graph into its callback.
    ///
    /// The returned stream must be kept alive for sound to continue.
    pub fn start(
        &self,
        cmd_rx: Receiver<AudioCmd>,
        msg_tx: Sender<AudioMsg>,
    ) -> anyhow::Result<cpal::Stream> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        match device.name() {
            Ok(name) => log::info!("cpal device: {}", name),
            Err(_) => log::info!("cpal device: (no name)"),
        }

        let config = StreamConfig {
            channels: CHANNELS,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        // --- All audio state lives inside the output callback closure ---
        let mut graph = AudioGraph::new(SAMPLE_RATE, std::sync::Arc::clone(&self.analyser));
        let mut meter_l = LevelMeter::new();
        let mut meter_r = LevelMeter::new();
        let mut report_counter: usize = 0;
        let report_interval = SAMPLE_RATE as usize / REPORTS_PER_SEC;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Ok(cmd) = cmd_rx.try_recv() {
                        graph.handle(cmd);
                    }

                    graph.process(data, CHANNELS as usize);

                    for frame in data.chunks(CHANNELS as usize) {
                        meter_l.push(frame[0]);
                        meter_r.push(frame.get(1).copied().unwrap_or(frame[0]));

                        report_counter += 1;
                        if report_counter >= report_interval {
                            report_counter = 0;
                            let _ = msg_tx.try_send(AudioMsg::MasterLevel(
                                meter_l.take_rms(),
                                meter_r.take_rms(),
                            ));
                            let _ = msg_tx.try_send(AudioMsg::ActiveVoices(graph.active_voices()));
                        }
                    }
                },
                |err| log::error!("audio output error: {}", err),
                None,
            )
            .context("failed to build output stream")?;

        stream.play().context("failed to start output stream")?;
        log::info!("audio output running at {} Hz", SAMPLE_RATE);

        Ok(stream)
    }
}
