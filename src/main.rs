mod app;
mod audio;
mod cli;
mod constants;
mod input;
mod keyer;
mod messages;
mod morse;
mod settings;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::Controller;
use crate::audio::analyser::SharedAnalyser;
use crate::audio::engine::AudioEngine;
use crate::cli::Args;
use crate::constants::*;
use crate::messages::*;
use crate::ui::widgets::scope::ScopeState;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let settings = args.load_settings()?;

    // --- Setup channels ---
    let (audio_cmd_tx, audio_cmd_rx): (Sender<AudioCmd>, Receiver<AudioCmd>) =
        bounded(CHANNEL_CAPACITY);
    let (audio_msg_tx, audio_msg_rx): (Sender<AudioMsg>, Receiver<AudioMsg>) =
        bounded(CHANNEL_CAPACITY);

    // --- Audio engine setup ---
    let engine = AudioEngine::new();
    let analyser = std::sync::Arc::clone(&engine.analyser);

    // Keep the stream alive for the whole UI session
    let _output_stream = match engine.start(audio_cmd_rx, audio_msg_tx) {
        Ok(stream) => Some(stream),
        Err(e) => {
            log::warn!("audio engine failed to start: {:#}", e);
            log::warn!("running in UI-only mode (no audio)");
            None
        }
    };

    let mut controller = Controller::new(settings, audio_cmd_tx);
    if let Some(text) = args.send.as_deref() {
        controller.send_text(text, Instant::now());
    }

    run_ui(controller, audio_msg_rx, analyser)
}

fn run_ui(
    mut controller: Controller,
    audio_msg_rx: Receiver<AudioMsg>,
    analyser: SharedAnalyser,
) -> anyhow::Result<()> {
    // --- Terminal setup ---
    enable_raw_mode().context("failed to enable raw mode")?;
    // Release events are needed for hold-to-key; without them a held key times out
    let key_release_events = matches!(crossterm::terminal::supports_keyboard_enhancement(), Ok(true));
    io::stdout().execute(EnterAlternateScreen)?;
    if key_release_events {
        io::stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(
        &mut terminal,
        &mut controller,
        &audio_msg_rx,
        &analyser,
        key_release_events,
    );

    // --- Cleanup ---
    if key_release_events {
        let _ = io::stdout().execute(PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if !key_release_events {
        log::info!(
            "terminal does not report key releases; held key auto-releases after {} ms",
            KEY_RELEASE_FALLBACK_MS
        );
    }
    result
}

fn run_loop(
    terminal: &mut Tui,
    controller: &mut Controller,
    audio_msg_rx: &Receiver<AudioMsg>,
    analyser: &SharedAnalyser,
    key_release_events: bool,
) -> anyhow::Result<()> {
    let frame_duration = Duration::from_millis(1000 / UI_FPS);
    let release_fallback = Duration::from_millis(KEY_RELEASE_FALLBACK_MS);
    let mut scope = ScopeState::for_analyser(analyser);
    // Last press/repeat of the straight key, for terminals without release events
    let mut key_last_seen: Option<Instant> = None;

    // --- Main loop ---
    loop {
        let frame_start = Instant::now();

        // --- Process audio messages (non-blocking) ---
        while let Ok(msg) = audio_msg_rx.try_recv() {
            controller.apply_audio_msg(msg);
        }

        // --- Process terminal input ---
        let mut timeout = Duration::from_millis(1);
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            match event::read()? {
                Event::Key(key) => {
                    let evt = input::handle_key(
                        key,
                        controller.text_entry.is_some(),
                        controller.is_sending(),
                    );
                    if let Some(evt) = evt {
                        let now = Instant::now();
                        if evt == UiEvent::KeyDown && !key_release_events {
                            key_last_seen = Some(now);
                        }
                        handle_ui_event(controller, evt, now);
                    }
                }
                Event::Resize(_, _) => {
                    scope.reset();
                    terminal.clear()?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        if let Some(seen) = key_last_seen {
            if now.duration_since(seen) >= release_fallback {
                key_last_seen = None;
                controller.key_up(now);
            }
        }
        controller.tick(now);

        if controller.should_quit {
            break;
        }

        // --- Render ---
        scope.sample(analyser);
        terminal.draw(|frame| ui::draw(frame, controller, &scope))?;

        // --- Frame rate limiting ---
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }

    Ok(())
}

fn handle_ui_event(controller: &mut Controller, event: UiEvent, now: Instant) {
    match event {
        UiEvent::Quit => controller.should_quit = true,
        UiEvent::Dit => controller.dit(),
        UiEvent::Dah => controller.dah(),
        UiEvent::KeyDown => controller.key_down(),
        UiEvent::KeyUp => controller.key_up(now),
        UiEvent::SelectControl(delta) => controller.select(delta),
        UiEvent::Adjust(direction, coarse) => controller.adjust_selected(direction, coarse),
        UiEvent::Activate => controller.activate_selected(),
        UiEvent::BeginText => controller.begin_text(),
        UiEvent::TextChar(c) => controller.push_text(c),
        UiEvent::TextBackspace => controller.backspace_text(),
        UiEvent::SubmitText => controller.submit_text(now),
        UiEvent::CancelText => controller.cancel_text(),
        UiEvent::CancelSend => controller.cancel_send(),
    }
}
