//! Interactive run mode.
//!
//! Drives the core driver on a current-thread runtime. Controls are a
//! single start/stop toggle, per-phase duration overrides, and a
//! duration reset. With `--json` the timer starts immediately, streams
//! one JSON event per line, and exits when the routine finishes.

use std::io::{stdout, Write};

use clap::Args;
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::mpsc;

use stride_core::clock::format_mm_ss;
use stride_core::timer::UI_MIN_PHASE_SECS;
use stride_core::{Command, Config, Event, IntervalTimer, TimerDriver, TimerState};

#[derive(Args)]
pub struct RunArgs {
    /// Slow walk duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(UI_MIN_PHASE_SECS..))]
    slow: Option<u64>,
    /// Fast walk duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(UI_MIN_PHASE_SECS..))]
    fast: Option<u64>,
    /// Run duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(UI_MIN_PHASE_SECS..))]
    run: Option<u64>,
    /// Start immediately and emit one JSON event per line
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = IntervalTimer::new(Config::load_or_default().routine());
    // Flag overrides are duration edits, so `r` still reverts to the
    // configured defaults.
    for (index, secs) in [args.slow, args.fast, args.run].into_iter().enumerate() {
        if let Some(secs) = secs {
            engine.set_phase_duration(index, secs)?;
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    if args.json {
        runtime.block_on(run_json(engine))
    } else {
        runtime.block_on(run_interactive(engine))
    }
}

async fn run_json(engine: IntervalTimer) -> Result<(), Box<dyn std::error::Error>> {
    let (driver, mut events) = TimerDriver::spawn(engine);
    driver.send(Command::Toggle);
    while let Some(event) = events.recv().await {
        println!("{}", serde_json::to_string(&event)?);
        if matches!(event, Event::RoutineFinished { .. }) {
            break;
        }
    }
    driver.shutdown().await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Reset,
    Quit,
}

/// Raw mode for the lifetime of the interactive loop; restored on drop
/// even when the loop errors out.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking keyboard reader on its own thread, bridged into the async
/// loop over a channel.
fn spawn_input_thread() -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                let Some(input) = map_key(key) else { continue };
                if tx.send(input).is_err() || input == Input::Quit {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => {
                let _ = tx.send(Input::Quit);
                break;
            }
        }
    });
    rx
}

fn map_key(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char(' ') => Some(Input::Toggle),
        KeyCode::Char('r') => Some(Input::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        _ => None,
    }
}

async fn run_interactive(engine: IntervalTimer) -> Result<(), Box<dyn std::error::Error>> {
    let (driver, mut events) = TimerDriver::spawn(engine);
    let guard = RawModeGuard::enable()?;
    let mut inputs = spawn_input_thread();

    print!("space start/stop - r reset durations - q quit\r\n");
    stdout().flush()?;

    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                None => break,
                Some(event) => render(&event)?,
            },
            maybe_input = inputs.recv() => match maybe_input {
                None | Some(Input::Quit) => break,
                Some(Input::Toggle) => driver.send(Command::Toggle),
                Some(Input::Reset) => driver.send(Command::ResetDurations),
            },
        }
    }

    let engine = driver.shutdown().await?;
    drop(guard);

    let counts = engine.counts();
    println!();
    println!(
        "total {} | routines {} | slow walk {} fast walk {} run {}",
        format_mm_ss(engine.total_elapsed_secs()),
        engine.routines_completed(),
        counts.slow_walk,
        counts.fast_walk,
        counts.run,
    );
    Ok(())
}

fn render(event: &Event) -> std::io::Result<()> {
    let mut out = stdout();
    match event {
        Event::StateSnapshot {
            state,
            kind,
            speed_range,
            remaining_secs,
            progress,
            total_elapsed_secs,
            counts,
            routines_completed,
            ..
        } => {
            let head = match (state, kind) {
                (TimerState::Idle, _) | (_, None) => "idle".to_string(),
                (TimerState::Running, Some(kind)) => format!(
                    "{kind} {} left ({} km/h) {:3.0}%",
                    format_mm_ss(*remaining_secs),
                    speed_range.as_deref().unwrap_or("-"),
                    progress * 100.0,
                ),
                (TimerState::Paused, Some(kind)) => format!(
                    "[paused] {kind} {} left",
                    format_mm_ss(*remaining_secs),
                ),
            };
            let line = format!(
                "{head} | total {} | routines {routines_completed} | slow {} fast {} run {}",
                format_mm_ss(*total_elapsed_secs),
                counts.slow_walk,
                counts.fast_walk,
                counts.run,
            );
            write!(out, "\r{line:<76}")?;
            out.flush()
        }
        Event::PhaseCompleted { kind, .. } => {
            write!(out, "\r{:<76}\r\n", format!("{kind} complete"))?;
            out.flush()
        }
        Event::RoutineFinished {
            routines_completed, ..
        } => {
            write!(
                out,
                "\r{:<76}\r\n",
                format!("routine complete ({routines_completed} total)")
            )?;
            out.flush()
        }
        // Started/stopped/edited states are visible in the snapshot that
        // follows each command.
        _ => Ok(()),
    }
}
