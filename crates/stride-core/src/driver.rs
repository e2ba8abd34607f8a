//! Periodic driver for the interval timer.
//!
//! The engine is clock-free; this adapter owns the one-second cadence.
//! A tokio task holds the engine, ticks it while running, applies
//! commands between ticks, and forwards every event - discrete state
//! changes plus one `StateSnapshot` per tick - to the display layer.
//!
//! The cadence is restarted whenever a command is applied, so a toggle
//! or duration edit never leaves two overlapping tick schedules. Letting
//! the handle go (or calling `shutdown`) cancels the pending tick
//! unconditionally before the task exits.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::IntervalTimer;

const TICK: Duration = Duration::from_secs(1);

/// Commands accepted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The single start/stop control: starts when stopped, stops when
    /// running.
    Toggle,
    Stop,
    SetPhaseDuration { index: usize, secs: u64 },
    ResetDurations,
    Shutdown,
}

/// Handle to a running driver task.
pub struct TimerDriver {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<IntervalTimer>,
}

impl TimerDriver {
    /// Spawn the driver over the given engine.
    ///
    /// Returns the handle plus the event stream: discrete events for
    /// every state change, and a fresh `StateSnapshot` after each
    /// applied command and each tick.
    pub fn spawn(engine: IntervalTimer) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(engine, cmd_rx, event_tx));
        (
            Self {
                commands: cmd_tx,
                task,
            },
            event_rx,
        )
    }

    /// Queue a command. Dropped silently if the task already exited.
    pub fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    /// Stop the loop and take the engine back.
    ///
    /// # Errors
    ///
    /// Returns `Driver` if the task panicked or was aborted.
    pub async fn shutdown(self) -> Result<IntervalTimer> {
        let _ = self.commands.send(Command::Shutdown);
        self.task
            .await
            .map_err(|e| CoreError::Driver(e.to_string()))
    }
}

fn cadence() -> Interval {
    // First fire one full period out: an interval's immediate first tick
    // would otherwise advance the timer at second zero.
    let mut interval = time::interval_at(Instant::now() + TICK, TICK);
    // Late ticks never burst.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn run_loop(
    mut engine: IntervalTimer,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<Event>,
) -> IntervalTimer {
    let mut ticker = cadence();
    // Seed the display with the pre-command state.
    let _ = events.send(engine.snapshot());
    loop {
        tokio::select! {
            maybe_cmd = commands.recv() => {
                match maybe_cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => {
                        if let Some(event) = apply(&mut engine, command) {
                            let _ = events.send(event);
                        }
                        // Any command can flip the running state or edit
                        // a duration; restart the cadence either way.
                        ticker = cadence();
                        let _ = events.send(engine.snapshot());
                    }
                }
            }
            _ = ticker.tick(), if engine.is_running() => {
                if let Some(event) = engine.tick() {
                    let _ = events.send(event);
                }
                let _ = events.send(engine.snapshot());
            }
        }
    }
    engine
}

fn apply(engine: &mut IntervalTimer, command: Command) -> Option<Event> {
    match command {
        Command::Toggle => Some(engine.start()),
        Command::Stop => engine.stop(),
        // Indices come from the presentation layer, which only offers
        // the phases that exist.
        Command::SetPhaseDuration { index, secs } => {
            engine.set_phase_duration(index, secs).ok()
        }
        Command::ResetDurations => Some(engine.reset()),
        Command::Shutdown => None,
    }
}
