//! # Stride Core Library
//!
//! Core logic for Stride, a walk/run interval trainer. The timer itself
//! is a one-second-resolution state machine over a fixed three-phase
//! routine (slow walk, fast walk, run); everything else here is the
//! plumbing around it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a clock-free state machine; the caller (normally
//!   the driver) invokes `tick()` once per elapsed second
//! - **Driver**: tokio task that owns the cadence and publishes events
//! - **Config**: TOML-based phase duration defaults
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: the interval timer state machine
//! - [`TimerDriver`]: periodic adapter over an engine
//! - [`Routine`]: the ordered phase list with the built-in defaults
//! - [`Config`]: application configuration

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod timer;

pub use config::Config;
pub use driver::{Command, TimerDriver};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use timer::{CompletionCounts, IntervalTimer, Phase, PhaseKind, Routine, TimerState};
