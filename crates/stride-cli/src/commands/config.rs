use clap::{Subcommand, ValueEnum};
use stride_core::{Config, PhaseKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    SlowWalk,
    FastWalk,
    Run,
}

impl From<PhaseArg> for PhaseKind {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::SlowWalk => PhaseKind::SlowWalk,
            PhaseArg::FastWalk => PhaseKind::FastWalk,
            PhaseArg::Run => PhaseKind::Run,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as JSON
    Show,
    /// Set a phase duration in seconds (minimum 10)
    Set {
        #[arg(value_enum)]
        phase: PhaseArg,
        secs: u64,
    },
    /// Restore the built-in defaults
    Reset,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let cfg = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        ConfigAction::Set { phase, secs } => {
            let kind = PhaseKind::from(phase);
            let mut cfg = Config::load()?;
            cfg.set_phase_secs(kind, secs)?;
            cfg.save()?;
            println!("{} = {secs}s", kind.label());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("configuration reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
