use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use pcx_core::Convention;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Power converter design-space explorer", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// Threading hint (`auto` or integer)
    #[arg(long, default_value = "auto", global = true)]
    pub threads: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize a study and write its Pareto frontier
    Run {
        /// Study file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        study: PathBuf,
        /// Output CSV for the non-dominated designs
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Also write every composite design of every sweep combination
        #[arg(long, value_hint = ValueHint::FilePath)]
        archive: Option<PathBuf>,
        /// Also write the frontier as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        json: Option<PathBuf>,
        /// Number of designs shown in the summary table
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Check a study file without running it
    Validate {
        /// Study file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        study: PathBuf,
    },
    /// Inspect and compose persisted frontiers
    Frontier {
        #[command(subcommand)]
        command: FrontierCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FrontierCommands {
    /// Print a frontier CSV as a table or JSON
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Primary objective convention (read from the file marker when omitted)
        #[arg(long, value_enum)]
        convention: Option<ConventionArg>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Skip malformed rows instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Series-compose two frontiers
    Combine {
        #[arg(value_hint = ValueHint::FilePath)]
        upstream: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        downstream: PathBuf,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        #[arg(long, value_enum)]
        convention: Option<ConventionArg>,
    },
    /// Union several frontiers under the dominance rule
    Merge {
        #[arg(required = true, num_args = 1.., value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        #[arg(long, value_enum)]
        convention: Option<ConventionArg>,
        /// Keep every row instead of pruning dominated ones
        #[arg(long)]
        archival: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConventionArg {
    Loss,
    Efficiency,
}

impl From<ConventionArg> for Convention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Loss => Convention::Loss,
            ConventionArg::Efficiency => Convention::Efficiency,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
