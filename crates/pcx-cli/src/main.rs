use clap::Parser;
use clap_complete::{generate, Shell};
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

use crate::commands::util::configure_threads;
use pcx_cli::cli::{build_cli_command, Cli, Commands};

mod commands;

fn generate_completions(shell: Shell, out: Option<&Path>) -> anyhow::Result<()> {
    let mut cmd = build_cli_command();
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        generate(shell, &mut cmd, "pcx", &mut file);
        println!("Wrote {shell:?} completion to {}", path.display());
    } else {
        generate(shell, &mut cmd, "pcx", &mut io::stdout());
    }
    Ok(())
}

fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run {
            study,
            out,
            archive,
            json,
            top,
        } => commands::run::handle(study, out, archive.as_deref(), json.as_deref(), *top),
        Commands::Validate { study } => commands::validate::handle(study),
        Commands::Frontier { command } => commands::frontier::handle(command),
        Commands::Completions { shell, out } => generate_completions(*shell, out.as_deref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber is already installed");
    }

    configure_threads(&cli.threads);

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
