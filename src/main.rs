use anyhow::Result;
use clap::Parser;
use quickcrate_onboard::cli::{Command, RootArgs};
use quickcrate_onboard::commands::{run_init_config, run_normalize, run_register, run_sample};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_logging(args.global.verbose);

    match args.command {
        Command::Register(register) => run_register(&args.global, register),
        Command::Normalize(normalize) => run_normalize(normalize),
        Command::Sample(sample) => run_sample(sample),
        Command::InitConfig(init) => run_init_config(&args.global, init),
    }
}
