//! CLI argument parsing for the merchant onboarding tool.
//!
//! The CLI drives the same wizard the dashboard uses, feeding it answers from a
//! JSON file instead of interactive forms.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for merchant onboarding.
#[derive(Parser, Debug)]
#[command(
    name = "qcadmin",
    version,
    about = "QuickCrate merchant registration tooling",
    after_help = "Commands:\n  register --answers <file>   Run the registration wizard and submit\n  normalize --input <file>    Print the canonical payload for a raw draft\n  sample                      Print a complete reference payload\n  init-config                 Write a default gateway config file\n\nExamples:\n  qcadmin register --answers merchant.json --tax-certificate pin.pdf --dry-run\n  qcadmin normalize --input draft.json\n  qcadmin --api-base-url http://localhost:5000/api register --answers merchant.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Gateway config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the environment and config file
    #[arg(long, value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Log progress to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Register(RegisterArgs),
    Normalize(NormalizeArgs),
    Sample(SampleArgs),
    InitConfig(InitConfigArgs),
}

/// Register command inputs: one answers file plus optional documents.
#[derive(Parser, Debug)]
#[command(about = "Walk the registration wizard with answers from a file and submit")]
pub struct RegisterArgs {
    /// JSON object with the form fields of every step
    #[arg(long, value_name = "PATH")]
    pub answers: PathBuf,

    /// KRA PIN certificate (PDF, JPEG, or PNG)
    #[arg(long, value_name = "PATH")]
    pub tax_certificate: Option<PathBuf>,

    /// Business registration certificate (PDF, JPEG, or PNG)
    #[arg(long, value_name = "PATH")]
    pub business_certificate: Option<PathBuf>,

    /// Validate every step and print the payload without contacting the backend
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Normalize a raw registration draft into the backend payload")]
pub struct NormalizeArgs {
    /// Raw draft JSON; `-` reads stdin
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Print a complete sample registration payload")]
pub struct SampleArgs {}

#[derive(Parser, Debug)]
#[command(about = "Write a default gateway config (to --config or the user config dir)")]
pub struct InitConfigArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Print the default config instead of writing it
    #[arg(long, conflicts_with = "force")]
    pub stdout: bool,
}
