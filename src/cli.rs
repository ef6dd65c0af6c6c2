use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-boldqc",
    version,
    about = "Single-subject fMRI quality control on top of FSL"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
    Report(ReportArgs),
    CheckTools(CheckToolsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "4D functional scan (prompted for when omitted)")]
    pub scan: Option<PathBuf>,

    #[arg(long, help = "Binary brain mask (prompted for when omitted)")]
    pub mask: Option<PathBuf>,

    #[arg(long, help = "Subject identifier (prompted for when omitted)")]
    pub subject: Option<String>,

    #[arg(long, default_value = ".", help = "Root under which <subject>_qc/ is created")]
    pub out: PathBuf,

    #[arg(long, env = "FSLDIR", help = "FSL installation; tools run from <dir>/bin")]
    pub fsl_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Also write <subject>_qc_summary.json")]
    pub json: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Exit non-zero when any stage fails or is skipped"
    )]
    pub strict: bool,

    #[arg(long, default_value_t = false, help = "Fail instead of prompting for missing inputs")]
    pub no_prompt: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub scan: PathBuf,

    #[arg(long)]
    pub mask: PathBuf,

    #[arg(long)]
    pub subject: String,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    #[arg(long)]
    pub subject: String,

    #[arg(long, help = "Original scan path shown in the report")]
    pub scan: Option<PathBuf>,

    #[arg(long, help = "Mask path shown in the report")]
    pub mask: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckToolsArgs {
    #[arg(long, env = "FSLDIR")]
    pub fsl_dir: Option<PathBuf>,
}
