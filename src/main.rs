use anyhow::{Result, bail};
use clap::Parser;
use console::Term;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_boldqc::cli::{Cli, Commands, ReportArgs, RunArgs};
use kira_boldqc::config::{RunConfig, resolve_inputs};
use kira_boldqc::ctx::Ctx;
use kira_boldqc::io;
use kira_boldqc::pipeline::Pipeline;
use kira_boldqc::pipeline::stage0_validate::Stage0Validate;
use kira_boldqc::toolkit::FslToolkit;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Validate(args) => {
            let config = RunConfig::new(args.scan, args.mask, args.subject, PathBuf::from("."));
            let mut ctx = Ctx::new(config);
            let pipeline = Pipeline::new(vec![Box::new(Stage0Validate::new())]);
            pipeline.run(&mut ctx, &FslToolkit::default())?;
            println!("kira-boldqc validate ok");
        }
        Commands::Report(args) => report(args)?,
        Commands::CheckTools(args) => {
            let tools = FslToolkit::new(args.fsl_dir.as_deref());
            let missing = tools.missing_tools();
            if !missing.is_empty() {
                bail!("missing toolkit commands: {}", missing.join(", "));
            }
            println!("all toolkit commands found");
        }
    }

    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let no_prompt = args.no_prompt;
    let (scan, mask, subject) = resolve_inputs(args.scan, args.mask, args.subject, |label| {
        if no_prompt {
            bail!("{} is required (--no-prompt given)", label);
        }
        terminal_prompt(label)
    })?;

    let mut config = RunConfig::new(scan, mask, subject, args.out);
    config.fsl_dir = args.fsl_dir;
    config.write_json = args.json;
    config.strict = args.strict;

    let tools = FslToolkit::new(config.fsl_dir.as_deref());
    let mut ctx = Ctx::new(config);
    Pipeline::full().with_progress(true).run(&mut ctx, &tools)?;
    finish(&ctx)
}

fn report(args: ReportArgs) -> Result<()> {
    // Inputs the caller does not name stay empty and render as NA.
    let mut config = RunConfig::new(
        args.scan.unwrap_or_default(),
        args.mask.unwrap_or_default(),
        args.subject,
        args.out,
    );
    config.write_json = args.json;

    let mut ctx = Ctx::new(config);
    Pipeline::report_only()
        .with_progress(true)
        .run(&mut ctx, &FslToolkit::default())?;
    finish(&ctx)
}

fn finish(ctx: &Ctx) -> Result<()> {
    print!("{}", io::summary::format_summary(ctx));
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    let incomplete = ctx.count_incomplete();
    if ctx.config.strict && incomplete > 0 {
        bail!("{} stage(s) did not complete", incomplete);
    }
    Ok(())
}

fn terminal_prompt(label: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{}: ", label))?;
    let line = if Term::stdout().is_term() {
        term.read_line()?
    } else {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        line
    };
    Ok(line.trim().to_string())
}
