use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use code_insight_analyzer::{CodeInsight, LineRequest, LocateRequest};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

mod settings;

#[derive(Parser)]
#[command(name = "code-insight")]
#[command(about = "Explainable heuristic analysis of Python entities and file line ranges", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Project root (overrides CODE_INSIGHT_ROOT and the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file (defaults to code-insight.toml in the project root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a class or function located by name
    Entity(EntityArgs),

    /// Analyze a line or line range of any text file
    Lines(LinesArgs),
}

#[derive(Args)]
struct EntityArgs {
    /// Class or function name
    name: String,

    /// Narrow the analysis to a method of the entity
    #[arg(long)]
    method: Option<String>,

    /// Search only this file instead of scanning the project
    #[arg(long)]
    file: Option<PathBuf>,
}

impl EntityArgs {
    fn request(&self) -> LocateRequest {
        let mut request = LocateRequest::new(&self.name);
        if let Some(method) = &self.method {
            request = request.method(method);
        }
        if let Some(file) = &self.file {
            request = request.in_file(file);
        }
        request
    }
}

#[derive(Args)]
struct LinesArgs {
    /// File to analyze (absolute, or relative to the project root)
    file: String,

    /// Line ("42") or inclusive range ("42-45")
    lines: String,

    /// What you want to know about these lines
    #[arg(short, long, default_value = "What does this code do?")]
    question: String,

    /// Symbol to focus on
    #[arg(long)]
    symbol: Option<String>,

    /// Lines of context around the target (clamped to 5..=100)
    #[arg(long)]
    window: Option<usize>,
}

impl LinesArgs {
    fn request(&self) -> LineRequest {
        let mut request = LineRequest::new(&self.file, &self.lines, &self.question);
        if let Some(symbol) = &self.symbol {
            request = request.symbol(symbol);
        }
        request.context_window = self.window;
        request
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = settings::load(cli.root.as_deref(), cli.config.as_deref())
        .context("Failed to load configuration")?;
    let engine = CodeInsight::new(config).context("Failed to initialize analyzer")?;

    match &cli.command {
        Commands::Entity(args) => respond(engine.analyze_entity(&args.request()), cli.pretty),
        Commands::Lines(args) => respond(engine.analyze_line_range(&args.request()), cli.pretty),
    }
}

/// Print a report, or the error rendered as data, as JSON on stdout
fn respond<T: Serialize>(result: code_insight_analyzer::Result<T>, pretty: bool) -> Result<ExitCode> {
    let (body, code) = match result {
        Ok(report) => (serde_json::to_value(report)?, ExitCode::SUCCESS),
        Err(err) => {
            log::warn!("{err}");
            (serde_json::to_value(err.to_report())?, ExitCode::FAILURE)
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{rendered}");
    Ok(code)
}
