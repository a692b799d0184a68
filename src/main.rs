use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use smtranslate::check::{self, CheckOptions, OutputOptions};
use smtranslate::config::{Config, LogFormat, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smtranslate", version, about = "Check SourceMod translations against English")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare every language with the English baseline
    Check(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Configuration folder path
    #[arg(long, default_value = "config")]
    config_folder: PathBuf,

    /// SourceMod translations folder path
    #[arg(long, env = "TRANSLATION_FOLDER")]
    translation_folder: PathBuf,

    /// Write one Markdown report per language into this folder
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the reports as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when any language has issues
    #[arg(long)]
    fail_on_issues: bool,
}

fn main() -> Result<ExitCode> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => run_check(args),
    }
}

fn run_check(args: CheckArgs) -> Result<ExitCode> {
    let config = Config::load(&args.config_folder)?;
    init_logging(&config.logging);

    let options = CheckOptions {
        config_folder: args.config_folder,
        translation_folder: args.translation_folder,
    };
    let outcome = check::run(&options)?;

    let output = OutputOptions {
        json: args.json,
        output_dir: args.output_dir,
        link_base: config.report.link_base,
        fail_on_issues: args.fail_on_issues,
    };
    let status = outcome.emit(&output, &mut std::io::stdout().lock())?;
    Ok(ExitCode::from(status))
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match (logging.format, logging.timestamps) {
        (LogFormat::Full, true) => builder.init(),
        (LogFormat::Full, false) => builder.without_time().init(),
        (LogFormat::Compact, true) => builder.compact().init(),
        (LogFormat::Compact, false) => builder.compact().without_time().init(),
    }
}
