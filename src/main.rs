use anyhow::{Context, Result};
use clap::Parser;
use skillcheck::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skillcheck")]
#[command(about = "Validate skill directories and the skills.json manifest", long_about = None)]
struct Cli {
    /// Repository root to validate
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Extra config file, applied over user and project config
    #[arg(long, value_name = "PATH", env = "SKILLCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    if !cli.root.is_dir() {
        anyhow::bail!("root {} is not a directory", cli.root.display());
    }

    let config = Config::load(&cli.root, cli.config.as_deref()).context("failed to load config")?;
    tracing::debug!(?config, "effective config");

    let findings = skillcheck::run(&cli.root, &config);
    print!("{}", findings.render());
    Ok(findings.exit_code())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
