use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use transaction_rollup::config::PipelineConfig;
use transaction_rollup::observability::{CompositeObserver, FileObserver, PipelineObserver, TracingObserver};
use transaction_rollup::pipeline::Pipeline;

/// Summarize a transactions CSV into summary, per-account, per-type and monthly views
#[derive(Parser, Debug)]
#[command(name = "transaction-rollup", version)]
struct Cli {
    /// Input transactions CSV
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Existing directory to write the view CSVs into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows of the input shown in the preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Append run events to this file
    #[arg(long)]
    run_log: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(n) = self.preview_rows {
            config.preview_rows = n;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    debug!(?config, "resolved configuration");

    let mut observers: Vec<Arc<dyn PipelineObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(log) = &cli.run_log {
        observers.push(Arc::new(FileObserver::new(log)));
    }

    let pipeline = Pipeline::new(config).with_observer(Arc::new(CompositeObserver::new(observers)));
    let stdout = std::io::stdout();
    pipeline.run(&mut stdout.lock())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
