//! unnotion CLI - page tree to Markdown export tool

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unnotion::{Exporter, RenderOptions, SnapshotSource};

#[derive(Parser)]
#[command(name = "unnotion")]
#[command(version)]
#[command(about = "Export a page tree snapshot to flat Markdown", long_about = None)]
struct Cli {
    /// Page id to export
    #[arg(value_name = "PAGE_ID")]
    page_id: String,

    /// Snapshot JSON file holding the page tree
    #[arg(short, long, value_name = "FILE", env = "UNNOTION_SNAPSHOT")]
    snapshot: PathBuf,

    /// Output Markdown file
    #[arg(short, long, value_name = "FILE", default_value = "output.md")]
    output: PathBuf,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Abort the export after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum number of concurrent sibling renders
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = SnapshotSource::from_path(&cli.snapshot)?;

    let mut options = RenderOptions::new();
    if let Some(limit) = cli.concurrency {
        options = options.with_max_concurrency(limit);
    }

    let mut exporter = Exporter::new(Arc::new(source)).with_options(options);
    if let Some(secs) = cli.timeout {
        exporter = exporter.with_timeout(Duration::from_secs(secs));
    }

    let rt = tokio::runtime::Runtime::new()?;

    if cli.stdout {
        let markdown = rt.block_on(exporter.export(&cli.page_id))?;
        println!("{}", markdown);
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Exporting page {}...", cli.page_id));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = rt.block_on(exporter.export_to_file(&cli.page_id, &cli.output));
    pb.finish_and_clear();
    result?;

    println!("{} {}", "Saved to".green(), cli.output.display());
    Ok(())
}
