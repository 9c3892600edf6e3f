use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use migration_stats::{PipelineConfig, Selection, run_pipeline};

/// Prepare UNHCR displacement data for mapping
#[derive(Debug, Parser)]
#[command(name = "migration-stats", version, about)]
struct Cli {
    /// JSON configuration file; absent keys take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary record table (CSV or Parquet)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Destination coordinate table
    #[arg(long)]
    destinations: Option<PathBuf>,

    /// Origin coordinate table
    #[arg(long)]
    origins: Option<PathBuf>,

    /// Destination country to show; repeat for several
    #[arg(long = "select-destination", value_name = "COUNTRY")]
    select_destination: Vec<String>,

    /// Origin country to show; repeat for several
    #[arg(long = "select-origin", value_name = "COUNTRY")]
    select_origin: Vec<String>,

    /// Write the presentation data here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(path) = &self.records {
            config.records_path.clone_from(path);
        }
        if let Some(path) = &self.destinations {
            config.destinations_path.clone_from(path);
        }
        if let Some(path) = &self.origins {
            config.origins_path.clone_from(path);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;

    let start = Instant::now();
    let pipeline = run_pipeline(&config).context("running migration pipeline")?;
    info!("{}", pipeline.summary);

    let selection = Selection::new(cli.select_destination, cli.select_origin);
    let data = pipeline.present(&selection);

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, &data)?;
    } else {
        serde_json::to_writer(&mut out, &data)?;
    }
    writeln!(out)?;
    out.flush()?;

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
