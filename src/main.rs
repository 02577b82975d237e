//! synthnet CLI — export synthetic network tables as graph JSON.
//!
//! # Usage
//!
//! ```bash
//! # One network to stdout
//! synthnet single --nodes nodes_pg.csv --edges edges.csv --id 3
//!
//! # One network, named from its parameters
//! synthnet single --nodes nodes_pg.csv --edges edges.csv --id 3 \
//!     --params parameters.csv --output-dir out/
//!
//! # Every network in the parameters table
//! synthnet batch --nodes nodes_pg.csv --edges edges.csv --params parameters.csv --output-dir out/
//!
//! # Ids 0..=99 as graph_{id}.json
//! synthnet range --nodes nodes_pg.csv --edges edges.csv --start 0 --end 99 --output-dir out/
//!
//! # All networks in one file
//! synthnet bundle --nodes nodes_pg.csv --edges edges.csv --params parameters.csv -o all.json
//!
//! # Parameters table from the ranking table, k = 10
//! synthnet params --ranking ranking_minorities.csv --k 10 -o parameters.csv
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the level), documents to files or
//! stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use synthnet::params::derive_parameter_table;
use synthnet::{
    BatchDriver, BatchReport, Converter, DuplicatePolicy, ExportConfig, FailurePolicy,
    NetworkId, ParameterTable, RankingSource,
};

#[derive(Parser)]
#[command(name = "synthnet")]
#[command(about = "Convert synthetic network tables into graph JSON documents", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Tables and join settings shared by every conversion.
#[derive(Args)]
struct Inputs {
    /// Nodes table (id,node,minority,pagerank,order_rank,order_node)
    #[arg(long)]
    nodes: PathBuf,

    /// Edges table (id,source,target)
    #[arg(long)]
    edges: PathBuf,

    /// Attributes table [default: ranking_minorities.csv next to --nodes]
    #[arg(long, conflicts_with = "no_ranking")]
    ranking: Option<PathBuf>,

    /// Do not join network attributes
    #[arg(long)]
    no_ranking: bool,

    /// Several attribute rows for one id: first or reject
    #[arg(long, default_value = "first")]
    duplicates: DuplicatePolicy,
}

impl Inputs {
    fn config(self) -> ExportConfig {
        let ranking = match (self.ranking, self.no_ranking) {
            (_, true) => RankingSource::Disabled,
            (Some(path), false) => RankingSource::Path(path),
            (None, false) => RankingSource::Sibling,
        };
        ExportConfig::new(self.nodes, self.edges)
            .with_ranking(ranking)
            .with_duplicates(self.duplicates)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one network
    Single {
        #[command(flatten)]
        inputs: Inputs,

        /// Network id
        #[arg(long)]
        id: NetworkId,

        /// Output file (stdout if neither this nor --output-dir is given)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Output directory; the filename comes from --params
        #[arg(long, requires = "params")]
        output_dir: Option<PathBuf>,

        /// Parameters table used to name the file
        #[arg(long, requires = "output_dir")]
        params: Option<PathBuf>,
    },

    /// Convert every network listed in a parameters table
    Batch {
        #[command(flatten)]
        inputs: Inputs,

        /// Parameters table (id,fm,h_MM,h_mm,...)
        #[arg(long)]
        params: PathBuf,

        /// Output directory
        #[arg(long)]
        output_dir: PathBuf,

        /// On a failing network: abort or skip
        #[arg(long, default_value = "abort")]
        on_error: FailurePolicy,
    },

    /// Convert an inclusive range of integer ids
    Range {
        #[command(flatten)]
        inputs: Inputs,

        /// First id
        #[arg(long, alias = "start-id")]
        start: i64,

        /// Last id (inclusive)
        #[arg(long, alias = "end-id")]
        end: i64,

        /// Output directory
        #[arg(long)]
        output_dir: PathBuf,

        /// On a failing network: abort or skip
        #[arg(long, default_value = "abort")]
        on_error: FailurePolicy,
    },

    /// Write every network of a parameters table into one JSON array
    Bundle {
        #[command(flatten)]
        inputs: Inputs,

        /// Parameters table (id,fm,h_MM,h_mm,...)
        #[arg(long)]
        params: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// On a failing network: abort or skip
        #[arg(long, default_value = "abort")]
        on_error: FailurePolicy,
    },

    /// Derive a parameters table from a ranking table
    Params {
        /// Ranking table (id,k,...)
        #[arg(long)]
        ranking: PathBuf,

        /// Keep rows with this k
        #[arg(long, default_value = "10")]
        k: String,

        /// Output CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Also write JSON lines here
        #[arg(long)]
        jsonl: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Single { inputs, id, output, output_dir, params } => {
            cmd_single(inputs.config(), &id, output, output_dir, params)
        }
        Commands::Batch { inputs, params, output_dir, on_error } => {
            let driver = driver(inputs, on_error, output_dir);
            let report = driver
                .by_parameters(&ParameterTable::new(&params))
                .with_context(|| format!("batch over {} failed", params.display()))?;
            summarize(&driver, &report);
            Ok(())
        }
        Commands::Range { inputs, start, end, output_dir, on_error } => {
            let driver = driver(inputs, on_error, output_dir);
            let report = driver
                .by_range(start, end)
                .with_context(|| format!("range {start}..={end} failed"))?;
            summarize(&driver, &report);
            Ok(())
        }
        Commands::Bundle { inputs, params, output, on_error } => {
            let converter = Converter::new(inputs.config().with_failure_policy(on_error));
            let bundle = synthnet::batch::bundle(&converter, &ParameterTable::new(&params))
                .with_context(|| format!("bundle over {} failed", params.display()))?;
            synthnet::export::write_bundle_file(&bundle.entries, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Bundled {} networks into {} ({} skipped)",
                bundle.entries.len(),
                output.display(),
                bundle.skipped.len()
            );
            Ok(())
        }
        Commands::Params { ranking, k, output, jsonl } => {
            let kept = derive_parameter_table(&ranking, &k, &output, jsonl.as_deref())
                .with_context(|| {
                    format!("failed to derive parameters from {}", ranking.display())
                })?;
            println!("Kept {kept} rows with k={k} in {}", output.display());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn driver(inputs: Inputs, on_error: FailurePolicy, output_dir: PathBuf) -> BatchDriver {
    let config = inputs.config().with_failure_policy(on_error);
    BatchDriver::new(Converter::new(config), output_dir)
}

fn cmd_single(
    config: ExportConfig,
    id: &NetworkId,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    params: Option<PathBuf>,
) -> Result<()> {
    if let (Some(dir), Some(params)) = (output_dir, params) {
        let driver = BatchDriver::new(Converter::new(config), dir);
        let written = driver
            .single_named(id, &ParameterTable::new(params))
            .with_context(|| format!("network {id} failed"))?;
        println!("Saved network {id} to {}", written.path.display());
        return Ok(());
    }

    let doc = Converter::new(config)
        .convert(id)
        .with_context(|| format!("network {id} failed"))?;
    match output {
        Some(path) => synthnet::export::write_document_file(&doc, &path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => synthnet::export::write_document(&doc, &mut std::io::stdout().lock())?,
    }
    Ok(())
}

fn summarize(driver: &BatchDriver, report: &BatchReport) {
    println!(
        "Generated {} graphs in {}",
        report.written.len(),
        driver.output_dir().display()
    );
    for skipped in &report.skipped {
        eprintln!("skipped network {}: {}", skipped.id, skipped.error);
    }
}
