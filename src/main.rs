//! moviegraph CLI: run imports and inspect deterministic ids

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use moviegraph::{
    read_records, ImportConfig, ImportPipeline, JsonLinesSink, MergeStore, MutationSink,
    RawRecord, RecordType,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "moviegraph", version, about = "Movie metadata to property graph importer")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "MOVIEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import JSON-lines files
    Import {
        /// Record type of every line (movie, person, company)
        #[arg(long = "type", value_name = "TAG", conflicts_with = "tagged")]
        record_type: Option<RecordType>,

        /// Lines are `<type>\t<json>`
        #[arg(long)]
        tagged: bool,

        /// Write the mutation stream as JSON lines to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long)]
        workers: Option<usize>,

        #[arg(long)]
        batch_size: Option<usize>,

        /// Provenance key for every asserted property
        #[arg(long)]
        provenance: Option<String>,

        /// Source tag written to every vertex
        #[arg(long)]
        source: Option<String>,

        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the internal vertex id of an entity
    Ids {
        /// movie, person or company
        kind: RecordType,

        /// External (TMDB) id
        external_id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ImportConfig::from_file(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => ImportConfig::default(),
    };

    match cli.command {
        Commands::Import {
            record_type,
            tagged,
            output,
            workers,
            batch_size,
            provenance,
            source,
            files,
        } => {
            if record_type.is_none() && !tagged {
                bail!("either --type <TAG> or --tagged is required");
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(provenance) = provenance {
                config.provenance_key = provenance;
            }
            if let Some(source) = source {
                config.source = source;
            }
            config.validate()?;
            init_tracing(&config, cli.verbose)?;
            run_import(&config, record_type, &files, output)
        }
        Commands::Ids { kind, external_id } => {
            println!("{}", kind.entity_kind().vertex_id(external_id));
            Ok(())
        }
    }
}

fn init_tracing(config: &ImportConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config
            .log_level
            .parse::<Level>()
            .with_context(|| format!("invalid log level {:?}", config.log_level))?
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_import(
    config: &ImportConfig,
    record_type: Option<RecordType>,
    files: &[PathBuf],
    output: Option<PathBuf>,
) -> Result<()> {
    let mut records: Vec<RawRecord> = Vec::new();
    let mut rejected = Vec::new();
    for path in files {
        let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
        let batch = read_records(BufReader::new(file), record_type)
            .with_context(|| format!("reading {:?}", path))?;
        info!("Read {} records from {:?}", batch.records.len(), path);
        records.extend(batch.records);
        rejected.extend(batch.rejected.into_iter().map(|(_, err)| err));
    }

    let pipeline = ImportPipeline::new(config);
    let (mut report, mutations) = pipeline.run_parallel(&records)?;
    for err in &rejected {
        report.record_skip(err.reason());
    }

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
            let mut sink = JsonLinesSink::new(BufWriter::new(file));
            sink.write_all(mutations)?;
            let written = sink.written();
            sink.into_inner().flush()?;
            info!("Wrote {} mutations to {:?}", written, path);
        }
        None => {
            let mut store = MergeStore::new();
            store.apply_all(mutations)?;
            println!(
                "graph: {} vertices, {} edges, {} data rows",
                store.vertex_count(),
                store.edge_count(),
                store.data_count()
            );
        }
    }

    println!("{}", report);
    Ok(())
}
