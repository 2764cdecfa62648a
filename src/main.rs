// src/main.rs

//! Hotel review scraper and QA bot CLI.

use clap::{Parser, Subcommand};

use hotel_reviews::answer::{OllamaGenerator, run_qa_loop};
use hotel_reviews::config::Config;
use hotel_reviews::error::{AppError, Result};
use hotel_reviews::pipeline::ingest;
use hotel_reviews::retrieval::{OllamaEmbedder, VectorStore};
use hotel_reviews::storage::BatchStore;

#[derive(Parser, Debug)]
#[command(
    name = "hotel-reviews",
    version,
    about = "Scrapes hotel review listings and answers questions over them"
)]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape reviews for a listing URL into a batch artifact
    Ingest { url: String },
    /// Ingest (or reuse) a batch and answer questions interactively
    Ask { url: String },
    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Ingest { url } => {
            let report = ingest(&url, &config).await?;
            println!(
                "{} records for {} at {}",
                report.record_count,
                report.hotel_id,
                report.artifact_path.display()
            );
        }
        Command::Ask { url } => {
            let report = ingest(&url, &config).await?;

            let store = BatchStore::new(&config.storage.data_dir);
            let records = store.read_batch(&report.hotel_id).await?.ok_or_else(|| {
                AppError::validation(format!("missing batch artifact for {}", report.hotel_id))
            })?;

            let embedder =
                OllamaEmbedder::new(&config.retrieval.ollama_host, &config.retrieval.embed_model);
            let index =
                VectorStore::open_or_build(&records, &embedder, &config.retrieval, &report.hotel_id)
                    .await?;
            let generator =
                OllamaGenerator::new(&config.retrieval.ollama_host, &config.answer.model);

            run_qa_loop(&index, &embedder, &generator, config.retrieval.top_k).await?;
        }
        Command::Validate => {
            println!("configuration OK");
        }
    }

    Ok(())
}
