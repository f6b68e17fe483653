//! citegap command-line interface
//!
//! Subcommands cover the whole surface: extracting manuscript text,
//! generating the classifier training dataset, indexing papers and
//! checking a manuscript for missing citations.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citegap::config::CitegapConfig;
use citegap::dataset::generate_citing_sentences_dataset;
use citegap::extraction::{ExtractOptions, PdfExtractor, TextExtractor};
use citegap::index::PaperIndex;
use citegap::providers::{
    ElasticStore, HfClassifier, PaperStore, RankLlmReranker, TeiEmbedder,
};
use citegap::workflow::MissingCitationRetriever;

#[derive(Parser)]
#[command(name = "citegap", about = "Find missing citations in scientific manuscripts")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract and clean text from a PDF manuscript
    Extract {
        /// Path to the PDF file
        path: PathBuf,
        /// Remove the references section
        #[arg(long)]
        remove_references: bool,
        /// Remove everything up to and including the abstract marker
        #[arg(long)]
        remove_abstract: bool,
        /// Strip inline citation markers
        #[arg(long)]
        remove_reference_markers: bool,
    },
    /// Generate the citing-sentences training dataset from a raw corpus
    Dataset {
        /// Directory with the raw corpus files
        #[arg(long)]
        data_dir: PathBuf,
        /// Directory to write the generated CSV into
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Index papers (title and abstract per row) into the store
    Index {
        /// CSV file with `title` and `abstract` columns
        #[arg(long)]
        papers: PathBuf,
        /// Skip titles that are already indexed
        #[arg(long)]
        skip_indexed: bool,
    },
    /// Check a manuscript for sentences with missing citations
    Check {
        /// Path to the PDF file
        path: PathBuf,
    },
}

#[derive(serde::Deserialize)]
struct PaperRow {
    title: String,
    #[serde(rename = "abstract")]
    abstract_text: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citegap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = CitegapConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Extract {
            path,
            remove_references,
            remove_abstract,
            remove_reference_markers,
        } => {
            let options = ExtractOptions {
                remove_references,
                remove_abstract,
                remove_reference_markers,
            };
            let text = PdfExtractor::new().extract(&path, &options)?;
            println!("{}", text);
        }

        Command::Dataset {
            data_dir,
            output_dir,
        } => {
            let path = generate_citing_sentences_dataset(&data_dir, &output_dir)?;
            println!("dataset written to {}", path.display());
        }

        Command::Index {
            papers,
            skip_indexed,
        } => {
            let store = ElasticStore::new(&config.store)?;
            store.ping().await?;
            store.ensure_indices(config.embeddings.dimensions).await?;

            let embedder = TeiEmbedder::new(&config.embeddings);
            tracing::info!(model = embedder.model(), "embedding model configured");
            let index = PaperIndex::new(
                Arc::new(store),
                Arc::new(embedder),
                &config.chunking,
                config.retrieval.clone(),
            )?;

            let mut reader = csv::Reader::from_path(&papers)?;
            let mut titles = Vec::new();
            let mut abstracts = Vec::new();
            for row in reader.deserialize::<PaperRow>() {
                let row = row?;
                if skip_indexed && index.is_already_indexed(&row.title).await? {
                    tracing::info!(title = %row.title, "already indexed, skipping");
                    continue;
                }
                titles.push(row.title);
                abstracts.push(row.abstract_text);
            }

            let summary = index.index_papers(&titles, &abstracts).await?;
            println!(
                "indexed {} papers ({} chunks); {} papers and {} chunks failed",
                summary.papers_indexed,
                summary.chunks_indexed,
                summary.papers_failed,
                summary.chunks_failed
            );
        }

        Command::Check { path } => {
            let store = Arc::new(ElasticStore::new(&config.store)?);
            let embedder = Arc::new(TeiEmbedder::new(&config.embeddings));
            let classifier = Arc::new(HfClassifier::new(&config.classifier));
            let reranker = Arc::new(RankLlmReranker::from_env(&config.reranker)?);

            let retriever = MissingCitationRetriever::new(
                store,
                embedder,
                classifier,
                reranker,
                Arc::new(PdfExtractor::new()),
                &config,
            )
            .await?;

            let results = retriever.check_paper(&path).await?;
            if results.is_empty() {
                println!("no sentences with missing citations found");
            }
            for result in results {
                println!("{}", result.sentence);
                if result.titles.is_empty() {
                    println!("  (no relevant papers found)");
                }
                for (rank, title) in result.titles.iter().enumerate() {
                    println!("  {}. {}", rank + 1, title);
                }
                println!();
            }
        }
    }

    Ok(())
}
