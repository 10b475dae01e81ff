//! relgraph CLI - Command-line interface
//!
//! Usage:
//!   relgraph extract --text "Paris is the capital of France." --output graph.html
//!   relgraph extract --pdf report.pdf --json
//!   relgraph prompt --text "..."
//!   relgraph parse reply.txt
//!   relgraph text report.pdf --pages

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use relgraph_core::{AppConfig, LlmClient, Triplet};
use relgraph_extractor::{build_prompt, parse_response};
use relgraph_graph::{GraphRenderer, RelationGraph, RenderOptions};
use relgraph_parser::{acquire_text, DocumentInput, FileType, PdfParser};
use relgraph_pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relgraph")]
#[command(about = "Extract entity relations from text and render them as a graph")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file (environment variables take precedence)
    #[arg(long, global = true, env = "RELGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on text, a PDF, or a text/markdown file
    #[command(group(ArgGroup::new("input").required(true).args(["text", "pdf", "file"])))]
    Extract {
        /// Text to analyze
        #[arg(long)]
        text: Option<String>,
        /// PDF document to analyze
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// File to analyze, decoder chosen by extension
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write the rendered graph document here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print triplets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the prompt that would be sent to the backend
    Prompt {
        /// Text to embed in the prompt
        #[arg(long)]
        text: String,
    },
    /// Parse a saved backend reply into triplets
    Parse {
        /// File holding the raw reply
        file: PathBuf,
        /// Write the rendered graph document here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print triplets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the text acquired from a file
    Text {
        /// PDF, text, or markdown file
        file: PathBuf,
        /// Print each PDF page separately
        #[arg(long)]
        pages: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "relgraph_cli=debug,relgraph_pipeline=debug,relgraph_extractor=debug,relgraph_llm=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn print_triplets(triplets: &[Triplet], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(triplets)?);
        return Ok(());
    }

    if triplets.is_empty() {
        println!("No relations extracted.");
        return Ok(());
    }
    for (i, t) in triplets.iter().enumerate() {
        println!("{:>3}. {t}", i + 1);
    }
    Ok(())
}

fn read_input(
    text: Option<String>,
    pdf: Option<PathBuf>,
    file: Option<PathBuf>,
) -> anyhow::Result<DocumentInput> {
    if let Some(text) = text {
        return Ok(DocumentInput::Text(text));
    }
    if let Some(path) = pdf {
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(DocumentInput::Pdf(bytes));
    }
    match file {
        Some(path) => Ok(DocumentInput::from_path(&path)?),
        None => anyhow::bail!("one of --text, --pdf or --file is required"),
    }
}

/// Parse a saved reply, reporting why it yielded nothing
fn parse_saved_reply(path: &Path) -> anyhow::Result<Vec<Triplet>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match parse_response(&raw) {
        Ok(triplets) => Ok(triplets),
        Err(e) => {
            eprintln!("Reply yields no triplets: {e}");
            Ok(Vec::new())
        }
    }
}

fn write_graph(html: Option<&str>, path: &Path) -> anyhow::Result<()> {
    match html {
        Some(html) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Graph written to {}", path.display());
        }
        None => eprintln!("No graph: nothing to write to {}", path.display()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            text,
            pdf,
            file,
            output,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let input = read_input(text, pdf, file)?;

            let client: Arc<dyn LlmClient> =
                Arc::from(relgraph_llm::create_llm_client(&config.llm)?);
            tracing::debug!(model = client.model_name(), kind = %input.kind(), "Running pipeline");

            let renderer = GraphRenderer::new(RenderOptions::from(&config.graph));
            let result = Pipeline::with_renderer(client, renderer).run(input).await?;

            print_triplets(&result.triplets, json)?;
            if let Some(path) = output {
                write_graph(result.graph_html.as_deref(), &path)?;
            }
        }
        Commands::Prompt { text } => {
            println!("{}", build_prompt(&text));
        }
        Commands::Parse { file, output, json } => {
            let config = load_config(cli.config.as_deref())?;
            let triplets = parse_saved_reply(&file)?;
            print_triplets(&triplets, json)?;

            if let Some(path) = output {
                if triplets.is_empty() {
                    write_graph(None, &path)?;
                } else {
                    let graph = RelationGraph::from_triplets(&triplets);
                    GraphRenderer::new(RenderOptions::from(&config.graph))
                        .render_to_file(&graph, &path)?;
                    eprintln!("Graph written to {}", path.display());
                }
            }
        }
        Commands::Text { file, pages } => {
            if pages && FileType::from_path(&file) == FileType::Pdf {
                let bytes = std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                for (i, page) in PdfParser::new().page_texts(&bytes)?.iter().enumerate() {
                    println!("--- page {} ---", i + 1);
                    println!("{page}");
                }
            } else {
                let text = acquire_text(DocumentInput::from_path(&file)?)?;
                println!("{text}");
            }
        }
    }

    Ok(())
}
