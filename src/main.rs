use anyhow::Result;
use clap::{Parser, Subcommand};
use scholar_scout::config::{find_config_file, load_config, load_config_from_env, Config};
use scholar_scout::enrich::ProfileEnricher;
use scholar_scout::models::SearchRequirement;
use scholar_scout::pipeline::{ContactPipeline, SearchPipeline};
use scholar_scout::query::QuerySynthesizer;
use scholar_scout::server::{self, AppState};
use scholar_scout::sources::ArxivClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Scout - find papers for a research interest and extract researcher contacts
#[derive(Parser, Debug)]
#[command(name = "scholar-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv and extract researcher contact details from paper PDFs", long_about = None)]
struct Cli {
    /// Enable verbose logging (-v, -vv for more)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search arXiv for papers matching a research interest
    Search {
        /// Free-text research interest
        requirement: String,

        /// Submission-date window in days
        #[arg(long)]
        days_back: Option<i64>,

        /// Maximum number of results
        #[arg(long)]
        max_results: Option<usize>,

        /// Restrict to a specific author
        #[arg(long)]
        author: Option<String>,

        /// Print results as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Extract researcher contacts from a paper PDF
    Contacts {
        /// URL of the PDF (must end in .pdf)
        url: String,

        /// Paper title to carry into the report
        #[arg(long)]
        title: Option<String>,
    },

    /// Run the web surface
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("scholar_scout={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve configuration once; everything downstream takes explicit
    // handles instead of re-reading the environment.
    let config: Config = if let Some(path) = &cli.config {
        load_config(path)?
    } else if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        load_config(&path)?
    } else {
        load_config_from_env()?
    };

    let client = config.http_client();
    let assistant = config.resolve_assistant(&client);
    let synthesizer = QuerySynthesizer::new(assistant.clone());
    let enricher = ProfileEnricher::new(assistant);
    let search = SearchPipeline::new(synthesizer, ArxivClient::new(client.clone()));
    let contacts = ContactPipeline::new(client, enricher);

    match cli.command {
        Commands::Search {
            requirement,
            days_back,
            max_results,
            author,
            json,
        } => {
            let mut request = SearchRequirement::new(requirement)
                .days_back(days_back.unwrap_or(config.search.days_back))
                .max_results(max_results.unwrap_or(config.search.max_results));
            if let Some(author) = author {
                request = request.author(author);
            }

            match search.run(&request).await {
                Ok(outcome) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&outcome)?);
                    } else {
                        println!("Query: {}", outcome.expression);
                        if outcome.papers.is_empty() {
                            println!("No papers matched.");
                        }
                        for paper in &outcome.papers {
                            println!(
                                "\n{} ({})\n  {}\n  {}\n  PDF: {}",
                                paper.title,
                                paper.published.as_deref().unwrap_or("unknown date"),
                                paper.authors.join(", "),
                                paper.url,
                                paper.pdf_url
                            );
                        }
                    }
                }
                // Search trouble means an empty result set plus a message,
                // not a non-zero exit
                Err(e) => println!("Search failed: {}", e),
            }
        }

        Commands::Contacts { url, title } => match contacts.run(&url, title.as_deref()).await {
            Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            Err(e) => {
                println!(
                    "{}",
                    serde_json::json!({ "error": e.to_string() })
                );
            }
        },

        Commands::Serve { host, port } => {
            let state = Arc::new(AppState {
                search,
                contacts,
                defaults: config.search.clone(),
            });
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            server::serve(state, &host, port).await?;
        }
    }

    Ok(())
}
