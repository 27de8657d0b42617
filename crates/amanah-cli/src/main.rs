//! Command-line front-end for the Amanah proposal-analysis engine.

use amanah_core::{ChatSession, DocumentIngestor, MetricsExtractor, ProposalAnalyzer};
use amanah_interaction::{GeminiGenerator, GeminiIngestor};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amanah")]
#[command(about = "AI-assisted zakat and charity proposal analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe a proposal PDF and extract zakat metrics
    Scan {
        /// Path to the proposal PDF
        pdf: PathBuf,
    },
    /// Run the Shariah-compliance flag review on a proposal PDF
    Review {
        /// Path to the proposal PDF
        pdf: PathBuf,
    },
    /// Extract zakat metrics from plain text read from a file
    Extract {
        /// Path to a text file with the proposal content
        file: PathBuf,
    },
    /// Interactive Q&A grounded in a proposal PDF
    Chat {
        /// Path to the proposal PDF
        pdf: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let generator = Arc::new(GeminiGenerator::try_from_env()?);

    match cli.command {
        Commands::Scan { pdf } => scan(generator, &pdf).await?,
        Commands::Review { pdf } => review(generator, &pdf).await?,
        Commands::Extract { file } => extract(generator, &file).await?,
        Commands::Chat { pdf } => chat(generator, &pdf).await?,
    }

    Ok(())
}

/// Transcribes the PDF, extracts metrics and prints both.
async fn scan(generator: Arc<GeminiGenerator>, pdf: &PathBuf) -> Result<()> {
    let ingestor = GeminiIngestor::new(generator.clone());
    let text = ingestor.document_to_text(pdf).await?;

    let extractor = MetricsExtractor::new(generator);
    let metrics = extractor.extract(&text).await;

    println!("{text}\n");
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

async fn review(generator: Arc<GeminiGenerator>, pdf: &PathBuf) -> Result<()> {
    amanah_core::ensure_pdf(pdf)?;
    let bytes = tokio::fs::read(pdf).await?;

    let analyzer = ProposalAnalyzer::new(generator);
    let result = analyzer.analyze(bytes).await?;

    if result.is_flagged() {
        for flag in &result.flags {
            println!("Flagged: {}", flag.phrase);
            println!("Explanation: {}\n", flag.explanation);
        }
    } else {
        println!("No compliance flags raised.");
    }
    Ok(())
}

async fn extract(generator: Arc<GeminiGenerator>, file: &PathBuf) -> Result<()> {
    let text = tokio::fs::read_to_string(file).await?;
    let extractor = MetricsExtractor::new(generator);
    let metrics = extractor.extract(&text).await;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

/// Reads questions from stdin, one per line. `/clear` resets the history,
/// `/quit` exits.
async fn chat(generator: Arc<GeminiGenerator>, pdf: &PathBuf) -> Result<()> {
    let ingestor = GeminiIngestor::new(generator.clone());
    let context = ingestor.document_to_text(pdf).await?;

    let mut session = ChatSession::new(generator);
    session.set_context(context);
    println!("Document loaded. Ask a question (/clear to reset, /quit to exit).");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                session.clear_history();
                println!("History cleared.");
            }
            question => {
                let reply = session.chat(question).await;
                println!("{reply}\n");
            }
        }
    }

    Ok(())
}
