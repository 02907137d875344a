use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use termscan::analysis::AnalysisClient;
use termscan::export;
use termscan::model::Theme;
use termscan::workflow::is_pdf;

#[derive(Parser)]
#[command(author, version, about = "PDF term extraction and study guide tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF and print the extracted terms
    Analyze {
        /// Input PDF file
        input: PathBuf,

        /// Write a styled study guide PDF to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Theme for the exported study guide (light or dark)
        #[arg(short, long, default_value = "light")]
        theme: String,

        /// Print the raw result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            output,
            theme,
            json,
        } => analyze(input, output, &theme, json).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn analyze(
    input: PathBuf,
    output: Option<PathBuf>,
    theme: &str,
    json: bool,
) -> anyhow::Result<()> {
    if !is_pdf(&input) {
        bail!("'{}' is not a PDF file", input.display());
    }

    let theme: Theme = theme.parse().map_err(anyhow::Error::msg)?;
    let client = AnalysisClient::from_env()?;

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = client.analyze(&bytes, &file_name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}\n", result.title);
        println!("{}\n", result.summary);
        if result.definitions.is_empty() {
            println!("No terms found in this document.");
        } else {
            for def in &result.definitions {
                println!("{}: {}", def.term, def.definition);
            }
        }
    }

    if let Some(path) = output {
        export::save_study_guide(&result, theme, &path)
            .with_context(|| format!("Failed to write study guide to '{}'", path.display()))?;
        println!("\nSaved study guide to '{}'", path.display());
    }

    Ok(())
}
