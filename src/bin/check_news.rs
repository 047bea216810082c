//! Run one credibility check from the command line and print the JSON result.
//!
//!   check_news --title "Headline" --description "Body text"
//!   echo "Body text" | check_news --title "Headline"

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use fake_news_detector::analyze::FallbackStrategy;
use fake_news_detector::bootstrap::AppRuntime;
use fake_news_detector::config::ClassifierConfig;
use fake_news_detector::{logging, AnalysisRequest};

#[derive(Parser, Debug)]
#[command(name = "check_news")]
#[command(about = "Score a news article as REAL or FAKE.", long_about = None)]
struct Cli {
    /// Article headline
    #[arg(short, long)]
    title: String,

    /// Article body; read from stdin when omitted
    #[arg(short, long)]
    description: Option<String>,

    /// Skip the remote classifier and score locally
    #[arg(long)]
    offline: bool,

    /// Override the fallback strategy (heuristic | degraded)
    #[arg(long)]
    fallback: Option<FallbackStrategy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();
    let cli = Cli::parse();

    let description = match cli.description {
        Some(d) => d,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading description from stdin")?;
            buf
        }
    };
    anyhow::ensure!(
        !cli.title.trim().is_empty() && !description.trim().is_empty(),
        "title and description are required"
    );

    let mut cfg = ClassifierConfig::load()?;
    if cli.offline {
        cfg.enabled = false;
    }
    if let Some(f) = cli.fallback {
        cfg.fallback = f;
    }
    let runtime = AppRuntime::from_config(cfg)?;

    let checked = runtime
        .service
        .check_news(&AnalysisRequest::new(cli.title, description))
        .await;
    println!("{}", serde_json::to_string_pretty(&checked.result)?);
    eprintln!("analyzer: {}", checked.analyzer);
    Ok(())
}
