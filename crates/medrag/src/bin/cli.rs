//! Command-line front end
//!
//! Run with: cargo run -p medrag --bin medrag -- ask "nyeri dada saat beraktivitas"

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use medrag::{config::RagConfig, format_hits_markdown, RagPipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medrag", version)]
#[command(about = "Ask medical textbooks and get answers with numbered references", long_about = None)]
struct Cli {
    /// Config file (defaults to $MEDRAG_CONFIG, then ./medrag.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
        /// Hits kept after re-ranking
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Show re-ranked hits without generating
    Retrieve {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Interactive session; type `exit` or `quit` to leave
    Chat {
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Check Ollama and the index
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medrag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config)?;
    let pipeline = RagPipeline::from_config(&config).context("failed to set up the pipeline")?;
    let default_k = config.retrieval.default_top_k;

    match cli.command {
        Commands::Ask { question, top_k } => {
            let answer = ask(&pipeline, &question.join(" "), top_k.unwrap_or(default_k)).await?;
            println!("{}", answer);
        }
        Commands::Retrieve { query, top_k } => {
            let hits = pipeline
                .retrieve(&query.join(" "), top_k.unwrap_or(default_k))
                .await?;
            if hits.is_empty() {
                println!("{}", config.retrieval.no_context_message);
            } else {
                println!("{}", format_hits_markdown(&hits));
            }
        }
        Commands::Chat { top_k } => chat(&pipeline, top_k.unwrap_or(default_k)).await?,
        Commands::Health => {
            let report = pipeline.health().await;
            print_check("embedder", report.embedder);
            print_check("vector store", report.vector_store);
            print_check("llm", report.llm);
            println!("  indexed chunks: {}", report.indexed_records);
            if !report.is_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<RagConfig> {
    let config = match path {
        Some(path) => {
            let mut config = RagConfig::load(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.apply_env_overrides()?;
            config.validate()?;
            config
        }
        None => RagConfig::from_env_or_default()?,
    };
    Ok(config)
}

async fn ask(pipeline: &RagPipeline, question: &str, top_k: usize) -> anyhow::Result<String> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Asking {}...", pipeline.llm().model()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.generate_answer(question, top_k).await;
    spinner.finish_and_clear();

    Ok(result?)
}

async fn chat(pipeline: &RagPipeline, top_k: usize) -> anyhow::Result<()> {
    println!(
        "{}",
        style("MedRAG chat. Type `exit` or `quit` to leave.").cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match ask(pipeline, question, top_k).await {
            Ok(answer) => println!("\n{}", answer),
            Err(e) => eprintln!("{} {:#}", style("error:").red().bold(), e),
        }
    }

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let mark = if ok {
        style("ok").green()
    } else {
        style("unavailable").red()
    };
    println!("  {}: {}", name, mark);
}
