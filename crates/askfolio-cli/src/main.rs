mod chat;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use askfolio_core::config::AskfolioConfig;
use askfolio_core::llm::LlmClient;
use askfolio_core::model::{Session, SessionStatus, QUESTION_LIMIT};
use askfolio_core::persona::Persona;
use askfolio_core::ratings::{RatingClient, RatingLog};
use askfolio_core::resolver::Resolver;
use askfolio_core::session::{FileStore, Remote, SessionTracker};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

pub type Tracker = SessionTracker<FileStore, Remote>;

#[derive(Parser)]
#[command(
    name = "askfolio",
    about = "Askfolio: ask the portfolio assistant anything (three questions per session)",
    version
)]
enum Cli {
    /// Start an interactive chat
    Chat {
        /// Display name; asked for interactively when omitted
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Answer a single question without touching the session
    Ask {
        question: String,
        /// Output raw JSON ({answer, source})
        #[arg(long)]
        json: bool,
    },
    /// Inspect or manage the current session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Rate the conversation (1-5)
    Rate {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Show a summary of locally recorded ratings
    Ratings {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration (API key masked)
    Config,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the current session
    Show {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Send the current session to the commit endpoint
    Commit,
    /// Forget the current session
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = AskfolioConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| AskfolioConfig::default_config());

    run(cli, &config).await
}

async fn run(cli: Cli, config: &AskfolioConfig) -> Result<()> {
    match cli {
        Cli::Chat { name } => chat::run(config, name).await,
        Cli::Ask { question, json } => cmd_ask(config, &question, json).await,
        Cli::Session { action } => {
            let tracker = make_tracker(config);
            match action {
                SessionAction::Show { json } => cmd_session_show(&tracker, json),
                SessionAction::Commit => cmd_session_commit(&tracker).await,
                SessionAction::Clear => {
                    tracker.clear_session();
                    println!("{}", "Session cleared.".green());
                    Ok(())
                }
            }
        }
        Cli::Rate { rating } => cmd_rate(config, rating).await,
        Cli::Ratings { json } => cmd_ratings(config, json),
        Cli::Config => {
            print!("{}", config.to_toml_masked()?);
            Ok(())
        }
    }
}

fn session_store_path(config: &AskfolioConfig) -> PathBuf {
    config
        .session
        .store_path
        .as_ref()
        .map(PathBuf::from)
        .or_else(FileStore::default_path)
        .unwrap_or_else(|| PathBuf::from(".askfolio-session.json"))
}

pub fn make_tracker(config: &AskfolioConfig) -> Arc<Tracker> {
    Arc::new(SessionTracker::new(
        FileStore::new(session_store_path(config)),
        Remote::from_config(&config.session),
    ))
}

pub fn make_resolver(config: &AskfolioConfig) -> Result<Resolver<LlmClient>> {
    let client = LlmClient::from_config(&config.completion)
        .context("failed to create completion client")?;
    let persona = Persona::from_config(&config.persona).context("failed to build persona")?;
    Ok(Resolver::new(client, persona).with_history_window(config.completion.history_window))
}

async fn cmd_ask(config: &AskfolioConfig, question: &str, json: bool) -> Result<()> {
    let resolver = make_resolver(config)?;
    let resolution = resolver.resolve_detailed(question, &[]).await;

    if json {
        let out = serde_json::json!({
            "answer": resolution.answer,
            "source": resolution.source.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", resolution.answer);
        println!("{}", format!("({})", resolution.source).dimmed());
    }
    Ok(())
}

fn cmd_session_show(tracker: &Tracker, json: bool) -> Result<()> {
    let Some(session) = tracker.current_session() else {
        if json {
            println!("null");
        } else {
            println!("{}", "No active session.".dimmed());
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    print_session(&session);
    Ok(())
}

fn print_session(session: &Session) {
    let status = match session.session_status {
        SessionStatus::Complete => "complete".green().to_string(),
        SessionStatus::Incomplete => "incomplete".yellow().to_string(),
    };
    println!("{}", format!("Session {}", session.session_id).bold());
    println!("  {}      {}", "Name:".dimmed(), session.name);
    println!(
        "  {}   {}",
        "Started:".dimmed(),
        session.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  {}    {}", "Status:".dimmed(), status);
    println!(
        "  {} {}/{}",
        "Questions:".dimmed(),
        session.total_questions,
        QUESTION_LIMIT
    );
    for q in &session.questions {
        println!("    {}. {}", q.order.to_string().cyan(), q.question);
    }
}

async fn cmd_session_commit(tracker: &Tracker) -> Result<()> {
    let Some(session) = tracker.current_session() else {
        println!("{}", "No active session.".dimmed());
        return Ok(());
    };
    if session.total_questions == 0 {
        println!("{}", "Nothing to commit: no questions asked yet.".dimmed());
        return Ok(());
    }

    if tracker.commit_session().await {
        println!("{} {}", "Session saved".green(), session.session_id.dimmed());
    } else {
        println!(
            "{}",
            "Could not reach the commit endpoint; the session is kept locally.".yellow()
        );
    }
    Ok(())
}

async fn cmd_rate(config: &AskfolioConfig, rating: u8) -> Result<()> {
    let session_id = make_tracker(config)
        .current_session()
        .map(|s| s.session_id)
        .unwrap_or_else(|| "anonymous".to_string());

    let client = RatingClient::from_config(&config.ratings);
    let sent = client.submit(rating, &session_id).await?;

    let stars = "★".repeat(rating as usize);
    if sent {
        println!("{} {}", "Thanks for rating!".green(), stars.yellow());
    } else {
        println!(
            "{} {} {}",
            "Thanks for rating!".green(),
            stars.yellow(),
            "(saved locally)".dimmed()
        );
    }
    Ok(())
}

fn cmd_ratings(config: &AskfolioConfig, json: bool) -> Result<()> {
    let log = RatingLog::from_config(&config.ratings);
    let summary = log.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Ratings".bold());
    println!("  {}   {}", "Total:".dimmed(), summary.total.to_string().cyan());
    if summary.total == 0 {
        return Ok(());
    }
    println!("  {} {:.2}", "Average:".dimmed(), summary.average);
    for (i, count) in summary.distribution.iter().enumerate().rev() {
        let bar = "█".repeat(*count);
        println!("  {} {:>3} {}", "★".repeat(i + 1).yellow(), count, bar.dimmed());
    }
    Ok(())
}
