mod admin;
mod feedback;

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fbdb_archive::FeedbackArchive;
use fbdb_db::PgStore;
use tracing_subscriber::EnvFilter;

use crate::admin::AdminCommands;
use crate::feedback::FeedbackCommands;

#[derive(Debug, Parser)]
#[command(name = "fbdb-cli")]
#[command(about = "Visitor feedback archive command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database connectivity and migrations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Submit, browse, export and delete feedback
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },
    /// Print the polarity and sentiment label for a piece of text
    Classify { text: String },
    /// Administrator utilities
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => run_db(command).await,
        Some(Commands::Feedback { command }) => {
            let config = fbdb_core::load_app_config()?;
            let archive = open_archive(&config).await?;
            feedback::run(&archive, &config, command).await
        }
        Some(Commands::Classify { text }) => {
            run_classify(&text);
            Ok(())
        }
        Some(Commands::Admin { command }) => {
            admin::run(command);
            Ok(())
        }
        None => {
            println!("fbdb-cli: run with --help to list commands");
            Ok(())
        }
    }
}

async fn run_db(command: DbCommands) -> anyhow::Result<()> {
    let config = fbdb_core::load_app_config()?;
    let pool = fbdb_db::connect_pool_from_config(&config)
        .await
        .context("failed to connect to the database")?;

    match command {
        DbCommands::Ping => {
            fbdb_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = fbdb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

async fn open_archive(config: &fbdb_core::AppConfig) -> anyhow::Result<FeedbackArchive> {
    let pool = fbdb_db::connect_pool_from_config(config)
        .await
        .context("feedback commands need a database; set DATABASE_URL")?;
    Ok(FeedbackArchive::new(Arc::new(PgStore::new(pool))))
}

fn run_classify(text: &str) {
    let classifier = fbdb_sentiment::SentimentClassifier::default();
    let polarity = classifier.polarity(text);
    println!("polarity:  {polarity:+.3}");
    println!("sentiment: {}", fbdb_sentiment::label_for_polarity(polarity));
}

#[cfg(test)]
mod tests;
