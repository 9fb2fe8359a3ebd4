//! Feedback command handlers for the CLI.
//!
//! These are called from `main` once the archive is connected to the
//! database. Admin-only commands authenticate before touching the store.

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use fbdb_archive::{FeedbackArchive, FilterCriteria};
use fbdb_core::{AppConfig, FeedbackRecord, Submission};

use crate::admin::{resolve_admin, AdminArgs};

/// Sub-commands available under `feedback`.
#[derive(Debug, Subcommand)]
pub enum FeedbackCommands {
    /// Submit a new piece of feedback
    Submit {
        #[arg(long)]
        name: String,
        /// One of the fixed category labels, e.g. "Bug Report"
        #[arg(long)]
        category: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// List feedback, newest first
    List {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export filtered feedback as csv or report (admin)
    Export {
        /// csv or report (pdf and html are accepted as report)
        #[arg(long)]
        format: String,
        /// Write to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Count filtered feedback by sentiment (admin)
    Summary {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Delete a feedback record by id (admin)
    Delete {
        id: i64,
        #[command(flatten)]
        admin: AdminArgs,
    },
}

/// Browse/export filters. Omitted flags impose no constraint.
#[derive(Debug, Clone, Default, Args)]
pub struct CriteriaArgs {
    /// Category label, or "All"
    #[arg(long)]
    pub category: Option<String>,
    /// Earliest day to include (YYYY-MM-DD)
    #[arg(long)]
    pub date_start: Option<String>,
    /// Latest day to include (YYYY-MM-DD)
    #[arg(long)]
    pub date_end: Option<String>,
    /// Case-sensitive text matched against name, message and email
    #[arg(long)]
    pub search: Option<String>,
}

impl From<CriteriaArgs> for FilterCriteria {
    fn from(args: CriteriaArgs) -> Self {
        Self {
            category: args.category,
            date_start: args.date_start,
            date_end: args.date_end,
            search: args.search,
        }
    }
}

pub(crate) async fn run(
    archive: &FeedbackArchive,
    config: &AppConfig,
    command: FeedbackCommands,
) -> anyhow::Result<()> {
    match command {
        FeedbackCommands::Submit {
            name,
            category,
            message,
            email,
        } => {
            let record = archive
                .submit(Submission {
                    name,
                    email,
                    category,
                    message,
                })
                .await?;
            println!(
                "stored feedback {} ({}, {})",
                record.id, record.category, record.sentiment
            );
        }
        FeedbackCommands::List { criteria, json } => {
            let records = archive.browse(&criteria.into()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_table(&records);
            }
        }
        FeedbackCommands::Export {
            format,
            output,
            criteria,
            admin,
        } => {
            let context = resolve_admin(config, &admin)?;
            let file = archive
                .export(&context, &criteria.into(), &format)
                .await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &file.bytes)?;
                    eprintln!("wrote {} bytes to {}", file.bytes.len(), path.display());
                }
                None => std::io::stdout().write_all(&file.bytes)?,
            }
        }
        FeedbackCommands::Summary {
            criteria,
            json,
            admin,
        } => {
            let context = resolve_admin(config, &admin)?;
            let summary = archive.summary(&context, &criteria.into()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("total:    {}", summary.total);
                println!("positive: {}", summary.positive);
                println!("neutral:  {}", summary.neutral);
                println!("negative: {}", summary.negative);
            }
        }
        FeedbackCommands::Delete { id, admin } => {
            let context = resolve_admin(config, &admin)?;
            archive.delete(&context, id).await?;
            println!("deleted feedback {id}");
        }
    }
    Ok(())
}

const NAME_COLUMN: usize = 20;
/// Leaves room for the `...` marker and one space of padding.
const NAME_WIDTH: usize = NAME_COLUMN - 4;
const MESSAGE_WIDTH: usize = 50;

fn print_table(records: &[FeedbackRecord]) {
    if records.is_empty() {
        println!("no feedback found");
        return;
    }

    let header = format!(
        "{:<6}{:<NAME_COLUMN$}{:<18}{:<10}{:<21}MESSAGE",
        "ID", "NAME", "CATEGORY", "SENTIMENT", "SUBMITTED AT"
    );
    println!("{header}");
    for record in records {
        println!(
            "{:<6}{:<NAME_COLUMN$}{:<18}{:<10}{:<21}{}",
            record.id,
            truncate(&record.name, NAME_WIDTH),
            record.category.label(),
            record.sentiment.label(),
            record.submitted_at_display(),
            truncate(&record.message, MESSAGE_WIDTH)
        );
    }
}

/// Shorten to `max` characters with a trailing `...`; newlines become spaces.
fn truncate(text: &str, max: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() > max {
        format!("{}...", flat.chars().take(max).collect::<String>())
    } else {
        flat
    }
}
