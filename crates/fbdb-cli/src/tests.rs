use std::net::SocketAddr;

use fbdb_core::{AppConfig, Environment, PasswordHash};

use super::*;
use crate::admin::{resolve_admin, AdminArgs};
use crate::feedback::CriteriaArgs;

fn config(env: Environment, hash: Option<PasswordHash>) -> AppConfig {
    AppConfig {
        database_url: None,
        env,
        bind_addr: "127.0.0.1:3000".parse::<SocketAddr>().unwrap(),
        log_level: "info".to_string(),
        db_max_connections: 10,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        admin_username: "admin".to_string(),
        admin_password_hash: hash,
        rate_limit_per_minute: 120,
    }
}

fn creds(username: Option<&str>, password: Option<&str>) -> AdminArgs {
    AdminArgs {
        username: username.map(ToString::to_string),
        password: password.map(ToString::to_string),
    }
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["fbdb-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["fbdb-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["fbdb-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_feedback_submit_with_optional_email() {
    let cli = Cli::try_parse_from([
        "fbdb-cli",
        "feedback",
        "submit",
        "--name",
        "Alice",
        "--category",
        "Bug Report",
        "--message",
        "The map is wrong",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::Submit {
                ref name,
                ref category,
                email: None,
                ..
            }
        }) if name == "Alice" && category == "Bug Report"
    ));
}

#[test]
fn feedback_submit_requires_message() {
    let result = Cli::try_parse_from([
        "fbdb-cli",
        "feedback",
        "submit",
        "--name",
        "Alice",
        "--category",
        "Question",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_feedback_list_filters() {
    let cli = Cli::try_parse_from([
        "fbdb-cli",
        "feedback",
        "list",
        "--category",
        "Complaint",
        "--date-start",
        "2025-01-01",
        "--date-end",
        "2025-01-31",
        "--search",
        "alice",
        "--json",
    ])
    .unwrap();
    let Some(Commands::Feedback {
        command: FeedbackCommands::List { criteria, json },
    }) = cli.command
    else {
        panic!("expected feedback list");
    };
    assert!(json);
    assert_eq!(criteria.category.as_deref(), Some("Complaint"));
    assert_eq!(criteria.date_start.as_deref(), Some("2025-01-01"));
    assert_eq!(criteria.date_end.as_deref(), Some("2025-01-31"));
    assert_eq!(criteria.search.as_deref(), Some("alice"));
}

#[test]
fn parses_feedback_list_without_filters() {
    let cli = Cli::try_parse_from(["fbdb-cli", "feedback", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::List {
                criteria: CriteriaArgs {
                    category: None,
                    date_start: None,
                    date_end: None,
                    search: None,
                },
                json: false
            }
        })
    ));
}

#[test]
fn parses_feedback_export_with_output_and_username() {
    let cli = Cli::try_parse_from([
        "fbdb-cli",
        "feedback",
        "export",
        "--format",
        "csv",
        "--output",
        "out.csv",
        "--category",
        "Question",
        "--username",
        "curator",
    ])
    .unwrap();
    let Some(Commands::Feedback {
        command:
            FeedbackCommands::Export {
                format,
                output,
                criteria,
                admin,
            },
    }) = cli.command
    else {
        panic!("expected feedback export");
    };
    assert_eq!(format, "csv");
    assert_eq!(output, Some(std::path::PathBuf::from("out.csv")));
    assert_eq!(criteria.category.as_deref(), Some("Question"));
    assert_eq!(admin.username.as_deref(), Some("curator"));
}

#[test]
fn parses_feedback_summary_with_filters() {
    let cli = Cli::try_parse_from([
        "fbdb-cli",
        "feedback",
        "summary",
        "--category",
        "Compliment",
        "--json",
    ])
    .unwrap();
    let Some(Commands::Feedback {
        command: FeedbackCommands::Summary { criteria, json, .. },
    }) = cli.command
    else {
        panic!("expected feedback summary");
    };
    assert!(json);
    assert_eq!(criteria.category.as_deref(), Some("Compliment"));
    assert_eq!(criteria.search, None);
}

#[test]
fn parses_feedback_delete_id() {
    let cli = Cli::try_parse_from(["fbdb-cli", "feedback", "delete", "42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Feedback {
            command: FeedbackCommands::Delete { id: 42, .. }
        })
    ));
}

#[test]
fn feedback_delete_rejects_non_numeric_id() {
    assert!(Cli::try_parse_from(["fbdb-cli", "feedback", "delete", "abc"]).is_err());
}

#[test]
fn parses_classify_text() {
    let cli = Cli::try_parse_from(["fbdb-cli", "classify", "great visit"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Classify { ref text }) if text == "great visit"
    ));
}

#[test]
fn parses_admin_hash_password() {
    let cli = Cli::try_parse_from(["fbdb-cli", "admin", "hash-password", "s3cret"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::HashPassword { ref password, iterations }
        }) if password == "s3cret" && iterations == fbdb_core::DEFAULT_ITERATIONS
    ));
}

#[test]
fn parses_admin_hash_password_iterations() {
    let cli = Cli::try_parse_from([
        "fbdb-cli",
        "admin",
        "hash-password",
        "s3cret",
        "--iterations",
        "1000",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::HashPassword {
                iterations: 1000,
                ..
            }
        })
    ));
    assert!(
        Cli::try_parse_from(["fbdb-cli", "admin", "hash-password", "x", "--iterations", "0"])
            .is_err()
    );
}

#[test]
fn resolve_admin_accepts_matching_credentials() {
    let hash = PasswordHash::derive("admin123", "salt", 1_000);
    let config = config(Environment::Production, Some(hash));

    let context = resolve_admin(&config, &creds(None, Some("admin123"))).unwrap();
    assert_eq!(context.username(), "admin");

    let context = resolve_admin(&config, &creds(Some("admin"), Some("admin123"))).unwrap();
    assert_eq!(context.username(), "admin");
}

#[test]
fn resolve_admin_rejects_bad_or_missing_password() {
    let hash = PasswordHash::derive("admin123", "salt", 1_000);
    let config = config(Environment::Production, Some(hash));

    assert!(resolve_admin(&config, &creds(None, Some("nope"))).is_err());
    assert!(resolve_admin(&config, &creds(Some("other"), Some("admin123"))).is_err());
    assert!(resolve_admin(&config, &creds(None, None)).is_err());
}

#[test]
fn resolve_admin_without_hash_depends_on_environment() {
    let dev = config(Environment::Development, None);
    let context = resolve_admin(&dev, &creds(None, None)).unwrap();
    assert_eq!(context, fbdb_core::AdminContext::unauthenticated_dev());

    let prod = config(Environment::Production, None);
    assert!(resolve_admin(&prod, &creds(None, None)).is_err());
}
