//! Admin credential handling for the CLI.

use clap::{Args, Subcommand};
use fbdb_core::{AdminContext, AdminUser, AppConfig, Environment, PasswordHash, DEFAULT_ITERATIONS};

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Print a salted PBKDF2 hash suitable for FBDB_ADMIN_PASSWORD_HASH
    HashPassword {
        password: String,
        /// PBKDF2-HMAC-SHA256 rounds
        #[arg(long, default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
        iterations: u32,
    },
}

/// Credentials for admin-only commands.
#[derive(Debug, Clone, Default, Args)]
pub struct AdminArgs {
    /// Admin username (defaults to the configured admin)
    #[arg(long, env = "FBDB_ADMIN_USERNAME")]
    pub username: Option<String>,
    /// Admin password
    #[arg(long, env = "FBDB_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub(crate) fn run(command: AdminCommands) {
    match command {
        AdminCommands::HashPassword {
            password,
            iterations,
        } => {
            println!("{}", PasswordHash::generate(&password, iterations));
        }
    }
}

/// Authenticate the CLI caller against the configured admin.
///
/// In development with no configured hash, a development context is returned.
///
/// # Errors
///
/// Returns an error if no password is supplied or the credentials do not match.
pub(crate) fn resolve_admin(config: &AppConfig, args: &AdminArgs) -> anyhow::Result<AdminContext> {
    let Some(hash) = &config.admin_password_hash else {
        if config.env == Environment::Development {
            tracing::warn!("FBDB_ADMIN_PASSWORD_HASH not set; admin checks skipped in development");
            return Ok(AdminContext::unauthenticated_dev());
        }
        anyhow::bail!("FBDB_ADMIN_PASSWORD_HASH is not configured");
    };

    let admin = AdminUser::new(&config.admin_username, hash.clone())?;
    let username = args.username.as_deref().unwrap_or(admin.username());
    let password = args
        .password
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("admin password required; set FBDB_ADMIN_PASSWORD"))?;

    admin
        .authenticate(username, password)
        .ok_or_else(|| anyhow::anyhow!("invalid admin credentials"))
}
