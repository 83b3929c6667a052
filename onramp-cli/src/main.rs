///! Onramp CLI
///!
///! Command-line interface for the onramp onboarding service

mod api;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address
    #[arg(short, long)]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Admin username for the API
    #[arg(short, long)]
    username: Option<String>,

    /// Admin password (falls back to ONRAMP_PASSWORD, then a prompt)
    #[arg(short, long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage cluster users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage project role memberships
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },
    /// Manage project quotas
    Quota {
        #[command(subcommand)]
        command: QuotaCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user
    Create {
        /// Username
        name: String,
        /// Full display name
        #[arg(short, long)]
        full_name: Option<String>,
    },
    /// Show a user
    Show { name: String },
    /// Delete a user and its identity
    Delete { name: String },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a project with its role groups
    Create {
        /// Project name
        name: String,
        /// Requesting user recorded on the project
        #[arg(short, long)]
        requester: String,
        /// Display name
        #[arg(short, long)]
        display_name: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a project
    Show { name: String },
    /// Delete a project and its role groups
    Delete { name: String },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// Grant a project role to a user
    Grant {
        /// Username
        user: String,
        /// Project name
        project: String,
        /// Role (admin, member, reader)
        role: String,
    },
    /// Check whether a user holds a project role
    Check {
        /// Username
        user: String,
        /// Project name
        project: String,
        /// Role (admin, member, reader)
        role: String,
    },
    /// Revoke a project role from a user
    Revoke {
        /// Username
        user: String,
        /// Project name
        project: String,
        /// Role (admin, member, reader)
        role: String,
    },
}

#[derive(Subcommand)]
enum QuotaCommands {
    /// Show the quotas applied to a project
    Show {
        /// Project name
        project: String,
    },
    /// Apply quotas to a project at a multiplier
    Set {
        /// Project name
        project: String,
        /// Quota multiplier
        #[arg(short, long, default_value = "1")]
        multiplier: i64,
    },
    /// Remove all managed quotas from a project
    Clear {
        /// Project name
        project: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need no server or credentials
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    // Load config, with CLI flags taking precedence
    let config = config::Config::load().unwrap_or_default();
    let server = cli.server.unwrap_or(config.server);
    let output_format = cli.output.unwrap_or(config.output);
    let username = cli.username.or(config.username).unwrap_or_else(|| "admin".to_string());
    let password = resolve_password(cli.password)?;

    let api_client = api::ApiClient::new(&server, &username, &password);

    match cli.command {
        Commands::User { command } => {
            commands::user::handle_user_command(command, &api_client, &output_format).await?
        }
        Commands::Project { command } => {
            commands::project::handle_project_command(command, &api_client, &output_format).await?
        }
        Commands::Role { command } => {
            commands::role::handle_role_command(command, &api_client, &output_format).await?
        }
        Commands::Quota { command } => {
            commands::quota::handle_quota_command(command, &api_client, &output_format).await?
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

/// Resolve the API password: flag, then ONRAMP_PASSWORD, then a prompt
fn resolve_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("ONRAMP_PASSWORD") {
        return Ok(password);
    }
    let password = rpassword::prompt_password("API password: ")?;
    Ok(password)
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
