//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::application::ports::ConfigStore;
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Run long-lived containers on a cheap DigitalOcean droplet
#[derive(Parser, Debug)]
#[command(
    name = "dodocker",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// DigitalOcean API token
    #[arg(long, global = true, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List droplets, deployments or keys
    #[command(subcommand)]
    List(commands::list::ListCommand),

    /// Create a droplet or a deployment
    #[command(subcommand)]
    Create(commands::create::CreateCommand),

    /// Delete a droplet
    #[command(subcommand)]
    Delete(commands::delete::DeleteCommand),

    /// Open a shell on a droplet
    Ssh(commands::ssh::SshArgs),

    /// Deploy an image (same as `create deployment`)
    Deploy(commands::deploy::DeployArgs),

    /// Show settings
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            token,
            command,
        } = self;
        let store = YamlConfigStore;
        let config = store.load()?;
        let app = AppContext::new(
            AppFlags {
                output: OutputFlags {
                    no_color,
                    quiet,
                    json,
                },
                behaviour: BehaviourFlags { yes },
                token,
            },
            config,
        );

        match command {
            Command::List(cmd) => commands::list::run(&app, cmd).await,
            Command::Create(cmd) => commands::create::run(&app, cmd).await,
            Command::Delete(cmd) => commands::delete::run(&app, cmd).await,
            Command::Ssh(args) => commands::ssh::run(&app, &args).await,
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, &store, &cmd),
        }
    }
}
