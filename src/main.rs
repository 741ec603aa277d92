mod cli;
mod client;
mod commands;
mod config;
mod error;
mod lifecycle;
mod output;
mod queries;
mod session;
mod store;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{BugCommands, Cli, Commands};
use client::BugtrackClient;
use config::Config;
use error::Result;
use session::Session;
use types::BugStatus;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        if e.is_network_failure() {
            eprintln!("Check that the bug tracker API is reachable, then run the command again.");
        }

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("BUGTRACK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    if !cli.command.needs_api() {
        return run_local(cli.command).await;
    }

    let session = Session::require()?;
    let config = Config::load()?;
    let client = BugtrackClient::new(&config.api_url()?, Some(session.token.clone()))?;

    match cli.command {
        Commands::Dashboard => {
            commands::dashboard::show(&client, &session).await?;
        }
        Commands::Bugs(args) => {
            commands::bugs::list(&client, &session, args).await?;
        }
        Commands::Developers => {
            commands::admin::developers(&client, &session).await?;
        }
        Commands::Admin => {
            commands::admin::panel(&client, &session).await?;
        }
        Commands::Bug { action } => match action {
            BugCommands::List(args) => {
                commands::bugs::list(&client, &session, args).await?;
            }
            BugCommands::Show { id } => {
                commands::bugs::show(&client, &session, &id).await?;
            }
            BugCommands::Create(args) => {
                commands::bugs::create(&client, &config, &session, args).await?;
            }
            BugCommands::Start { id } => {
                commands::bugs::transition(&client, &config, &session, &id, BugStatus::InProgress)
                    .await?;
            }
            BugCommands::Resolve { id } => {
                commands::bugs::transition(&client, &config, &session, &id, BugStatus::Resolved)
                    .await?;
            }
            BugCommands::Approve { id } => {
                commands::bugs::transition(&client, &config, &session, &id, BugStatus::Approved)
                    .await?;
            }
            BugCommands::Transition { id, status } => {
                commands::bugs::transition(&client, &config, &session, &id, status).await?;
            }
            BugCommands::Assign { id, developer } => {
                commands::bugs::assign(&client, &config, &session, &id, &developer).await?;
            }
        },
        Commands::Login(_)
        | Commands::Logout
        | Commands::Whoami
        | Commands::Completions { .. }
        | Commands::Init => {
            // Already handled above
        }
    }

    Ok(())
}

/// Commands that never touch the API: no config load, no client.
async fn run_local(command: Commands) -> Result<()> {
    match command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bugtrack", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::Login(args) => {
            commands::auth::login(args)?;
        }
        Commands::Logout => {
            commands::auth::logout()?;
        }
        Commands::Whoami => {
            commands::auth::whoami(&Session::require()?)?;
        }
        _ => {
            // Routed to the API path by needs_api
        }
    }

    Ok(())
}
