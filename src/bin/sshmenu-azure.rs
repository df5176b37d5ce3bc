use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use sshmenu_azure::azure::{ArmClient, Session};
use sshmenu_azure::cli::config::{self, Config};
use sshmenu_azure::cli::menu::{self, MenuOptions};
use sshmenu_azure::cli::Cli;
use sshmenu_azure::discovery::{Discoverer, DEFAULT_CONCURRENCY};
use sshmenu_azure::launch::SshCommand;
use sshmenu_azure::select::TerminalPresenter;
use sshmenu_azure::Error;

#[tokio::main]
async fn main() -> ExitCode {
    sshmenu_azure::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Error>() {
            Some(Error::Cancelled) => ExitCode::SUCCESS,
            Some(Error::TagFilter(_)) => {
                let _ = Cli::command().print_help();
                eprintln!("\n{}", err);
                ExitCode::FAILURE
            }
            Some(Error::Ssh(status)) => {
                eprintln!("{}", err);
                status
                    .code()
                    .and_then(|code| u8::try_from(code).ok())
                    .map(ExitCode::from)
                    .unwrap_or(ExitCode::FAILURE)
            }
            _ => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let options = MenuOptions::from_cli(&cli, &config)?;

    let session = Session::from_env()?;
    tracing::debug!(subscription = %session.subscription_id, "session ready");
    let client = ArmClient::new(session)?;

    let shutdown = CancellationToken::new();
    let on_interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let discoverer = Discoverer::new(Arc::new(client))
        .with_concurrency(resolve_concurrency(&cli, &config))
        .with_shutdown(shutdown);
    let presenter = TerminalPresenter::default();

    if cli.json {
        let group = menu::choose_group(&discoverer, &presenter, &options).await?;
        let records = menu::discover_targets(&discoverer, &group, &options).await?;
        let json = serde_json::to_string_pretty(&records).context("Failed to encode VM list")?;
        println!("{}", json);
        return Ok(());
    }

    let target = menu::select_target(&discoverer, &presenter, &options)
        .await
        .map_err(|e| match e {
            Error::Api(_) => anyhow::Error::new(e)
                .context("There was an error listing virtual machines"),
            other => anyhow::Error::new(other),
        })?;

    ssh_command(&cli, &config).launch(&target.ip_address).await?;
    Ok(())
}

fn resolve_concurrency(cli: &Cli, config: &Config) -> usize {
    cli.concurrency
        .or(config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY)
}

fn ssh_command(cli: &Cli, config: &Config) -> SshCommand {
    let mut ssh = SshCommand::default();
    if let Some(program) = &config.ssh_command {
        ssh.program = program.clone();
    }
    ssh.args = config
        .ssh_args
        .iter()
        .chain(cli.ssh_args.iter())
        .cloned()
        .collect();
    ssh
}
