use std::io::{IsTerminal, Write};

use anyhow::{bail, Context};
use clap::Parser;
use mysql_diff_deploy::config::{self, Config, ExecMode};
use mysql_diff_deploy::db::Db;
use mysql_diff_deploy::mycnf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // SIGINT/SIGTERM cancel whatever the collaborator is doing
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        });
    }

    if let Err(e) = run(&cancel).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn run(cancel: &CancellationToken) -> anyhow::Result<()> {
    let args = config::Args::parse();
    let cnf = mycnf::load_default(None).context("failed to load MySQL option files")?;
    let config = config::resolve(&args, &cnf)?;

    let db = Db::connect(&config, cancel)
        .await
        .context("failed to connect to the database")?;

    match config.mode {
        ExecMode::Deploy => run_deploy(&db, &config, cancel).await,
        ExecMode::Import => run_import(&db, &config, cancel).await,
    }
}

async fn run_deploy(db: &Db, config: &Config, cancel: &CancellationToken) -> anyhow::Result<()> {
    let schema = config
        .schema
        .as_deref()
        .context("a schema file is required")?;

    let plan = db.plan(schema, cancel).await.context("failed to plan")?;
    plan.preview(&mut std::io::stderr())
        .context("failed to preview the plan")?;

    if config.dry_run {
        return Ok(());
    }
    if !config.auto_approve && !approved(cancel).await? {
        bail!("the plan was cancelled");
    }

    db.deploy(&plan, cancel).await.context("failed to deploy")?;
    Ok(())
}

async fn run_import(db: &Db, config: &Config, cancel: &CancellationToken) -> anyhow::Result<()> {
    let sql_text = db
        .load_schema(cancel)
        .await
        .context("failed to load the schema")?;
    eprint!("{sql_text}");

    if sql_text.is_empty() {
        info!("no table detected");
        return Ok(());
    }
    if config.dry_run {
        return Ok(());
    }
    if !config.auto_approve && !approved(cancel).await? {
        bail!("the import was cancelled");
    }

    db.import(&sql_text, cancel).await.context("failed to import")?;
    Ok(())
}

/// Ask the operator for a literal `yes`. The prompt races the
/// cancellation token, so an interrupt aborts it instead of leaving the
/// process stuck on stdin.
async fn approved(cancel: &CancellationToken) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("a terminal is required for approval; pass --auto-approve to skip it");
    }
    println!("Do you want to perform these actions?");
    println!("Only 'yes' will be accepted to confirm.");
    print!("Enter a value: ");
    std::io::stdout().flush()?;

    let read_line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    });

    tokio::select! {
        () = cancel.cancelled() => bail!("interrupted while waiting for approval"),
        result = read_line => {
            let line = result.context("the approval prompt was aborted")??;
            Ok(line.trim() == "yes")
        }
    }
}
