//! eca-check - ECA validation of local commits
//!
//! Runs the same pipeline the review host uses:
//! - `push` validates a commit as if it were being pushed
//! - `submit` evaluates the "ECA signed" submit requirement
//! - `signed` evaluates the `has:signed_<plugin>` search predicate
//! - `policy` shows the effective project settings

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eca_client::HttpComplianceClient;
use eca_gate::{
    ChangeInfo, ChangeStatus, ProjectPolicyResolver, PushValidationOrchestrator, SignedPredicate,
    SubmitVerdictEvaluator, ValidationPipeline,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod git;

use config::CheckConfig;

/// eca-check CLI
#[derive(Parser)]
#[command(name = "eca-check")]
#[command(about = "Validate commits against the Eclipse Contributor Agreement service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ECA_CONFIG")]
    config: Option<String>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "ECA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "ECA_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a commit as a push to PROJECT
    Push {
        #[command(flatten)]
        target: Target,
    },

    /// Evaluate the submit requirement for a change carrying the commit
    Submit {
        #[command(flatten)]
        target: Target,

        /// Treat the change as already merged
        #[arg(long)]
        closed: bool,

        /// Change number reported in logs
        #[arg(long, default_value_t = 0)]
        change: u64,
    },

    /// Evaluate the signed search predicate for the commit
    Signed {
        #[command(flatten)]
        target: Target,
    },

    /// Show the effective validation settings of a project
    Policy {
        /// Project name
        #[arg(short, long)]
        project: String,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Project name
    #[arg(short, long)]
    project: String,

    /// Revision to validate
    #[arg(short, long, default_value = "HEAD")]
    rev: String,

    /// Repository directory
    #[arg(long, default_value = ".")]
    repo: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = CheckConfig::load(cli.config.as_deref()).context("loading configuration")?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let resolver = ProjectPolicyResolver::new(Arc::new(config.policy_store()), &config.plugin_name);

    if let Command::Policy { project } = &cli.command {
        let policy = resolver
            .resolve(project)
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        println!("{}", serde_json::to_string_pretty(&policy)?);
        return Ok(ExitCode::SUCCESS);
    }

    let client = HttpComplianceClient::new(&config.service).context("creating compliance client")?;
    let pipeline = Arc::new(ValidationPipeline::new(
        Arc::new(client),
        resolver,
        config.pipeline.clone(),
    ));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling validation");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Command::Push { target } => {
            let commit = git::read_commit(&target.repo, &target.rev)?;
            let orchestrator = PushValidationOrchestrator::new(pipeline, config.push.clone());

            match orchestrator
                .on_commit_received(&target.project, &commit, &cancel)
                .await
            {
                Ok(messages) => {
                    for message in messages {
                        println!("{}", message);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(rejection) => {
                    for message in &rejection.messages {
                        eprintln!("{}", message);
                    }
                    eprintln!("rejected: {}", rejection.message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Submit {
            target,
            closed,
            change,
        } => {
            let change = load_change(&target, change, closed)?;
            let evaluator = SubmitVerdictEvaluator::new(pipeline, config.submit.clone());
            let verdict = evaluator.evaluate(&change, &cancel).await;

            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if let Some(message) = verdict.message() {
                eprintln!("{}: {}", change.project, message);
            }
            Ok(if verdict.is_ready() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Signed { target } => {
            let change = load_change(&target, 0, false)?;
            let evaluator = SubmitVerdictEvaluator::new(pipeline, config.submit.clone());
            let predicate = SignedPredicate::new(&config.plugin_name, Arc::new(evaluator));

            let matched = predicate.matches(&change, &cancel).await?;
            println!("{}: {}", predicate, matched);
            Ok(if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Policy { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn load_change(target: &Target, id: u64, closed: bool) -> anyhow::Result<ChangeInfo> {
    let commit = git::read_commit(&target.repo, &target.rev)?;
    let status = if closed {
        ChangeStatus::Merged
    } else {
        ChangeStatus::Open
    };
    Ok(ChangeInfo::new(id, &target.project, status, Arc::new(commit)))
}
