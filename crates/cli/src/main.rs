//! repo-improver CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Load configuration**: `.env` via `dotenvy`, then the process
//!    environment for `GITHUB_TOKEN` and `OPENAI_API_KEY`.
//! 2. **Wire observability**: `tracing-subscriber` with a JSON layer on stderr
//!    and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an OTLP exporter.
//! 3. **Construct infrastructure**: a [`github::GithubClient`] and an
//!    [`llm::OpenAiProvider`], injected into [`nodes::RepositoryImprover`] only
//!    after the credential pre-flight passes.
//! 4. **Run once** against the repository named on the command line and print
//!    the [`nodes::RunReport`] as JSON on stdout.

mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use github::GithubClient;
use llm::OpenAiProvider;
use nodes::{Clients, RepositoryImprover, RunReport};
use pipeline::{Credentials, ImproverError, ImproverSettings, RepositoryHandle};
use tracing::info;

/// Improve the Python sources of a GitHub repository and open a pull request
/// with the result.
#[derive(Debug, Parser)]
#[command(name = "repo-improver", version, about)]
struct Cli {
    /// Target repository as `owner/name`.
    repository: RepositoryHandle,
}

fn build_clients(credentials: &Credentials) -> Result<Clients, ImproverError> {
    let host = GithubClient::new(credentials.github_token()).map_err(|e| {
        ImproverError::ConfigurationError {
            message: format!("GitHub client: {e}"),
        }
    })?;
    let completion = OpenAiProvider::new(credentials.completion_api_key()).map_err(|e| {
        ImproverError::ConfigurationError {
            message: format!("completion client: {e}"),
        }
    })?;
    Ok((Arc::new(host), Arc::new(completion)))
}

fn print_report(report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialise run report")?;
    println!("{json}");
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let improver = RepositoryImprover::connect(
        |key| std::env::var(key).ok(),
        ImproverSettings::default(),
        build_clients,
    )?;

    let report = improver
        .run(&cli.repository)
        .await
        .with_context(|| format!("improvement run for {} failed", cli.repository))?;

    match &report.pull_request {
        Some(pr) => info!(number = %pr.number, url = %pr.html_url, "done"),
        None => info!(branch = %report.branch.head, "done, nothing to improve"),
    }
    print_report(&report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let telemetry = match telemetry::init() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli).await;
    drop(telemetry);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
