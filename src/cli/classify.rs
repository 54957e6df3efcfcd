//! Classify mode CLI logic
//!
//! Runs the classifier once against a failure described on the command line
//! and prints a JSON report on stdout. The account, if any, lives in an
//! in-memory store for the duration of the run.

use anyhow::{Context, Result};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    Error, Settings,
    error_log::MemoryErrorLog,
    handler::{ErrorClassifier, Failure, HttpFailure},
    storage::{AccountStore, LocalStore},
    types::{ClassifyOutcome, ClassifyReport},
};

/// Arguments for classify mode
#[derive(Debug)]
pub struct ClassifyArgs {
    pub status: u16,
    pub content_type: Option<String>,
    /// Body file, or `-` for stdin
    pub body: Option<String>,
    pub account: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Run classify mode and print the report
pub async fn run_classify_mode(args: ClassifyArgs) -> Result<()> {
    let settings = super::load_settings(args.config.as_deref());

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if args.verbose { "debug" } else { "error" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    let failure = build_failure(&args)?;
    debug!(
        "Classifying HTTP {} with content type {:?}",
        failure.status(),
        failure.content_type()
    );

    let report = classify(&args, failure, &settings)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Classify a failure against a fresh in-memory store
fn classify(
    args: &ClassifyArgs,
    failure: HttpFailure,
    settings: &Settings,
) -> Result<ClassifyReport> {
    let store = Arc::new(LocalStore::in_memory());
    if let Some(account) = &args.account {
        store.insert_account(account)?;
    }
    let log = Arc::new(MemoryErrorLog::new(settings.storage.error_log_capacity));
    let classifier = ErrorClassifier::new(log.clone(), store.clone(), settings.messages.clone());

    let result = classifier.handle(Failure::Http(failure), args.account.as_deref());

    let report = match result {
        Ok(()) => ClassifyReport::new(ClassifyOutcome::NoError, log.entries()),
        Err(Error::Banking(error)) => ClassifyReport::banking(&error, log.entries()),
        Err(Error::Json(e)) => {
            debug!("Response body is not valid JSON: {}", e);
            ClassifyReport::new(ClassifyOutcome::MalformedBody, log.entries())
        }
        Err(e) => return Err(e).context("Classification failed"),
    };

    let account_error_message = match &args.account {
        Some(account) => store.error_message(account)?,
        None => None,
    };

    Ok(report.with_account_error_message(account_error_message))
}

/// Build the failure described by the arguments
fn build_failure(args: &ClassifyArgs) -> Result<HttpFailure> {
    let status = reqwest::StatusCode::from_u16(args.status)
        .with_context(|| format!("Invalid HTTP status: {}", args.status))?;

    let mut failure = HttpFailure::with_status(status).with_body(read_body(args.body.as_deref())?);
    if let Some(content_type) = &args.content_type {
        failure = failure.with_header("Content-Type", content_type);
    }
    Ok(failure)
}

/// Read the response body from a file or stdin
fn read_body(source: Option<&str>) -> Result<Vec<u8>> {
    match source {
        None => Ok(Vec::new()),
        Some("-") => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("Failed to read body from stdin")?;
            Ok(body)
        }
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read body from {}", path))
        }
    }
}
