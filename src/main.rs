//! fieldtree - run a form over a JSON model from the command line
//!
//! Usage: `fieldtree <model.json> [updates.json]`
//!
//! The updates file is an object of new property values. An optional
//! `"$validations"` entry maps property names to rule names (or lists of
//! them, or `/pattern/` strings, or nested objects for sub-records). Inside
//! a nested object `$rule` sets the property's own rule and `$each` the
//! validation of every array element.

use anyhow::{Context, Result};
use fieldtree::{Form, FormOptions, MessagesConfig, SubmissionStatus, Validations};
use serde_json::{json, Map, Value};
use std::io;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VALIDATIONS_KEY: &str = "$validations";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldtree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(model_path) = args.first() else {
        eprintln!("usage: fieldtree <model.json> [updates.json]");
        std::process::exit(2);
    };

    match run(Path::new(model_path), args.get(1).map(Path::new)).await {
        Ok(SubmissionStatus::Submitted) => Ok(()),
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run(model_path: &Path, updates_path: Option<&Path>) -> Result<SubmissionStatus> {
    let model = read_json(model_path)?;
    let updates = match updates_path {
        Some(path) => read_json(path)?,
        None => json!({}),
    };
    let (validations, updates) = split_validations(updates)?;
    let messages = MessagesConfig::from_env()?;

    let options = FormOptions::new()
        .validations(validations)
        .messages(messages)
        .on_update(|| tracing::debug!("Form updated"))
        .on_submit(|form: &Form| -> Result<()> {
            println!("{}", serde_json::to_string_pretty(form.model().as_ref())?);
            Ok(())
        })
        .on_submit_error(|error: &anyhow::Error| {
            tracing::error!("Submission failed: {error:#}");
        });
    let mut form = Form::new(model, options)?;

    form.update_fields(updates)?;
    form.submit(None).await;

    let errors: Map<String, Value> = form
        .errors()
        .into_iter()
        .map(|(path, messages)| (path, json!(messages)))
        .collect();
    let report = json!({
        "status": form.submission_status(),
        "dirty": form.dirty(),
        "valid": form.valid(),
        "changes": form.changes(),
        "errors": errors,
    });
    eprintln!("{}", serde_json::to_string_pretty(&report)?);

    Ok(form.submission_status())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Separate the `$validations` entry from the property updates
fn split_validations(updates: Value) -> Result<(Validations, Value)> {
    let Value::Object(mut map) = updates else {
        anyhow::bail!("updates must be a JSON object");
    };
    let validations = match map.remove(VALIDATIONS_KEY) {
        Some(spec) => Validations::from_json(&spec)?,
        None => Validations::new(),
    };
    Ok((validations, Value::Object(map)))
}
