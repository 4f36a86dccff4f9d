//! Upload command - send one CSV statement to the backend

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use dialoguer::Input;
use tally_core::adapters::local_picker::LocalFilePicker;
use tally_core::{OperationResult, UploadOutcome};

use super::{cancel_on_interrupt, get_context, runtime, Reported};

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    let selection = match file {
        Some(path) => Some(path),
        None if !json && atty::is(atty::Stream::Stdin) => prompt_for_file()?,
        None => None,
    };

    // JSON mode reports through stdout only
    let ctx = get_context("upload", json)?;
    let picker = LocalFilePicker::new(selection, ctx.cache_dir());
    let screen = ctx.upload_screen(Arc::new(picker));

    let rt = runtime()?;
    let outcome = rt.block_on(async {
        cancel_on_interrupt(screen.lifetime());
        screen.pick_and_upload().await
    });

    if json {
        let result = match &outcome {
            UploadOutcome::Failed { user_message } => {
                OperationResult::fail_with_context(user_message.clone(), outcome_context(&outcome))
            }
            _ => OperationResult::ok(outcome.clone()),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    // The notifier already told the user; cancellation stays silent
    match outcome {
        UploadOutcome::Failed { .. } => Err(Reported.into()),
        UploadOutcome::Cancelled | UploadOutcome::Uploaded { .. } => Ok(()),
    }
}

/// Ask for a path; an empty answer cancels
fn prompt_for_file() -> Result<Option<PathBuf>> {
    let answer: String = Input::new()
        .with_prompt("CSV file to upload (empty to cancel)")
        .allow_empty(true)
        .interact_text()?;

    let answer = answer.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}

fn outcome_context(outcome: &UploadOutcome) -> HashMap<String, serde_json::Value> {
    let mut context = HashMap::new();
    if let Ok(value) = serde_json::to_value(outcome) {
        context.insert("outcome".to_string(), value);
    }
    context
}
