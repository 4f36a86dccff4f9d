//! Summary command - total income, total expense and net

use anyhow::Result;
use colored::Colorize;
use tally_core::services::SummaryState;
use tally_core::OperationResult;

use super::{cancel_on_interrupt, get_context, runtime, Reported};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("summary", json)?;
    let screen = ctx.summary_screen();

    let rt = runtime()?;
    let spinner = output::spinner("Loading summary...", !json);
    let state = rt.block_on(async {
        cancel_on_interrupt(screen.lifetime());
        screen.activate().await
    });
    spinner.finish_and_clear();

    match state {
        SummaryState::Loaded(data) => {
            let rendered = data.render();
            if json {
                let payload = serde_json::json!({
                    "total_income": data.total_income,
                    "total_expense": data.total_expense,
                    "net": data.net,
                    "rendered": rendered,
                });
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(payload))?);
                return Ok(());
            }

            println!("{}", "Financial Summary".bold());
            println!();
            let mut table = output::create_table();
            table.add_row(vec!["Total Income".to_string(), rendered.income.green().to_string()]);
            table.add_row(vec!["Total Expense".to_string(), rendered.expense.red().to_string()]);
            table.add_row(vec!["Net".to_string(), rendered.net.bold().to_string()]);
            println!("{}", table);
            Ok(())
        }
        SummaryState::Failed { message } => {
            if json {
                let result: OperationResult<()> = OperationResult::fail(message);
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::labeled_error("Summary unavailable", &message);
            }
            Err(Reported.into())
        }
        // Interrupted; leave quietly
        SummaryState::Cancelled | SummaryState::Loading => Ok(()),
    }
}
