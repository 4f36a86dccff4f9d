//! Insight commands - categories, daily spending, text report, transactions

use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;
use tally_core::domain::amount::format_currency;
use tally_core::domain::TransactionFilter;
use tally_core::services::UserAction;
use tally_core::{Error, OperationResult, TallyContext};
use tokio_util::sync::CancellationToken;

use super::{cancel_on_interrupt, get_context, runtime, Reported};
use crate::output;

pub fn run_categories(json: bool) -> Result<()> {
    let ctx = get_context("categories", json)?;
    let insights = &ctx.insights_service;
    let Some(totals) = fetch(&ctx, json, |cancel| async move {
        insights.category_totals(&cancel).await
    })?
    else {
        return Ok(());
    };

    if totals.is_empty() {
        output::info("No spending recorded yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Category", "Total"]);
    for total in &totals {
        table.add_row(vec![total.category.clone(), format_currency(total.total)]);
    }
    println!("{}", table);
    Ok(())
}

pub fn run_daily(json: bool) -> Result<()> {
    let ctx = get_context("daily", json)?;
    let insights = &ctx.insights_service;
    let Some(days) = fetch(&ctx, json, |cancel| async move {
        insights.daily_spending(&cancel).await
    })?
    else {
        return Ok(());
    };

    if days.is_empty() {
        output::info("No spending recorded yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Spent"]);
    for day in &days {
        let date = day
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![date, format_currency(day.total_spent)]);
    }
    println!("{}", table);
    Ok(())
}

pub fn run_report(start: Option<NaiveDate>, end: Option<NaiveDate>, json: bool) -> Result<()> {
    let ctx = get_context("report", json)?;
    let insights = &ctx.insights_service;
    let Some(report) = fetch(&ctx, json, |cancel| async move {
        insights.summary_text(start, end, &cancel).await
    })?
    else {
        return Ok(());
    };

    println!("{}", report.summary);
    Ok(())
}

pub fn run_transactions(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context("transactions", json)?;
    let filter = TransactionFilter {
        start_date: start,
        end_date: end,
        category,
    };
    let insights = &ctx.insights_service;
    let filter = &filter;
    let Some(transactions) = fetch(&ctx, json, |cancel| async move {
        insights.transactions(filter, &cancel).await
    })?
    else {
        return Ok(());
    };

    if transactions.is_empty() {
        output::info("No transactions found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Description", "Category", "Amount"]);
    for tx in &transactions {
        let amount = tx.amount.map(format_currency).unwrap_or_default();
        let amount = if tx.amount.is_some_and(|a| a.is_sign_negative()) {
            amount.red().to_string()
        } else {
            amount
        };
        table.add_row(vec![
            tx.date.clone().unwrap_or_default(),
            tx.description.clone().unwrap_or_default(),
            tx.category.clone().unwrap_or_default(),
            amount,
        ]);
    }
    println!("{}", table);
    println!("{} transactions", transactions.len());
    Ok(())
}

/// Run one insight request with Ctrl-C cancellation
///
/// In JSON mode the result is printed here and `None` is returned. A failure
/// is shown once, labeled, and turned into [`Reported`].
fn fetch<T, F, Fut>(ctx: &TallyContext, json: bool, request: F) -> Result<Option<T>>
where
    T: Serialize,
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = tally_core::domain::result::Result<T>>,
{
    let rt = runtime()?;
    let cancel = CancellationToken::new();
    let spinner = output::spinner("Loading insights...", !json);
    let result = rt.block_on(async {
        cancel_on_interrupt(cancel.clone());
        let result = request(cancel.clone()).await;
        // Stop the interrupt watcher
        cancel.cancel();
        result
    });
    spinner.finish_and_clear();

    match result {
        Ok(data) if json => {
            println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
            Ok(None)
        }
        Ok(data) => Ok(Some(data)),
        Err(Error::Cancelled) => Ok(None),
        Err(error) => {
            let message = match &error {
                // Bad input is safe and useful to show as-is
                Error::Other(detail) => detail.clone(),
                _ => ctx
                    .config
                    .error_messages
                    .user_message(UserAction::LoadInsights, &error),
            };
            if json {
                let result: OperationResult<()> = OperationResult::fail(message);
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::labeled_error("Insights unavailable", &message);
            }
            Err(Reported.into())
        }
    }
}
