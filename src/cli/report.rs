//! `report` command - one-shot batch measurement.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::config::BudgetConfig;
use crate::history::HistoryStore;
use crate::pipeline::Pipeline;

/// Run a single batch and print the table.
pub fn run(config: BudgetConfig) -> Result<()> {
    let config = Arc::new(config);
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let pipeline = Arc::new(Pipeline::new(Arc::clone(&config))?);
    let mut history = HistoryStore::new();
    run_once(&runtime, &pipeline, &config, &mut history)
}

/// One batch: measure, report, then fold the new sizes into history.
pub fn run_once(
    runtime: &Runtime,
    pipeline: &Arc<Pipeline>,
    config: &BudgetConfig,
    history: &mut HistoryStore,
) -> Result<()> {
    let outcomes = runtime.block_on(Arc::clone(pipeline).run(history))?;
    crate::report::print_report(&outcomes, config.budget.payload_size);
    history.apply(&outcomes);
    Ok(())
}
