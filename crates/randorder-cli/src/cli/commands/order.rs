use std::io::Read;
use std::path::Path;

use anyhow::Context;
use randorder_core::{
    BucketType, GuardOutcome, MarkerTable, NodeItem, OrderError, RandomOrderConfig, RunPlan,
    StrategyRegistry, TestItem,
};
use serde::Serialize;

use super::super::args::{OrderArgs, OutputFormat};
use crate::exit_codes::{INTEGRITY_VIOLATION, SUCCESS};

#[derive(Debug, Serialize)]
struct OrderReport<'a> {
    bucket: BucketType,
    seed: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'a str>,
    order: Vec<&'a str>,
}

pub(crate) fn run(args: OrderArgs) -> anyhow::Result<i32> {
    let file_cfg = match &args.config {
        Some(path) => RandomOrderConfig::load(path)?,
        None => RandomOrderConfig::default(),
    };
    let cfg = file_cfg.merge(args.overrides());
    cfg.validate()?;

    let plan = RunPlan::from_config(&cfg);
    let mut items = read_items(args.input.as_deref())?;

    let mut markers = MarkerTable::new();
    for scope in &cfg.disabled_scopes {
        markers.disable(scope.trim());
    }
    markers.apply(&mut items);
    tracing::debug!(
        items = items.len(),
        disabled_scopes = cfg.disabled_scopes.len(),
        "collected node ids"
    );

    if plan.bucket_type.is_enabled() {
        eprint!("{}", plan.report_header());
    }

    let outcome = match plan.apply(&mut items, &StrategyRegistry::builtin()) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(OrderError::IntegrityViolation { .. }) = e.downcast_ref::<OrderError>() {
                eprintln!("error: {e}");
                return Ok(INTEGRITY_VIOLATION);
            }
            return Err(e);
        }
    };

    let order: Vec<&str> = items.iter().map(|i| i.node_id()).collect();
    match args.format {
        OutputFormat::Text => {
            for id in &order {
                println!("{id}");
            }
        }
        OutputFormat::Json => {
            let (label, failure) = match &outcome {
                GuardOutcome::Shuffled => ("shuffled", None),
                GuardOutcome::Skipped => ("skipped", None),
                GuardOutcome::Degraded { failure } => ("degraded", Some(failure.as_str())),
            };
            let report = OrderReport {
                bucket: plan.bucket_type,
                seed: plan.seed.to_string(),
                outcome: label,
                failure,
                order,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(SUCCESS)
}

/// One node id per line; blank lines and `#` comments are skipped.
fn read_items(input: Option<&Path>) -> anyhow::Result<Vec<NodeItem>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read node ids from stdin")?;
            buf
        }
    };
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(NodeItem::parse)
        .collect())
}
