//! Implementation of the `promptlab run` command.
//!
//! # What `promptlab run` does
//!
//! 1. Resolves the API key; a missing key fails before any other work
//! 2. Loads the problems, tools and template pair
//! 3. Assembles and price-checks every request, so a bad parameter stops
//!    the batch before the first model call
//! 4. Runs the requests one at a time; Ctrl-C cancels the call in flight
//! 5. Journals each outcome and prints the session cost

use super::inputs::{problem_report, prompt_config, selected_tools};
use crate::cli::RunArgs;
use promptlab::context::{LabContext, require_initialized};
use promptlab::cost::{SessionCostLedger, display_cost};
use promptlab::credentials::ApiKey;
use promptlab::error::{LabError, Result};
use promptlab::events::{Event, EventAction, record_event};
use promptlab::generation::{AnthropicCapability, GenerationAdapter};
use promptlab::pipeline::{Pipeline, RunOutput};
use promptlab::prompt::GenerationRequest;
use promptlab::results::{DeclaredOrMentioned, ResultStore};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Execute the `promptlab run` command.
pub fn cmd_run(data_dir: Option<&Path>, args: RunArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let config = ctx.load_config()?;
    let api_key = ApiKey::from_env(&config.api_key_env)?;

    let problems = problem_report(&ctx)?;
    let tools = selected_tools(&ctx, &args.generation.tools)?;
    let prompt_config = prompt_config(&ctx, &config, &args.generation)?;

    let capability = AnthropicCapability::new(api_key).with_base_url(config.api_base_url.clone());
    let adapter = GenerationAdapter::new(
        Arc::new(capability),
        config.retry_policy(),
        config.timeout(),
    );
    let store = ResultStore::new(&ctx.results_dir, Arc::new(DeclaredOrMentioned));
    let pipeline = Pipeline::new(
        adapter,
        config.pricing_table(),
        store,
        Arc::new(SessionCostLedger::new()),
    );

    let mut requests = Vec::with_capacity(args.problems.len());
    for problem_id in &args.problems {
        let problem = problems.require(problem_id)?;
        requests.push(pipeline.prepare(problem, &tools, &prompt_config)?);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| LabError::Internal(format!("failed to start async runtime: {}", e)))?;

    runtime.block_on(run_batch(&ctx, &pipeline, requests))
}

/// Run prepared requests in order, stopping at the first failure.
async fn run_batch(
    ctx: &LabContext,
    pipeline: &Pipeline,
    requests: Vec<GenerationRequest>,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted; abandoning the call in flight.");
            interrupt.cancel();
        }
    });

    let total = requests.len();
    let mut outcome = Ok(());

    for (index, request) in requests.into_iter().enumerate() {
        let problem_id = request.problem.id.clone();
        let model_id = request.model_id.clone();
        println!("[{}/{}] {} with {}", index + 1, total, problem_id, model_id);

        match pipeline.run_request(request, &cancel).await {
            Ok(output) => {
                print_run(&output);
                record_event(
                    ctx,
                    &Event::new(EventAction::Run)
                        .with_result(&output.record.result_id)
                        .with_details(json!({
                            "problem_id": problem_id,
                            "model_id": model_id,
                            "parsed": output.record.parse.parsed_count,
                            "partial": output.record.parse.partial,
                            "total_cost": output.record.cost.total_cost,
                        })),
                );
            }
            Err(err) => {
                record_event(
                    ctx,
                    &Event::new(EventAction::RunFailed).with_details(json!({
                        "problem_id": problem_id,
                        "model_id": model_id,
                        "error": err.to_string(),
                    })),
                );
                outcome = Err(err);
                break;
            }
        }
    }

    watcher.abort();

    let session = pipeline.ledger().snapshot();
    println!();
    println!(
        "Session: {} run(s), {} tokens, {}",
        session.run_count,
        session.total_tokens,
        display_cost(session.total_cost)
    );
    outcome
}

fn print_run(output: &RunOutput) {
    let record = &output.record;
    let metrics = record.metrics();
    println!("  Result:   {}", record.result_id);
    println!(
        "  Parsed:   {}/{} ({} use tools)",
        record.parse.parsed_count, record.parse.expected_count, metrics.tool_solution_count
    );
    if record.parse.partial {
        println!(
            "  Warning:  partial parse, {} block(s) skipped; raw output kept",
            record.parse.skipped_blocks
        );
    }
    println!(
        "  Tokens:   {} in / {} out",
        record.usage.input_tokens, record.usage.output_tokens
    );
    println!("  Cost:     {}", display_cost(record.cost.total_cost));
    println!(
        "  Latency:  {} ms ({} attempt{})",
        record.latency_ms,
        record.attempts,
        if record.attempts == 1 { "" } else { "s" }
    );
}
