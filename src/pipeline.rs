//! One full run: assemble, price-check, generate, cost, record.
//!
//! Everything that can reject a run (parameters, templates, an unpriced
//! model) is checked before the network call. Cost is computed only from the
//! usage of a completed call and is added to the session ledger before the
//! record is written, so spend is counted even if persisting fails.

use crate::cost::{LedgerSnapshot, PricingTable, SessionCostLedger};
use crate::error::Result;
use crate::generation::GenerationAdapter;
use crate::problems::ProblemStatement;
use crate::prompt::{GenerationRequest, PromptConfig, assemble};
use crate::results::{CallStats, ResultRecord, ResultStore};
use crate::tools::ToolDescriptor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A recorded run and the session totals after it.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub record: ResultRecord,
    pub session: LedgerSnapshot,
}

pub struct Pipeline {
    adapter: GenerationAdapter,
    pricing: PricingTable,
    store: ResultStore,
    ledger: Arc<SessionCostLedger>,
}

impl Pipeline {
    pub fn new(
        adapter: GenerationAdapter,
        pricing: PricingTable,
        store: ResultStore,
        ledger: Arc<SessionCostLedger>,
    ) -> Self {
        Self {
            adapter,
            pricing,
            store,
            ledger,
        }
    }

    pub fn ledger(&self) -> &SessionCostLedger {
        &self.ledger
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Assemble the request and confirm its model is priced. No network access.
    pub fn prepare(
        &self,
        problem: &ProblemStatement,
        tools: &[ToolDescriptor],
        config: &PromptConfig,
    ) -> Result<GenerationRequest> {
        let request = assemble(problem, tools, config)?;
        self.pricing.require(&request.model_id)?;
        Ok(request)
    }

    /// Run `problem` with `tools` end to end.
    pub async fn run(
        &self,
        problem: &ProblemStatement,
        tools: &[ToolDescriptor],
        config: &PromptConfig,
        cancel: &CancellationToken,
    ) -> Result<RunOutput> {
        let request = self.prepare(problem, tools, config)?;
        self.run_request(request, cancel).await
    }

    /// Generate, cost and record an already prepared request.
    pub async fn run_request(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RunOutput> {
        info!(
            problem_id = %request.problem.id,
            model = %request.model_id,
            tools = request.tools.len(),
            "starting generation run"
        );

        let outcome = self.adapter.invoke_cancellable(&request, cancel).await?;
        let cost = self.pricing.estimate(&outcome.usage, &request.model_id)?;
        let session = self.ledger.accumulate(&outcome.usage, &cost);

        let record = self.store.record(
            request,
            outcome.raw_output,
            outcome.usage,
            cost,
            CallStats {
                latency_ms: outcome.latency_ms,
                attempts: outcome.attempts,
            },
        )?;

        info!(
            result_id = %record.result_id,
            parsed = record.parse.parsed_count,
            partial = record.parse.partial,
            total_cost = cost.total_cost,
            session_cost = session.total_cost,
            "run recorded"
        );

        Ok(RunOutput { record, session })
    }
}
