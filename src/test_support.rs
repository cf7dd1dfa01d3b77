use crate::config::Config;
use crate::context::LabContext;
use crate::cost::CostEstimate;
use crate::generation::{
    CapabilityError, CapabilityRequest, CapabilityResponse, GenerationCapability, UsageRecord,
};
use crate::problems::ProblemStatement;
use crate::prompt::{GenerationRequest, PromptConfig, assemble};
use crate::results::{CallStats, DeclaredOrMentioned, ResultRecord};
use crate::tools::{ToolDescriptor, ToolInput, ToolTags};
use async_trait::async_trait;
use serde_json::json;
use indexmap::IndexMap;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tempfile::TempDir;

type Scripted = Result<CapabilityResponse, CapabilityError>;

/// Capability that replays a fixed script of responses, one per call.
pub(crate) struct ScriptedCapability {
    script: Mutex<VecDeque<Scripted>>,
    delay: Option<Duration>,
    calls: AtomicU32,
    last_request: Mutex<Option<CapabilityRequest>>,
}

impl ScriptedCapability {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            delay: None,
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Sleep this long inside every call before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<CapabilityRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationCapability for ScriptedCapability {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &CapabilityRequest) -> Scripted {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CapabilityError::permanent("script exhausted")))
    }
}

pub(crate) fn sample_problem() -> ProblemStatement {
    ProblemStatement {
        id: "nutrition_l1_001".to_string(),
        domain: "health".to_string(),
        subdomain: "nutrition".to_string(),
        level: 1,
        text: "I want to understand how different foods affect my energy levels".to_string(),
    }
}

fn tool(
    tool_id: &str,
    display_name: &str,
    category: &str,
    domain: &str,
    inputs: &[(&str, &str, &[&str])],
) -> ToolDescriptor {
    ToolDescriptor {
        tool_id: tool_id.to_string(),
        display_name: display_name.to_string(),
        category: category.to_string(),
        integration_status: "manual_export".to_string(),
        description: None,
        inputs: inputs
            .iter()
            .map(|(name, data_type, cases)| {
                (
                    name.to_string(),
                    ToolInput {
                        data_type: data_type.to_string(),
                        use_cases: cases.iter().map(|c| c.to_string()).collect(),
                    },
                )
            })
            .collect::<IndexMap<_, _>>(),
        tags: ToolTags {
            data_types: BTreeSet::new(),
            domains: BTreeSet::from([domain.to_string()]),
        },
        integration_score: None,
        parent_system: None,
    }
}

/// Two health tools and one productivity tool.
pub(crate) fn sample_tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "oura_ring",
            "Oura Ring",
            "wearable",
            "health",
            &[(
                "readiness",
                "daily_score",
                &["See how rested you are each morning", "Spot energy dips"],
            )],
        ),
        tool(
            "myfitnesspal",
            "MyFitnessPal",
            "nutrition_app",
            "health",
            &[("food_log", "meal_entries", &["Log what you eat", "Track macros"])],
        ),
        tool(
            "notion",
            "Notion",
            "notes",
            "productivity",
            &[("pages", "text", &["Keep a food and mood journal"])],
        ),
    ]
}

pub(crate) fn sample_prompt_config() -> PromptConfig {
    let config = Config::default();
    config.prompt_config(&config.system_prompt, &config.user_prompt)
}

pub(crate) fn sample_request() -> GenerationRequest {
    assemble(&sample_problem(), &sample_tools(), &sample_prompt_config()).unwrap()
}

/// Five solution blocks; four reference the sample tools (one only by mention).
pub(crate) fn sample_output() -> String {
    let body = json!({
        "solutions": [
            {
                "title": "Match your energy to your readiness score",
                "prompt": "Here is a screenshot of my sleep readiness for the week. Help me see which meals came before my low days.",
                "tools_used": ["oura_ring"],
                "tags": ["curious", "beginner", "nutrition"]
            },
            {
                "title": "Turn your food log into an energy journal",
                "prompt": "I exported last week's meals and pasted my daily notes. What patterns between food and energy do you see?",
                "tools_used": ["myfitnesspal", "notion"],
                "tags": ["organized", "intermediate", "nutrition"]
            },
            {
                "title": "Review a week of meals",
                "prompt": "I copied my MyFitnessPal diary below. Point out meals that might leave me sluggish.",
                "tools_used": [],
                "tags": ["curious", "beginner", "nutrition"]
            },
            {
                "title": "Plan an energy-friendly grocery list",
                "prompt": "Using the foods I usually log, suggest swaps that keep my energy steady through the afternoon.",
                "tools_used": ["Notion"],
                "tags": ["practical", "beginner", "shopping"]
            },
            {
                "title": "Learn how food affects energy",
                "prompt": "Explain in simple terms how protein, fibre and sugar affect my energy over a day, with one easy experiment to try.",
                "tools_used": [],
                "tags": ["learning", "beginner", "nutrition"]
            }
        ]
    });
    format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&body).unwrap()
    )
}

pub(crate) fn sample_record() -> ResultRecord {
    ResultRecord::build(
        sample_request(),
        sample_output(),
        UsageRecord {
            input_tokens: 1000,
            output_tokens: 500,
        },
        CostEstimate {
            input_cost: 0.003,
            output_cost: 0.0075,
            total_cost: 0.0105,
        },
        CallStats {
            latency_ms: 850,
            attempts: 1,
        },
        &DeclaredOrMentioned,
    )
}

/// A data directory with the sample problem and tools on disk.
pub(crate) fn create_test_data_dir() -> (TempDir, LabContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = LabContext::from_data_dir(temp_dir.path().join("data"));
    ctx.ensure_layout().unwrap();

    let problem = sample_problem();
    std::fs::write(
        ctx.problems_dir.join("health.json"),
        json!([{
            "problem_id": problem.id,
            "domain": problem.domain,
            "subdomain": problem.subdomain,
            "level": problem.level,
            "problem_text": problem.text
        }])
        .to_string(),
    )
    .unwrap();

    std::fs::write(
        ctx.tools_dir.join("tools.json"),
        serde_json::to_string_pretty(&sample_tools()).unwrap(),
    )
    .unwrap();

    (temp_dir, ctx)
}
