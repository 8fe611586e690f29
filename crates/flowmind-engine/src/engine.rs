//! The scheduler (§4.8 C9): token-threaded tick execution over a validated
//! [`Workflow`] definition.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use flowmind_actor::{ActorConfig, ActorRequest};
use flowmind_checkpoint::CheckpointEnvelope;
use flowmind_context::ContextManager;
use flowmind_error::{ErrorContext, FlowmindError, Result};
use flowmind_expression::{evaluate_node, guard};
use flowmind_resilience::{with_retry, DeadLetterEntry, DeadLetterError, DeadLetterQueue, RetryConfig};
use flowmind_tasks::HumanTaskQueue;
use flowmind_token::history::{Analytics, WasteCategory};
use flowmind_token::{Token, TokenStatus};
use flowmind_workflow::model::{DecisionNode, Edge, Workflow};
use flowmind_workflow::{validate, WorkflowIndex};
use serde_json::Value;
use tracing::warn;

use crate::options::EngineOptions;
use crate::status::EngineStatus;

/// The scheduler over one workflow run: owns the token set, the shared
/// context slots, and the collaborators actor calls drive (§4.5-§4.7).
pub struct Engine {
    workflow: Workflow,
    options: EngineOptions,
    status: EngineStatus,
    tokens: Vec<Token>,
    context: ContextManager,
    task_queue: Arc<HumanTaskQueue>,
    dead_letter: Option<Arc<DeadLetterQueue>>,
    retry_config: RetryConfig,
}

impl Engine {
    /// Validate `workflow` and build a fresh, `idle` engine. Refuses
    /// construction on structural errors (§4.8).
    pub fn new(workflow: Workflow, options: EngineOptions) -> Result<Self> {
        validate::validate(&workflow).context("constructing engine")?;
        let context = ContextManager::from_declarations(&workflow.contexts);
        Ok(Self {
            workflow,
            options,
            status: EngineStatus::Idle,
            tokens: Vec::new(),
            context,
            task_queue: Arc::new(HumanTaskQueue::new()),
            dead_letter: None,
            retry_config: RetryConfig::default(),
        })
    }

    #[must_use]
    pub fn with_task_queue(mut self, task_queue: Arc<HumanTaskQueue>) -> Self {
        self.task_queue = task_queue;
        self
    }

    #[must_use]
    pub fn with_dead_letter(mut self, dead_letter: Arc<DeadLetterQueue>) -> Self {
        self.dead_letter = Some(dead_letter);
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    #[must_use]
    pub fn task_queue(&self) -> &Arc<HumanTaskQueue> {
        &self.task_queue
    }

    #[must_use]
    pub fn dead_letter(&self) -> Option<&Arc<DeadLetterQueue>> {
        self.dead_letter.as_ref()
    }

    /// Select the entry point (§4.8) and create the first token, seeded
    /// with `{…initial_data, _workflow_id, _workflow_name, _started_at}`.
    pub fn start(&mut self, initial_data: HashMap<String, Value>) -> Result<()> {
        let index = WorkflowIndex::build(&self.workflow);
        let entry = index
            .entry_point(&self.workflow)
            .ok_or_else(|| FlowmindError::validation("workflow declares no activities"))?;

        let mut data = initial_data;
        data.insert("_workflow_id".to_string(), Value::String(self.workflow.id.to_string()));
        data.insert("_workflow_name".to_string(), Value::String(self.workflow.name.clone()));
        data.insert("_started_at".to_string(), Value::String(Utc::now().to_rfc3339()));

        let token = Token::new(entry.id.to_string(), data, self.workflow.id);
        self.tokens.push(token);
        self.status = EngineStatus::Running;
        Ok(())
    }

    /// Process every token observed as `active` at the start of this step
    /// (§4.8 "Tick", §5 ordering guarantees), then recompute engine status.
    ///
    /// Each tick also sweeps the human task queue for overdue tasks (§11
    /// supplemented feature: SLA escalation) — an explicit call here, not a
    /// hidden background timer.
    pub async fn run_step(&mut self) -> Result<()> {
        let escalated = self.task_queue.sweep_overdue(Utc::now()).await;
        if !escalated.is_empty() {
            tracing::debug!(count = escalated.len(), "escalated overdue human tasks");
        }

        let index = WorkflowIndex::build(&self.workflow);
        let edges_by_id: HashMap<String, &Edge> =
            self.workflow.edges.iter().map(|edge| (edge.id.to_string(), edge)).collect();
        let actor_config = self.options.actor_config();

        let active_ids: Vec<_> = self
            .tokens
            .iter()
            .filter(|token| token.status == TokenStatus::Active)
            .map(|token| token.id)
            .collect();

        for token_id in active_ids {
            let Some(token) = self.tokens.iter_mut().find(|token| token.id == token_id) else {
                continue;
            };
            process_token(
                token,
                &index,
                &edges_by_id,
                &self.task_queue,
                self.dead_letter.as_deref(),
                &actor_config,
                &self.retry_config,
                self.options.wait_for_human_tasks,
            )
            .await;
        }

        self.recompute_status();
        Ok(())
    }

    fn recompute_status(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        if self.tokens.is_empty() {
            return;
        }
        if self.tokens.iter().all(|token| token.status.is_terminal()) {
            let any_failed = self.tokens.iter().any(|token| token.status == TokenStatus::Failed);
            self.status = if any_failed { EngineStatus::Failed } else { EngineStatus::Completed };
            self.context.clear_transient();
        } else if !self.tokens.iter().any(|token| token.status == TokenStatus::Active) {
            self.status = EngineStatus::WaitingHuman;
        } else {
            self.status = EngineStatus::Running;
        }
    }

    /// Run-to-completion: repeat `run_step` while `running`, bounded by
    /// `options.max_steps` (§4.8).
    pub async fn run(&mut self) -> Result<()> {
        let mut steps = 0;
        while self.status == EngineStatus::Running && steps < self.options.max_steps {
            self.run_step().await?;
            steps += 1;
        }
        Ok(())
    }

    /// Resume a `waiting` token with human-provided `output` (§4.8
    /// "Resume"): the human response is this node's result, so the token is
    /// both unparked and advanced past it, exactly as a successful actor
    /// call would be. A no-op if the token is not currently `waiting` (§8
    /// invariant 3 — idempotent under repeated invocation).
    pub fn resume_token(&mut self, token_id: flowmind_core::TokenId, output: HashMap<String, Value>) {
        let Some(pos) = self.tokens.iter().position(|token| token.id == token_id) else {
            return;
        };
        if self.tokens[pos].status != TokenStatus::Waiting {
            return;
        }

        let index = WorkflowIndex::build(&self.workflow);
        let token = &mut self.tokens[pos];
        let node_id = token.current_node_id.clone();

        let waiting_since = token
            .get_data("_waiting_since")
            .and_then(Value::as_str)
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        let wait_time = waiting_since
            .map(|since| Utc::now() - since)
            .and_then(|delta| delta.to_std().ok())
            .map(flowmind_core::format_iso8601_seconds);

        token.merge_data(output);
        token.update_status(
            TokenStatus::Active,
            Some(Analytics {
                wait_time,
                waste_categories: vec![WasteCategory::Waiting],
                ..Default::default()
            }),
        );
        advance(token, &node_id, &index, None);

        self.recompute_status();
    }

    /// Serialize the current run into a versioned envelope (§4.7).
    #[must_use]
    pub fn checkpoint(&self) -> CheckpointEnvelope {
        CheckpointEnvelope::new(
            self.workflow.id,
            self.workflow.name.clone(),
            self.workflow.version.to_string(),
            self.status.to_string(),
            self.tokens.clone(),
            self.context.snapshot(),
        )
    }

    /// Rebuild engine state from a checkpoint envelope taken against this
    /// same workflow definition (§4.7, §8 invariant 7, S5). Engine options
    /// and collaborators (task queue, dead-letter queue, retry config) are
    /// supplied fresh; only the run state (tokens, contexts, status) is
    /// restored.
    pub fn restore(workflow: Workflow, options: EngineOptions, envelope: CheckpointEnvelope) -> Result<Self> {
        let mut engine = Self::new(workflow, options)?;
        engine.status = envelope
            .engine_status
            .parse()
            .map_err(FlowmindError::validation)?;
        engine.tokens = envelope.tokens;
        for (id, value) in envelope.contexts {
            let lifecycle = engine
                .workflow
                .contexts
                .iter()
                .find(|decl| decl.id == id)
                .map_or(flowmind_workflow::Lifecycle::Transient, |decl| decl.lifecycle);
            engine.context.register(id, value, lifecycle);
        }
        Ok(engine)
    }
}

#[allow(clippy::too_many_arguments)]
async fn process_token(
    token: &mut Token,
    index: &WorkflowIndex<'_>,
    edges_by_id: &HashMap<String, &Edge>,
    task_queue: &HumanTaskQueue,
    dead_letter: Option<&DeadLetterQueue>,
    actor_config: &ActorConfig,
    retry_config: &RetryConfig,
    wait_for_human_tasks: bool,
) {
    let node_id = token.current_node_id.clone();

    if let Some(decision) = index.decisions_by_id.get(node_id.as_str()).copied() {
        process_decision(token, decision, edges_by_id);
        return;
    }

    let Some(activity) = index.activities_by_id.get(node_id.as_str()).copied() else {
        fail_token(token, FlowmindError::not_found("node", node_id));
        return;
    };

    let role = activity
        .role_id
        .and_then(|role_id| index.roles_by_id.get(role_id.to_string().as_str()).copied());

    let enter_time = Utc::now();
    let token_id = token.id;
    let workflow_id = token.workflow_id;
    let base_context = token.context_data.clone();

    let attempt = with_retry(
        || {
            let mut inputs = serde_json::Map::new();
            for (key, value) in &base_context {
                inputs.insert(key.clone(), value.clone());
            }
            inputs.insert("_token_id".to_string(), serde_json::json!(token_id.to_string()));
            inputs.insert("_workflow_id".to_string(), serde_json::json!(workflow_id.to_string()));
            inputs.insert("_activity_id".to_string(), serde_json::json!(activity.id.to_string()));
            inputs.insert("_activity_name".to_string(), serde_json::json!(activity.name.clone()));

            let request = ActorRequest {
                activity,
                role,
                token_id,
                workflow_id,
                inputs: Value::Object(inputs),
            };
            async move { flowmind_actor::dispatch(request, actor_config, task_queue).await }
        },
        retry_config,
    )
    .await;

    match attempt {
        Ok(outputs) => {
            let requires_human = outputs
                .get("_requires_human_action")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            if requires_human && wait_for_human_tasks {
                let mut patch = value_object_to_map(outputs);
                patch.insert("_waiting_since".to_string(), Value::String(Utc::now().to_rfc3339()));
                token.merge_data(patch);
                token.update_status(
                    TokenStatus::Waiting,
                    Some(Analytics {
                        waste_categories: vec![WasteCategory::Waiting],
                        ..Default::default()
                    }),
                );
                return;
            }

            let is_flow_skip = outputs.get("_flow").and_then(Value::as_str) == Some("skip");
            token.merge_data(value_object_to_map(outputs));
            let exit_time = Utc::now();
            let elapsed = (exit_time - enter_time).to_std().unwrap_or_default();
            let formatted = flowmind_core::format_iso8601_seconds(elapsed);
            let analytics = Analytics {
                process_time: Some(formatted.clone()),
                lead_time: Some(formatted.clone()),
                cycle_time: Some(formatted),
                value_added: Some(activity.value_added()),
                ..Default::default()
            };

            if is_flow_skip {
                token.skip_here(Some(analytics));
                advance(token, &node_id, index, None);
            } else {
                advance(token, &node_id, index, Some(analytics));
            }
        }
        Err((error, state)) => {
            warn!(%token_id, %node_id, error = %error, "activity failed after retry exhaustion");
            token.merge_data(HashMap::from([("_error".to_string(), Value::String(error.to_string()))]));
            token.update_status(
                TokenStatus::Failed,
                Some(Analytics {
                    waste_categories: vec![WasteCategory::Defects],
                    error_rate: Some(1.0),
                    ..Default::default()
                }),
            );
            if let Some(dlq) = dead_letter {
                dlq.enqueue(DeadLetterEntry {
                    token: token.clone(),
                    workflow_id,
                    activity_id: Some(activity.id),
                    error: DeadLetterError {
                        message: error.message().to_string(),
                        kind: error.kind().to_string(),
                        stack: None,
                    },
                    retry_state: state,
                    created_at: Utc::now(),
                    metadata: HashMap::new(),
                });
            }
        }
    }
}

fn process_decision(token: &mut Token, decision: &DecisionNode, edges_by_id: &HashMap<String, &Edge>) {
    match evaluate_node(decision, &token.context_data) {
        Ok(result) => {
            let outputs = serde_json::to_value(&result.outputs).unwrap_or(Value::Null);
            token.merge_data(HashMap::from([
                ("_decision_node_id".to_string(), Value::String(decision.id.clone())),
                ("_decision_matched".to_string(), Value::Bool(result.matched)),
                ("_decision_outputs".to_string(), outputs),
            ]));
            match result.output_edge_id.as_deref().and_then(|id| edges_by_id.get(id).copied()) {
                Some(edge) => token.move_to(edge.target_id.clone(), None),
                None => fail_token(token, FlowmindError::no_matching_rule(decision.id.clone())),
            }
        }
        Err(error) => fail_token(token, error),
    }
}

/// §4.8 "Edge selection (advance)": declaration-order guard evaluation,
/// default-edge fallback, first-edge fallback, completed if none.
fn advance(token: &mut Token, node_id: &str, index: &WorkflowIndex<'_>, analytics: Option<Analytics>) {
    let outgoing = index.outgoing(node_id);
    if outgoing.is_empty() {
        token.complete_here(analytics);
        return;
    }

    let guarded = outgoing.iter().find(|edge| {
        edge.condition
            .as_deref()
            .is_some_and(|condition| guard::evaluate(condition, &token.context_data))
    });
    let chosen = guarded
        .or_else(|| outgoing.iter().find(|edge| edge.is_default))
        .unwrap_or(&outgoing[0]);

    token.move_to(chosen.target_id.clone(), analytics);
}

fn fail_token(token: &mut Token, error: FlowmindError) {
    token.merge_data(HashMap::from([("_error".to_string(), Value::String(error.to_string()))]));
    token.update_status(
        TokenStatus::Failed,
        Some(Analytics {
            waste_categories: vec![WasteCategory::Defects],
            error_rate: Some(1.0),
            ..Default::default()
        }),
    );
}

fn value_object_to_map(value: Value) -> HashMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    }
}
