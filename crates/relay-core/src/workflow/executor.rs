//! Workflow Executor — runs the five phases in order.
//!
//! For every phase the executor:
//! 1. Looks up the agent profile for the phase
//! 2. Builds the system prompt from the agent role and the phase task
//! 3. Builds the user prompt from earlier phase outputs
//! 4. Calls the model once (uniform model / temperature / max tokens)
//! 5. Stores the reply and echoes it to the console
//!
//! Phases run strictly one after another. The first failure ends the run and
//! is returned as a [`WorkflowFailure`] holding whatever completed before it.

use std::io::Write;

use chrono::Local;

use crate::config::Settings;
use crate::error::{StepError, WorkflowFailure};
use crate::workflow::agent_caller::{ChatMessage, CompletionClient, CompletionRequest};
use crate::workflow::report::{rule, HEAVY_RULE};
use crate::workflow::schema::{PhaseDescriptor, PhaseId, PHASES};
use crate::workflow::specialist::Roster;
use crate::workflow::store::PhaseResults;

pub const WORKFLOW_TITLE: &str = "AUTOGEN INTERVIEW PLATFORM WORKFLOW - SIMPLIFIED DEMO";

/// The prompt-chain executor.
pub struct WorkflowExecutor<'a> {
    settings: &'a Settings,
    roster: &'a Roster,
    client: &'a dyn CompletionClient,
    /// Verbose output mode
    verbose: bool,
}

impl<'a> WorkflowExecutor<'a> {
    pub fn new(settings: &'a Settings, roster: &'a Roster, client: &'a dyn CompletionClient) -> Self {
        Self {
            settings,
            roster,
            client,
            verbose: false,
        }
    }

    /// Set verbose mode for prompt sizes and token usage.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Execute all phases, writing progress to `console`.
    pub async fn execute<W: Write>(&self, console: &mut W) -> Result<PhaseResults, WorkflowFailure> {
        let mut results = PhaseResults::new();

        if let Err(e) = self.write_header(console) {
            return Err(WorkflowFailure {
                phase: PHASES[0].id,
                completed: results,
                source: StepError::Console(e),
            });
        }

        for phase in &PHASES {
            tracing::info!("[Executor] Phase {}: {}", phase.id.number(), phase.id.key());

            if let Err(source) = self.execute_phase(phase, &mut results, console).await {
                tracing::warn!(
                    "[Executor] Aborted at phase {} ({}) after {} completed phase(s): {}",
                    phase.id.number(),
                    phase.id.key(),
                    results.len(),
                    source
                );
                return Err(WorkflowFailure {
                    phase: phase.id,
                    completed: results,
                    source,
                });
            }
        }

        Ok(results)
    }

    fn write_header<W: Write>(&self, console: &mut W) -> std::io::Result<()> {
        writeln!(console, "\n{}", rule(HEAVY_RULE))?;
        writeln!(console, "{WORKFLOW_TITLE}")?;
        writeln!(console, "{}", rule(HEAVY_RULE))?;
        writeln!(console, "Start Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(console, "Model: {}\n", self.settings.model)?;
        Ok(())
    }

    /// Execute a single phase and store its output.
    async fn execute_phase<W: Write>(
        &self,
        phase: &PhaseDescriptor,
        results: &mut PhaseResults,
        console: &mut W,
    ) -> Result<(), StepError> {
        let id = phase.id;
        let agent = self.roster.get(id);

        writeln!(console, "\n{}", rule(HEAVY_RULE))?;
        writeln!(console, "PHASE {}: {}", id.number(), id.title())?;
        writeln!(console, "{}", rule(HEAVY_RULE))?;
        writeln!(console, "[{} ({}) is {}...]", agent.name, agent.role, id.activity())?;
        console.flush()?;

        let request = self.build_request(phase, results, &agent.role)?;

        if self.verbose {
            writeln!(
                console,
                "   📥 Prompt length: {} chars",
                request.messages.iter().map(|m| m.content.chars().count()).sum::<usize>()
            )?;
        }

        let reply = self.client.complete(&request).await?;

        if self.verbose {
            if let Some(ref usage) = reply.usage {
                if let (Some(inp), Some(out)) = (usage.prompt_tokens, usage.completion_tokens) {
                    writeln!(console, "   📊 Tokens: {} in / {} out", inp, out)?;
                }
            }
        }

        tracing::debug!("[Executor] Phase {} answered by model {}", id, reply.model);

        // Echo before storing: a failed write leaves this phase unrecorded.
        writeln!(console, "\n[{} Output]", agent.name)?;
        writeln!(console, "{}", reply.content)?;
        console.flush()?;

        // Each key is populated once; PHASES holds every id exactly once.
        if results.insert(id, reply.content).is_err() {
            tracing::warn!("[Executor] Phase '{}' already has output, keeping the first", id);
        }
        Ok(())
    }

    /// Build the two-message completion request for `phase`.
    pub fn build_request(
        &self,
        phase: &PhaseDescriptor,
        results: &PhaseResults,
        role: &str,
    ) -> Result<CompletionRequest, StepError> {
        let user_prompt = (phase.user_prompt)(results).ok_or_else(|| {
            let missing = PhaseId::ALL
                .into_iter()
                .take(phase.id.index())
                .find(|p| !results.contains(*p))
                .unwrap_or(phase.id);
            StepError::MissingInput(missing)
        })?;

        tracing::debug!(
            "[Executor] {} prompt: {} chars system / {} chars user",
            phase.id,
            phase.system_prompt(role).len(),
            user_prompt.len()
        );

        Ok(CompletionRequest {
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            messages: vec![
                ChatMessage::system(phase.system_prompt(role)),
                ChatMessage::user(user_prompt),
            ],
        })
    }
}
