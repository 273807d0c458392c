use futures_util::future::join_all;
use thiserror::Error;

use crate::{
    gateway::error::GatewayError,
    orchestration::{
        agent::{Agent, AgentId, AgentOutput, ModelSession},
        memory::{CollectiveMemory, MemoryError},
        orchestrator::Orchestrator,
        prompts,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkConfig {
    pub num_agents: usize,
    pub num_iterations: usize,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            num_agents: 3,
            num_iterations: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// A call was refused because of the credential itself. The caller is
    /// expected to rotate and retry the whole question.
    #[error("credential rejected during orchestration: {0}")]
    CredentialRejected(GatewayError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[derive(Debug, Clone)]
pub struct FrameworkOutcome {
    pub final_answer: AgentOutput,
    pub styles: Vec<String>,
    pub memory: CollectiveMemory,
}

/// Decompose, iterate over a shared memory, then synthesize.
pub struct OrchestrationFramework {
    config: FrameworkConfig,
    orchestrator: Orchestrator,
    agents: Vec<Agent>,
}

impl OrchestrationFramework {
    pub fn new(session: ModelSession, config: FrameworkConfig) -> Self {
        let agents = (0..config.num_agents)
            .map(|index| Agent::new(AgentId::Worker(index), session.clone()))
            .collect();
        Self {
            config,
            orchestrator: Orchestrator::new(session),
            agents,
        }
    }

    pub fn config(&self) -> FrameworkConfig {
        self.config
    }

    pub async fn run(&self, query: &str) -> Result<FrameworkOutcome, OrchestrationError> {
        let decomposition = self
            .orchestrator
            .decompose(query, self.config.num_agents)
            .await;
        escalate_credential_failure(std::slice::from_ref(&decomposition.response))?;
        let styles = decomposition.styles;

        let mut memory = CollectiveMemory::new();

        let initial_prompts = styles
            .iter()
            .map(|style| prompts::build_initial_analysis_prompt(style, query))
            .collect::<Vec<_>>();
        let initial = self.fan_out(&initial_prompts).await;
        escalate_credential_failure(&initial)?;
        let mut latest = render_all(&initial);
        memory.update(latest.clone(), 0)?;
        tracing::debug!(
            target: "orchestration",
            agents = self.agents.len(),
            "initial_round_recorded"
        );

        for round in 1..=self.config.num_iterations {
            let memory_json = memory.to_prompt_json();
            let refinement_prompts = styles
                .iter()
                .enumerate()
                .map(|(index, style)| {
                    let peers = latest
                        .iter()
                        .enumerate()
                        .filter(|(peer, _)| *peer != index)
                        .map(|(_, output)| output.clone())
                        .collect::<Vec<_>>();
                    prompts::build_refinement_prompt(
                        style,
                        query,
                        &memory_json,
                        &peers,
                        &latest[index],
                    )
                })
                .collect::<Vec<_>>();

            let refined = self.fan_out(&refinement_prompts).await;
            escalate_credential_failure(&refined)?;
            latest = render_all(&refined);
            memory.update(latest.clone(), round)?;
            tracing::debug!(
                target: "orchestration",
                round = round,
                "refinement_round_recorded"
            );
        }

        let final_answer = self.orchestrator.synthesize(query, &latest, &memory).await;
        escalate_credential_failure(std::slice::from_ref(&final_answer))?;

        Ok(FrameworkOutcome {
            final_answer,
            styles,
            memory,
        })
    }

    async fn fan_out(&self, prompts: &[String]) -> Vec<AgentOutput> {
        join_all(
            self.agents
                .iter()
                .zip(prompts)
                .map(|(agent, prompt)| agent.generate(prompt)),
        )
        .await
    }
}

fn render_all(outputs: &[AgentOutput]) -> Vec<String> {
    outputs.iter().map(AgentOutput::render).collect()
}

fn escalate_credential_failure(outputs: &[AgentOutput]) -> Result<(), OrchestrationError> {
    match outputs
        .iter()
        .filter_map(AgentOutput::failure)
        .find(|error| error.rotates_credential())
    {
        Some(error) => Err(OrchestrationError::CredentialRejected(error.clone())),
        None => Ok(()),
    }
}
