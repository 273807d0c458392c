use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::orchestration::{
    agent::{Agent, AgentId, AgentOutput, ModelSession},
    memory::CollectiveMemory,
    prompts,
};

#[derive(Debug, Clone)]
pub struct Decomposition {
    pub styles: Vec<String>,
    pub response: AgentOutput,
    pub fell_back: bool,
}

/// Splits a task into per-agent thinking styles and merges the team's work
/// into one final answer.
#[derive(Clone)]
pub struct Orchestrator {
    agent: Agent,
}

impl Orchestrator {
    pub fn new(session: ModelSession) -> Self {
        Self {
            agent: Agent::new(AgentId::Orchestrator, session),
        }
    }

    pub async fn decompose(&self, query: &str, num_agents: usize) -> Decomposition {
        let prompt = prompts::build_decomposition_prompt(query, num_agents);
        let response = self.agent.generate(&prompt).await;

        match response.as_text().and_then(|text| parse_styles(text, num_agents)) {
            Some(styles) => Decomposition {
                styles,
                response,
                fell_back: false,
            },
            None => {
                tracing::info!(
                    target: "orchestration",
                    num_agents = num_agents,
                    "decomposition_fallback_styles"
                );
                Decomposition {
                    styles: fallback_styles(num_agents),
                    response,
                    fell_back: true,
                }
            }
        }
    }

    pub async fn synthesize(
        &self,
        query: &str,
        final_outputs: &[String],
        memory: &CollectiveMemory,
    ) -> AgentOutput {
        let prompt =
            prompts::build_synthesis_prompt(query, final_outputs, &memory.to_prompt_json());
        self.agent.generate(&prompt).await
    }
}

/// Accepts the first-`[`-to-last-`]` span only when it is a JSON list of
/// exactly `expected` non-blank entries.
pub fn parse_styles(response: &str, expected: usize) -> Option<Vec<String>> {
    let span = list_span_pattern()?.find(response)?;
    let Value::Array(items) = serde_json::from_str::<Value>(span.as_str()).ok()? else {
        return None;
    };
    if items.len() != expected {
        return None;
    }

    let styles = items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => text.trim().to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>();
    if styles.iter().any(|style| style.is_empty()) {
        return None;
    }
    Some(styles)
}

pub fn fallback_styles(num_agents: usize) -> Vec<String> {
    (1..=num_agents)
        .map(|index| format!("Analytical Style {}", index))
        .collect()
}

fn list_span_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)\[.*\]").ok())
        .as_ref()
}
