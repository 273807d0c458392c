use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("round {round} cannot be recorded; next round is {expected}")]
    OutOfOrder { round: usize, expected: usize },
}

/// Append-only, round-indexed record of agent outputs for one question.
#[derive(Debug, Clone, Default)]
pub struct CollectiveMemory {
    rounds: BTreeMap<usize, Vec<String>>,
}

#[derive(Serialize)]
struct RoundView<'a> {
    round: usize,
    outputs: &'a [String],
}

impl CollectiveMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        outputs: Vec<String>,
        round: usize,
    ) -> Result<&BTreeMap<usize, Vec<String>>, MemoryError> {
        let expected = self.rounds.len();
        if round != expected {
            return Err(MemoryError::OutOfOrder { round, expected });
        }
        self.rounds.insert(round, outputs);
        Ok(&self.rounds)
    }

    pub fn state(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.rounds
    }

    pub fn round(&self, round: usize) -> Option<&[String]> {
        self.rounds.get(&round).map(Vec::as_slice)
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn latest(&self) -> Option<&[String]> {
        self.rounds.values().next_back().map(Vec::as_slice)
    }

    /// Full history as pretty JSON, oldest round first.
    pub fn to_prompt_json(&self) -> String {
        let view = self
            .rounds
            .iter()
            .map(|(round, outputs)| RoundView {
                round: *round,
                outputs,
            })
            .collect::<Vec<_>>();
        serde_json::to_string_pretty(&view).unwrap_or_else(|_| "[]".to_string())
    }
}
