use std::{path::PathBuf, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

use crate::{
    gateway::{
        ModelClient,
        credentials::CredentialPool,
        error::GatewayError,
        types::{ChatRequest, Credential, ModelSpec},
    },
    orchestration::{
        FrameworkConfig, ModelSession, OrchestrationError, OrchestrationFramework,
        prompts::build_baseline_prompt,
    },
    runner::{
        dataset::{DatasetError, Question, load_question_set},
        extraction::{ERROR_SENTINEL, extract_answer, is_correct},
        ledger::{EvaluationResult, LedgerError, ResultsLedger},
        plan::{FileTask, RunMode},
    },
};

pub const POOL_EXHAUSTED_REASONING: &str = "All API keys failed.";
pub const UNRECOVERABLE_REASONING: &str = "An unrecoverable error occurred";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub mode: RunMode,
    pub framework: FrameworkConfig,
    pub rotation_backoff: Duration,
    pub agent_failure_cooldown: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            mode: RunMode::Cof,
            framework: FrameworkConfig::default(),
            rotation_backoff: Duration::from_secs(1),
            agent_failure_cooldown: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub processed: usize,
    pub skipped: usize,
    pub invalid_records: usize,
    pub failed: usize,
    pub correct: usize,
}

#[derive(Debug, Clone, Default)]
struct ModelAnswer {
    text: String,
    inner_reasoning: String,
}

#[derive(Debug)]
enum DispatchError {
    Gateway(GatewayError),
    Orchestration(OrchestrationError),
}

impl DispatchError {
    fn rotates_credential(&self) -> bool {
        matches!(self, Self::Gateway(error) if error.rotates_credential())
    }
}

impl From<GatewayError> for DispatchError {
    fn from(error: GatewayError) -> Self {
        Self::Gateway(error)
    }
}

impl From<OrchestrationError> for DispatchError {
    fn from(error: OrchestrationError) -> Self {
        match error {
            OrchestrationError::CredentialRejected(error) => Self::Gateway(error),
            other => Self::Orchestration(other),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway(error) => write!(f, "{}", error),
            Self::Orchestration(error) => write!(f, "{}", error),
        }
    }
}

/// Drives one question set at a time against a shared credential pool.
#[derive(Clone)]
pub struct BatchRunner {
    client: ModelClient,
    pool: Arc<CredentialPool>,
    settings: BatchSettings,
}

impl BatchRunner {
    pub fn new(client: ModelClient, pool: Arc<CredentialPool>, settings: BatchSettings) -> Self {
        Self {
            client,
            pool,
            settings,
        }
    }

    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Questions run strictly in order; each result is on disk before the
    /// next question starts.
    pub async fn run_file(&self, task: &FileTask) -> Result<FileSummary, BatchError> {
        let questions = load_question_set(&task.input).await?;
        let mut ledger = ResultsLedger::load(&task.output)?;
        let mut summary = FileSummary {
            input: task.input.clone(),
            output: task.output.clone(),
            invalid_records: questions.skipped_records,
            ..FileSummary::default()
        };

        tracing::info!(
            target: "runner",
            input = %task.input.display(),
            output = %task.output.display(),
            model = %task.model.name,
            mode = %self.settings.mode,
            questions = questions.len(),
            resumed = ledger.len(),
            "file_started"
        );

        for question in &questions.questions {
            if ledger.contains(&question.id) {
                summary.skipped += 1;
                continue;
            }

            let result = self.evaluate(question, &task.model).await;
            summary.processed += 1;
            if result.model_answer == ERROR_SENTINEL {
                summary.failed += 1;
            }
            if result.is_correct {
                summary.correct += 1;
            }
            ledger.append(result)?;
        }

        tracing::info!(
            target: "runner",
            input = %task.input.display(),
            processed = summary.processed,
            skipped = summary.skipped,
            invalid_records = summary.invalid_records,
            failed = summary.failed,
            correct = summary.correct,
            "file_completed"
        );
        Ok(summary)
    }

    /// Always yields a record. Credential-class failures retire the key in
    /// use and retry the same question; anything else is recorded as failed.
    pub async fn evaluate(&self, question: &Question, model: &ModelSpec) -> EvaluationResult {
        loop {
            let Some(credential) = self.pool.current() else {
                tracing::error!(
                    target: "runner",
                    question_id = %question.id,
                    "credential_pool_exhausted"
                );
                return failure_record(question, POOL_EXHAUSTED_REASONING.to_string());
            };

            match self.dispatch(&credential, model, question).await {
                Ok(answer) => return self.build_result(question, answer),
                Err(error) if error.rotates_credential() => {
                    tracing::warn!(
                        target: "runner",
                        question_id = %question.id,
                        key_index = credential.index,
                        error = %error,
                        "credential_rotation"
                    );
                    self.pool.retire(&credential);
                    sleep(self.settings.rotation_backoff).await;
                }
                Err(error) => {
                    tracing::warn!(
                        target: "runner",
                        question_id = %question.id,
                        key_index = credential.index,
                        error = %error,
                        "question_abandoned"
                    );
                    return failure_record(
                        question,
                        format!("{}: {}", UNRECOVERABLE_REASONING, error),
                    );
                }
            }
        }
    }

    async fn dispatch(
        &self,
        credential: &Credential,
        model: &ModelSpec,
        question: &Question,
    ) -> Result<ModelAnswer, DispatchError> {
        match self.settings.mode {
            RunMode::Cof => {
                let session = ModelSession::new(self.client.clone(), credential.clone(), model.clone())
                    .with_failure_cooldown(self.settings.agent_failure_cooldown);
                let framework = OrchestrationFramework::new(session, self.settings.framework);
                let outcome = framework.run(&question.text).await?;
                Ok(ModelAnswer {
                    text: outcome.final_answer.render(),
                    inner_reasoning: String::new(),
                })
            }
            RunMode::Baseline => {
                let request = ChatRequest::new(
                    format!("baseline-{}-{}", question.id, Uuid::now_v7()),
                    model,
                    build_baseline_prompt(&question.text),
                );
                let completion = self.client.complete(credential, request).await?;
                Ok(ModelAnswer {
                    text: completion.answer,
                    inner_reasoning: completion.reasoning,
                })
            }
        }
    }

    fn build_result(&self, question: &Question, answer: ModelAnswer) -> EvaluationResult {
        let extracted = extract_answer(&answer.text);
        let is_correct = is_correct(&extracted.answer, &question.correct_answer);
        tracing::info!(
            target: "runner",
            question_id = %question.id,
            model_answer = %extracted.answer,
            is_correct = is_correct,
            "question_evaluated"
        );
        EvaluationResult {
            question_id: question.id.clone(),
            original_question: question.text.clone(),
            model_answer: extracted.answer,
            model_reasoning: extracted.reasoning,
            correct_answer: question.correct_answer.clone(),
            inner_reasoning: answer.inner_reasoning,
            is_correct,
        }
    }
}

pub fn failure_record(question: &Question, reasoning: String) -> EvaluationResult {
    EvaluationResult {
        question_id: question.id.clone(),
        original_question: question.text.clone(),
        model_answer: ERROR_SENTINEL.to_string(),
        model_reasoning: reasoning,
        correct_answer: question.correct_answer.clone(),
        inner_reasoning: String::new(),
        is_correct: false,
    }
}
