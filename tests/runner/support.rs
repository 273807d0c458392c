use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde_json::{Value, json};

use cogload::{
    gateway::{CredentialPool, ModelClient, testing::ScriptedBackend, types::ModelSpec},
    orchestration::FrameworkConfig,
    runner::{BatchRunner, BatchSettings, FileTask, RunMode, ledger::EvaluationResult},
};

pub fn model(enable_thinking: bool) -> ModelSpec {
    ModelSpec {
        name: "test-model".to_string(),
        model_id: "org/test-model".to_string(),
        enable_thinking,
    }
}

pub fn settings(mode: RunMode) -> BatchSettings {
    BatchSettings {
        mode,
        framework: FrameworkConfig::default(),
        rotation_backoff: Duration::ZERO,
        agent_failure_cooldown: Duration::ZERO,
    }
}

pub fn runner(backend: &ScriptedBackend, keys: usize, mode: RunMode) -> BatchRunner {
    let pool = CredentialPool::new((0..keys).map(|index| format!("key-{index}")).collect());
    BatchRunner::new(
        ModelClient::new(Arc::new(backend.clone())),
        Arc::new(pool),
        settings(mode),
    )
}

pub fn question(year: i64, number: i64, text: &str, answer: &str) -> Value {
    json!({"year": year, "number": number, "question": text, "answer": answer})
}

pub fn write_questions(dir: &Path, name: &str, questions: &[Value]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(
        &path,
        serde_json::to_string_pretty(questions).expect("questions serialize"),
    )
    .expect("question file should be written");
    path
}

pub fn task(input: PathBuf, output: PathBuf, enable_thinking: bool) -> FileTask {
    FileTask {
        input,
        output,
        model: model(enable_thinking),
    }
}

pub fn read_ledger(path: &Path) -> Vec<EvaluationResult> {
    let raw = std::fs::read_to_string(path).expect("ledger should exist");
    serde_json::from_str(&raw).expect("ledger should parse")
}
