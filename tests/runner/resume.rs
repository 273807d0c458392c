use cogload::{
    gateway::testing::ScriptedBackend,
    runner::{
        RunMode,
        ledger::{EvaluationResult, ResultsLedger},
    },
};

use crate::support::{question, read_ledger, runner, task, write_questions};

fn prior_record() -> EvaluationResult {
    EvaluationResult {
        question_id: "2023-1".to_string(),
        original_question: "first question".to_string(),
        model_answer: "D".to_string(),
        model_reasoning: "recorded in an earlier run".to_string(),
        correct_answer: "A".to_string(),
        inner_reasoning: String::new(),
        is_correct: false,
    }
}

#[tokio::test]
async fn given_existing_ledger_when_rerun_then_present_ids_are_not_redispatched_or_altered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_questions(
        dir.path(),
        "q.json",
        &[
            question(2023, 1, "first question", "A"),
            question(2023, 2, "second question", "B"),
        ],
    );
    let output = dir.path().join("out.json");
    ResultsLedger::load(&output)
        .expect("empty ledger")
        .append(prior_record())
        .expect("seed ledger");

    let backend = ScriptedBackend::constant(r#"{"answer": "B", "reasoning": "fresh"}"#);
    let runner = runner(&backend, 1, RunMode::Baseline);

    let summary = runner
        .run_file(&task(input.clone(), output.clone(), false))
        .await
        .expect("file should complete");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.correct, 1);
    assert!(
        backend
            .calls()
            .iter()
            .all(|call| !call.prompt.contains("first question"))
    );

    let ledger = read_ledger(&output);
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0], prior_record());
    assert_eq!(ledger[1].question_id, "2023-2");

    let rerun = runner
        .run_file(&task(input, output.clone(), false))
        .await
        .expect("second rerun should complete");
    assert_eq!(rerun.processed, 0);
    assert_eq!(rerun.skipped, 2);
    assert_eq!(backend.call_count(), 1);
    assert_eq!(read_ledger(&output), ledger);
}

#[tokio::test]
async fn given_ledger_written_with_legacy_key_when_loaded_then_ids_are_recognised() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.json");
    std::fs::write(
        &output,
        r#"[{"question_id": "2023-7", "model_answer": "A", "is_correct": true}]"#,
    )
    .expect("seed ledger");

    let ledger = ResultsLedger::load(&output).expect("ledger loads");
    assert!(ledger.contains("2023-7"));
}

#[tokio::test]
async fn given_records_without_key_when_file_runs_then_they_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_questions(
        dir.path(),
        "q.json",
        &[
            serde_json::json!({"question": "orphan", "answer": "A"}),
            question(2024, 3, "kept", "A"),
        ],
    );
    let output = dir.path().join("out.json");
    let backend = ScriptedBackend::constant(r#"{"answer": "A", "reasoning": "r"}"#);
    let runner = runner(&backend, 1, RunMode::Baseline);

    let summary = runner
        .run_file(&task(input, output.clone(), false))
        .await
        .expect("file should complete");

    assert_eq!(summary.invalid_records, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(read_ledger(&output)[0].question_id, "2024-3");
}
