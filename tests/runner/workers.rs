use cogload::{
    gateway::testing::ScriptedBackend,
    runner::{RunMode, plan::plan_tasks, run_tasks},
};

use crate::support::{model, question, read_ledger, runner, write_questions};

#[tokio::test]
async fn given_models_and_files_when_pool_runs_then_every_task_writes_its_ledger() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&input_dir).expect("input dir");
    for name in ["a-choicequestions.json", "b-choicequestions.json"] {
        write_questions(
            &input_dir,
            name,
            &[question(2023, 1, "q1", "A"), question(2023, 2, "q2", "B")],
        );
    }

    let files = vec![
        "a-choicequestions.json".to_string(),
        "missing.json".to_string(),
        "b-choicequestions.json".to_string(),
    ];
    let tasks = plan_tasks(
        &input_dir,
        &output_dir,
        &files,
        &[model(false), model(true)],
        RunMode::Baseline,
    );
    assert_eq!(tasks.len(), 4);

    let backend = ScriptedBackend::constant(r#"{"answer": "A", "reasoning": "r"}"#);
    let report = run_tasks(runner(&backend, 1, RunMode::Baseline), tasks, 3).await;

    assert_eq!(report.completed.len(), 4);
    assert!(report.failed.is_empty());
    assert_eq!(report.processed(), 8);
    assert_eq!(report.correct(), 4);
    for summary in &report.completed {
        assert_eq!(read_ledger(&summary.output).len(), 2);
    }
    assert!(
        output_dir
            .join("a-test-model-Baseline-true-choiceanswer.json")
            .exists()
    );
}

#[tokio::test]
async fn given_corrupt_ledger_when_pool_runs_then_file_is_reported_and_others_continue() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&input_dir).expect("input dir");
    std::fs::create_dir_all(&output_dir).expect("output dir");
    write_questions(&input_dir, "a.json", &[question(2023, 1, "q1", "A")]);
    write_questions(&input_dir, "b.json", &[question(2023, 1, "q1", "A")]);
    let corrupt = output_dir.join("a-test-model-Baseline-false-choiceanswer.json");
    std::fs::write(&corrupt, "not json").expect("corrupt ledger");

    let tasks = plan_tasks(
        &input_dir,
        &output_dir,
        &["a.json".to_string(), "b.json".to_string()],
        &[model(false)],
        RunMode::Baseline,
    );
    let backend = ScriptedBackend::constant(r#"{"answer": "A", "reasoning": "r"}"#);
    let report = run_tasks(runner(&backend, 1, RunMode::Baseline), tasks, 1).await;

    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(std::fs::read_to_string(&corrupt).expect("untouched"), "not json");
}
