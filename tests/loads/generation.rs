use serde_json::{Value, json};

use cogload::loads::{
    GenerationManifest, GenerationRequest, LoadFamily, LoadLevel, generate_datasets,
    manifest_file_name,
};

fn write_source(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("choicequestions.json");
    let records = json!([
        {"year": 2023, "number": 5, "question": "Stem\nA. 1\nB. 2", "answer": "C", "topic": "sets"},
        {"year": 2023, "number": 6, "answer": "A"}
    ]);
    std::fs::write(&path, records.to_string()).expect("source written");
    path
}

#[test]
fn given_source_set_when_generated_then_one_file_per_level_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_source(dir.path());
    let out = dir.path().join("generated");

    let manifest = generate_datasets(&GenerationRequest {
        input,
        family: LoadFamily::Redundancy,
        levels: vec![LoadLevel::new(1).expect("level"), LoadLevel::new(3).expect("level")],
        seed: 42,
        output_dir: Some(out.clone()),
    })
    .expect("generation should succeed");

    assert_eq!(
        manifest.files,
        vec![
            "redundant-load-level-1-choicequestions.json".to_string(),
            "redundant-load-level-3-choicequestions.json".to_string(),
        ]
    );

    let level_one: Vec<Value> = serde_json::from_str(
        &std::fs::read_to_string(out.join(&manifest.files[0])).expect("level 1 written"),
    )
    .expect("level 1 parses");
    assert_eq!(level_one.len(), 2);
    assert_eq!(level_one[0]["question"], "Stem\nStem\nA. 1\nB. 2A. 1\nB. 2");
    assert_eq!(level_one[0]["answer"], "C");
    assert_eq!(level_one[0]["topic"], "sets");
    assert_eq!(level_one[1], json!({"year": 2023, "number": 6, "answer": "A"}));

    let recorded: GenerationManifest = serde_json::from_str(
        &std::fs::read_to_string(out.join(manifest_file_name(
            LoadFamily::Redundancy,
            "choicequestions.json",
        )))
        .expect("manifest written"),
    )
    .expect("manifest parses");
    assert_eq!(recorded, manifest);
    assert_eq!(recorded.seed, 42);
}

#[test]
fn given_non_ascii_text_when_generated_then_it_is_written_unescaped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("q.json");
    std::fs::write(&input, r#"[{"year": 1, "number": 1, "question": "集合\nA. 1", "answer": "A"}]"#)
        .expect("source written");

    let manifest = generate_datasets(&GenerationRequest {
        input,
        family: LoadFamily::Contradiction,
        levels: vec![LoadLevel::new(2).expect("level")],
        seed: 0,
        output_dir: None,
    })
    .expect("generation should succeed");

    let raw = std::fs::read_to_string(dir.path().join(&manifest.files[0])).expect("written");
    assert!(raw.contains("理论物理能力认证"));
    assert!(raw.contains("    {"));
}

#[test]
fn given_source_that_is_not_an_array_when_generated_then_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("q.json");
    std::fs::write(&input, r#"{"year": 1}"#).expect("source written");

    let result = generate_datasets(&GenerationRequest {
        input,
        family: LoadFamily::Ambiguity,
        levels: vec![LoadLevel::new(1).expect("level")],
        seed: 0,
        output_dir: None,
    });
    assert!(result.is_err());
}
