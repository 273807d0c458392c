use cogload::loads::{
    LoadFamily, LoadLevel, ambiguity, apply, contradiction, irrelevance, redundancy,
};

const QUESTION: &str = "已知集合 A={1,2}，则 A 的子集个数为\nA. 1\nB. 2\nC. 3\nD. 4";

fn level(value: u8) -> LoadLevel {
    LoadLevel::new(value).expect("valid level")
}

#[test]
fn given_any_family_when_level_applied_then_original_text_survives() {
    for family in [
        LoadFamily::Contradiction,
        LoadFamily::Ambiguity,
        LoadFamily::Redundancy,
    ] {
        for value in 1..=4 {
            let loaded = apply(family, QUESTION, level(value), 11);
            assert!(
                loaded.contains("A. 1"),
                "{family} level {value} lost the options"
            );
            assert_ne!(loaded, QUESTION);
        }
    }
}

#[test]
fn given_contradiction_levels_when_applied_then_each_frames_the_question() {
    assert!(contradiction::add_load(QUESTION, level(1), 0).starts_with("任务要求：请以最简洁的方式"));
    assert!(contradiction::add_load(QUESTION, level(2), 0).contains("理论物理能力认证"));
    assert!(contradiction::add_load(QUESTION, level(3), 0).contains("错误的一个"));
    let l4 = contradiction::add_load(QUESTION, level(4), 0);
    assert!(contradiction::FALLACIES.iter().any(|fallacy| l4.contains(fallacy)));
}

#[test]
fn given_question_with_options_when_ambiguity_applied_then_body_and_options_are_split() {
    let l1 = ambiguity::add_load(QUESTION, level(1));
    assert!(l1.contains("--- 项目A ---\n已知集合 A={1,2}，则 A 的子集个数为\n\n--- 项目B ---\nA. 1\nB. 2"));
    let l4 = ambiguity::add_load(QUESTION, level(4));
    assert!(l4.contains("[备选答案]: A. 1"));
}

#[test]
fn given_irrelevance_level_two_when_applied_then_seed_controls_noise() {
    let a = irrelevance::add_load(QUESTION, level(2), 1);
    let b = irrelevance::add_load(QUESTION, level(2), 1);
    let c = irrelevance::add_load(QUESTION, level(2), 2);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.contains("data:image/gif;base64,"));
}

#[test]
fn given_redundancy_level_one_when_applied_then_stem_and_options_double() {
    let loaded = redundancy::add_load("Stem\nA. x", level(1));
    assert_eq!(loaded, "Stem\nStem\nA. xA. x");
}
