use cogload::runner::extraction::{
    PARSE_ERROR_SENTINEL, StructuredOutcome, extract_answer, is_correct, match_answer_letter,
    parse_structured,
};

#[test]
fn given_json_in_prose_when_extracted_then_answer_is_b() {
    let text = r#"After careful thought, my verdict is {"answer": "B", "reasoning": "only B fits"} and that is final."#;
    let extracted = extract_answer(text);
    assert_eq!(extracted.answer, "B");
    assert_eq!(extracted.reasoning, "only B fits");
}

#[test]
fn given_fenced_json_when_extracted_then_answer_is_b() {
    let text = "Here you go:\n```json\n{\n  \"answer\": \"B\",\n  \"reasoning\": \"by symmetry\"\n}\n```\nThanks!";
    let extracted = extract_answer(text);
    assert_eq!(extracted.answer, "B");
    assert_eq!(extracted.reasoning, "by symmetry");
}

#[test]
fn given_no_json_object_when_extracted_then_parse_error_and_incorrect() {
    let text = "The answer must be B, obviously.";
    assert_eq!(parse_structured(text), StructuredOutcome::NoObject);
    let extracted = extract_answer(text);
    assert_eq!(extracted.answer, PARSE_ERROR_SENTINEL);
    assert!(!is_correct(&extracted.answer, "B"));
}

#[test]
fn given_broken_json_with_answer_field_when_extracted_then_regex_tier_recovers() {
    let text = r#"{"ANSWER" : "d", "reasoning": "missing quote}"#;
    assert!(matches!(parse_structured(text), StructuredOutcome::Malformed(_)));
    assert_eq!(match_answer_letter(text), Some("D".to_string()));
    assert_eq!(extract_answer(text).answer, "D");
}

#[test]
fn given_error_marker_text_when_extracted_then_parse_error() {
    let extracted = extract_answer("Error in Agent Orchestrator: backend returned status 500");
    assert_eq!(extracted.answer, PARSE_ERROR_SENTINEL);
}

#[test]
fn given_answers_with_whitespace_and_case_when_scored_then_trimmed_case_insensitive() {
    assert!(is_correct("c", " C "));
    assert!(!is_correct("C", "D"));
}
