use crate::loads::LoadLevel;

/// Level k repeats the stem (first line) and the option block k+1 times.
pub fn add_load(question_text: &str, level: LoadLevel) -> String {
    if level.is_identity() {
        return question_text.to_string();
    }
    let repeats = usize::from(level.get()) + 1;
    repeat_parts(question_text, repeats, repeats)
}

pub fn repeat_parts(question_text: &str, stem_repeats: usize, options_repeats: usize) -> String {
    let (stem, options) = question_text
        .split_once('\n')
        .unwrap_or((question_text, ""));

    let mut repeated = format!("{}\n", stem).repeat(stem_repeats);
    if options_repeats == 0 || options.is_empty() {
        if repeated.ends_with('\n') {
            repeated.pop();
        }
        return repeated;
    }
    repeated.push_str(&options.repeat(options_repeats));
    repeated
}
