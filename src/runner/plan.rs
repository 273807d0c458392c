use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::gateway::types::ModelSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Cof,
    Baseline,
}

impl RunMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cof => "COF",
            Self::Baseline => "Baseline",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (input file, output ledger, model) unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub input: PathBuf,
    pub output: PathBuf,
    pub model: ModelSpec,
}

const QUESTION_SET_SUFFIX: &str = "-choicequestions";

pub fn output_file_name(input_file: &str, model: &ModelSpec, mode: RunMode) -> String {
    let stem = Path::new(input_file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_file.to_string());
    let prefix = stem.replace(QUESTION_SET_SUFFIX, "");
    format!(
        "{}-{}-{}-{}-choiceanswer.json",
        prefix,
        model.name,
        mode.label(),
        model.enable_thinking
    )
}

/// Models outermost, files in configured order. Missing inputs are logged
/// and left out.
pub fn plan_tasks(
    input_dir: &Path,
    output_dir: &Path,
    files: &[String],
    models: &[ModelSpec],
    mode: RunMode,
) -> Vec<FileTask> {
    let mut tasks = Vec::new();
    for model in models {
        for file in files {
            let input = input_dir.join(file);
            if !input.is_file() {
                tracing::warn!(
                    target: "runner",
                    input = %input.display(),
                    "input_file_missing_skipped"
                );
                continue;
            }
            tasks.push(FileTask {
                input,
                output: output_dir.join(output_file_name(file, model, mode)),
                model: model.clone(),
            });
        }
    }
    tasks
}
