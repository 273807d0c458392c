pub mod ambiguity;
pub mod contradiction;
pub mod irrelevance;
pub mod redundancy;

use std::{
    fmt, fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const DEFAULT_LEVELS: [u8; 4] = [1, 2, 3, 4];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("load level {0} is out of range 0..=4")]
    InvalidLevel(u8),
    #[error("failed to read source dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("source dataset {path} is not a JSON array: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LoadFamily {
    Contradiction,
    Ambiguity,
    Irrelevance,
    Redundancy,
}

impl LoadFamily {
    /// Prefix used in generated dataset names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Contradiction => "contradictory",
            Self::Ambiguity => "ambiguity",
            Self::Irrelevance => "irrelevant",
            Self::Redundancy => "redundant",
        }
    }
}

impl fmt::Display for LoadFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_tag())
    }
}

/// Load intensity. Level 0 leaves the text untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LoadLevel(u8);

impl LoadLevel {
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Result<Self, LoadError> {
        if level > Self::MAX {
            return Err(LoadError::InvalidLevel(level));
        }
        Ok(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for LoadLevel {
    type Error = LoadError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<LoadLevel> for u8 {
    fn from(level: LoadLevel) -> Self {
        level.0
    }
}

pub fn apply(family: LoadFamily, question_text: &str, level: LoadLevel, seed: u64) -> String {
    match family {
        LoadFamily::Contradiction => contradiction::add_load(question_text, level, seed),
        LoadFamily::Ambiguity => ambiguity::add_load(question_text, level),
        LoadFamily::Irrelevance => irrelevance::add_load(question_text, level, seed),
        LoadFamily::Redundancy => redundancy::add_load(question_text, level),
    }
}

pub fn seed_from_clock() -> u64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos & i128::from(u64::MAX)) as u64
}

/// Deterministic byte stream for (seed, purpose, text).
pub(crate) fn seeded_bytes(seed: u64, purpose: &str, text: &str, len: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(len);
    let mut block: u64 = 0;
    while bytes.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(purpose.as_bytes());
        hasher.update([0_u8]);
        hasher.update(text.as_bytes());
        hasher.update(block.to_le_bytes());
        bytes.extend_from_slice(&hasher.finalize());
        block += 1;
    }
    bytes.truncate(len);
    bytes
}

pub(crate) fn seeded_index(seed: u64, purpose: &str, text: &str, bound: usize) -> usize {
    let bytes = seeded_bytes(seed, purpose, text, 8);
    let mut word = [0_u8; 8];
    word.copy_from_slice(&bytes);
    (u64::from_le_bytes(word) % bound.max(1) as u64) as usize
}

pub fn dataset_file_name(family: LoadFamily, level: LoadLevel, base_name: &str) -> String {
    format!("{}-load-level-{}-{}", family.file_tag(), level.get(), base_name)
}

pub fn manifest_file_name(family: LoadFamily, base_name: &str) -> String {
    format!("{}-load-manifest-{}", family.file_tag(), base_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationManifest {
    pub family: LoadFamily,
    pub seed: u64,
    pub source: String,
    pub levels: Vec<LoadLevel>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub input: PathBuf,
    pub family: LoadFamily,
    pub levels: Vec<LoadLevel>,
    pub seed: u64,
    pub output_dir: Option<PathBuf>,
}

/// Writes one dataset per level plus a manifest. Every record is copied and
/// only its `question` string is rewritten.
pub fn generate_datasets(request: &GenerationRequest) -> Result<GenerationManifest, LoadError> {
    let raw = fs::read_to_string(&request.input).map_err(|source| LoadError::Read {
        path: request.input.clone(),
        source,
    })?;
    let records: Vec<Value> = serde_json::from_str(&raw).map_err(|err| LoadError::Parse {
        path: request.input.clone(),
        message: err.to_string(),
    })?;

    let base_name = request
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions.json".to_string());
    let output_dir = request
        .output_dir
        .clone()
        .or_else(|| request.input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir).map_err(|source| LoadError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let mut files = Vec::with_capacity(request.levels.len());
    for level in &request.levels {
        let loaded = records
            .iter()
            .map(|record| load_record(record, request.family, *level, request.seed))
            .collect::<Vec<_>>();
        let file_name = dataset_file_name(request.family, *level, &base_name);
        write_pretty_json(&output_dir.join(&file_name), &loaded)?;
        tracing::info!(
            target: "loads",
            family = %request.family,
            level = level.get(),
            records = loaded.len(),
            file = %file_name,
            "load_dataset_written"
        );
        files.push(file_name);
    }

    let manifest = GenerationManifest {
        family: request.family,
        seed: request.seed,
        source: base_name.clone(),
        levels: request.levels.clone(),
        files,
    };
    write_pretty_json(
        &output_dir.join(manifest_file_name(request.family, &base_name)),
        &manifest,
    )?;
    Ok(manifest)
}

fn load_record(record: &Value, family: LoadFamily, level: LoadLevel, seed: u64) -> Value {
    let mut record = record.clone();
    if let Some(Value::String(text)) = record.get_mut("question") {
        *text = apply(family, text, level, seed);
    }
    record
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let write_error = |source: std::io::Error| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| write_error(std::io::Error::other(err)))?;
    writer.flush().map_err(write_error)
}
