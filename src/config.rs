use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    gateway::types::{CredentialRef, EndpointConfig, ModelSpec},
    orchestration::FrameworkConfig,
    runner::{BatchSettings, RunMode},
};

const SCHEMA_FILE_NAME: &str = "cogload.schema.json";
const BUILTIN_SCHEMA: &str = include_str!("../cogload.schema.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    pub credentials: Vec<CredentialRef>,
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub loads: LoadsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_num_agents() -> usize {
    3
}

fn default_num_iterations() -> usize {
    1
}

fn default_max_workers() -> usize {
    4
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_stderr_level() -> StderrLevel {
    StderrLevel::Info
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,
    #[serde(default = "default_num_iterations")]
    pub num_iterations: usize,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_backoff_ms")]
    pub rotation_backoff_ms: u64,
    #[serde(default = "default_backoff_ms")]
    pub agent_failure_cooldown_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            files: Vec::new(),
            mode: RunMode::default(),
            num_agents: default_num_agents(),
            num_iterations: default_num_iterations(),
            max_workers: default_max_workers(),
            rotation_backoff_ms: default_backoff_ms(),
            agent_failure_cooldown_ms: default_backoff_ms(),
        }
    }
}

impl RunConfig {
    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            mode: self.mode,
            framework: FrameworkConfig {
                num_agents: self.num_agents,
                num_iterations: self.num_iterations,
            },
            rotation_backoff: Duration::from_millis(self.rotation_backoff_ms),
            agent_failure_cooldown: Duration::from_millis(self.agent_failure_cooldown_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadsConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StderrLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_stderr_level")]
    pub stderr_level: StderrLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_level: default_stderr_level(),
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = load_schema(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        config.run.input_dir = resolve_relative(config_base, &config.run.input_dir);
        config.run.output_dir = resolve_relative(config_base, &config.run.output_dir);
        config.logging.dir = resolve_relative(config_base, &config.logging.dir);

        Ok(config)
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    base.join(path)
}

/// `$schema` in the config wins, then a schema file next to the config,
/// then the copy compiled into the binary.
fn load_schema(config_base: &Path, config_value: &Value) -> Result<Value> {
    let schema_path = match config_value.get("$schema").and_then(|value| value.as_str()) {
        Some(path_text) => Some(resolve_relative(config_base, Path::new(path_text))),
        None => Some(config_base.join(SCHEMA_FILE_NAME)).filter(|path| path.exists()),
    };

    let (schema_content, origin) = match schema_path {
        Some(path) => (
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read schema {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (BUILTIN_SCHEMA.to_string(), "built-in schema".to_string()),
    };

    serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", origin))
}

fn validate_against_schema(config_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
