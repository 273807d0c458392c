use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow, bail};
use tokio::signal::unix::{SignalKind, signal};

use crate::{
    config::{Config, LoggingConfig},
    gateway::{
        ModelClient,
        adapters::openai_compatible::OpenAiCompatibleBackend,
        credentials::{CredentialPool, EnvCredentialProvider, resolve_all},
    },
    loads::{self, GenerationManifest, GenerationRequest, LoadFamily, LoadLevel},
    logging::init_tracing,
    runner::{BatchRunner, RunMode, RunReport, plan::plan_tasks, run_tasks},
};

enum ExitReason {
    Completed(RunReport),
    Signal(&'static str),
}

pub async fn run(config: Config, mode_override: Option<RunMode>) -> Result<()> {
    let _logging_guard = init_tracing(&config.logging)?;

    let mut run_config = config.run.clone();
    if let Some(mode) = mode_override {
        run_config.mode = mode;
    }

    let tokens = resolve_all(&EnvCredentialProvider, &config.credentials)
        .map_err(|err| anyhow!("failed to resolve credentials: {err}"))?;
    if tokens.is_empty() {
        bail!("credential pool is empty");
    }
    let pool = Arc::new(CredentialPool::new(tokens));

    let backend = OpenAiCompatibleBackend::new(config.endpoint.clone())
        .map_err(|err| anyhow!("failed to build model backend: {err}"))?;
    let client = ModelClient::new(Arc::new(backend));

    let tasks = plan_tasks(
        &run_config.input_dir,
        &run_config.output_dir,
        &run_config.files,
        &config.models,
        run_config.mode,
    );
    tracing::info!(
        target: "runner",
        tasks = tasks.len(),
        credentials = pool.len(),
        mode = %run_config.mode,
        max_workers = run_config.max_workers,
        "run_planned"
    );
    if tasks.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(&run_config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            run_config.output_dir.display()
        )
    })?;

    let runner = BatchRunner::new(client, pool, run_config.batch_settings());

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let exit_reason = tokio::select! {
        _ = sigint.recv() => ExitReason::Signal("SIGINT"),
        _ = sigterm.recv() => ExitReason::Signal("SIGTERM"),
        report = run_tasks(runner, tasks, run_config.max_workers) => ExitReason::Completed(report),
    };

    match exit_reason {
        ExitReason::Completed(report) if !report.failed.is_empty() => {
            bail!("{} file(s) could not be processed", report.failed.len())
        }
        ExitReason::Completed(_) => Ok(()),
        ExitReason::Signal(signal_name) => {
            tracing::warn!(target: "runner", signal = signal_name, "run_interrupted");
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: PathBuf,
    pub family: LoadFamily,
    pub levels: Vec<u8>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn generate(args: GenerateArgs) -> Result<GenerationManifest> {
    let config = args
        .config
        .as_deref()
        .map(Config::load)
        .transpose()?;
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    let _logging_guard = init_tracing(&logging)?;

    let levels = args
        .levels
        .iter()
        .map(|level| LoadLevel::new(*level))
        .collect::<Result<Vec<_>, _>>()?;
    let seed = args
        .seed
        .or_else(|| config.as_ref().and_then(|config| config.loads.seed))
        .unwrap_or_else(loads::seed_from_clock);

    let manifest = loads::generate_datasets(&GenerationRequest {
        input: args.input.clone(),
        family: args.family,
        levels,
        seed,
        output_dir: args.output_dir,
    })
    .with_context(|| format!("failed to generate datasets from {}", args.input.display()))?;

    tracing::info!(
        target: "loads",
        family = %manifest.family,
        seed = manifest.seed,
        files = manifest.files.len(),
        "load_generation_completed"
    );
    Ok(manifest)
}
