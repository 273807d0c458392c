use std::{collections::VecDeque, sync::Arc};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::runner::{
    batch::{BatchError, BatchRunner, FileSummary},
    plan::FileTask,
};

#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Vec<FileSummary>,
    pub failed: Vec<(FileTask, String)>,
}

impl RunReport {
    pub fn correct(&self) -> usize {
        self.completed.iter().map(|summary| summary.correct).sum()
    }

    pub fn processed(&self) -> usize {
        self.completed.iter().map(|summary| summary.processed).sum()
    }
}

type TaskQueue = Arc<Mutex<VecDeque<FileTask>>>;

/// Fixed number of workers draining one shared task queue. A file-level
/// error is reported and the worker moves on to the next file.
pub async fn run_tasks(runner: BatchRunner, tasks: Vec<FileTask>, max_workers: usize) -> RunReport {
    let worker_count = max_workers.max(1).min(tasks.len().max(1));
    let queue: TaskQueue = Arc::new(Mutex::new(tasks.into_iter().collect()));

    let handles = (0..worker_count)
        .map(|worker| {
            let runner = runner.clone();
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { drain(worker, runner, queue).await })
        })
        .collect::<Vec<JoinHandle<_>>>();

    let mut report = RunReport::default();
    for handle in handles {
        match handle.await {
            Ok(partial) => {
                report.completed.extend(partial.completed);
                report.failed.extend(partial.failed);
            }
            Err(err) => {
                tracing::error!(target: "runner", error = %err, "worker_join_failed");
            }
        }
    }

    tracing::info!(
        target: "runner",
        files_completed = report.completed.len(),
        files_failed = report.failed.len(),
        processed = report.processed(),
        correct = report.correct(),
        credential_cursor = runner.pool().cursor(),
        "run_completed"
    );
    report
}

async fn drain(worker: usize, runner: BatchRunner, queue: TaskQueue) -> RunReport {
    let mut report = RunReport::default();
    loop {
        let Some(task) = queue.lock().await.pop_front() else {
            break;
        };
        tracing::debug!(
            target: "runner",
            worker = worker,
            input = %task.input.display(),
            "worker_picked_task"
        );

        match runner.run_file(&task).await {
            Ok(summary) => report.completed.push(summary),
            Err(err) => {
                log_file_error(worker, &task, &err);
                report.failed.push((task, err.to_string()));
            }
        }
    }
    report
}

fn log_file_error(worker: usize, task: &FileTask, err: &BatchError) {
    tracing::error!(
        target: "runner",
        worker = worker,
        input = %task.input.display(),
        output = %task.output.display(),
        error = %err,
        "file_failed"
    );
}
