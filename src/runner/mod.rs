pub mod batch;
pub mod dataset;
pub mod extraction;
pub mod ledger;
pub mod plan;
pub mod workers;

pub use batch::{BatchError, BatchRunner, BatchSettings, FileSummary};
pub use dataset::{Question, QuestionSet};
pub use ledger::{EvaluationResult, ResultsLedger};
pub use plan::{FileTask, RunMode};
pub use workers::{RunReport, run_tasks};
