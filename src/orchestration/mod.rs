pub mod agent;
pub mod framework;
pub mod memory;
pub mod orchestrator;
pub mod prompts;

pub use agent::{Agent, AgentId, AgentOutput, ModelSession};
pub use framework::{FrameworkConfig, FrameworkOutcome, OrchestrationError, OrchestrationFramework};
pub use memory::{CollectiveMemory, MemoryError};
pub use orchestrator::{Decomposition, Orchestrator};
