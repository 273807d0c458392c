mod agent;
mod orchestrator;
