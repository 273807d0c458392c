pub mod app;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod loads;
pub mod logging;
pub mod orchestration;
pub mod runner;
