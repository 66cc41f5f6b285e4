//! Shared application service layer for the grid simulator.
//!
//! This crate sits between the CLI and the engines: it loads and validates
//! project files, compiles them into engine catalogs, runs grid and reactor
//! scenarios, and summarizes or exports their results.

pub mod catalog_compile;
pub mod error;
pub mod export;
pub mod metrics;
pub mod project_service;
pub mod run_service;

pub use catalog_compile::{
    CompiledProject, compile_emission_factors, compile_project, compile_reactors, compile_sources,
};
pub use error::{AppError, AppResult};
pub use export::{write_dispatch_csv, write_transient_csv};
pub use metrics::{DispatchMetrics, compute_dispatch_metrics};
pub use project_service::{
    ProjectSummary, load_demand, load_project, read_demand_csv, save_project, summarize,
    validate_project,
};
pub use run_service::{
    GridRunResponse, GridScenario, TransientRunResponse, TransientScenario, run_grid_scenario,
    run_transient, sweep_drought,
};
