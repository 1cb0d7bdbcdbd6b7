// src/core/mod.rs
//! Core services shared by the generation and dispatch pipelines

pub mod artifact_namer;
pub mod config_manager;
pub mod fs_ops;

pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
