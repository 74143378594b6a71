//! Pipeline configuration parsing from environment variables.
//!
//! Worker pool size and the directories run artifacts are written to.

use crate::application::pipeline::dispatcher::DEFAULT_WORKERS;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Pipeline environment configuration
#[derive(Debug, Clone)]
pub struct PipelineEnvConfig {
    pub workers: usize,
    /// Root for the parameter extract and the archive/output directories.
    pub base_dir: PathBuf,
    pub archive_dir_name: String,
    pub output_dir_name: String,
}

impl Default for PipelineEnvConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            base_dir: PathBuf::from("."),
            archive_dir_name: "INPUT".to_string(),
            output_dir_name: "OUTPUT".to_string(),
        }
    }
}

impl PipelineEnvConfig {
    pub fn from_env() -> Result<Self> {
        let workers = env::var("PIPELINE_WORKERS")
            .unwrap_or_else(|_| DEFAULT_WORKERS.to_string())
            .parse::<usize>()
            .context("Failed to parse PIPELINE_WORKERS")?;
        if workers == 0 {
            anyhow::bail!("PIPELINE_WORKERS must be at least 1");
        }

        Ok(Self {
            workers,
            base_dir: env::var("REPORT_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            archive_dir_name: env::var("INPUT_ARCHIVE_DIR").unwrap_or_else(|_| "INPUT".to_string()),
            output_dir_name: env::var("OUTPUT_DIR").unwrap_or_else(|_| "OUTPUT".to_string()),
        })
    }
}
