//! Configuration validation

use super::*;
use crate::error::PipelineError;
use anyhow::Result;

/// Largest accepted counter thread count
pub const MAX_THREADS: usize = 1024;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_counter(&config.counter)?;
    validate_cluster(&config.cluster)?;
    validate_output(&config.output)?;

    if config.cluster.mode != ExecutionMode::Service && config.input.is_none() {
        return Err(PipelineError::Usage(format!("{} mode requires an input file", config.cluster.mode)).into());
    }

    Ok(())
}

/// Validate counter configuration
pub fn validate_counter(counter: &CounterConfig) -> Result<()> {
    if counter.threads == 0 || counter.threads > MAX_THREADS {
        anyhow::bail!("threads must be between 1 and {}, got {}", MAX_THREADS, counter.threads);
    }

    Ok(())
}

/// Validate participant layout
pub fn validate_cluster(cluster: &ClusterConfig) -> Result<()> {
    match cluster.mode {
        ExecutionMode::Standalone => {
            if cluster.participants == 0 {
                return Err(PipelineError::Usage("at least one participant is required".to_string()).into());
            }
        }
        ExecutionMode::Coordinator => {
            if cluster.hosts.is_empty() {
                return Err(PipelineError::Usage(
                    "coordinator mode requires --host-list or --clients-file".to_string(),
                )
                .into());
            }
        }
        ExecutionMode::Service => {}
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.top == Some(0) {
        anyhow::bail!("top must be greater than 0");
    }

    Ok(())
}
