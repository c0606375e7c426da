//! Input validation utilities
//!
//! Validation lives at the CLI boundary; the pricing model itself never
//! rejects or clamps its inputs. The ranges below match Lambda's actual
//! configuration limits (128 MB to 10240 MB memory, 512 MB to 10240 MB
//! ephemeral storage, 100 ms to 15 min duration).

use crate::error::{CostctlError, Result};

/// Smallest configurable memory allocation in MB
pub const MIN_MEMORY_MB: u32 = 128;
/// Largest configurable memory allocation in MB
pub const MAX_MEMORY_MB: u32 = 10_240;

/// Smallest configurable ephemeral storage in MB
pub const MIN_STORAGE_MB: u32 = 512;
/// Largest configurable ephemeral storage in MB
pub const MAX_STORAGE_MB: u32 = 10_240;

/// Shortest billable invocation duration in ms
pub const MIN_COMPUTE_TIME_MS: u32 = 100;
/// Longest invocation duration in ms (15 minutes)
pub const MAX_COMPUTE_TIME_MS: u32 = 15 * 60 * 1000;

/// Validate a Lambda memory allocation in MB
pub fn validate_memory_mb(memory_mb: u32) -> Result<()> {
    if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&memory_mb) {
        return Err(CostctlError::Validation {
            field: "memory_mb".to_string(),
            reason: format!(
                "Memory must be {}-{} MB, got: {}",
                MIN_MEMORY_MB, MAX_MEMORY_MB, memory_mb
            ),
        });
    }
    Ok(())
}

/// Validate a Lambda ephemeral storage allocation in MB
pub fn validate_storage_mb(storage_mb: u32) -> Result<()> {
    if !(MIN_STORAGE_MB..=MAX_STORAGE_MB).contains(&storage_mb) {
        return Err(CostctlError::Validation {
            field: "storage_mb".to_string(),
            reason: format!(
                "Ephemeral storage must be {}-{} MB, got: {}",
                MIN_STORAGE_MB, MAX_STORAGE_MB, storage_mb
            ),
        });
    }
    Ok(())
}

/// Validate an average invocation duration in ms
pub fn validate_compute_time_ms(compute_time_ms: u32) -> Result<()> {
    if !(MIN_COMPUTE_TIME_MS..=MAX_COMPUTE_TIME_MS).contains(&compute_time_ms) {
        return Err(CostctlError::Validation {
            field: "compute_time_ms".to_string(),
            reason: format!(
                "Duration must be {}-{} ms, got: {}",
                MIN_COMPUTE_TIME_MS, MAX_COMPUTE_TIME_MS, compute_time_ms
            ),
        });
    }
    Ok(())
}

/// Validate a budget amount in USD
pub fn validate_budget(budget: f64) -> Result<()> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(CostctlError::Validation {
            field: "budget".to_string(),
            reason: format!("Budget must be a non-negative amount, got: {}", budget),
        });
    }
    Ok(())
}
