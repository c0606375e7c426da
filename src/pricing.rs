//! Lambda invocation pricing model
//!
//! Closed-form cost arithmetic for AWS Lambda: total cost for a batch of
//! invocations, and the invocation count a dollar budget buys. Both
//! functions are pure and perform no input validation; degenerate inputs
//! (zero or negative cost per invocation) propagate as ordinary
//! floating-point results. Callers that need clamping do it themselves.

use serde::Serialize;

/// Milliseconds to seconds conversion factor
pub const MS_TO_S: f64 = 0.001;

/// On-demand compute price per GB-second (USD)
pub const COMPUTE_PRICE_PER_GB_SECOND: f64 = 0.0000166667;

/// Price per invocation request (USD)
pub const REQUEST_PRICE: f64 = 0.0000002;

/// Ephemeral storage price per GB-second (USD)
pub const STORAGE_PRICE_PER_GB_SECOND: f64 = 0.0000000358;

/// Ephemeral storage included free with every invocation (GB)
pub const FREE_STORAGE_GB: f64 = 0.5;

/// Parameters for a batch of Lambda invocations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaCostInput {
    pub requests: f64,
    pub compute_time_ms: f64,
    pub memory_size_gb: f64,
    pub ephemeral_storage_gb: f64,
}

/// Cost breakdown for a batch of Lambda invocations (USD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambdaCostOutput {
    pub compute_cost: f64,
    pub request_cost: f64,
    pub storage_cost: f64,
    pub total_cost: f64,
}

/// A dollar budget plus per-invocation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaInvocationsInput {
    pub total_cost: f64,
    pub compute_time_ms: f64,
    pub memory_size_gb: f64,
    pub ephemeral_storage_gb: f64,
}

/// Invocation count a budget buys
///
/// `invocations` is a floored quotient kept as f64: when the cost per
/// invocation is zero or negative the result may be non-finite or negative,
/// and it is returned as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambdaInvocationsOutput {
    pub invocations: f64,
}

/// Compute the cost of running `requests` Lambda invocations.
///
/// Storage below [`FREE_STORAGE_GB`] yields a negative storage term that
/// reduces the total. The baseline is applied as a signed subtraction, not
/// a floor at zero.
pub fn lambda_cost(input: &LambdaCostInput) -> LambdaCostOutput {
    let total_compute_seconds = input.requests * input.compute_time_ms * MS_TO_S;
    let total_compute_gbs = input.memory_size_gb * total_compute_seconds;
    let compute_cost = total_compute_gbs * COMPUTE_PRICE_PER_GB_SECOND;
    let request_cost = input.requests * REQUEST_PRICE;
    let total_storage_gbs = (input.ephemeral_storage_gb - FREE_STORAGE_GB) * total_compute_seconds;
    let storage_cost = total_storage_gbs * STORAGE_PRICE_PER_GB_SECOND;
    let total_cost = compute_cost + request_cost + storage_cost;

    LambdaCostOutput {
        compute_cost,
        request_cost,
        storage_cost,
        total_cost,
    }
}

/// Compute how many invocations a budget buys, flooring the quotient.
pub fn lambda_invocations(input: &LambdaInvocationsInput) -> LambdaInvocationsOutput {
    let compute_seconds_per_invocation = input.compute_time_ms * MS_TO_S;
    let compute_gbs_per_invocation = input.memory_size_gb * compute_seconds_per_invocation;
    let compute_cost_per_invocation = compute_gbs_per_invocation * COMPUTE_PRICE_PER_GB_SECOND;

    let request_cost_per_invocation = REQUEST_PRICE;

    let storage_seconds_per_invocation = compute_seconds_per_invocation;
    let storage_gbs_per_invocation =
        (input.ephemeral_storage_gb - FREE_STORAGE_GB) * storage_seconds_per_invocation;
    let storage_cost_per_invocation = storage_gbs_per_invocation * STORAGE_PRICE_PER_GB_SECOND;

    let cost_per_invocation =
        compute_cost_per_invocation + request_cost_per_invocation + storage_cost_per_invocation;
    let invocations = (input.total_cost / cost_per_invocation).floor();

    LambdaInvocationsOutput { invocations }
}
