//! Property-based tests for the Lambda pricing model
//!
//! Verifies the algebraic properties of the cost formulas over wide input
//! ranges rather than single literal values.

use costctl::pricing::{
    lambda_cost, lambda_invocations, LambdaCostInput, LambdaInvocationsInput,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_zero_requests_always_cost_nothing(
        compute_time_ms in 1.0..900_000.0f64,
        memory_size_gb in 0.001..10.0f64,
        ephemeral_storage_gb in 0.0..10.0f64,
    ) {
        let out = lambda_cost(&LambdaCostInput {
            requests: 0.0,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });

        prop_assert_eq!(out.compute_cost, 0.0);
        prop_assert_eq!(out.request_cost, 0.0);
        prop_assert_eq!(out.storage_cost, 0.0);
        prop_assert_eq!(out.total_cost, 0.0);
    }

    #[test]
    fn test_total_is_exact_sum_of_parts(
        requests in (0u64..1_000_000_000).prop_map(|r| r as f64),
        compute_time_ms in 1.0..900_000.0f64,
        memory_size_gb in 0.001..10.0f64,
        ephemeral_storage_gb in 0.0..10.0f64,
    ) {
        let out = lambda_cost(&LambdaCostInput {
            requests,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });

        // the total is defined as this sum; no rounding step in between
        prop_assert_eq!(
            out.total_cost,
            out.compute_cost + out.request_cost + out.storage_cost
        );
    }

    #[test]
    fn test_more_requests_cost_more(
        requests in (0u64..1_000_000).prop_map(|r| r as f64),
        extra in (1u64..1_000_000).prop_map(|r| r as f64),
        compute_time_ms in 1.0..900_000.0f64,
        memory_size_gb in 0.001..10.0f64,
        // at or above the free baseline so the storage term cannot turn
        // the marginal cost negative
        ephemeral_storage_gb in 0.5..10.0f64,
    ) {
        let base = lambda_cost(&LambdaCostInput {
            requests,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });
        let more = lambda_cost(&LambdaCostInput {
            requests: requests + extra,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });

        prop_assert!(more.request_cost > base.request_cost);
        prop_assert!(more.compute_cost > base.compute_cost);
        prop_assert!(more.total_cost > base.total_cost);
    }

    #[test]
    fn test_invocations_inverts_cost_up_to_flooring(
        requests in (1u64..100_000_000).prop_map(|r| r as f64),
        compute_time_ms in 1.0..900_000.0f64,
        memory_size_gb in 0.001..10.0f64,
        ephemeral_storage_gb in 0.5..10.0f64,
    ) {
        let cost = lambda_cost(&LambdaCostInput {
            requests,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });
        let out = lambda_invocations(&LambdaInvocationsInput {
            total_cost: cost.total_cost,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });

        prop_assert!((out.invocations - requests).abs() <= 1.0);
    }

    #[test]
    fn test_invocations_are_whole_numbers(
        total_cost in 0.0..1_000_000.0f64,
        compute_time_ms in 1.0..900_000.0f64,
        memory_size_gb in 0.001..10.0f64,
        ephemeral_storage_gb in 0.5..10.0f64,
    ) {
        let out = lambda_invocations(&LambdaInvocationsInput {
            total_cost,
            compute_time_ms,
            memory_size_gb,
            ephemeral_storage_gb,
        });

        prop_assert!(out.invocations >= 0.0);
        prop_assert_eq!(out.invocations.fract(), 0.0);
    }
}
