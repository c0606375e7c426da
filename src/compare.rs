//! EC2 vs Lambda cost comparison
//!
//! Builds the comparison rows shown by `costctl compare`: for every
//! instance type passing the filter, the daily and monthly EC2 cost and
//! the number of daily Lambda invocations that cost the same.

use crate::config::LambdaConfig;
use crate::ec2::{daily_cost, monthly_cost, PriceCatalog};
use crate::error::Result;
use crate::format::{format_count, format_duration_ms, format_size, format_usd, KILO};
use crate::pricing::{
    lambda_cost, lambda_invocations, LambdaCostInput, LambdaCostOutput, LambdaInvocationsInput,
};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use console::style;
use serde::Serialize;

/// Lambda parameters as the user supplies them (MB and ms)
///
/// The pricing model works in GB; the conversion by 1024 happens here,
/// at the same place the original inputs were converted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambdaParams {
    pub memory_size_mb: f64,
    pub storage_mb: f64,
    pub compute_time_ms: f64,
}

impl LambdaParams {
    pub fn from_config(config: &LambdaConfig) -> Self {
        Self {
            memory_size_mb: config.memory_size_mb as f64,
            storage_mb: config.storage_mb as f64,
            compute_time_ms: config.compute_time_ms as f64,
        }
    }

    pub fn memory_size_gb(&self) -> f64 {
        self.memory_size_mb / KILO
    }

    pub fn ephemeral_storage_gb(&self) -> f64 {
        self.storage_mb / KILO
    }

    /// Cost breakdown for running `requests` invocations
    pub fn cost_for_requests(&self, requests: f64) -> LambdaCostOutput {
        lambda_cost(&LambdaCostInput {
            requests,
            compute_time_ms: self.compute_time_ms,
            memory_size_gb: self.memory_size_gb(),
            ephemeral_storage_gb: self.ephemeral_storage_gb(),
        })
    }

    /// Invocations a dollar budget buys (raw, unclamped)
    pub fn invocations_for_budget(&self, total_cost: f64) -> f64 {
        lambda_invocations(&LambdaInvocationsInput {
            total_cost,
            compute_time_ms: self.compute_time_ms,
            memory_size_gb: self.memory_size_gb(),
            ephemeral_storage_gb: self.ephemeral_storage_gb(),
        })
        .invocations
    }
}

/// One instance type compared against Lambda
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub instance_type: String,
    pub hourly_cost: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    /// Daily Lambda invocations costing the same as the instances
    pub lambda_invocations: f64,
}

/// Full comparison document
#[derive(Debug, Serialize)]
pub struct Comparison {
    pub filter: String,
    pub num_instances: f64,
    pub lambda: LambdaParams,
    pub rows: Vec<ComparisonRow>,
    pub timestamp: DateTime<Utc>,
}

/// Build comparison rows for every instance type passing the filter.
///
/// Rows are sorted by hourly price ascending.
pub fn build_comparison(
    catalog: &PriceCatalog,
    filter: &str,
    limit: usize,
    params: &LambdaParams,
    num_instances: f64,
) -> Comparison {
    let mut rows: Vec<ComparisonRow> = catalog
        .filter(filter, limit)
        .into_iter()
        .map(|(instance_type, hourly)| {
            let daily = daily_cost(hourly, num_instances);
            ComparisonRow {
                instance_type: instance_type.to_string(),
                hourly_cost: hourly,
                daily_cost: daily,
                monthly_cost: monthly_cost(daily),
                lambda_invocations: params.invocations_for_budget(daily),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.hourly_cost.total_cmp(&b.hourly_cost));

    Comparison {
        filter: filter.to_string(),
        num_instances,
        lambda: *params,
        rows,
        timestamp: Utc::now(),
    }
}

/// Render a comparison as text (comfy-table) or JSON
pub fn show_comparison(comparison: &Comparison, output_format: &str) -> Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(comparison)?);
        return Ok(());
    }

    println!(
        "Lambda: {} memory, {} storage, {} avg duration",
        style(format_size(comparison.lambda.memory_size_mb)).cyan(),
        style(format_size(comparison.lambda.storage_mb)).cyan(),
        style(format_duration_ms(comparison.lambda.compute_time_ms)).cyan(),
    );
    println!(
        "EC2: {} instance(s), filter {}",
        style(comparison.num_instances).cyan(),
        style(format!("\"{}\"", comparison.filter)).cyan(),
    );
    println!();

    if comparison.rows.is_empty() {
        println!("No results");
        return Ok(());
    }

    println!("{}", render_table(comparison));
    Ok(())
}

fn render_table(comparison: &Comparison) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Instance Type",
        "Hourly",
        "Daily",
        "Monthly",
        "Lambda invocations/day",
    ]);

    for row in &comparison.rows {
        let invocations_cell = if row.lambda_invocations.is_finite() && row.lambda_invocations >= 0.0
        {
            Cell::new(format_count(row.lambda_invocations)).fg(comfy_table::Color::Green)
        } else {
            // degenerate cost-per-invocation; show the raw value
            Cell::new(format_count(row.lambda_invocations)).fg(comfy_table::Color::Red)
        };

        table.add_row(vec![
            Cell::new(&row.instance_type),
            Cell::new(format!("${:.4}", row.hourly_cost)),
            Cell::new(format_usd(row.daily_cost)),
            Cell::new(format_usd(row.monthly_cost)),
            invocations_cell,
        ]);
    }

    table
}

/// Print the Lambda cost breakdown for a fixed number of invocations
pub fn show_lambda_cost(requests: f64, params: &LambdaParams, output_format: &str) -> Result<()> {
    let breakdown = params.cost_for_requests(requests);

    if output_format == "json" {
        let doc = serde_json::json!({
            "requests": requests,
            "memory_size_mb": params.memory_size_mb,
            "storage_mb": params.storage_mb,
            "compute_time_ms": params.compute_time_ms,
            "compute_cost": breakdown.compute_cost,
            "request_cost": breakdown.request_cost,
            "storage_cost": breakdown.storage_cost,
            "total_cost": breakdown.total_cost,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "Cost of {} invocation(s) at {} / {} / {}:",
        style(format_count(requests)).cyan(),
        format_size(params.memory_size_mb),
        format_size(params.storage_mb),
        format_duration_ms(params.compute_time_ms),
    );
    println!("  compute:  ${:.6}", breakdown.compute_cost);
    println!("  requests: ${:.6}", breakdown.request_cost);
    if breakdown.storage_cost < 0.0 {
        // below the free-tier baseline the storage term is a credit
        println!(
            "  storage:  {}",
            style(format!("${:.6}", breakdown.storage_cost)).yellow()
        );
    } else {
        println!("  storage:  ${:.6}", breakdown.storage_cost);
    }
    println!(
        "  total:    {}",
        style(format!("${:.6}", breakdown.total_cost)).green().bold()
    );
    Ok(())
}

/// Print the break-even invocation count for a dollar budget
pub fn show_breakeven(
    budget: f64,
    source: &str,
    params: &LambdaParams,
    output_format: &str,
) -> Result<()> {
    let invocations = params.invocations_for_budget(budget);
    let cost_per_invocation = params.cost_for_requests(1.0).total_cost;

    if output_format == "json" {
        let doc = serde_json::json!({
            "budget": budget,
            "source": source,
            "cost_per_invocation": cost_per_invocation,
            "invocations": invocations,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("Budget: {} ({})", style(format_usd(budget)).cyan(), source);
    println!("Cost per invocation: ${:.10}", cost_per_invocation);
    println!(
        "Break-even invocations: {}",
        style(format_count(invocations)).green().bold()
    );
    if !invocations.is_finite() || invocations < 0.0 {
        println!(
            "{} cost per invocation is not positive; Lambda never reaches the budget",
            style("NOTE:").yellow()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LambdaParams {
        LambdaParams {
            memory_size_mb: 128.0,
            storage_mb: 512.0,
            compute_time_ms: 200.0,
        }
    }

    #[test]
    fn test_rows_sorted_by_hourly_price() {
        let catalog = PriceCatalog::builtin();
        let comparison = build_comparison(&catalog, "t3\\.", 50, &params(), 1.0);
        assert!(!comparison.rows.is_empty());
        for pair in comparison.rows.windows(2) {
            assert!(pair[0].hourly_cost <= pair[1].hourly_cost);
        }
    }

    #[test]
    fn test_row_costs_derived_from_hourly() {
        let catalog = PriceCatalog::builtin();
        let comparison = build_comparison(&catalog, "^t3\\.micro$", 50, &params(), 2.0);
        assert_eq!(comparison.rows.len(), 1);
        let row = &comparison.rows[0];
        assert_eq!(row.instance_type, "t3.micro");
        assert!((row.daily_cost - 0.0104 * 24.0 * 2.0).abs() < 1e-12);
        assert!((row.monthly_cost - row.daily_cost * 365.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_invocations_match_pricing_model() {
        let catalog = PriceCatalog::builtin();
        let p = params();
        let comparison = build_comparison(&catalog, "^t2\\.", 50, &p, 1.0);
        for row in &comparison.rows {
            let expected = p.invocations_for_budget(row.daily_cost);
            assert_eq!(row.lambda_invocations, expected);
        }
    }

    #[test]
    fn test_empty_filter_result() {
        let catalog = PriceCatalog::builtin();
        let comparison = build_comparison(&catalog, "^zz9\\.", 50, &params(), 1.0);
        assert!(comparison.rows.is_empty());
        // rendering an empty comparison prints "No results" and succeeds
        assert!(show_comparison(&comparison, "text").is_ok());
    }

    #[test]
    fn test_params_unit_conversion() {
        let p = params();
        assert!((p.memory_size_gb() - 0.125).abs() < 1e-12);
        assert!((p.ephemeral_storage_gb() - 0.5).abs() < 1e-12);
    }
}
