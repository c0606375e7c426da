//! Chart series building
//!
//! Prepares the data behind the cost chart: a handful of request-count
//! steps up to the break-even point, one flat series per EC2 instance
//! type, and one Lambda series. Rendering is someone else's job (the
//! dashboard, JSON/CSV consumers); this module is pure arithmetic.

use crate::compare::LambdaParams;
use crate::ec2::{daily_cost, PriceCatalog};
use crate::error::Result;
use serde::Serialize;

/// Upper bound on chart steps
pub const MAX_CHART_STEPS: f64 = 10.0;

/// One line on the chart
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

/// Chart document: request-count labels plus one series per line
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub labels: Vec<f64>,
    pub series: Vec<Series>,
    /// Raw break-even invocation count the steps were derived from
    pub breakeven_invocations: f64,
}

/// Clamp a raw break-even count to a usable number of chart steps.
///
/// The pricing model hands back an unclamped quotient; the [1, 10] clamp
/// is deliberately a caller concern. NaN maps to the minimal chart.
pub fn clamp_steps(invocations: f64) -> usize {
    if invocations.is_nan() {
        return 1;
    }
    invocations.min(MAX_CHART_STEPS).max(1.0) as usize
}

/// Build chart series for every instance type passing the filter.
///
/// The x axis runs from zero to the break-even invocation count of the
/// most expensive filtered instance, in at most [`MAX_CHART_STEPS`] steps.
pub fn build_chart(
    catalog: &PriceCatalog,
    filter: &str,
    limit: usize,
    params: &LambdaParams,
    num_instances: f64,
) -> ChartData {
    let filtered = catalog.filter(filter, limit);

    let max_hourly = filtered
        .iter()
        .map(|(_, price)| *price)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_daily_cost = daily_cost(max_hourly, num_instances);

    let invocations = params.invocations_for_budget(max_daily_cost);
    let num_steps = clamp_steps(invocations);
    let step_size = invocations.max(0.0) / num_steps as f64;
    let labels: Vec<f64> = (0..=num_steps)
        .map(|index| (index as f64 * step_size).round())
        .collect();

    let mut series: Vec<Series> = filtered
        .iter()
        .map(|(instance_type, price)| Series {
            label: instance_type.to_string(),
            data: vec![daily_cost(*price, num_instances); labels.len()],
        })
        .collect();

    series.push(Series {
        label: "Lambda".to_string(),
        data: labels
            .iter()
            .map(|requests| params.cost_for_requests(*requests).total_cost)
            .collect(),
    });

    ChartData {
        labels,
        series,
        breakeven_invocations: invocations,
    }
}

impl ChartData {
    /// Render the chart data as CSV: one column of request counts,
    /// one column per series.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("requests");
        for series in &self.series {
            csv.push(',');
            csv.push_str(&series.label);
        }
        csv.push('\n');

        for (i, label) in self.labels.iter().enumerate() {
            csv.push_str(&format!("{}", label));
            for series in &self.series {
                csv.push_str(&format!(",{}", series.data[i]));
            }
            csv.push('\n');
        }
        csv
    }
}

/// Print chart data as CSV (text) or JSON
pub fn show_chart(chart: &ChartData, output_format: &str) -> Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(chart)?);
    } else {
        print!("{}", chart.to_csv());
    }
    Ok(())
}
