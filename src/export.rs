//! Export functions for comparison data

use crate::compare::Comparison;
use crate::error::{CostctlError, Result};
use tracing::info;

/// Export a comparison to CSV, HTML, or JSON; stdout when no file given
pub fn export_comparison(comparison: &Comparison, format: &str, file: Option<&str>) -> Result<()> {
    let rendered = match format {
        "csv" => generate_csv(comparison),
        "html" => generate_html(comparison),
        "json" => serde_json::to_string_pretty(comparison)?,
        _ => {
            return Err(CostctlError::Validation {
                field: "format".to_string(),
                reason: format!(
                    "Unsupported export format: {}. Use 'csv', 'html' or 'json'",
                    format
                ),
            });
        }
    };

    if let Some(path) = file {
        std::fs::write(path, rendered)?;
        info!("Exported comparison to {}", path);
        println!("Exported to {}", path);
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn generate_csv(comparison: &Comparison) -> String {
    let mut csv =
        String::from("Instance Type,Hourly Cost,Daily Cost,Monthly Cost,Lambda Invocations/Day\n");

    for row in &comparison.rows {
        csv.push_str(&format!(
            "{},{:.4},{:.2},{:.2},{}\n",
            row.instance_type,
            row.hourly_cost,
            row.daily_cost,
            row.monthly_cost,
            row.lambda_invocations
        ));
    }

    csv
}

fn generate_html(comparison: &Comparison) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>costctl Cost Comparison</title>
    <style>
        body { font-family: monospace; margin: 20px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #4CAF50; color: white; }
        tr:nth-child(even) { background-color: #f2f2f2; }
        .degenerate { color: red; }
    </style>
</head>
<body>
    <h1>EC2 vs Lambda Cost Comparison</h1>
    <p>Generated: "#,
    );

    html.push_str(
        &comparison
            .timestamp
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    );
    html.push_str(&format!(
        r#"</p>
    <p>Lambda: {} MB memory, {} MB storage, {} ms avg duration; {} instance(s), filter "{}"</p>
    <table>
        <tr>
            <th>Instance Type</th>
            <th>Hourly</th>
            <th>Daily</th>
            <th>Monthly</th>
            <th>Lambda Invocations/Day</th>
        </tr>"#,
        comparison.lambda.memory_size_mb,
        comparison.lambda.storage_mb,
        comparison.lambda.compute_time_ms,
        comparison.num_instances,
        comparison.filter
    ));

    for row in &comparison.rows {
        let invocations_class = if row.lambda_invocations.is_finite() && row.lambda_invocations >= 0.0
        {
            ""
        } else {
            "degenerate"
        };

        html.push_str(&format!(
            r#"<tr>
            <td>{}</td>
            <td>${:.4}</td>
            <td>${:.2}</td>
            <td>${:.2}</td>
            <td class="{}">{}</td>
        </tr>"#,
            row.instance_type,
            row.hourly_cost,
            row.daily_cost,
            row.monthly_cost,
            invocations_class,
            row.lambda_invocations
        ));
    }

    html.push_str(
        r#"
    </table>
</body>
</html>"#,
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{build_comparison, LambdaParams};
    use crate::ec2::PriceCatalog;

    fn comparison() -> Comparison {
        let catalog = PriceCatalog::builtin();
        let params = LambdaParams {
            memory_size_mb: 128.0,
            storage_mb: 512.0,
            compute_time_ms: 200.0,
        };
        build_comparison(&catalog, "^t2\\.", 50, &params, 1.0)
    }

    #[test]
    fn test_csv_has_header_and_row_per_instance() {
        let comparison = comparison();
        let csv = generate_csv(&comparison);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("Instance Type,"));
        assert_eq!(lines.len(), comparison.rows.len() + 1);
        assert!(csv.contains("t2.micro"));
    }

    #[test]
    fn test_html_contains_rows() {
        let comparison = comparison();
        let html = generate_html(&comparison);
        assert!(html.contains("<table>"));
        assert!(html.contains("t2.micro"));
        assert!(html.contains("Lambda Invocations/Day"));
    }

    #[test]
    fn test_json_round_trips() {
        let comparison = comparison();
        let json = serde_json::to_string_pretty(&comparison).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["rows"].as_array().unwrap().len(),
            comparison.rows.len()
        );
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let comparison = comparison();
        let result = export_comparison(&comparison, "xml", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let comparison = comparison();
        export_comparison(&comparison, "csv", Some(path.to_str().unwrap())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Instance Type,"));
    }
}
