use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use costctl::chart;
use costctl::compare::{self, LambdaParams};
use costctl::config::{self, Config};
use costctl::dashboard;
use costctl::ec2::{self, PriceCatalog};
use costctl::export;
use costctl::validation;

#[derive(Parser)]
#[command(name = "costctl")]
#[command(
    about = "Compare AWS EC2 instance costs against Lambda invocation pricing",
    long_about = "costctl compares the daily cost of running EC2 instances against the\nequivalent number of AWS Lambda invocations.\n\nFeatures:\n  - Comparison table per instance type (daily, monthly, break-even invocations)\n  - Lambda cost breakdowns for a fixed invocation count\n  - Break-even invocation counts for a dollar budget or instance type\n  - Chart series data (CSV/JSON) and an interactive terminal dashboard\n  - CSV/HTML/JSON export"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

/// Lambda parameters; config supplies any value not given
#[derive(Args, Clone)]
struct LambdaOpts {
    /// Lambda memory allocation in MB (128-10240)
    #[arg(long, value_name = "MB")]
    memory_mb: Option<u32>,

    /// Lambda ephemeral storage in MB (512-10240, first 512 free)
    #[arg(long, value_name = "MB")]
    storage_mb: Option<u32>,

    /// Average invocation duration in milliseconds (100-900000)
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u32>,
}

/// EC2 side of the comparison; config supplies any value not given
#[derive(Args, Clone)]
struct Ec2Opts {
    /// Instance-type filter (regex, case-insensitive; an invalid pattern
    /// matches everything)
    #[arg(long, value_name = "PATTERN")]
    filter: Option<String>,

    /// Number of EC2 instances to compare against
    #[arg(long, value_name = "COUNT")]
    instances: Option<u32>,

    /// Maximum instance types to include
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare EC2 daily cost against Lambda invocations
    ///
    /// One row per instance type passing the filter, sorted by hourly
    /// price: daily cost, monthly cost, and the number of daily Lambda
    /// invocations that cost the same.
    ///
    /// Examples:
    ///   costctl compare
    ///   costctl compare --filter m5 --instances 3
    ///   costctl compare --memory-mb 1024 --duration-ms 500 --output json
    Compare {
        #[command(flatten)]
        lambda: LambdaOpts,
        #[command(flatten)]
        ec2: Ec2Opts,
    },
    /// Cost breakdown for a fixed number of Lambda invocations
    ///
    /// Examples:
    ///   costctl lambda 1000000
    ///   costctl lambda 5000000 --memory-mb 512 --duration-ms 100
    Lambda {
        /// Number of invocations
        #[arg(value_name = "REQUESTS")]
        requests: u64,
        #[command(flatten)]
        lambda: LambdaOpts,
    },
    /// Break-even invocation count for a budget or instance type
    ///
    /// With an instance type, the budget is its daily cost times the
    /// instance count. The raw quotient is shown unclamped; degenerate
    /// parameters (storage below the free tier can make the cost per
    /// invocation negative) are reported as-is.
    ///
    /// Examples:
    ///   costctl breakeven t3.micro
    ///   costctl breakeven m5.large --instances 4
    ///   costctl breakeven --budget 100
    Breakeven {
        /// EC2 instance type to price the budget from
        #[arg(value_name = "INSTANCE_TYPE")]
        instance_type: Option<String>,

        /// Dollar budget (instead of an instance type)
        #[arg(long, value_name = "USD")]
        budget: Option<f64>,

        /// Number of EC2 instances
        #[arg(long, value_name = "COUNT")]
        instances: Option<u32>,

        #[command(flatten)]
        lambda: LambdaOpts,
    },
    /// Emit chart series data (CSV, or JSON with --output json)
    ///
    /// The x axis runs from zero to the break-even invocation count of
    /// the most expensive filtered instance, in at most 10 steps; one
    /// flat series per instance type plus the cumulative Lambda series.
    Chart {
        #[command(flatten)]
        lambda: LambdaOpts,
        #[command(flatten)]
        ec2: Ec2Opts,
    },
    /// Interactive terminal dashboard with live parameter adjustment
    Dashboard,
    /// List known instance types and prices
    Instances {
        /// Instance-type filter (regex, case-insensitive)
        #[arg(value_name = "PATTERN")]
        filter: Option<String>,

        /// List instance family prefixes instead of types
        #[arg(long)]
        families: bool,

        /// Maximum instance types to list
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Export the comparison to a file or stdout
    ///
    /// Examples:
    ///   costctl export --format csv --file comparison.csv
    ///   costctl export --format html --file report.html
    Export {
        /// Export format (csv, html, json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(long, value_name = "PATH")]
        file: Option<String>,

        #[command(flatten)]
        lambda: LambdaOpts,
        #[command(flatten)]
        ec2: Ec2Opts,
    },
    /// Initialize configuration
    Init {
        /// Path for the new config file
        #[arg(short = 'o', long = "file", default_value = ".costctl.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config = Config::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Compare { lambda, ec2 } => {
            let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
            let params = resolve_lambda_params(&lambda, &config)?;
            let (filter, instances, limit) = resolve_ec2_opts(&ec2, &config);
            let comparison =
                compare::build_comparison(&catalog, &filter, limit, &params, instances);
            compare::show_comparison(&comparison, &cli.output)?;
        }
        Commands::Lambda { requests, lambda } => {
            let params = resolve_lambda_params(&lambda, &config)?;
            compare::show_lambda_cost(requests as f64, &params, &cli.output)?;
        }
        Commands::Breakeven {
            instance_type,
            budget,
            instances,
            lambda,
        } => {
            let params = resolve_lambda_params(&lambda, &config)?;
            let num_instances = instances.unwrap_or(config.ec2.num_instances) as f64;
            let (budget, source) = match (budget, instance_type) {
                (Some(budget), _) => {
                    validation::validate_budget(budget)?;
                    (budget, "budget".to_string())
                }
                (None, Some(instance_type)) => {
                    let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
                    let hourly = catalog.price_or_estimate(&instance_type);
                    let daily = ec2::daily_cost(hourly, num_instances);
                    (
                        daily,
                        format!("{} x{} per day", instance_type, num_instances),
                    )
                }
                (None, None) => {
                    anyhow::bail!("Provide an INSTANCE_TYPE or --budget");
                }
            };
            compare::show_breakeven(budget, &source, &params, &cli.output)?;
        }
        Commands::Chart { lambda, ec2 } => {
            let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
            let params = resolve_lambda_params(&lambda, &config)?;
            let (filter, instances, limit) = resolve_ec2_opts(&ec2, &config);
            let chart_data = chart::build_chart(&catalog, &filter, limit, &params, instances);
            chart::show_chart(&chart_data, &cli.output)?;
        }
        Commands::Dashboard => {
            let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
            dashboard::run_dashboard(&config, &catalog)?;
        }
        Commands::Instances {
            filter,
            families,
            limit,
        } => {
            let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
            let filter = filter.unwrap_or_else(|| config.ec2.filter.clone());
            let limit = limit.unwrap_or(config.ec2.type_limit);
            ec2::show_instances(&catalog, &filter, limit, families, &cli.output)?;
        }
        Commands::Export {
            format,
            file,
            lambda,
            ec2,
        } => {
            let catalog = PriceCatalog::load(config.ec2.price_file.as_deref())?;
            let params = resolve_lambda_params(&lambda, &config)?;
            let (filter, instances, limit) = resolve_ec2_opts(&ec2, &config);
            let comparison =
                compare::build_comparison(&catalog, &filter, limit, &params, instances);
            export::export_comparison(&comparison, &format, file.as_deref())?;
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
    }

    Ok(())
}

fn resolve_lambda_params(opts: &LambdaOpts, config: &Config) -> Result<LambdaParams> {
    let memory_mb = opts.memory_mb.unwrap_or(config.lambda.memory_size_mb);
    let storage_mb = opts.storage_mb.unwrap_or(config.lambda.storage_mb);
    let duration_ms = opts.duration_ms.unwrap_or(config.lambda.compute_time_ms);

    validation::validate_memory_mb(memory_mb)?;
    validation::validate_storage_mb(storage_mb)?;
    validation::validate_compute_time_ms(duration_ms)?;

    Ok(LambdaParams {
        memory_size_mb: memory_mb as f64,
        storage_mb: storage_mb as f64,
        compute_time_ms: duration_ms as f64,
    })
}

fn resolve_ec2_opts(opts: &Ec2Opts, config: &Config) -> (String, f64, usize) {
    let filter = opts
        .filter
        .clone()
        .unwrap_or_else(|| config.ec2.filter.clone());
    let instances = opts.instances.unwrap_or(config.ec2.num_instances) as f64;
    let limit = opts.limit.unwrap_or(config.ec2.type_limit);
    (filter, instances, limit)
}
