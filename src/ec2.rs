//! EC2 instance-type price catalog
//!
//! A static table of on-demand hourly prices (us-east-1, Linux) with a
//! prefix-family fallback for unknown types. Prices are approximate
//! (a production tool would use the AWS Pricing API). The built-in table
//! can be extended or overridden by a user-supplied TOML price file.

use crate::error::{ConfigError, Result};
use regex::RegexBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Hours billed per day when projecting hourly prices
pub const HOURS_PER_DAY: f64 = 24.0;

/// Maximum instance types returned by a filter query
pub const DEFAULT_TYPE_LIMIT: usize = 50;

/// Approximate on-demand hourly prices, us-east-1 Linux
static INSTANCE_PRICES: &[(&str, f64)] = &[
    // t2 burstable (previous generation)
    ("t2.nano", 0.0058),
    ("t2.micro", 0.0116),
    ("t2.small", 0.023),
    ("t2.medium", 0.0464),
    ("t2.large", 0.0928),
    ("t2.xlarge", 0.1856),
    ("t2.2xlarge", 0.3712),
    // t3 burstable
    ("t3.nano", 0.0052),
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("t3.xlarge", 0.1664),
    ("t3.2xlarge", 0.3328),
    // t3a burstable (AMD)
    ("t3a.nano", 0.0047),
    ("t3a.micro", 0.0094),
    ("t3a.small", 0.0188),
    ("t3a.medium", 0.0376),
    ("t3a.large", 0.0752),
    ("t3a.xlarge", 0.1504),
    ("t3a.2xlarge", 0.3008),
    // t4g burstable (Graviton)
    ("t4g.nano", 0.0042),
    ("t4g.micro", 0.0084),
    ("t4g.small", 0.0168),
    ("t4g.medium", 0.0336),
    ("t4g.large", 0.0672),
    ("t4g.xlarge", 0.1344),
    ("t4g.2xlarge", 0.2688),
    // m5 general purpose
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("m5.2xlarge", 0.384),
    ("m5.4xlarge", 0.768),
    ("m5.8xlarge", 1.536),
    ("m5.12xlarge", 2.304),
    ("m5.16xlarge", 3.072),
    ("m5.24xlarge", 4.608),
    // m6i general purpose
    ("m6i.large", 0.096),
    ("m6i.xlarge", 0.192),
    ("m6i.2xlarge", 0.384),
    ("m6i.4xlarge", 0.768),
    ("m6i.8xlarge", 1.536),
    // m7g general purpose (Graviton)
    ("m7g.medium", 0.0408),
    ("m7g.large", 0.0816),
    ("m7g.xlarge", 0.1632),
    ("m7g.2xlarge", 0.3264),
    ("m7g.4xlarge", 0.6528),
    // c5 compute optimized
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
    ("c5.2xlarge", 0.34),
    ("c5.4xlarge", 0.68),
    ("c5.9xlarge", 1.53),
    ("c5.18xlarge", 3.06),
    // c6i compute optimized
    ("c6i.large", 0.085),
    ("c6i.xlarge", 0.17),
    ("c6i.2xlarge", 0.34),
    ("c6i.4xlarge", 0.68),
    ("c6i.8xlarge", 1.36),
    // c7g compute optimized (Graviton)
    ("c7g.medium", 0.0363),
    ("c7g.large", 0.0725),
    ("c7g.xlarge", 0.145),
    ("c7g.2xlarge", 0.29),
    // r5 memory optimized
    ("r5.large", 0.126),
    ("r5.xlarge", 0.252),
    ("r5.2xlarge", 0.504),
    ("r5.4xlarge", 1.008),
    ("r5.12xlarge", 3.024),
    // r6g memory optimized (Graviton)
    ("r6g.medium", 0.0504),
    ("r6g.large", 0.1008),
    ("r6g.xlarge", 0.2016),
    ("r6g.2xlarge", 0.4032),
    // i3 storage optimized
    ("i3.large", 0.156),
    ("i3.xlarge", 0.312),
    ("i3.2xlarge", 0.624),
    ("i3.4xlarge", 1.248),
    // g4dn GPU
    ("g4dn.xlarge", 0.526),
    ("g4dn.2xlarge", 0.752),
    ("g4dn.4xlarge", 1.204),
    ("g4dn.8xlarge", 2.176),
    ("g4dn.12xlarge", 3.912),
    // g5 GPU
    ("g5.xlarge", 1.006),
    ("g5.2xlarge", 1.212),
    ("g5.4xlarge", 1.624),
    ("g5.12xlarge", 5.672),
    // p3/p4/p5 GPU training
    ("p3.2xlarge", 3.06),
    ("p3.8xlarge", 12.24),
    ("p3.16xlarge", 24.48),
    ("p4d.24xlarge", 32.7726),
    ("p5.48xlarge", 98.32),
];

/// Estimate instance cost per hour for a type missing from the catalog
///
/// Prefix-family approximation; unknown families get a flat default.
pub fn estimate_hourly_price(instance_type: &str) -> f64 {
    match instance_type {
        t if t.starts_with("t2.") => 0.0464,
        t if t.starts_with("t3.") => 0.0416,
        t if t.starts_with("t4g.") => 0.0336,
        t if t.starts_with("m5.") => 0.192,
        t if t.starts_with("c5.") => 0.17,
        t if t.starts_with("r5.") => 0.252,
        t if t.starts_with("g4dn.") => 0.526,
        t if t.starts_with("p3.") => 3.06,
        _ => 0.1,
    }
}

/// Daily cost of running `num_instances` instances at an hourly price
pub fn daily_cost(hourly: f64, num_instances: f64) -> f64 {
    hourly * HOURS_PER_DAY * num_instances
}

/// Monthly projection of a daily cost
pub fn monthly_cost(daily: f64) -> f64 {
    daily * 365.0 / 12.0
}

/// Instance-type price catalog
///
/// Entries keep their declaration (or file) order; sorting is a display
/// concern.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    entries: Vec<(String, f64)>,
}

impl PriceCatalog {
    /// Catalog with the built-in price table only
    pub fn builtin() -> Self {
        Self {
            entries: INSTANCE_PRICES
                .iter()
                .map(|(name, price)| (name.to_string(), *price))
                .collect(),
        }
    }

    /// Catalog with optional overrides from a TOML price file
    ///
    /// The file maps instance-type names to hourly prices:
    ///
    /// ```toml
    /// "t3.micro" = 0.0104
    /// "x2idn.huge" = 12.5
    /// ```
    ///
    /// Known types are overridden in place; new types are appended.
    pub fn load(price_file: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::builtin();
        if let Some(path) = price_file {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            let content = std::fs::read_to_string(path)?;
            let overrides: HashMap<String, f64> = toml::from_str(&content)
                .map_err(|e| ConfigError::PriceFile(format!("{}: {}", path.display(), e)))?;
            debug!(
                "Loaded {} price override(s) from {}",
                overrides.len(),
                path.display()
            );
            for (name, price) in overrides {
                catalog.upsert(name, price);
            }
        }
        Ok(catalog)
    }

    fn upsert(&mut self, name: String, price: f64) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((name, price)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact hourly price lookup
    pub fn hourly_price(&self, instance_type: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == instance_type)
            .map(|(_, price)| *price)
    }

    /// Hourly price, falling back to the prefix-family estimate
    pub fn price_or_estimate(&self, instance_type: &str) -> f64 {
        match self.hourly_price(instance_type) {
            Some(price) => price,
            None => {
                warn!(
                    "Instance type {} not in catalog, using family estimate",
                    instance_type
                );
                estimate_hourly_price(instance_type)
            }
        }
    }

    /// Filter instance types by a case-insensitive regex, truncated to `limit`.
    ///
    /// An invalid pattern matches everything rather than erroring, so a
    /// half-typed filter still shows results.
    pub fn filter(&self, pattern: &str, limit: usize) -> Vec<(&str, f64)> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build();
        self.entries
            .iter()
            .filter(|(name, _)| match &regex {
                Ok(re) => re.is_match(name),
                Err(_) => true,
            })
            .take(limit)
            .map(|(name, price)| (name.as_str(), *price))
            .collect()
    }

    /// Sorted, deduplicated instance family prefixes (the part before '.')
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .entries
            .iter()
            .map(|(name, _)| name.split('.').next().unwrap_or(name).to_string())
            .collect();
        families.sort();
        families.dedup();
        families
    }
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// List known instance types (or family prefixes) as text or JSON
pub fn show_instances(
    catalog: &PriceCatalog,
    filter: &str,
    limit: usize,
    families: bool,
    output_format: &str,
) -> Result<()> {
    if families {
        let families = catalog.families();
        if output_format == "json" {
            println!("{}", serde_json::to_string_pretty(&families)?);
        } else {
            for family in families {
                println!("{}", family);
            }
        }
        return Ok(());
    }

    let filtered = catalog.filter(filter, limit);

    if output_format == "json" {
        let doc: Vec<serde_json::Value> = filtered
            .iter()
            .map(|(name, price)| {
                serde_json::json!({
                    "instance_type": name,
                    "hourly_cost": price,
                    "daily_cost": daily_cost(*price, 1.0),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!("No results");
        return Ok(());
    }

    let mut table = comfy_table::Table::new();
    table.set_header(vec!["Instance Type", "Hourly", "Daily"]);
    for (name, price) in &filtered {
        table.add_row(vec![
            comfy_table::Cell::new(name),
            comfy_table::Cell::new(format!("${:.4}", price)),
            comfy_table::Cell::new(format!("${:.2}", daily_cost(*price, 1.0))),
        ]);
    }
    println!("{}", table);
    println!(
        "{} type(s) shown (of {} known)",
        console::style(filtered.len()).cyan(),
        catalog.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_instance_prices() {
        let catalog = PriceCatalog::builtin();
        assert_eq!(catalog.hourly_price("t3.micro"), Some(0.0104));
        assert_eq!(catalog.hourly_price("t3.small"), Some(0.0208));
        assert_eq!(catalog.hourly_price("g4dn.xlarge"), Some(0.526));
        assert_eq!(catalog.hourly_price("p5.48xlarge"), Some(98.32));
        assert_eq!(catalog.hourly_price("does.not.exist"), None);
    }

    #[test]
    fn test_price_or_estimate_fallback() {
        let catalog = PriceCatalog::builtin();
        assert_eq!(catalog.price_or_estimate("t3.micro"), 0.0104);
        // unknown type falls back to a positive family estimate
        assert!(catalog.price_or_estimate("unknown.type") > 0.0);
        assert_eq!(catalog.price_or_estimate("t3.mystery"), 0.0416);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = PriceCatalog::builtin();
        let lower = catalog.filter("t3\\.", DEFAULT_TYPE_LIMIT);
        let upper = catalog.filter("T3\\.", DEFAULT_TYPE_LIMIT);
        assert!(!lower.is_empty());
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_filter_invalid_regex_matches_all() {
        let catalog = PriceCatalog::builtin();
        let filtered = catalog.filter("t3.(", catalog.len());
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn test_filter_respects_limit() {
        let catalog = PriceCatalog::builtin();
        let filtered = catalog.filter("", 5);
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn test_families_sorted_and_deduplicated() {
        let catalog = PriceCatalog::builtin();
        let families = catalog.families();
        assert!(families.contains(&"t2".to_string()));
        assert!(families.contains(&"t3".to_string()));
        assert!(families.contains(&"g4dn".to_string()));
        let mut sorted = families.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(families, sorted);
    }

    #[test]
    fn test_daily_and_monthly_cost() {
        let daily = daily_cost(0.1, 2.0);
        assert!((daily - 4.8).abs() < 1e-12);
        assert!((monthly_cost(daily) - 4.8 * 365.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_with_overrides() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\"t3.micro\" = 0.02").unwrap();
        writeln!(file, "\"x2idn.metal\" = 13.338").unwrap();

        let catalog = PriceCatalog::load(Some(file.path())).unwrap();
        assert_eq!(catalog.hourly_price("t3.micro"), Some(0.02));
        assert_eq!(catalog.hourly_price("x2idn.metal"), Some(13.338));
        // untouched entries keep their builtin price
        assert_eq!(catalog.hourly_price("t2.micro"), Some(0.0116));
    }

    #[test]
    fn test_load_missing_price_file() {
        let result = PriceCatalog::load(Some(Path::new("/nonexistent/prices.toml")));
        assert!(result.is_err());
    }
}
