use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub lambda: LambdaConfig,
    pub ec2: Ec2Config,
}

/// Default Lambda parameters used when no CLI flag is given
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaConfig {
    /// Memory allocation per invocation in MB (128..=10240)
    pub memory_size_mb: u32,
    /// Ephemeral storage per invocation in MB (512..=10240)
    pub storage_mb: u32,
    /// Average invocation duration in milliseconds
    pub compute_time_ms: u32,
}

/// Default EC2 comparison parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ec2Config {
    /// Instance-type filter (regex, case-insensitive)
    pub filter: String,
    /// Number of EC2 instances to compare against
    pub num_instances: u32,
    /// Maximum instance types shown per query
    pub type_limit: usize,
    /// Optional TOML file overriding the built-in price catalog
    pub price_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lambda: LambdaConfig {
                memory_size_mb: 128,
                storage_mb: 512,
                compute_time_ms: 200,
            },
            ec2: Ec2Config {
                filter: "t2".to_string(),
                num_instances: 1,
                type_limit: crate::ec2::DEFAULT_TYPE_LIMIT,
                price_file: None,
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .costctl.toml in current dir, then ~/.config/costctl/config.toml
            let local = PathBuf::from(".costctl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("costctl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".costctl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Missing required fields");
                err.push_str("\n    - Incorrect value types");
                err.push_str("\n  Tip: Run 'costctl init' to create a new config file");
                err
            })?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!(
                    "   Using default configuration. Run 'costctl init' to create a config file."
                );
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.lambda.memory_size_mb, 128);
        assert_eq!(config.lambda.storage_mb, 512);
        assert_eq!(config.lambda.compute_time_ms, 200);
        assert_eq!(config.ec2.filter, "t2");
        assert_eq!(config.ec2.num_instances, 1);
        assert_eq!(config.ec2.type_limit, 50);
        assert!(config.ec2.price_file.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = Config::default();
        config.ec2.filter = "m5".to_string();
        config.lambda.memory_size_mb = 1024;
        assert!(config.save(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.ec2.filter, "m5");
        assert_eq!(loaded.lambda.memory_size_mb, 1024);
        assert_eq!(loaded.lambda.storage_mb, config.lambda.storage_mb);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        // Should return default config
        let config = Config::load(Some(&fake_path)).unwrap();
        assert_eq!(config.lambda.memory_size_mb, 128);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        let result = Config::load(Some(&config_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("init_test.toml");

        assert!(init_config(&config_path).is_ok());
        assert!(config_path.exists());

        // Verify it's valid TOML
        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.ec2.filter, "t2");
    }
}
