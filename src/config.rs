use crate::eval::MetricSpec;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ragbench: RagbenchConfig,
    pub embeddings: EmbeddingsConfig,
    pub eval: EvalConfig,
}

/// Paths and logging
#[derive(Debug, Clone, Deserialize)]
pub struct RagbenchConfig {
    /// Candidate embedding table (JSON array; order = universe order).
    pub candidates_path: PathBuf,
    /// Eval query set (JSON array).
    pub queries_path: PathBuf,
    /// Optional per-id disk cache for query embeddings.
    #[serde(default)]
    pub query_cache_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Embeddings configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub dimensions: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    1000
}

/// Evaluation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Metric specs to compute per query, e.g. ["mrr", "hit@3", "recall@20"].
    pub metrics: Vec<String>,
    /// Optional minimum mean value per metric; the eval binary exits non-zero
    /// when any configured threshold is missed.
    #[serde(default)]
    pub thresholds: HashMap<String, f64>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RAGBENCH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RAGBENCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.embeddings.dimensions == 0 {
            anyhow::bail!("embeddings.dimensions must be greater than 0");
        }

        if self.eval.metrics.is_empty() {
            anyhow::bail!("eval.metrics must list at least one metric");
        }

        // Reject malformed metric specs at startup instead of mid-run
        for spec in &self.eval.metrics {
            spec.parse::<MetricSpec>()
                .with_context(|| format!("eval.metrics entry {:?} is not a valid metric", spec))?;
        }
        for spec in self.eval.thresholds.keys() {
            spec.parse::<MetricSpec>().with_context(|| {
                format!("eval.thresholds key {:?} is not a valid metric", spec)
            })?;
        }

        Ok(())
    }

    pub fn candidates_path(&self) -> &Path {
        &self.ragbench.candidates_path
    }

    pub fn queries_path(&self) -> &Path {
        &self.ragbench.queries_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(temp_dir: &TempDir, body: &str) -> PathBuf {
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    fn valid_config() -> String {
        r#"
[ragbench]
candidates_path = "candidate_embeddings.json"
queries_path = "eval_queries.json"
query_cache_dir = "query_cache"
log_level = "debug"

[embeddings]
dimensions = 1536
cache_capacity = 100

[eval]
metrics = ["mrr", "hit@3", "recall@20"]

[eval.thresholds]
mrr = 0.8
"hit@3" = 0.85
"#
        .to_string()
    }

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("RAGBENCH_CONFIG").ok();
        std::env::set_var("RAGBENCH_CONFIG", config_path.to_str().unwrap());
        f();
        match original {
            Some(val) => std::env::set_var("RAGBENCH_CONFIG", val),
            None => std::env::remove_var("RAGBENCH_CONFIG"),
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(&temp_dir, &valid_config());
        with_config_env(&config_path, || {
            let config = Config::load().expect("valid config should load");
            assert_eq!(config.ragbench.log_level, "debug");
            assert_eq!(config.embeddings.dimensions, 1536);
            assert_eq!(config.eval.metrics.len(), 3);
            assert_eq!(config.eval.thresholds.get("mrr"), Some(&0.8));
            assert_eq!(
                config.ragbench.query_cache_dir.as_deref(),
                Some(Path::new("query_cache"))
            );
        });
    }

    #[test]
    fn test_config_rejects_bad_metric() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let body = valid_config().replace("\"hit@3\", ", "\"hit@abc\", ");
        let config_path = write_config(&temp_dir, &body);
        with_config_env(&config_path, || {
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("hit@abc"));
        });
    }

    #[test]
    fn test_config_rejects_empty_metrics() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let body = valid_config().replace(
            "metrics = [\"mrr\", \"hit@3\", \"recall@20\"]",
            "metrics = []",
        );
        // Thresholds reference metrics; drop them for this case
        let body = body.split("[eval.thresholds]").next().unwrap().to_string();
        let config_path = write_config(&temp_dir, &body);
        with_config_env(&config_path, || {
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("at least one metric"));
        });
    }

    #[test]
    fn test_config_missing_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Path::new("nonexistent.toml"), || {
            assert!(Config::load().is_err());
        });
    }
}
