// Client configuration, read from the environment with local defaults

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_METRIC: &str = "correctness";
pub const DEFAULT_TESTS_FILE: &str = "tests.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Evaluator origin; `/api/evaluate` is appended per request
    pub base_url: String,
    pub metric: String,
    pub tests_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            metric: DEFAULT_METRIC.to_string(),
            tests_file: PathBuf::from(DEFAULT_TESTS_FILE),
        }
    }
}

impl Config {
    /// Load from PLAYGROUND_URL, PLAYGROUND_METRIC and PLAYGROUND_TESTS_FILE
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("PLAYGROUND_URL").unwrap_or(defaults.base_url),
            metric: non_empty("PLAYGROUND_METRIC").unwrap_or(defaults.metric),
            tests_file: non_empty("PLAYGROUND_TESTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tests_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.metric, "correctness");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PLAYGROUND_URL", "http://eval.internal:9000"),
            ("PLAYGROUND_METRIC", "faithfulness"),
            ("PLAYGROUND_TESTS_FILE", "suite.json"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://eval.internal:9000");
        assert_eq!(config.metric, "faithfulness");
        assert_eq!(config.tests_file, PathBuf::from("suite.json"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(|key| {
            (key == "PLAYGROUND_METRIC").then(|| "   ".to_string())
        });
        assert_eq!(config.metric, DEFAULT_METRIC);
    }
}
