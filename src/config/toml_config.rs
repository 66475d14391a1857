use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://hazelnut.onrender.com";

/// What the form collector does with input that does not parse as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Refuse the submission before anything is sent.
    #[default]
    Reject,
    /// Send NaN along; it goes over the wire as `null`.
    Forward,
}

/// How overlapping submissions are arbitrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Only the most recently issued submission may update the view.
    #[default]
    LatestWins,
    /// A new submission is refused while one is in flight.
    SingleFlight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub numeric_policy: NumericPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub policy: SubmissionPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl CalculatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, expanding `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.engine.base_url
    }

    pub fn numeric_policy(&self) -> NumericPolicy {
        self.form.numeric_policy
    }

    pub fn submission_policy(&self) -> SubmissionPolicy {
        self.submission.policy
    }
}

impl Validate for CalculatorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("engine.base_url", &self.engine.base_url)?;

        if let Some(timeout) = self.engine.timeout_seconds {
            validation::validate_positive_number("engine.timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CalculatorConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.engine.timeout_seconds, None);
        assert_eq!(config.numeric_policy(), NumericPolicy::Reject);
        assert_eq!(config.submission_policy(), SubmissionPolicy::LatestWins);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[engine]
base_url = "http://127.0.0.1:5000"
timeout_seconds = 10

[form]
numeric_policy = "forward"

[submission]
policy = "single_flight"

[logging]
format = "json"
"#;

        let config = CalculatorConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.engine.timeout_seconds, Some(10));
        assert_eq!(config.numeric_policy(), NumericPolicy::Forward);
        assert_eq!(config.submission_policy(), SubmissionPolicy::SingleFlight);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HAZELNUT_TEST_ENGINE_URL", "https://pricing.test");

        let toml_content = r#"
[engine]
base_url = "${HAZELNUT_TEST_ENGINE_URL}"
"#;

        let config = CalculatorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.base_url(), "https://pricing.test");

        std::env::remove_var("HAZELNUT_TEST_ENGINE_URL");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let toml_content = r#"
[form]
numeric_policy = "coerce"
"#;

        assert!(matches!(
            CalculatorConfig::from_toml_str(toml_content),
            Err(CalcError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[engine]
base_url = "not-a-url"
"#;
        let config = CalculatorConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[engine]
timeout_seconds = 0
"#;
        let config = CalculatorConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[engine]\nbase_url = \"https://file.test\"\n")
            .unwrap();

        let config = CalculatorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "https://file.test");
    }
}
