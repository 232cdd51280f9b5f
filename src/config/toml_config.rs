use crate::utils::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub publisher: Option<PublisherSection>,
    pub record: Option<RecordSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherSection {
    pub project_id: Option<String>,
    pub topic_id: Option<String>,
    pub endpoint: Option<String>,
    pub emulator_host: Option<String>,
    pub access_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSection {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| RelayError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses `content`, resolving `${VAR}` references through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unknown variables are left as-is.
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn publisher(&self) -> PublisherSection {
        self.publisher.clone().unwrap_or_default()
    }

    pub fn record(&self) -> RecordSection {
        self.record.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[publisher]
project_id = "demo-project"
topic_id = "people"
endpoint = "https://pubsub.example.com"
timeout_seconds = 5

[record]
first_name = "Ada"
last_name = "Lovelace"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let publisher = config.publisher();

        assert_eq!(publisher.project_id.as_deref(), Some("demo-project"));
        assert_eq!(publisher.topic_id.as_deref(), Some("people"));
        assert_eq!(publisher.timeout_seconds, Some(5));
        assert!(publisher.access_token.is_none());
        assert_eq!(config.record().first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.publisher().project_id.is_none());
        assert!(config.record().last_name.is_none());
    }

    #[test]
    fn test_var_substitution() {
        let toml_content = r#"
[publisher]
access_token = "${RELAY_TOKEN}"
topic_id = "${RELAY_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str_with(toml_content, |name| {
            (name == "RELAY_TOKEN").then(|| "secret-token".to_string())
        })
        .unwrap();
        let publisher = config.publisher();
        assert_eq!(publisher.access_token.as_deref(), Some("secret-token"));
        assert_eq!(
            publisher.topic_id.as_deref(),
            Some("${RELAY_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[publisher\nproject_id = 1").unwrap_err();
        assert!(matches!(err, RelayError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[publisher]\ntopic_id = \"from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.publisher().topic_id.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/nonexistent/xml-relay.toml").unwrap_err();
        assert!(matches!(err, RelayError::ConfigError { .. }));
    }
}
