use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> RelayError {
    RelayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_project_id(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains('/') {
        return Err(invalid(field_name, value, "Project ID cannot contain '/'"));
    }
    Ok(())
}

/// Pub/Sub topic IDs: 3-255 chars, leading letter, no `goog` prefix.
pub fn validate_topic_id(field_name: &str, value: &str) -> Result<()> {
    if !(3..=255).contains(&value.len()) {
        return Err(invalid(
            field_name,
            value,
            "Topic ID must be between 3 and 255 characters",
        ));
    }

    if !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid(field_name, value, "Topic ID must start with a letter"));
    }

    if value.to_ascii_lowercase().starts_with("goog") {
        return Err(invalid(field_name, value, "Topic ID cannot start with 'goog'"));
    }

    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "-_.~+%".contains(*c)))
    {
        return Err(invalid(
            field_name,
            value,
            format!("Topic ID contains unsupported character '{}'", bad),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://pubsub.googleapis.com").is_ok());
        assert!(validate_url("endpoint", "http://localhost:8085").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30, 1, 600).is_ok());
        assert!(validate_range("timeout_seconds", 0, 1, 600).is_err());
        assert!(validate_range("timeout_seconds", 601, 1, 600).is_err());
    }

    #[test]
    fn test_validate_topic_id() {
        assert!(validate_topic_id("topic_id", "bq-conn-topic").is_ok());
        assert!(validate_topic_id("topic_id", "orders.v1~eu+%20").is_ok());
        assert!(validate_topic_id("topic_id", "ab").is_err());
        assert!(validate_topic_id("topic_id", "1orders").is_err());
        assert!(validate_topic_id("topic_id", "google-topic").is_err());
        assert!(validate_topic_id("topic_id", "orders/eu").is_err());
    }

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("project_id", "bdb-org-cicd").is_ok());
        assert!(validate_project_id("project_id", "  ").is_err());
        assert!(validate_project_id("project_id", "projects/demo").is_err());
    }
}
