use crate::utils::error::{DeskError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DeskError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DeskError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(DeskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ai.endpoint", "https://generativelanguage.googleapis.com").is_ok());
        assert!(validate_url("ai.endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("ai.endpoint", "").is_err());
        assert!(validate_url("ai.endpoint", "invalid-url").is_err());
        assert!(validate_url("ai.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let key = Some("secret".to_string());
        assert_eq!(validate_required_field("ai.api_key", &key).unwrap(), "secret");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("ai.api_key", &missing),
            Err(DeskError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range_for_prices() {
        assert!(validate_range("price", 0.0, 0.0, 100_000.0).is_ok());
        assert!(validate_range("price", 49.99, 0.0, 100_000.0).is_ok());
        assert!(validate_range("price", -1.0, 0.0, 100_000.0).is_err());
    }

    #[test]
    fn test_validate_non_empty_and_path() {
        assert!(validate_non_empty_string("model", "gemini-2.5-flash").is_ok());
        assert!(validate_non_empty_string("model", "   ").is_err());
        assert!(validate_path("data_file", "taller.json").is_ok());
        assert!(validate_path("data_file", "").is_err());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }
}
