use crate::error::{AppError, Result};

use super::{ApiConfig, Config, YearConfig};

/// Validate a config and surface every issue in one error.
pub fn validate_config(config: &Config, current_year: i32) -> Result<()> {
    let mut issues = Vec::new();

    validate_api(&config.api, &mut issues);
    validate_years(&config.years, current_year, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_api(api: &ApiConfig, issues: &mut Vec<String>) {
    let base = api.base_url.trim();
    if base.is_empty() {
        issues.push("api.base_url must not be empty".to_string());
    } else if !(base.starts_with("http://") || base.starts_with("https://")) {
        issues.push(format!(
            "api.base_url must start with http:// or https://, found `{base}`"
        ));
    }

    if api.vehicle_type.trim().is_empty() {
        issues.push("api.vehicle_type must not be empty".to_string());
    }

    if !api.makes_path.starts_with('/') {
        issues.push("api.makes_path must start with `/`".to_string());
    }

    if !api.models_path.starts_with('/') {
        issues.push("api.models_path must start with `/`".to_string());
    }
    for placeholder in ["{make}", "{year}"] {
        if !api.models_path.contains(placeholder) {
            issues.push(format!(
                "api.models_path should reference `{placeholder}` for substitution"
            ));
        }
    }

    if api.timeout.is_zero() {
        issues.push("api.timeout_secs must be greater than zero".to_string());
    }
}

fn validate_years(years: &YearConfig, current_year: i32, issues: &mut Vec<String>) {
    if years.first > current_year {
        issues.push(format!(
            "years.first ({}) is after the current year ({current_year})",
            years.first
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builtin_config_is_valid() {
        validate_config(&Config::builtin(), 2024).expect("builtin config should be valid");
    }

    #[test]
    fn rejects_models_path_without_year() {
        let mut config = Config::builtin();
        config.api.models_path = "/vehicles/GetModelsForMakeIdYear/makeId/{make}".to_string();

        let err = validate_config(&config, 2024).expect_err("validation should fail");
        let message = err.to_string();
        assert!(message.contains("`{year}`"), "unexpected error message: {message}");
        assert!(!message.contains("`{make}`"), "unexpected error message: {message}");
    }

    #[test]
    fn aggregates_multiple_issues() {
        let mut config = Config::builtin();
        config.api.base_url = "vpic.nhtsa.dot.gov".to_string();
        config.api.timeout = Duration::ZERO;
        config.years.first = 2030;

        let err = validate_config(&config, 2024).expect_err("validation should fail");
        let message = err.to_string();
        assert!(message.contains("http://"), "unexpected error message: {message}");
        assert!(message.contains("timeout_secs"), "unexpected error message: {message}");
        assert!(message.contains("years.first"), "unexpected error message: {message}");
    }
}
