use std::collections::HashMap;

use crate::config::ApiConfig;
use crate::error::AppError;

use super::FetchResult;

/// Full URL of the make list for the configured vehicle type.
pub fn makes_url(api: &ApiConfig) -> FetchResult<String> {
    let replacements = HashMap::from([("vehicle_type", api.vehicle_type.as_str())]);
    let path = render_template(&api.makes_path, &replacements)?;
    Ok(format!("{}{}", api.base_url, path))
}

/// Full URL of the model list for one `(make, year)` pair.
pub fn models_url(api: &ApiConfig, make: &str, year: i32) -> FetchResult<String> {
    let year = year.to_string();
    let replacements = HashMap::from([
        ("make", make),
        ("year", year.as_str()),
        ("vehicle_type", api.vehicle_type.as_str()),
    ]);
    let path = render_template(&api.models_path, &replacements)?;
    Ok(format!("{}{}", api.base_url, path))
}

/// Substitute `{key}` placeholders; every value is percent-encoded as a path segment.
fn render_template(template: &str, replacements: &HashMap<&str, &str>) -> FetchResult<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            let mut key = String::new();
            let mut closed = false;
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == '}' {
                    closed = true;
                    break;
                }
                key.push(next);
            }

            if !closed {
                return Err(AppError::message(format!(
                    "Unterminated placeholder in template: {{{key}"
                )));
            }

            if key.is_empty() {
                return Err(AppError::message(
                    "Encountered empty placeholder `{}` in template",
                ));
            }

            let value = replacements.get(key.as_str()).ok_or_else(|| {
                AppError::message(format!(
                    "No replacement provided for placeholder `{}` in template",
                    key
                ))
            })?;
            result.push_str(&urlencoding::encode(value));
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
