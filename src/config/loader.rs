use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Context, Result};

use super::{ApiConfig, Config, YearConfig};

/// Load a JSON config file, filling unset fields from the built-in defaults.
///
/// The result is not validated; callers apply CLI overrides first.
pub fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let config = parse_config(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    Ok(config)
}

pub(crate) fn parse_config(json: &str) -> serde_json::Result<Config> {
    let raw: RawConfig = serde_json::from_str(json)?;
    Ok(raw.into_config())
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    api: RawApiConfig,
    #[serde(default)]
    years: RawYearConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawApiConfig {
    base_url: Option<String>,
    vehicle_type: Option<String>,
    makes_path: Option<String>,
    models_path: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawYearConfig {
    first: Option<i32>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let defaults = Config::builtin();
        let config = Config {
            api: self.api.into_api_config(defaults.api),
            years: self.years.into_year_config(defaults.years),
        };
        let base_url = config.api.base_url.clone();
        config.with_base_url(&base_url)
    }
}

impl RawApiConfig {
    fn into_api_config(self, defaults: ApiConfig) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            vehicle_type: self.vehicle_type.unwrap_or(defaults.vehicle_type),
            makes_path: self.makes_path.unwrap_or(defaults.makes_path),
            models_path: self.models_path.unwrap_or(defaults.models_path),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

impl RawYearConfig {
    fn into_year_config(self, defaults: YearConfig) -> YearConfig {
        YearConfig {
            first: self.first.unwrap_or(defaults.first),
        }
    }
}
