use std::time::Duration;

pub mod loader;
pub mod validator;

pub use loader::load_config;
pub use validator::validate_config;

pub const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api";
pub const DEFAULT_VEHICLE_TYPE: &str = "car";
pub const DEFAULT_MAKES_PATH: &str = "/vehicles/GetMakesForVehicleType/{vehicle_type}?format=json";
pub const DEFAULT_MODELS_PATH: &str =
    "/vehicles/GetModelsForMakeIdYear/makeId/{make}/modelyear/{year}?format=json";
pub const DEFAULT_FIRST_YEAR: i32 = 2015;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upstream vPIC endpoint definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub vehicle_type: String,
    /// Path template for the make list. Supports `{vehicle_type}`.
    pub makes_path: String,
    /// Path template for the model list. Requires `{make}` and `{year}`.
    pub models_path: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Bounds of the generated model-year list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearConfig {
    pub first: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api: ApiConfig,
    pub years: YearConfig,
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
                makes_path: DEFAULT_MAKES_PATH.to_string(),
                models_path: DEFAULT_MODELS_PATH.to_string(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                user_agent: format!("vehicle-finder/{}", env!("CARGO_PKG_VERSION")),
            },
            years: YearConfig {
                first: DEFAULT_FIRST_YEAR,
            },
        }
    }

    /// Replace the API base URL, dropping any trailing slash.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}
