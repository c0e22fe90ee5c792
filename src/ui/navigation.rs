use std::fmt;

use crate::error::{AppError, Result};

/// Typed input of the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsParams {
    pub make: String,
    pub year: i32,
}

/// Central routing type for the TUI flows.
///
/// Path forms are `/` and `/results/{make}/{year}`; a results route may lack
/// either segment, in which case the results screen issues no request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Selector,
    Results {
        make: Option<String>,
        year: Option<i32>,
    },
}

impl Route {
    pub fn results(make: impl Into<String>, year: i32) -> Self {
        Route::Results {
            make: Some(make.into()),
            year: Some(year),
        }
    }

    /// Both parameters, when present and the make is non-empty.
    pub fn params(&self) -> Option<ResultsParams> {
        match self {
            Route::Results {
                make: Some(make),
                year: Some(year),
            } if !make.is_empty() => Some(ResultsParams {
                make: make.clone(),
                year: *year,
            }),
            _ => None,
        }
    }

    /// Human readable label used by headers and logs.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Selector => "Find Your Vehicle",
            Route::Results { .. } => "Vehicle Models",
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Selector => "/".to_string(),
            Route::Results { make, year } => {
                let mut path = "/results".to_string();
                if let Some(make) = make {
                    path.push('/');
                    path.push_str(&urlencoding::encode(make));
                    if let Some(year) = year {
                        path.push('/');
                        path.push_str(&year.to_string());
                    }
                }
                path
            }
        }
    }

    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path
            .trim()
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .collect();

        match segments.as_slice() {
            [""] => Ok(Route::Selector),
            ["results", rest @ ..] if rest.len() <= 2 => {
                let make = match rest.first() {
                    Some(raw) if !raw.is_empty() => Some(
                        urlencoding::decode(raw)
                            .map_err(|err| {
                                AppError::message(format!("Invalid make segment `{raw}`: {err}"))
                            })?
                            .into_owned(),
                    ),
                    _ => None,
                };
                let year = match rest.get(1) {
                    Some(raw) if !raw.is_empty() => Some(raw.parse::<i32>().map_err(|_| {
                        AppError::message(format!("Invalid year segment `{raw}` in route"))
                    })?),
                    _ => None,
                };
                Ok(Route::Results { make, year })
            }
            _ => Err(AppError::message(format!("Unknown route `{path}`"))),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// How a screen handed control back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOutcome {
    Navigate(Route),
    Exit,
}
