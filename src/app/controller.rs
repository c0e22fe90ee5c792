use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::VehicleSource;
use crate::ui::{run_results_screen, run_selector_screen, Route, ScreenOutcome};
use crate::utils::{current_year, model_years};

/// Coordinates configuration, the vPIC client, and the TUI screens.
///
/// Screens share nothing; each mount starts from fresh state.
pub struct AppController {
    config: Config,
    source: Arc<dyn VehicleSource>,
}

impl AppController {
    /// `config` is expected to have passed `validate_config` already.
    pub fn new(config: Config, source: Arc<dyn VehicleSource>) -> Self {
        Self { config, source }
    }

    pub async fn run(self, initial: Route) -> Result<()> {
        let mut route = initial;

        loop {
            info!("Navigating to {route}");
            let outcome = match &route {
                Route::Selector => {
                    run_selector_screen(Arc::clone(&self.source), self.years()).await?
                }
                Route::Results { .. } => {
                    run_results_screen(Arc::clone(&self.source), route.clone(), self.year_bounds())
                        .await?
                }
            };

            match outcome {
                ScreenOutcome::Navigate(next) => route = next,
                ScreenOutcome::Exit => return Ok(()),
            }
        }
    }

    /// Year list for a new selector mount, bounded by today's year.
    fn years(&self) -> Vec<i32> {
        model_years(self.config.years.first, current_year())
    }

    fn year_bounds(&self) -> (i32, i32) {
        (self.config.years.first, current_year())
    }
}
