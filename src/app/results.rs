use std::sync::Arc;

use log::{debug, info, warn};

use crate::fetch::{FetchResult, FetchSlot, Generation, VehicleModel, VehicleSource};
use crate::ui::navigation::ResultsParams;

pub const MODELS_ERROR_MESSAGE: &str = "Error fetching vehicle models.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsPhase {
    Idle,
    Loading,
    Success(Vec<VehicleModel>),
    Failure(String),
}

/// What the results screen should draw. The variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Grid(&'a [VehicleModel]),
}

/// A request the session must issue after a route change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelsRequest {
    pub generation: Generation,
    pub params: ResultsParams,
}

/// Fetch state machine keyed by the `(make, year)` route pair.
#[derive(Debug, Clone)]
pub struct ResultsState {
    params: Option<ResultsParams>,
    generation: Generation,
    phase: ResultsPhase,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsState {
    pub fn new() -> Self {
        Self {
            params: None,
            generation: 0,
            phase: ResultsPhase::Idle,
        }
    }

    pub fn params(&self) -> Option<&ResultsParams> {
        self.params.as_ref()
    }

    pub fn phase(&self) -> &ResultsPhase {
        &self.phase
    }

    /// Apply new route parameters.
    ///
    /// Missing parameters leave the state idle with no request. Unchanged
    /// parameters issue nothing; anything else bumps the generation and
    /// returns the request to send.
    pub fn navigate(&mut self, params: Option<ResultsParams>) -> Option<ModelsRequest> {
        let Some(params) = params else {
            debug!("Results route is missing make or year; not fetching");
            self.params = None;
            self.generation += 1;
            self.phase = ResultsPhase::Idle;
            return None;
        };

        if self.params.as_ref() == Some(&params) && self.phase != ResultsPhase::Idle {
            return None;
        }

        self.generation += 1;
        self.params = Some(params.clone());
        self.phase = ResultsPhase::Loading;
        Some(ModelsRequest {
            generation: self.generation,
            params,
        })
    }

    /// Apply a completed request. Returns false when it was superseded.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: FetchResult<Vec<VehicleModel>>,
    ) -> bool {
        if generation != self.generation {
            info!(
                "Discarding stale model list (generation {generation}, current {})",
                self.generation
            );
            return false;
        }

        self.phase = match outcome {
            Ok(models) => ResultsPhase::Success(models),
            Err(err) => {
                warn!("Error fetching vehicle models: {err}");
                ResultsPhase::Failure(MODELS_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn view(&self) -> ResultsView<'_> {
        match &self.phase {
            ResultsPhase::Idle | ResultsPhase::Loading => ResultsView::Loading,
            ResultsPhase::Failure(message) => ResultsView::Error(message),
            ResultsPhase::Success(models) if models.is_empty() => ResultsView::Empty,
            ResultsPhase::Success(models) => ResultsView::Grid(models),
        }
    }
}

/// Results state plus the model request lifecycle.
pub struct ResultsSession {
    state: ResultsState,
    slot: FetchSlot<Vec<VehicleModel>>,
    source: Arc<dyn VehicleSource>,
}

impl ResultsSession {
    pub fn new(source: Arc<dyn VehicleSource>) -> Self {
        Self {
            state: ResultsState::new(),
            slot: FetchSlot::new(),
            source,
        }
    }

    /// Feed route parameters in; issues at most one request.
    pub fn navigate(&mut self, params: Option<ResultsParams>) {
        match self.state.navigate(params) {
            Some(ModelsRequest { generation, params }) => {
                let source = Arc::clone(&self.source);
                self.slot.spawn(generation, async move {
                    source.fetch_models(&params.make, params.year).await
                });
            }
            None if self.state.params().is_none() => self.slot.cancel(),
            None => {}
        }
    }

    /// Drain finished requests. Returns true when state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(tagged) = self.slot.poll() {
            changed |= self.state.complete(tagged.generation, tagged.outcome);
        }
        changed
    }

    /// Wait for the next completion and apply it.
    pub async fn settle(&mut self) -> bool {
        match self.slot.next().await {
            Some(tagged) => self.state.complete(tagged.generation, tagged.outcome),
            None => false,
        }
    }

    pub fn state(&self) -> &ResultsState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fetch::Make;
    use futures::future::BoxFuture;
    use std::sync::Mutex;
    use std::time::Duration;

    fn params(make: &str, year: i32) -> ResultsParams {
        ResultsParams {
            make: make.to_string(),
            year,
        }
    }

    fn model(name: &str, make: &str) -> VehicleModel {
        VehicleModel {
            model_name: name.to_string(),
            make_name: make.to_string(),
            model_id: None,
        }
    }

    #[test]
    fn starts_loading_when_params_are_present() {
        let mut state = ResultsState::new();
        let request = state.navigate(Some(params("Honda", 2020))).expect("request");

        assert_eq!(request.params, params("Honda", 2020));
        assert_eq!(state.phase(), &ResultsPhase::Loading);
        assert_eq!(state.view(), ResultsView::Loading);
    }

    #[test]
    fn missing_params_issue_nothing_and_keep_loading() {
        let mut state = ResultsState::new();
        assert_eq!(state.navigate(None), None);
        assert_eq!(state.phase(), &ResultsPhase::Idle);
        assert_eq!(state.view(), ResultsView::Loading);
    }

    #[test]
    fn same_params_do_not_refetch() {
        let mut state = ResultsState::new();
        assert!(state.navigate(Some(params("Honda", 2020))).is_some());
        assert!(state.navigate(Some(params("Honda", 2020))).is_none());
        assert!(state.navigate(Some(params("Honda", 2021))).is_some());
    }

    #[test]
    fn empty_results_render_empty_panel_only() {
        let mut state = ResultsState::new();
        let request = state.navigate(Some(params("Honda", 2020))).expect("request");

        assert!(state.complete(request.generation, Ok(Vec::new())));
        assert_eq!(state.view(), ResultsView::Empty);
    }

    #[test]
    fn failure_renders_fixed_error_and_clears_loading() {
        let mut state = ResultsState::new();
        let request = state.navigate(Some(params("Honda", 2020))).expect("request");

        assert!(state.complete(
            request.generation,
            Err(AppError::message("connection reset"))
        ));
        assert_eq!(state.view(), ResultsView::Error(MODELS_ERROR_MESSAGE));
    }

    #[test]
    fn success_keeps_models_verbatim() {
        let mut state = ResultsState::new();
        let request = state.navigate(Some(params("Honda", 2020))).expect("request");
        let models = vec![
            model("Pilot", "HONDA"),
            model("Accord", "HONDA"),
            model("Accord", "HONDA"),
        ];

        assert!(state.complete(request.generation, Ok(models.clone())));
        assert_eq!(state.view(), ResultsView::Grid(&models));
    }

    #[test]
    fn stale_response_cannot_overwrite_newer_selection() {
        let mut state = ResultsState::new();
        let first = state.navigate(Some(params("Honda", 2019))).expect("first");
        let second = state.navigate(Some(params("Toyota", 2021))).expect("second");

        assert!(!state.complete(first.generation, Ok(vec![model("Civic", "HONDA")])));
        assert_eq!(state.view(), ResultsView::Loading);

        let fresh = vec![model("Camry", "TOYOTA")];
        assert!(state.complete(second.generation, Ok(fresh.clone())));
        assert_eq!(state.view(), ResultsView::Grid(&fresh));
        assert_eq!(state.params(), Some(&params("Toyota", 2021)));
    }

    #[test]
    fn late_response_after_params_removed_is_ignored() {
        let mut state = ResultsState::new();
        let request = state.navigate(Some(params("Honda", 2020))).expect("request");
        state.navigate(None);

        assert!(!state.complete(request.generation, Ok(Vec::new())));
        assert_eq!(state.view(), ResultsView::Loading);
    }

    /// Records every model request; "Slow" makes answer after a delay.
    struct RecordingSource {
        calls: Mutex<Vec<(String, i32)>>,
    }

    impl RecordingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, i32)> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl VehicleSource for RecordingSource {
        fn fetch_makes(&self) -> BoxFuture<'_, FetchResult<Vec<Make>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn fetch_models<'a>(
            &'a self,
            make: &'a str,
            year: i32,
        ) -> BoxFuture<'a, FetchResult<Vec<VehicleModel>>> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((make.to_string(), year));
            Box::pin(async move {
                if make == "Slow" {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Ok(vec![model(&format!("{make} {year}"), make)])
            })
        }
    }

    #[tokio::test]
    async fn route_issues_exactly_one_request_with_route_values() {
        let source = RecordingSource::new();
        let mut session = ResultsSession::new(source.clone());

        session.navigate(Some(params("Honda", 2020)));
        assert!(session.settle().await);
        session.navigate(Some(params("Honda", 2020)));

        assert_eq!(source.calls(), vec![("Honda".to_string(), 2020)]);
        assert_eq!(
            session.state().view(),
            ResultsView::Grid(&[model("Honda 2020", "Honda")])
        );
    }

    #[tokio::test]
    async fn rapid_route_change_keeps_latest_selection() {
        let source = RecordingSource::new();
        let mut session = ResultsSession::new(source.clone());

        session.navigate(Some(params("Slow", 2019)));
        session.navigate(Some(params("Fast", 2021)));

        assert!(session.settle().await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        session.pump();

        assert_eq!(
            source.calls().last(),
            Some(&("Fast".to_string(), 2021))
        );
        assert_eq!(
            session.state().view(),
            ResultsView::Grid(&[model("Fast 2021", "Fast")])
        );
    }

    #[tokio::test]
    async fn missing_params_send_no_request() {
        let source = RecordingSource::new();
        let mut session = ResultsSession::new(source.clone());

        session.navigate(None);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!session.pump());
        assert!(source.calls().is_empty());
        assert_eq!(session.state().view(), ResultsView::Loading);
    }
}
