use std::sync::Arc;

use log::{info, warn};

use crate::fetch::{FetchResult, FetchSlot, Generation, Make, VehicleSource};
use crate::ui::navigation::Route;
use crate::utils::contains_ignore_case;

pub const MAKES_ERROR_MESSAGE: &str = "Error fetching vehicle makes.";

/// Form values of the selector screen. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_make: String,
    pub selected_year: String,
    pub filter_text: String,
}

impl SelectionState {
    pub fn on_make_change(&mut self, value: &str) {
        self.selected_make = value.to_string();
    }

    pub fn on_year_change(&mut self, value: &str) {
        self.selected_year = value.to_string();
    }

    /// Store the filter text; the make list is only searched on trigger.
    pub fn on_filter_change(&mut self, text: &str) {
        self.filter_text = text.to_string();
    }

    /// Select the first make (in API order) whose name contains the filter text.
    ///
    /// Returns the matched make name, leaving the selection untouched on no match.
    pub fn on_search_trigger<'a>(&mut self, makes: &'a [Make]) -> Option<&'a str> {
        let found = makes
            .iter()
            .find(|make| contains_ignore_case(&make.name, &self.filter_text))?;
        self.selected_make = found.name.clone();
        Some(found.name.as_str())
    }

    pub fn compute_next_enabled(&self) -> bool {
        !self.selected_make.is_empty() && !self.selected_year.is_empty()
    }

    /// Results route for the current selection, only when Next is enabled.
    pub fn navigate_to_results(&self) -> Option<Route> {
        if !self.compute_next_enabled() {
            return None;
        }
        Some(Route::Results {
            make: Some(self.selected_make.clone()),
            year: self.selected_year.trim().parse::<i32>().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MakesPhase {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the selector screen owns for one mount.
#[derive(Debug, Clone)]
pub struct SelectorState {
    makes: Vec<Make>,
    years: Vec<i32>,
    phase: MakesPhase,
    generation: Generation,
    pub selection: SelectionState,
}

impl SelectorState {
    pub fn new(years: Vec<i32>) -> Self {
        Self {
            makes: Vec::new(),
            years,
            phase: MakesPhase::Loading,
            generation: 0,
            selection: SelectionState::default(),
        }
    }

    pub fn makes(&self) -> &[Make] {
        &self.makes
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn phase(&self) -> &MakesPhase {
        &self.phase
    }

    /// Enter `Loading` and hand out the generation for the new request.
    pub fn begin_load(&mut self) -> Generation {
        self.generation += 1;
        self.phase = MakesPhase::Loading;
        self.generation
    }

    /// Apply a completed make request. Returns false when it was superseded.
    pub fn complete(&mut self, generation: Generation, outcome: FetchResult<Vec<Make>>) -> bool {
        if generation != self.generation {
            info!(
                "Discarding stale make list (generation {generation}, current {})",
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(makes) => {
                self.makes = makes;
                self.phase = MakesPhase::Ready;
            }
            Err(err) => {
                warn!("Error fetching vehicle makes: {err}");
                self.makes.clear();
                self.phase = MakesPhase::Failed(MAKES_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Run the search against the loaded makes.
    pub fn search(&mut self) -> Option<String> {
        let makes = &self.makes;
        self.selection.on_search_trigger(makes).map(str::to_string)
    }
}

/// Selector state plus the make request lifecycle.
pub struct SelectorSession {
    state: SelectorState,
    slot: FetchSlot<Vec<Make>>,
    source: Arc<dyn VehicleSource>,
}

impl SelectorSession {
    /// Mount the screen: build the year list and issue the make request.
    pub fn mount(source: Arc<dyn VehicleSource>, years: Vec<i32>) -> Self {
        let mut session = Self {
            state: SelectorState::new(years),
            slot: FetchSlot::new(),
            source,
        };
        session.reload();
        session
    }

    pub fn reload(&mut self) {
        let generation = self.state.begin_load();
        let source = Arc::clone(&self.source);
        self.slot
            .spawn(generation, async move { source.fetch_makes().await });
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

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SelectorState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fetch::VehicleModel;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make(id: i64, name: &str) -> Make {
        Make {
            id,
            name: name.to_string(),
        }
    }

    fn sample_makes() -> Vec<Make> {
        vec![make(474, "Honda"), make(448, "Toyota")]
    }

    #[test]
    fn next_enabled_truth_table() {
        for (make, year, expected) in [
            ("", "", false),
            ("Honda", "", false),
            ("", "2020", false),
            ("Honda", "2020", true),
        ] {
            let selection = SelectionState {
                selected_make: make.to_string(),
                selected_year: year.to_string(),
                filter_text: String::new(),
            };
            assert_eq!(
                selection.compute_next_enabled(),
                expected,
                "make={make:?} year={year:?}"
            );
        }
    }

    #[test]
    fn search_selects_first_case_insensitive_match() {
        let makes = sample_makes();
        let mut selection = SelectionState::default();
        selection.on_filter_change("hon");

        assert_eq!(selection.on_search_trigger(&makes), Some("Honda"));
        assert_eq!(selection.selected_make, "Honda");
    }

    #[test]
    fn search_without_match_keeps_selection() {
        let makes = sample_makes();
        let mut selection = SelectionState::default();
        selection.on_make_change("Toyota");
        selection.on_filter_change("xyz");

        assert_eq!(selection.on_search_trigger(&makes), None);
        assert_eq!(selection.selected_make, "Toyota");
    }

    #[test]
    fn search_uses_api_order_not_alphabetical() {
        let makes = vec![make(1, "Zeta Motors"), make(2, "Alpha Motors")];
        let mut selection = SelectionState::default();
        selection.on_filter_change("MOTORS");

        assert_eq!(selection.on_search_trigger(&makes), Some("Zeta Motors"));
    }

    #[test]
    fn filter_change_does_not_select() {
        let mut selection = SelectionState::default();
        selection.on_filter_change("hon");
        assert!(selection.selected_make.is_empty());
    }

    #[test]
    fn navigation_requires_both_values() {
        let mut selection = SelectionState::default();
        selection.on_make_change("Honda");
        assert_eq!(selection.navigate_to_results(), None);

        selection.on_year_change("2020");
        assert_eq!(
            selection.navigate_to_results(),
            Some(Route::results("Honda", 2020))
        );
    }

    #[test]
    fn failed_make_fetch_is_surfaced() {
        let mut state = SelectorState::new(vec![2015, 2016]);
        let generation = state.begin_load();

        assert!(state.complete(generation, Err(AppError::message("boom"))));
        assert_eq!(
            state.phase(),
            &MakesPhase::Failed(MAKES_ERROR_MESSAGE.to_string())
        );
        assert!(state.makes().is_empty());
        assert_eq!(state.search(), None);
    }

    #[test]
    fn stale_make_list_is_discarded() {
        let mut state = SelectorState::new(Vec::new());
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(!state.complete(first, Ok(vec![make(1, "Stale")])));
        assert_eq!(state.phase(), &MakesPhase::Loading);

        assert!(state.complete(second, Ok(sample_makes())));
        assert_eq!(state.phase(), &MakesPhase::Ready);
        assert_eq!(state.makes().len(), 2);
    }

    struct CountingSource {
        makes_calls: AtomicUsize,
    }

    impl VehicleSource for CountingSource {
        fn fetch_makes(&self) -> BoxFuture<'_, FetchResult<Vec<Make>>> {
            self.makes_calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(sample_makes()) })
        }

        fn fetch_models<'a>(
            &'a self,
            _make: &'a str,
            _year: i32,
        ) -> BoxFuture<'a, FetchResult<Vec<VehicleModel>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[tokio::test]
    async fn mount_issues_one_make_request() {
        let source = Arc::new(CountingSource {
            makes_calls: AtomicUsize::new(0),
        });
        let mut session = SelectorSession::mount(source.clone(), vec![2015]);

        assert!(session.settle().await);
        assert_eq!(source.makes_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.state().phase(), &MakesPhase::Ready);

        session.state_mut().selection.on_filter_change("toy");
        assert_eq!(session.state_mut().search().as_deref(), Some("Toyota"));
    }
}
