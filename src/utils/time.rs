use chrono::{Datelike, Local};

/// Calendar year according to the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Contiguous, inclusive list of model years from `first` through `last`.
///
/// Returns an empty list when `first` is after `last`.
pub fn model_years(first: i32, last: i32) -> Vec<i32> {
    (first..=last).collect()
}
