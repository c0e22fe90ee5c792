pub mod results;
pub mod selector;

pub use results::{run_results_screen, ResultsScreen};
pub use selector::{run_selector_screen, SelectorScreen};
