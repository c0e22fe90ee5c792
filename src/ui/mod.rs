pub mod components;
pub mod navigation;
pub mod screens;
pub mod styles;

pub use components::TerminalGuard;
pub use navigation::{ResultsParams, Route, ScreenOutcome};
pub use screens::{run_results_screen, run_selector_screen};
