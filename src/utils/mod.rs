pub mod text;
pub mod time;

pub use text::{contains_ignore_case, truncate_to_width};
pub use time::{current_year, model_years};
