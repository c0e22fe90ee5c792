pub mod bootstrap;
pub mod controller;
pub mod results;
pub mod selection;

pub use bootstrap::run;
pub use controller::AppController;
