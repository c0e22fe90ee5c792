pub mod cards;
pub mod terminal;
pub mod utils;

pub use cards::render_card_grid;
pub use terminal::TerminalGuard;
