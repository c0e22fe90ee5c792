use std::borrow::Cow;

use ratatui::prelude::Stylize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};

/// Accent color used for prompts, highlights, and the Next button.
pub const ACCENT: Color = Color::Indexed(33);

/// Build a styled text block for headers.
pub fn header_text<'a>(text: impl Into<Cow<'a, str>>) -> Text<'a> {
    let owned = text.into().into_owned();
    Text::from(owned.bold().fg(ACCENT))
}

/// Produce a dimmed line for secondary descriptions and hints.
pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}

pub fn selection_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Border style for the focused widget.
pub fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn warning_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn disabled_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
