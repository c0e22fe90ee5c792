use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::app::selection::{MakesPhase, SelectorSession};
use crate::error::Result;
use crate::fetch::VehicleSource;
use crate::ui::components::utils::{centered_box, split_horizontal, split_vertical};
use crate::ui::navigation::{Route, ScreenOutcome};
use crate::ui::styles::{
    disabled_style, error_style, focus_style, header_text, secondary_line, selection_style, ACCENT,
};
use crate::ui::TerminalGuard;

const MAKE_PLACEHOLDER: &str = "Select a Make";
const YEAR_PLACEHOLDER: &str = "Select a Year";
const PAGE_STEP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Search,
    Make,
    Year,
    Next,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Search, Focus::Make, Focus::Year, Focus::Next];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Selector session plus the widget state needed to draw it.
pub struct SelectorScreen {
    session: SelectorSession,
    focus: Focus,
    make_list: ListState,
    year_list: ListState,
    hint: Option<String>,
}

impl SelectorScreen {
    pub fn mount(source: Arc<dyn VehicleSource>, years: Vec<i32>) -> Self {
        Self {
            session: SelectorSession::mount(source, years),
            focus: Focus::Search,
            make_list: ListState::default().with_selected(Some(0)),
            year_list: ListState::default().with_selected(Some(0)),
            hint: None,
        }
    }

    pub fn session(&self) -> &SelectorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SelectorSession {
        &mut self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Apply one key press. Returns an outcome when the screen should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Some(ScreenOutcome::Exit);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Make => self.handle_make_key(key),
            Focus::Year => self.handle_year_key(key),
            Focus::Next => self.handle_next_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        if key.code == KeyCode::Enter {
            self.run_search();
            return None;
        }

        let selection = &mut self.session.state_mut().selection;
        let mut text = selection.filter_text.clone();
        match key.code {
            KeyCode::Char(ch) => text.push(ch),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return None,
        }
        selection.on_filter_change(&text);
        None
    }

    fn run_search(&mut self) {
        let filter = self.session.state().selection.filter_text.clone();
        match self.session.state_mut().search() {
            Some(name) => {
                self.sync_make_cursor();
                self.hint = Some(format!("Selected {name}"));
            }
            None => {
                self.hint = Some(format!("No make matches \"{filter}\""));
            }
        }
    }

    fn handle_make_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        let len = self.session.state().makes().len() + 1;
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let idx = self.make_list.selected().unwrap_or(0);
                let value = match idx {
                    0 => String::new(),
                    n => self
                        .session
                        .state()
                        .makes()
                        .get(n - 1)
                        .map(|make| make.name.clone())
                        .unwrap_or_default(),
                };
                self.session.state_mut().selection.on_make_change(&value);
                self.hint = None;
            }
            KeyCode::Char('r') => self.reload(),
            code => move_cursor(&mut self.make_list, code, len),
        }
        None
    }

    fn handle_year_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        let len = self.session.state().years().len() + 1;
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let idx = self.year_list.selected().unwrap_or(0);
                let value = match idx {
                    0 => String::new(),
                    n => self
                        .session
                        .state()
                        .years()
                        .get(n - 1)
                        .map(|year| year.to_string())
                        .unwrap_or_default(),
                };
                self.session.state_mut().selection.on_year_change(&value);
                self.hint = None;
            }
            KeyCode::Char('r') => self.reload(),
            code => move_cursor(&mut self.year_list, code, len),
        }
        None
    }

    fn handle_next_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                match self.session.state().selection.navigate_to_results() {
                    Some(route) => return Some(ScreenOutcome::Navigate(route)),
                    None => self.hint = Some("Pick a make and a year first.".to_string()),
                }
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        None
    }

    fn reload(&mut self) {
        self.session.reload();
        self.make_list.select(Some(0));
        self.hint = None;
    }

    /// Point the make cursor at the committed make.
    fn sync_make_cursor(&mut self) {
        let state = self.session.state();
        let idx = state
            .makes()
            .iter()
            .position(|make| make.name == state.selection.selected_make)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        self.make_list.select(Some(idx));
    }
}

fn move_cursor(list: &mut ListState, code: KeyCode, len: usize) {
    if len == 0 {
        return;
    }
    let current = list.selected().unwrap_or(0);
    let next = match code {
        KeyCode::Up | KeyCode::Char('k') => current.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (current + 1).min(len - 1),
        KeyCode::PageUp => current.saturating_sub(PAGE_STEP),
        KeyCode::PageDown => (current + PAGE_STEP).min(len - 1),
        KeyCode::Home => 0,
        KeyCode::End => len - 1,
        _ => current,
    };
    list.select(Some(next));
}

pub fn render_selector(f: &mut Frame<'_>, screen: &mut SelectorScreen) {
    let area = centered_box(90, 32, f.size());
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Route::Selector.title());
    let inner = outer.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(outer, area);

    let chunks = split_vertical(
        inner,
        &[
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    );

    f.render_widget(
        Paragraph::new(header_text("Find Your Vehicle")).alignment(Alignment::Center),
        chunks[0],
    );

    let state = screen.session.state();
    let selection = &state.selection;

    let search = Paragraph::new(Line::from(vec![
        Span::raw(selection.filter_text.clone()),
        if screen.focus == Focus::Search {
            Span::styled("▏", selection_style())
        } else {
            Span::raw("")
        },
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(screen.focus == Focus::Search))
            .title("Search… (Enter to search)"),
    );
    f.render_widget(search, chunks[1]);

    let columns = split_horizontal(
        chunks[2],
        &[Constraint::Percentage(60), Constraint::Percentage(40)],
    );

    let make_items: Vec<ListItem> = std::iter::once(MAKE_PLACEHOLDER.to_string())
        .chain(state.makes().iter().map(|make| make.name.clone()))
        .map(|label| {
            let committed = !selection.selected_make.is_empty() && label == selection.selected_make;
            list_item(label, committed)
        })
        .collect();
    let make_title = format!("Vehicle Make: {}", display_value(&selection.selected_make));
    let make_list = List::new(make_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(screen.focus == Focus::Make))
                .title(make_title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let year_items: Vec<ListItem> = std::iter::once(YEAR_PLACEHOLDER.to_string())
        .chain(state.years().iter().map(|year| year.to_string()))
        .map(|label| {
            let committed = !selection.selected_year.is_empty() && label == selection.selected_year;
            list_item(label, committed)
        })
        .collect();
    let year_title = format!("Model Year: {}", display_value(&selection.selected_year));
    let year_list = List::new(year_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(screen.focus == Focus::Year))
                .title(year_title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let enabled = selection.compute_next_enabled();
    let next_style = match (enabled, screen.focus == Focus::Next) {
        (true, true) => Style::default()
            .fg(Color::White)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
        (true, false) => selection_style(),
        (false, _) => disabled_style(),
    };
    let next = Paragraph::new(Span::styled("Next ›", next_style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(screen.focus == Focus::Next)),
        );

    let status = match state.phase() {
        MakesPhase::Loading => secondary_line("Loading vehicle makes…"),
        MakesPhase::Failed(message) => Line::from(Span::styled(
            format!("{message} Press r to reload."),
            error_style(),
        )),
        MakesPhase::Ready => match &screen.hint {
            Some(hint) => Line::from(hint.clone()),
            None => secondary_line(format!("{} makes loaded", state.makes().len())),
        },
    };

    f.render_widget(next, chunks[3]);
    f.render_widget(Paragraph::new(status), chunks[4]);
    f.render_widget(
        Paragraph::new(secondary_line(
            "Tab focus • ↑/↓ move • Enter choose • r reload • Esc quit",
        )),
        chunks[5],
    );

    f.render_stateful_widget(make_list, columns[0], &mut screen.make_list);
    f.render_stateful_widget(year_list, columns[1], &mut screen.year_list);
}

fn list_item(label: String, committed: bool) -> ListItem<'static> {
    if committed {
        ListItem::new(Line::from(Span::styled(format!("✓ {label}"), selection_style())))
    } else {
        ListItem::new(Line::from(format!("  {label}")))
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

/// Drive the selector screen until the user navigates or quits.
pub async fn run_selector_screen(
    source: Arc<dyn VehicleSource>,
    years: Vec<i32>,
) -> Result<ScreenOutcome> {
    let mut guard = TerminalGuard::new()?;
    let mut screen = SelectorScreen::mount(source, years);

    loop {
        screen.session.pump();
        guard
            .terminal_mut()
            .draw(|f| render_selector(f, &mut screen))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = screen.handle_key(key) {
                    guard.restore()?;
                    return Ok(outcome);
                }
            }
        }

        tokio::task::yield_now().await;
    }
}
