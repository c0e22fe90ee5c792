use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::app::results::{ResultsSession, ResultsView};
use crate::error::Result;
use crate::fetch::VehicleSource;
use crate::ui::components::cards::{max_scroll, render_card_grid};
use crate::ui::components::utils::{centered_box, split_vertical};
use crate::ui::navigation::{Route, ScreenOutcome};
use crate::ui::styles::{error_style, header_text, secondary_line, warning_style, ACCENT};
use crate::ui::TerminalGuard;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Results session plus the route it was last given and the grid scroll.
pub struct ResultsScreen {
    session: ResultsSession,
    route: Route,
    years: (i32, i32),
    scroll: usize,
    tick: usize,
}

impl ResultsScreen {
    /// Mount on `route`; `years` bounds the ←/→ year stepping.
    pub fn mount(source: Arc<dyn VehicleSource>, route: Route, years: (i32, i32)) -> Self {
        let mut screen = Self {
            session: ResultsSession::new(source),
            route: Route::Selector,
            years,
            scroll: 0,
            tick: 0,
        };
        screen.set_route(route);
        screen
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn session(&self) -> &ResultsSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ResultsSession {
        &mut self.session
    }

    /// Point the screen at a new route; re-fetches only when the pair changed.
    pub fn set_route(&mut self, route: Route) {
        if route != self.route {
            self.scroll = 0;
        }
        self.session.navigate(route.params());
        self.route = route;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenOutcome> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(ScreenOutcome::Exit);
        }

        match key.code {
            KeyCode::Char('q') => return Some(ScreenOutcome::Exit),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                return Some(ScreenOutcome::Navigate(Route::Selector));
            }
            KeyCode::Left | KeyCode::Char('h') => self.step_year(-1),
            KeyCode::Right | KeyCode::Char('l') => self.step_year(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            _ => {}
        }
        None
    }

    fn step_year(&mut self, delta: i32) {
        let Some(params) = self.route.params() else {
            return;
        };
        let (first, last) = self.years;
        // A deep link outside the bounds lands on the nearest one.
        let year = (params.year + delta).clamp(first, last);
        if year == params.year {
            return;
        }
        self.set_route(Route::results(params.make, year));
    }
}

pub fn render_results(f: &mut Frame<'_>, screen: &mut ResultsScreen) {
    let area = f.size();
    let chunks = split_vertical(
        area,
        &[
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ],
    );

    let params = screen.route.params();
    let title = match &params {
        Some(p) => format!("Vehicle Models for {} - {}", p.make, p.year),
        None => screen.route.title().to_string(),
    };
    f.render_widget(
        Paragraph::new(header_text(title)).alignment(Alignment::Center),
        chunks[0],
    );

    let body = chunks[1];
    match screen.session.state().view() {
        ResultsView::Loading => {
            let frame = SPINNER[screen.tick % SPINNER.len()];
            let panel = centered_box(24, 3, body);
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(frame, Style::default().fg(ACCENT)),
                    Span::raw(" Loading…"),
                ]))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
                panel,
            );
        }
        ResultsView::Error(message) => {
            let panel = centered_box(60, 3, body);
            f.render_widget(
                Paragraph::new(Line::from(format!("⚠ {message}")))
                    .style(error_style())
                    .block(
                        Block::default()
                            .borders(Borders::LEFT)
                            .border_type(BorderType::Thick)
                            .border_style(error_style()),
                    ),
                panel,
            );
        }
        ResultsView::Empty => {
            let text = match &params {
                Some(p) => format!("No models found for {} in {}.", p.make, p.year),
                None => "No models found.".to_string(),
            };
            let panel = Rect {
                height: body.height.min(3),
                ..body
            };
            f.render_widget(
                Paragraph::new(text).style(warning_style()).block(
                    Block::default()
                        .borders(Borders::LEFT)
                        .border_type(BorderType::Thick)
                        .border_style(warning_style()),
                ),
                panel,
            );
        }
        ResultsView::Grid(models) => {
            let year = params.as_ref().map(|p| p.year).unwrap_or_default();
            screen.scroll = screen.scroll.min(max_scroll(models.len(), body));
            render_card_grid(f, body, models, year, screen.scroll);
        }
    }

    f.render_widget(
        Paragraph::new(secondary_line(
            "←/→ year • ↑/↓ scroll • Esc back • q quit",
        )),
        chunks[2],
    );
}

/// Drive the results screen until the user goes back or quits.
pub async fn run_results_screen(
    source: Arc<dyn VehicleSource>,
    route: Route,
    years: (i32, i32),
) -> Result<ScreenOutcome> {
    let mut guard = TerminalGuard::new()?;
    let mut screen = ResultsScreen::mount(source, route, years);

    loop {
        screen.session.pump();
        screen.tick = screen.tick.wrapping_add(1);
        guard
            .terminal_mut()
            .draw(|f| render_results(f, &mut screen))?;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::results::MODELS_ERROR_MESSAGE;
    use crate::error::AppError;
    use crate::fetch::{FetchResult, Make, VehicleModel};
    use crate::ui::components::utils::buffer_text;
    use futures::future::BoxFuture;
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;

    /// Answers from a fixed table keyed by make; unknown makes fail.
    struct TableSource {
        calls: Mutex<Vec<(String, i32)>>,
    }

    impl TableSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl VehicleSource for TableSource {
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
                match make {
                    "Honda" => Ok(vec![
                        VehicleModel {
                            model_name: "Civic".into(),
                            make_name: "HONDA".into(),
                            model_id: Some(1863),
                        },
                        VehicleModel {
                            model_name: "Accord".into(),
                            make_name: "HONDA".into(),
                            model_id: Some(1861),
                        },
                    ]),
                    "Empty" => Ok(Vec::new()),
                    _ => Err(AppError::message("503 Service Unavailable")),
                }
            })
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn render(screen: &mut ResultsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal
            .draw(|f| render_results(f, screen))
            .expect("draw");
        buffer_text(terminal.backend().buffer())
    }

    async fn settled(make: &str, year: i32) -> (ResultsScreen, Arc<TableSource>) {
        let source = TableSource::new();
        let mut screen = ResultsScreen::mount(source.clone(), Route::results(make, year), (2015, 2024));
        assert!(screen.session_mut().settle().await);
        (screen, source)
    }

    #[tokio::test]
    async fn grid_shows_cards_with_route_year() {
        let (mut screen, _) = settled("Honda", 2020).await;
        let text = render(&mut screen);

        assert!(text.contains("Vehicle Models for Honda - 2020"), "{text}");
        assert!(text.contains("Civic"), "{text}");
        assert!(text.contains("Accord"), "{text}");
        assert_eq!(text.matches("Year: 2020").count(), 2, "{text}");
        assert!(!text.contains("No models found"), "{text}");
    }

    #[tokio::test]
    async fn empty_result_shows_only_the_empty_panel() {
        let (mut screen, _) = settled("Empty", 2020).await;
        let text = render(&mut screen);

        assert!(text.contains("No models found for Empty in 2020."), "{text}");
        assert!(!text.contains(MODELS_ERROR_MESSAGE), "{text}");
        assert!(!text.contains("Loading"), "{text}");
        assert!(!text.contains("Year:"), "{text}");
    }

    #[tokio::test]
    async fn failure_shows_error_panel_without_loading() {
        let (mut screen, _) = settled("Broken", 2020).await;
        let text = render(&mut screen);

        assert!(text.contains(MODELS_ERROR_MESSAGE), "{text}");
        assert!(!text.contains("503"), "{text}");
        assert!(!text.contains("Loading"), "{text}");
        assert!(!text.contains("No models found"), "{text}");
    }

    #[tokio::test]
    async fn missing_year_stays_loading_without_request() {
        let source = TableSource::new();
        let route = Route::parse("/results/Honda").expect("route");
        let mut screen = ResultsScreen::mount(source.clone(), route, (2015, 2024));

        let text = render(&mut screen);
        assert!(text.contains("Loading"), "{text}");
        assert!(source.calls.lock().expect("calls lock").is_empty());
    }

    #[tokio::test]
    async fn stepping_the_year_refetches_within_bounds() {
        let (mut screen, source) = settled("Honda", 2024).await;

        assert_eq!(screen.handle_key(key(KeyCode::Right)), None);
        assert_eq!(screen.route(), &Route::results("Honda", 2024));

        screen.handle_key(key(KeyCode::Left));
        assert_eq!(screen.route(), &Route::results("Honda", 2023));
        assert!(screen.session_mut().settle().await);

        assert_eq!(
            *source.calls.lock().expect("calls lock"),
            vec![("Honda".to_string(), 2024), ("Honda".to_string(), 2023)]
        );
    }

    #[tokio::test]
    async fn out_of_range_deep_link_steps_into_bounds() {
        let (mut screen, source) = settled("Honda", 1990).await;

        screen.handle_key(key(KeyCode::Left));
        assert_eq!(screen.route(), &Route::results("Honda", 2015));
        assert!(screen.session_mut().settle().await);

        let (mut screen, _) = settled("Honda", 2040).await;
        screen.handle_key(key(KeyCode::Right));
        assert_eq!(screen.route(), &Route::results("Honda", 2024));

        assert_eq!(
            *source.calls.lock().expect("calls lock"),
            vec![("Honda".to_string(), 1990), ("Honda".to_string(), 2015)]
        );
    }

    #[tokio::test]
    async fn back_returns_to_selector() {
        let (mut screen, _) = settled("Honda", 2020).await;
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)),
            Some(ScreenOutcome::Navigate(Route::Selector))
        );
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), Some(ScreenOutcome::Exit));
    }
}
