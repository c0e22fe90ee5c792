use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::fetch::VehicleModel;
use crate::ui::styles::selection_style;
use crate::utils::truncate_to_width;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 5;

/// Responsive column count: one column on narrow terminals, up to three.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=71 => 1,
        72..=119 => 2,
        _ => 3,
    }
}

pub fn grid_rows(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}

/// Largest first-row offset that still fills the viewport.
pub fn max_scroll(count: usize, area: Rect) -> usize {
    let rows = grid_rows(count, grid_columns(area.width));
    let visible = usize::from(area.height / CARD_HEIGHT).max(1);
    rows.saturating_sub(visible)
}

/// Render the model cards starting at row `scroll`.
pub fn render_card_grid(
    f: &mut Frame<'_>,
    area: Rect,
    models: &[VehicleModel],
    year: i32,
    scroll: usize,
) {
    let columns = grid_columns(area.width);
    let visible_rows = usize::from(area.height / CARD_HEIGHT).max(1);
    let col_width = area.width / columns as u16;

    let rows = models
        .chunks(columns)
        .skip(scroll)
        .take(visible_rows)
        .enumerate();

    for (row_idx, row) in rows {
        for (col_idx, model) in row.iter().enumerate() {
            let rect = Rect {
                x: area.x + col_idx as u16 * col_width,
                y: area.y + row_idx as u16 * CARD_HEIGHT,
                width: col_width,
                height: CARD_HEIGHT.min(area.height.saturating_sub(row_idx as u16 * CARD_HEIGHT)),
            };
            if rect.height < 3 {
                continue;
            }
            render_card(f, rect, model, year);
        }
    }
}

fn render_card(f: &mut Frame<'_>, area: Rect, model: &VehicleModel, year: i32) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    let width = usize::from(inner.width);

    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&model.model_name, width),
            selection_style(),
        )),
        Line::from(truncate_to_width(&format!("Make: {}", model.make_name), width)),
        Line::from(truncate_to_width(&format!("Year: {year}"), width)),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
