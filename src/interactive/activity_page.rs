//! Activity page component: level header and card grid

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::category;
use crate::list_view::{grid_columns, ActivityCard, ActivityPage, PageBody};

use super::app::App;
use super::utils::{get_category_color, truncate_str};

const CARD_HEIGHT: u16 = 5;

/// Render the page for the selected level
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(page) = app.page() else {
        let paragraph = Paragraph::new("No hay niveles disponibles")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_page_header(f, &page, chunks[0]);

    match &page.body {
        PageBody::Cards(cards) => render_grid(f, cards, app.selected_card, chunks[1]),
        PageBody::Empty { title, detail } => render_empty(f, title, detail, chunks[1]),
    }
}

fn render_page_header(f: &mut Frame, page: &ActivityPage, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            page.header.count_line.clone(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  |  "),
        Span::styled(
            page.header.level_line.clone(),
            Style::default().fg(Color::Cyan),
        ),
    ])];
    if let Some(description) = &page.header.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", page.header.title))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

fn render_empty(f: &mut Frame, title: &str, detail: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pulse 'a' para crear una actividad",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_grid(f: &mut Frame, cards: &[ActivityCard], selected: Option<usize>, area: Rect) {
    let columns = grid_columns(area.width);
    // Borders plus spacing between columns
    let inner_width = area.width.saturating_sub(2) as usize;
    let cell_width = (inner_width / columns).saturating_sub(1).max(4);

    let rows: Vec<Row> = cards
        .chunks(columns)
        .enumerate()
        .map(|(row_idx, chunk)| {
            let cells: Vec<Cell> = chunk
                .iter()
                .enumerate()
                .map(|(col_idx, card)| {
                    let is_selected = selected == Some(row_idx * columns + col_idx);
                    format_card_cell(card, cell_width, is_selected)
                })
                .collect();
            Row::new(cells).height(CARD_HEIGHT)
        })
        .collect();

    let widths = vec![Constraint::Ratio(1, columns as u32); columns];
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(1);

    let mut state = TableState::default().with_selected(selected.map(|i| i / columns));
    f.render_stateful_widget(table, area, &mut state);
}

/// Format a card for display in a grid cell
fn format_card_cell(card: &ActivityCard, width: usize, is_selected: bool) -> Cell<'static> {
    let code = category::code_for_label(&card.category_label);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_str(&card.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(&card.category_label, width),
            Style::default().fg(get_category_color(code)),
        )),
        Line::from(Span::styled(
            truncate_str(&card.description, width),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(file) = &card.attachment {
        lines.push(Line::from(Span::styled(
            truncate_str(&format!("📎 {}", file), width),
            Style::default().fg(Color::Yellow),
        )));
    }

    let mut style = Style::default();
    if is_selected {
        style = style.bg(Color::DarkGray);
    }
    Cell::from(lines).style(style)
}
