//! Activity details panel rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::category;
use crate::model::Activity;

use super::app::App;
use super::utils::get_category_color;

fn label(text: &str) -> Span<'static> {
    Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Render details of the selected activity
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_activity() {
        Some(activity) => detail_lines(app, activity),
        None => vec![
            Line::from(Span::styled(
                "Ninguna actividad seleccionada",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Use las flechas para elegir una actividad",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Detalles ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn detail_lines(app: &App, activity: &Activity) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            label("Título: "),
            Span::styled(
                activity.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (#{})", activity.id),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            label("Tipo: "),
            Span::styled(
                category::label_for_code(&activity.category).to_string(),
                Style::default().fg(get_category_color(&activity.category)),
            ),
        ]),
        Line::from(vec![
            label("Descripción: "),
            Span::raw(activity.description.clone()),
        ]),
    ];

    if let Some(content) = activity.content.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(Line::from(vec![
            label("Contenido: "),
            Span::styled(content.to_string(), Style::default().fg(Color::Gray)),
        ]));
    }

    match activity.resource() {
        Some(resource) => {
            let name = if resource.file_name.is_empty() {
                "Archivo existente".to_string()
            } else {
                resource.file_name.clone()
            };
            lines.push(Line::from(vec![
                label("Recurso: "),
                Span::styled(format!("📎 {}", name), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", app.client.resolve_url(&resource.url)),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => lines.push(Line::from(vec![label("Recurso: "), Span::raw("-")])),
    }

    if let Some(updated) = activity.updated_at.or(activity.created_at) {
        lines.push(Line::from(vec![
            label("Actualizada: "),
            Span::styled(
                updated.format("%Y-%m-%d %H:%M").to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    lines
}
