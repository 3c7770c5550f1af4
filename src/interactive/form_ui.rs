//! Editor dialog rendering with context-aware right panel

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::category::SELECTABLE_LABELS;
use crate::editor::{ActivityEditor, EditorMode, FormField};
use crate::resource::format_size;

use super::app::App;
use super::utils::centered_rect;

/// Render the editor dialog over the page
pub fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let editor = &app.editor;
    let dialog = centered_rect(80, 80, area);
    f.render_widget(Clear, dialog);

    let title = match editor.mode() {
        EditorMode::Create => " Nueva actividad ".to_string(),
        EditorMode::Edit { id } => format!(" Editar actividad #{} ", id),
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(dialog);

    let paragraph = Paragraph::new(form_lines(editor, app.is_saving()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[0]);

    render_context_panel(f, editor, chunks[1]);
}

fn form_lines(editor: &ActivityEditor, saving: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Tab: Siguiente | ←→: Cursor/opción | Ctrl+F: Archivo | Ctrl+R: Quitar archivo | Ctrl+S: Guardar | Esc: Cancelar",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for field in FormField::all() {
        let is_current = editor.current_field() == field;

        let label_style = if is_current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if is_current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", field.label()), label_style),
            Span::raw(": "),
            Span::styled(display_value(editor, field, is_current), value_style),
        ]));
    }

    lines.push(Line::from(""));

    if saving {
        lines.push(Line::from(Span::styled(
            "Guardando...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    } else if let Some(error) = editor.error() {
        lines.push(Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red),
        )));
    } else {
        let hint = match editor.current_field() {
            FormField::Title => "Título de la actividad",
            FormField::Description => "Breve descripción para la tarjeta",
            FormField::Level => "←→ para elegir el nivel",
            FormField::Category => "←→ para elegir el tipo",
            FormField::Resource => "Enter o Ctrl+F para elegir un archivo, Supr para quitarlo",
            FormField::Content => "Contenido opcional",
        };
        lines.push(Line::from(Span::styled(
            format!("💡 {}", hint),
            Style::default().fg(Color::Blue),
        )));
    }

    lines
}

fn display_value(editor: &ActivityEditor, field: FormField, is_current: bool) -> String {
    match field {
        FormField::Level => editor
            .selected_level_name()
            .map(str::to_string)
            .unwrap_or_else(|| "<sin seleccionar>".to_string()),
        FormField::Category => {
            let category = &editor.form().category;
            if category.is_empty() {
                "<sin seleccionar>".to_string()
            } else {
                category.clone()
            }
        }
        FormField::Resource => resource_summary(editor),
        _ => {
            let value = editor.form().text(field);
            if is_current {
                with_cursor(value, editor.cursor_position())
            } else if value.is_empty() {
                "<vacío>".to_string()
            } else {
                value.to_string()
            }
        }
    }
}

/// Insert a block cursor at a character position
fn with_cursor(value: &str, char_pos: usize) -> String {
    let byte_pos = value
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let mut display = value.to_string();
    display.insert(byte_pos, '█');
    display
}

fn resource_summary(editor: &ActivityEditor) -> String {
    match (editor.pending_file(), editor.attached()) {
        (Some(pending), _) => format!(
            "{} ({}, se subirá al guardar)",
            pending.file_name,
            format_size(pending.size)
        ),
        (None, Some(attached)) if attached.file_name.is_empty() => "Archivo existente".to_string(),
        (None, Some(attached)) => format!("📎 {}", attached.file_name),
        (None, None) => "<ninguno>".to_string(),
    }
}

/// Render context-aware right panel based on current field
fn render_context_panel(f: &mut Frame, editor: &ActivityEditor, area: Rect) {
    match editor.current_field() {
        FormField::Level => {
            let current = editor.selected_level_name();
            let items = editor
                .levels()
                .iter()
                .map(|level| choice_item(&level.name, current == Some(level.name.as_str())))
                .collect();
            render_choice_list(f, items, " Niveles (←→) ", area);
        }
        FormField::Category => {
            let current = editor.form().category.as_str();
            let items = SELECTABLE_LABELS
                .iter()
                .map(|label| choice_item(label, *label == current))
                .collect();
            render_choice_list(f, items, " Tipos (←→) ", area);
        }
        _ => render_resource_panel(f, editor, area),
    }
}

fn choice_item(text: &str, is_selected: bool) -> ListItem<'static> {
    let style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let prefix = if is_selected { "▶ " } else { "  " };
    ListItem::new(format!("{}{}", prefix, text)).style(style)
}

fn render_choice_list(f: &mut Frame, items: Vec<ListItem>, title: &str, area: Rect) {
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}

fn render_resource_panel(f: &mut Frame, editor: &ActivityEditor, area: Rect) {
    let mut lines = Vec::new();

    if let Some(attached) = editor.attached() {
        lines.push(Line::from(Span::styled(
            "Archivo actual",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let name = if attached.file_name.is_empty() {
            "Archivo existente"
        } else {
            attached.file_name.as_str()
        };
        lines.push(Line::from(format!("📎 {}", name)));
        lines.push(Line::from(""));
    }

    if let Some(pending) = editor.pending_file() {
        lines.push(Line::from(Span::styled(
            "Archivo nuevo",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(pending.file_name.clone()));
        lines.push(Line::from(Span::styled(
            format!("{} · {}", pending.mime_type, format_size(pending.size)),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Sin recurso adjunto",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Permitidos: jpg, jpeg, png, webp, pdf, mp3, mp4 (máx. 10MB)",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recurso ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render the file path prompt with a live cursor
pub fn render_file_prompt(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(70, 20, area);
    let popup = Rect {
        height: popup.height.max(3),
        ..popup
    };
    f.render_widget(Clear, popup);

    let width = popup.width.max(3) - 3;
    let scroll = app.file_input.visual_scroll(width as usize);
    let input = Paragraph::new(app.file_input.value())
        .style(Style::default().fg(Color::Yellow))
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ruta del archivo (Enter: aceptar, Esc: cancelar) ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(input, popup);

    f.set_cursor(
        popup.x + (app.file_input.visual_cursor().max(scroll) - scroll) as u16 + 1,
        popup.y + 1,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_in_accented_text() {
        assert_eq!(with_cursor("Canción", 6), "Canció█n");
        assert_eq!(with_cursor("", 0), "█");
        assert_eq!(with_cursor("abc", 10), "abc█");
    }
}
