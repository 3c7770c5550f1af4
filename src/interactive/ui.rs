//! Main UI rendering logic

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, AppMode};
use super::utils::get_message_style;
use super::{activity_details, activity_page, form_ui};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Level tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(5), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);
    render_level_tabs(f, app, chunks[1]);

    match app.mode {
        AppMode::Help => render_help(f, chunks[2]),
        _ => render_main_content(f, app, chunks[2]),
    }

    render_messages(f, app, chunks[3]);
    render_footer(f, app, chunks[4]);

    if matches!(app.mode, AppMode::Editor | AppMode::FilePrompt) {
        form_ui::render_editor(f, app, size);
    }
    if app.mode == AppMode::FilePrompt {
        form_ui::render_file_prompt(f, app, size);
    }

    // The editor shows its own saving state
    if app.loading && !app.is_saving() {
        render_loading_overlay(f, app, size);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let session = if app.client.is_authenticated() {
        "sesión iniciada"
    } else {
        "sin sesión"
    };
    let title = format!(" Activity Desk - {} ({}) ", app.client.base_url(), session);
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn render_level_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .levels
        .iter()
        .map(|level| Line::from(level.name.clone()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.selected_level)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Niveles ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(tabs, area);
}

fn render_main_content(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    activity_page::render(f, app, chunks[0]);
    activity_details::render(f, app, chunks[1]);
}

fn render_help(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Atajos de teclado",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        section("Navegación:"),
        Line::from("  Tab/Shift+Tab  Nivel siguiente / anterior"),
        Line::from("  ←/→ ↑/↓        Moverse entre tarjetas"),
        Line::from(""),
        section("Acciones:"),
        Line::from("  a              Nueva actividad"),
        Line::from("  e / Enter      Editar la actividad seleccionada"),
        Line::from("  r              Recargar actividades"),
        Line::from("  c              Copiar la URL del recurso"),
        Line::from(""),
        section("Editor:"),
        Line::from("  Tab/Shift+Tab  Campo siguiente / anterior"),
        Line::from("  ←/→            Cursor, o cambiar nivel y tipo"),
        Line::from("  Ctrl+F         Elegir archivo"),
        Line::from("  Ctrl+R         Quitar archivo"),
        Line::from("  Ctrl+S         Guardar"),
        Line::from("  Esc            Cancelar"),
        Line::from(""),
        section("General:"),
        Line::from("  q              Salir"),
        Line::from("  ?              Mostrar esta ayuda"),
        Line::from(""),
        Line::from(Span::styled(
            "Pulse Esc para volver...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ayuda ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = app
        .messages
        .iter()
        .filter(|msg| !msg.is_expired())
        .map(|msg| {
            let style = get_message_style(msg.message_type);
            Line::from(vec![
                Span::styled(format!("{} ", msg.icon()), style),
                Span::styled(msg.text.clone(), style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Listo",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Mensajes ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.mode {
        AppMode::Browse => {
            "[Tab] Nivel  [←→↑↓] Tarjetas  [a] Nueva  [Enter/e] Editar  [r] Recargar  [c] Copiar URL  [?] Ayuda  [q] Salir"
        }
        AppMode::Editor => "[Ctrl+S] Guardar  [Ctrl+F] Archivo  [Ctrl+R] Quitar archivo  [Esc] Cancelar",
        AppMode::FilePrompt => "[Enter] Aceptar  [Esc] Volver al editor",
        AppMode::Help => "[Esc] Volver",
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}

/// Render loading overlay with spinner
fn render_loading_overlay(f: &mut Frame, app: &App, area: Rect) {
    use std::time::{SystemTime, UNIX_EPOCH};

    let popup_width = 50.min(area.width);
    let popup_height = 5.min(area.height);
    let popup_area = Rect {
        x: (area.width.saturating_sub(popup_width)) / 2,
        y: (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let spinner_frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let spinner = spinner_frames[((now / 100) % spinner_frames.len() as u128) as usize];

    let loading_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.loading_message.clone(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(loading_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cargando ")
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
