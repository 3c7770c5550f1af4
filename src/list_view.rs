//! Activity list view: header and card grid for one level
//!
//! Pure presentation. Fetching and filtering belong to the caller.

use crate::category;
use crate::model::{Activity, Level};

pub const EMPTY_TITLE: &str = "No hay actividades disponibles";
pub const EMPTY_DETAIL: &str = "No se encontraron actividades para este nivel.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub title: String,
    pub description: Option<String>,
    pub count_line: String,
    pub level_line: String,
}

/// One card in the grid, keyed by the activity id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub key: i64,
    pub title: String,
    pub description: String,
    pub category_label: String,
    pub attachment: Option<String>,
}

impl ActivityCard {
    pub fn from_activity(activity: &Activity) -> Self {
        ActivityCard {
            key: activity.id,
            title: activity.title.clone(),
            description: activity.description.clone(),
            category_label: category::label_for_code(&activity.category).to_string(),
            attachment: activity.resource().map(|r| {
                if r.file_name.is_empty() {
                    "Archivo existente".to_string()
                } else {
                    r.file_name
                }
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Cards(Vec<ActivityCard>),
    Empty { title: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPage {
    pub header: PageHeader,
    pub body: PageBody,
}

impl ActivityPage {
    /// Build the page for a level and its activities, in the given order
    pub fn build(level: &Level, activities: &[Activity]) -> Self {
        let header = PageHeader {
            title: format!("Actividades - {}", level.name),
            description: level
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            count_line: format!("{} actividades", activities.len()),
            level_line: format!("Nivel {}", level.name),
        };

        let body = if activities.is_empty() {
            PageBody::Empty {
                title: EMPTY_TITLE.to_string(),
                detail: EMPTY_DETAIL.to_string(),
            }
        } else {
            PageBody::Cards(activities.iter().map(ActivityCard::from_activity).collect())
        };

        ActivityPage { header, body }
    }

    pub fn cards(&self) -> &[ActivityCard] {
        match &self.body {
            PageBody::Cards(cards) => cards,
            PageBody::Empty { .. } => &[],
        }
    }

    /// Plain text rendering for the CLI
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n", self.header.title));
        if let Some(description) = &self.header.description {
            out.push_str(description);
            out.push('\n');
        }
        out.push_str(&format!(
            "{} | {}\n\n",
            self.header.count_line, self.header.level_line
        ));

        match &self.body {
            PageBody::Cards(cards) => {
                for card in cards {
                    out.push_str(&format!(
                        "[{}] {} ({})\n",
                        card.key, card.title, card.category_label
                    ));
                    if !card.description.is_empty() {
                        out.push_str(&format!("    {}\n", card.description));
                    }
                    if let Some(file) = &card.attachment {
                        out.push_str(&format!("    📎 {}\n", file));
                    }
                }
            }
            PageBody::Empty { title, detail } => {
                out.push_str(title);
                out.push('\n');
                out.push_str(detail);
                out.push('\n');
            }
        }
        out
    }
}

/// Number of grid columns for a given width in terminal cells
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=79 => 1,
        80..=119 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level {
            id: 3,
            name: "B2".to_string(),
            description: Some("Intermedio alto".to_string()),
        }
    }

    fn activity(id: i64, title: &str, code: &str) -> Activity {
        Activity {
            id,
            title: title.to_string(),
            description: format!("{} description", title),
            content: None,
            level_id: 3,
            category: code.to_string(),
            resource_file_url: None,
            resource_file_name: None,
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_header() {
        let page = ActivityPage::build(&level(), &[activity(1, "A", "GRAMMAR")]);
        assert_eq!(page.header.title, "Actividades - B2");
        assert_eq!(page.header.description.as_deref(), Some("Intermedio alto"));
        assert_eq!(page.header.count_line, "1 actividades");
        assert_eq!(page.header.level_line, "Nivel B2");
    }

    #[test]
    fn test_blank_description_is_hidden() {
        let mut level = level();
        level.description = Some("  ".to_string());
        let page = ActivityPage::build(&level, &[]);
        assert!(page.header.description.is_none());
    }

    #[test]
    fn test_cards_preserve_order_and_keys() {
        let activities = vec![
            activity(9, "Ninth", "SPEAKING"),
            activity(2, "Second", "DEBATE"),
            activity(5, "Fifth", "GAME"),
        ];
        let page = ActivityPage::build(&level(), &activities);
        let keys: Vec<i64> = page.cards().iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![9, 2, 5]);
        assert_eq!(page.cards()[0].category_label, "Conversación");
        assert_eq!(page.cards()[1].category_label, "DEBATE");
        assert_eq!(page.cards()[2].category_label, "Juego");
    }

    #[test]
    fn test_empty_state() {
        let page = ActivityPage::build(&level(), &[]);
        assert_eq!(page.header.count_line, "0 actividades");
        assert_eq!(
            page.body,
            PageBody::Empty {
                title: EMPTY_TITLE.to_string(),
                detail: EMPTY_DETAIL.to_string(),
            }
        );
        assert!(page.cards().is_empty());
        assert!(page.to_text().contains(EMPTY_TITLE));
    }

    #[test]
    fn test_attachment_name() {
        let mut with_file = activity(1, "A", "READING");
        with_file.resource_file_url = Some("/api/files/activities/x.mp3".to_string());
        with_file.resource_file_name = Some("audio.mp3".to_string());
        let mut unnamed = activity(2, "B", "READING");
        unnamed.resource_file_url = Some("/api/files/activities/y.pdf".to_string());

        let page = ActivityPage::build(&level(), &[with_file, unnamed]);
        assert_eq!(page.cards()[0].attachment.as_deref(), Some("audio.mp3"));
        assert_eq!(page.cards()[1].attachment.as_deref(), Some("Archivo existente"));
        assert!(page.to_text().contains("📎 audio.mp3"));
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(40), 1);
        assert_eq!(grid_columns(80), 2);
        assert_eq!(grid_columns(119), 2);
        assert_eq!(grid_columns(200), 3);
    }
}
