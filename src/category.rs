//! Activity categories: backend codes and their Spanish labels

/// A backend category code with its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: &'static str,
    pub label: &'static str,
}

impl Category {
    pub const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// One label per backend code
pub const CATEGORIES: &[Category] = &[
    Category::new("SPEAKING", "Conversación"),
    Category::new("GRAMMAR", "Gramática"),
    Category::new("VOCABULARY", "Vocabulario"),
    Category::new("READING", "Comprensión de lectura"),
    Category::new("LISTENING", "Comprensión auditiva"),
    Category::new("WRITING", "Escritura"),
    Category::new("EXERCISE", "Preparación de exámenes"),
    Category::new("GAME", "Juego"),
];

/// Extra labels that submit as an existing code but never display
const LABEL_ALIASES: &[Category] = &[Category::new("SPEAKING", "Pronunciación")];

/// Labels offered by the editor, in picker order
pub const SELECTABLE_LABELS: &[&str] = &[
    "Conversación",
    "Gramática",
    "Vocabulario",
    "Comprensión de lectura",
    "Comprensión auditiva",
    "Escritura",
    "Pronunciación",
    "Preparación de exámenes",
];

/// Display label for a backend code. Unknown codes display as themselves.
pub fn label_for_code(code: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.label)
        .unwrap_or(code)
}

/// Backend code for a label. Unknown labels are submitted as-is.
pub fn code_for_label(label: &str) -> &str {
    CATEGORIES
        .iter()
        .chain(LABEL_ALIASES)
        .find(|c| c.label == label)
        .map(|c| c.code)
        .unwrap_or(label)
}

/// Resolve user input given as either a label or a code, case-insensitively.
///
/// Used by the CLI, where typing `speaking` is easier than `Conversación`.
pub fn resolve_label(input: &str) -> Option<&'static str> {
    let input = input.trim();
    SELECTABLE_LABELS
        .iter()
        .copied()
        .chain(CATEGORIES.iter().map(|c| c.label))
        .find(|label| label.to_lowercase() == input.to_lowercase())
        .or_else(|| {
            CATEGORIES
                .iter()
                .find(|c| c.code.eq_ignore_ascii_case(input))
                .map(|c| c.label)
        })
}

/// Next label in picker order, wrapping. An empty or unknown current value starts at the first.
pub fn next_label(current: &str) -> &'static str {
    match SELECTABLE_LABELS.iter().position(|l| *l == current) {
        Some(i) => SELECTABLE_LABELS[(i + 1) % SELECTABLE_LABELS.len()],
        None => SELECTABLE_LABELS[0],
    }
}

/// Previous label in picker order, wrapping
pub fn previous_label(current: &str) -> &'static str {
    match SELECTABLE_LABELS.iter().position(|l| *l == current) {
        Some(0) | None => SELECTABLE_LABELS[SELECTABLE_LABELS.len() - 1],
        Some(i) => SELECTABLE_LABELS[i - 1],
    }
}
