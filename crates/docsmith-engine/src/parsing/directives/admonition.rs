use super::DirectiveInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Note,
    Warning,
    Tip,
    Important,
    Caution,
    /// `{admonition}` with a custom title.
    Plain,
    /// Collapsible `{dropdown}`.
    Dropdown,
}

impl AdmonitionKind {
    pub const NAMES: [&'static str; 7] = [
        "note",
        "warning",
        "tip",
        "important",
        "caution",
        "admonition",
        "dropdown",
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "warning" => AdmonitionKind::Warning,
            "tip" => AdmonitionKind::Tip,
            "important" => AdmonitionKind::Important,
            "caution" => AdmonitionKind::Caution,
            "admonition" => AdmonitionKind::Plain,
            "dropdown" => AdmonitionKind::Dropdown,
            _ => AdmonitionKind::Note,
        }
    }

    pub fn default_title(self) -> Option<&'static str> {
        match self {
            AdmonitionKind::Note => Some("Note"),
            AdmonitionKind::Warning => Some("Warning"),
            AdmonitionKind::Tip => Some("Tip"),
            AdmonitionKind::Important => Some("Important"),
            AdmonitionKind::Caution => Some("Caution"),
            AdmonitionKind::Plain | AdmonitionKind::Dropdown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdmonitionBlock {
    pub kind: AdmonitionKind,
    pub title: Option<String>,
    /// Dropdowns only: rendered expanded.
    pub open: bool,
}

impl AdmonitionBlock {
    pub fn new(kind: AdmonitionKind) -> Self {
        Self {
            kind,
            title: None,
            open: false,
        }
    }

    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>) {
        self.title = match (input.arguments, self.kind.default_title()) {
            (Some(title), _) => Some(title.to_string()),
            (None, Some(default)) => Some(default.to_string()),
            (None, None) => {
                input.error(format!("{{{}}} requires a title argument", input.name));
                None
            }
        };
        if self.kind == AdmonitionKind::Dropdown {
            self.open = input.flag("open");
        }
    }
}
