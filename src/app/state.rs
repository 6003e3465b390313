/// Focusable text areas, in Tab order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Field {
    #[default]
    ChatInput,
    TechStack,
    CodeBuffer,
    RepoName,
    CodeDir,
    BoardId,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::ChatInput,
        Self::TechStack,
        Self::CodeBuffer,
        Self::RepoName,
        Self::CodeDir,
        Self::BoardId,
    ];

    pub const fn next(self) -> Self {
        match self {
            Self::ChatInput => Self::TechStack,
            Self::TechStack => Self::CodeBuffer,
            Self::CodeBuffer => Self::RepoName,
            Self::RepoName => Self::CodeDir,
            Self::CodeDir => Self::BoardId,
            Self::BoardId => Self::ChatInput,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::ChatInput => Self::BoardId,
            Self::TechStack => Self::ChatInput,
            Self::CodeBuffer => Self::TechStack,
            Self::RepoName => Self::CodeBuffer,
            Self::CodeDir => Self::RepoName,
            Self::BoardId => Self::CodeDir,
        }
    }

    /// Hint shown inside an empty, unfocused input.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::ChatInput => "Enter your prompt...",
            Self::TechStack => "Tech stack (e.g., React.js, FastAPI)",
            Self::CodeBuffer => "",
            Self::RepoName => "GitHub Repo Name",
            Self::CodeDir => "Code Directory",
            Self::BoardId => "Trello Board ID",
        }
    }
}

/// Panels whose content scrolls independently of focus.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ScrollTarget {
    Chat,
    Code,
    Workflow,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A modal message, the terminal counterpart of a browser alert.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// Target of the "open in browser" shortcut, when the message names one.
    pub link: Option<String>,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
            link: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        self.link = (!link.trim().is_empty()).then_some(link);
        self
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "Notice",
            NoticeKind::Error => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycle_visits_every_field_once() {
        let mut field = Field::default();
        let mut visited = Vec::new();
        for _ in 0..Field::ALL.len() {
            visited.push(field);
            field = field.next();
        }
        assert_eq!(field, Field::ChatInput);
        assert_eq!(visited, Field::ALL.to_vec());
    }

    #[test]
    fn previous_undoes_next() {
        for field in Field::ALL {
            assert_eq!(field.next().previous(), field);
        }
    }

    #[test]
    fn blank_links_are_dropped() {
        assert_eq!(Notice::info("x").with_link("  ").link, None);
        assert_eq!(
            Notice::info("x").with_link("https://github.com/a/b").link.as_deref(),
            Some("https://github.com/a/b")
        );
    }
}
