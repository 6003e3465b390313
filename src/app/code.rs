use tracing::warn;

use crate::backend::ApiError;

use super::dispatch::Request;

pub const DEFAULT_TECH_STACK: &str = "React.js";
pub const PLACEHOLDER_CODE: &str = "// Your code will appear here...";
pub const FRONT_END_ERROR: &str = "Error generating front-end code.";
pub const BACK_END_ERROR: &str = "Error generating back-end code.";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CodeTarget {
    FrontEnd,
    BackEnd,
}

impl CodeTarget {
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::FrontEnd => "Generate Front-End Code",
            Self::BackEnd => "Generate Back-End Code",
        }
    }

    const fn error_text(self) -> &'static str {
        match self {
            Self::FrontEnd => FRONT_END_ERROR,
            Self::BackEnd => BACK_END_ERROR,
        }
    }
}

/// Tech-stack input and the generated code buffer.
#[derive(Debug)]
pub struct CodePanel {
    pub tech_stack: String,
    code: String,
    scroll: u16,
    scroll_x: u16,
}

impl Default for CodePanel {
    fn default() -> Self {
        Self {
            tech_stack: DEFAULT_TECH_STACK.to_string(),
            code: PLACEHOLDER_CODE.to_string(),
            scroll: 0,
            scroll_x: 0,
        }
    }
}

impl CodePanel {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_x(&self) -> u16 {
        self.scroll_x
    }

    pub fn request(&self, target: CodeTarget) -> Request {
        let tech_stack = self.tech_stack.clone();
        match target {
            CodeTarget::FrontEnd => Request::GenerateFrontEnd { tech_stack },
            CodeTarget::BackEnd => Request::GenerateBackEnd { tech_stack },
        }
    }

    /// Replaces the buffer wholesale with the generated code, or with the
    /// target's error text on failure. A reply without code empties it.
    pub fn finish(&mut self, target: CodeTarget, result: Result<Option<String>, ApiError>) {
        self.code = match result {
            Ok(code) => code.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, ?target, "code generation request failed");
                target.error_text().to_string()
            }
        };
        self.scroll = 0;
        self.scroll_x = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.code.push(ch);
    }

    pub fn delete_char(&mut self) {
        self.code.pop();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max_scroll = self.code.lines().count().saturating_sub(1);
        let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
        let next = i32::from(self.scroll).saturating_add(delta);
        self.scroll = u16::try_from(next.max(0)).unwrap_or(u16::MAX).min(max_scroll);
    }

    /// Horizontal offset, stopping at the last column of the widest line.
    pub fn scroll_columns_by(&mut self, delta: i32) {
        let widest = self
            .code
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let max_scroll = u16::try_from(widest.saturating_sub(1)).unwrap_or(u16::MAX);
        let next = i32::from(self.scroll_x).saturating_add(delta);
        self.scroll_x = u16::try_from(next.max(0)).unwrap_or(u16::MAX).min(max_scroll);
    }
}
