use tracing::warn;

use crate::backend::{ApiError, GenerateCodeResponse};

pub const NO_CODE_GENERATED: &str = "No code generated.";
pub const GENERATE_CODE_ERROR: &str = "Error generating code.";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
}

/// Prompt input plus the append-only transcript.
#[derive(Debug, Default)]
pub struct ChatPanel {
    pub input: String,
    transcript: Vec<ChatTurn>,
    /// Rows scrolled up from the newest turn; zero follows the tail.
    scroll_back: u16,
}

impl ChatPanel {
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    /// Positive `rows` move toward the newest turn.
    pub fn scroll_by(&mut self, rows: i32) {
        let next = i32::from(self.scroll_back).saturating_sub(rows);
        self.scroll_back = u16::try_from(next.max(0)).unwrap_or(u16::MAX);
    }

    /// Caps the offset at the rows hidden above the view and returns it.
    pub fn clamp_scroll_back(&mut self, hidden_rows: u16) -> u16 {
        self.scroll_back = self.scroll_back.min(hidden_rows);
        self.scroll_back
    }

    /// Records the user's turn and hands back the prompt to send.
    ///
    /// Blank input is ignored: nothing is appended, nothing is sent and the
    /// input keeps its contents.
    pub fn submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }

        let prompt = self.input.clone();
        self.push(Sender::User, prompt.clone());
        Some(prompt)
    }

    /// Appends exactly one assistant turn for a finished request and clears
    /// the input, whatever the outcome.
    pub fn finish(&mut self, result: Result<GenerateCodeResponse, ApiError>) {
        let text = match result {
            Ok(reply) => reply
                .generated_code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| NO_CODE_GENERATED.to_string()),
            Err(err) => {
                warn!(error = %err, "generate_code request failed");
                GENERATE_CODE_ERROR.to_string()
            }
        };

        self.push(Sender::Assistant, text);
        self.input.clear();
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.transcript.push(ChatTurn { sender, text });
        self.scroll_back = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(code: Option<&str>) -> Result<GenerateCodeResponse, ApiError> {
        Ok(GenerateCodeResponse {
            generated_code: code.map(str::to_string),
        })
    }

    #[test]
    fn blank_prompt_is_a_no_op() {
        let mut panel = ChatPanel {
            input: "   \t".to_string(),
            ..ChatPanel::default()
        };

        assert_eq!(panel.submit(), None);
        assert!(panel.transcript().is_empty());
        assert_eq!(panel.input, "   \t");

        panel.input.clear();
        assert_eq!(panel.submit(), None);
        assert!(panel.transcript().is_empty());
    }

    #[test]
    fn successful_reply_becomes_last_turn() {
        let mut panel = ChatPanel {
            input: "Write a hello world function".to_string(),
            ..ChatPanel::default()
        };

        let prompt = panel.submit().expect("prompt should be sent");
        assert_eq!(prompt, "Write a hello world function");
        assert_eq!(
            panel.transcript().last(),
            Some(&ChatTurn {
                sender: Sender::User,
                text: "Write a hello world function".to_string(),
            })
        );

        panel.finish(reply(Some("print('hi')")));

        assert_eq!(
            panel.transcript().last(),
            Some(&ChatTurn {
                sender: Sender::Assistant,
                text: "print('hi')".to_string(),
            })
        );
        assert!(panel.input.is_empty());
    }

    #[test]
    fn empty_or_missing_code_uses_fallback() {
        let mut panel = ChatPanel::default();
        panel.finish(reply(Some("")));
        panel.finish(reply(None));

        let texts: Vec<&str> = panel
            .transcript()
            .iter()
            .map(|turn| turn.text.as_str())
            .collect();
        assert_eq!(texts, vec![NO_CODE_GENERATED, NO_CODE_GENERATED]);
    }

    #[test]
    fn failure_appends_error_turn_and_clears_input() {
        let mut panel = ChatPanel {
            input: "Write a parser".to_string(),
            ..ChatPanel::default()
        };
        panel.submit().expect("prompt should be sent");

        panel.finish(Err(ApiError::Request {
            message: "connection refused".to_string(),
        }));

        assert_eq!(panel.transcript().len(), 2);
        assert_eq!(panel.transcript()[1].sender, Sender::Assistant);
        assert_eq!(panel.transcript()[1].text, GENERATE_CODE_ERROR);
        assert!(panel.input.is_empty());
    }

    #[test]
    fn user_text_is_kept_untrimmed() {
        let mut panel = ChatPanel {
            input: "  spaced prompt ".to_string(),
            ..ChatPanel::default()
        };
        assert_eq!(panel.submit().as_deref(), Some("  spaced prompt "));
        assert_eq!(panel.transcript()[0].text, "  spaced prompt ");
    }

    #[test]
    fn new_turns_jump_back_to_the_tail() {
        let mut panel = ChatPanel::default();
        panel.scroll_by(-8);
        assert_eq!(panel.scroll_back(), 8);
        assert_eq!(panel.clamp_scroll_back(5), 5);

        panel.scroll_by(2);
        assert_eq!(panel.scroll_back(), 3);
        panel.scroll_by(10);
        assert_eq!(panel.scroll_back(), 0);

        panel.scroll_by(-4);
        panel.finish(reply(Some("done")));
        assert_eq!(panel.scroll_back(), 0);
    }
}
