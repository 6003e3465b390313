use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::code::CodeTarget;
use crate::app::operations::Operation;
use crate::app::{App, Field, Message, ScrollTarget};

/// Rows moved by PageUp/PageDown.
const PAGE_ROWS: i32 = 10;
/// Columns moved by Left/Right in the code buffer.
const COLUMN_STEP: i32 = 4;

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return self.update(Message::Quit);
        }

        if self.current_notice().is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => self.update(Message::DismissNotice),
                KeyCode::Char('o') if !ctrl => self.update(Message::OpenNoticeLink),
                _ => Ok(()),
            };
        }

        if let Some(message) = global_message(key.code) {
            return self.update(message);
        }

        match key.code {
            KeyCode::Tab => return self.update(Message::FocusNext),
            KeyCode::BackTab => return self.update(Message::FocusPrevious),
            _ => {}
        }

        if self.focus == Field::CodeBuffer {
            self.handle_code_key(key);
            return Ok(());
        }

        if let Some(message) = scroll_message(self.focus, key.code) {
            return self.update(message);
        }

        match key.code {
            KeyCode::Enter if self.focus == Field::ChatInput => self.update(Message::SubmitChat),
            KeyCode::Backspace => {
                if let Some(text) = self.field_mut(self.focus) {
                    text.pop();
                }
                Ok(())
            }
            KeyCode::Char(ch) if accepts_text(key.modifiers) => {
                if let Some(text) = self.field_mut(self.focus) {
                    text.push(ch);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_code_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.code.insert_char('\n'),
            KeyCode::Backspace => self.code.delete_char(),
            KeyCode::Up => self.code.scroll_by(-1),
            KeyCode::Down => self.code.scroll_by(1),
            KeyCode::PageUp => self.code.scroll_by(-PAGE_ROWS),
            KeyCode::PageDown => self.code.scroll_by(PAGE_ROWS),
            KeyCode::Left => self.code.scroll_columns_by(-COLUMN_STEP),
            KeyCode::Right => self.code.scroll_columns_by(COLUMN_STEP),
            KeyCode::Char(ch) if accepts_text(key.modifiers) => self.code.insert_char(ch),
            _ => {}
        }
    }
}

fn global_message(code: KeyCode) -> Option<Message> {
    let message = match code {
        KeyCode::F(2) => Message::ToggleTheme,
        KeyCode::F(3) => Message::Generate(CodeTarget::FrontEnd),
        KeyCode::F(4) => Message::Generate(CodeTarget::BackEnd),
        KeyCode::F(5) => Message::Run(Operation::CreateRepo),
        KeyCode::F(6) => Message::Run(Operation::PushCode),
        KeyCode::F(7) => Message::Run(Operation::RunTests),
        KeyCode::F(8) => Message::Run(Operation::FetchTasks),
        KeyCode::F(9) => Message::Run(Operation::RunWorkflow),
        _ => return None,
    };
    Some(message)
}

/// Single-line inputs scroll the output of their panel: the chat input
/// scrolls the transcript, the operation inputs scroll the workflow results.
fn scroll_message(focus: Field, code: KeyCode) -> Option<Message> {
    let target = match focus {
        Field::ChatInput => ScrollTarget::Chat,
        Field::RepoName | Field::CodeDir | Field::BoardId => ScrollTarget::Workflow,
        Field::TechStack | Field::CodeBuffer => return None,
    };
    let rows = match code {
        KeyCode::Up => -1,
        KeyCode::Down => 1,
        KeyCode::PageUp => -PAGE_ROWS,
        KeyCode::PageDown => PAGE_ROWS,
        _ => return None,
    };
    Some(Message::Scroll(target, rows))
}

fn accepts_text(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
