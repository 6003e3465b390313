use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Message, ScrollTarget};

const WHEEL_ROWS: i32 = 3;
const WHEEL_COLUMNS: i32 = 4;

impl App {
    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let modal = self.current_notice().is_some();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(message) = self
                    .interaction_map
                    .resolve_message(mouse.column, mouse.row)
                {
                    if !modal || matches!(message, Message::DismissNotice | Message::OpenNoticeLink)
                    {
                        self.update(message)?;
                    }
                }
            }
            _ if modal => {}
            kind => {
                if let Some(message) = self.wheel_message(kind, mouse.column, mouse.row) {
                    self.update(message)?;
                }
            }
        }
        Ok(())
    }

    /// Wheel events scroll whichever panel is under the cursor. Only the code
    /// buffer scrolls sideways.
    fn wheel_message(&self, kind: MouseEventKind, column: u16, row: u16) -> Option<Message> {
        let target = self.interaction_map.resolve_scroll(column, row)?;
        match (kind, target) {
            (MouseEventKind::ScrollUp, _) => Some(Message::Scroll(target, -WHEEL_ROWS)),
            (MouseEventKind::ScrollDown, _) => Some(Message::Scroll(target, WHEEL_ROWS)),
            (MouseEventKind::ScrollLeft, ScrollTarget::Code) => {
                Some(Message::ScrollCodeColumns(-WHEEL_COLUMNS))
            }
            (MouseEventKind::ScrollRight, ScrollTarget::Code) => {
                Some(Message::ScrollCodeColumns(WHEEL_COLUMNS))
            }
            _ => None,
        }
    }
}
