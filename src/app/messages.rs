use crossterm::event::{KeyEvent, MouseEvent};

use super::code::CodeTarget;
use super::operations::Operation;
use super::state::{Field, ScrollTarget};

/// Everything that can change [`App`](super::App) state.
///
/// Raw terminal input arrives as `Key`/`Mouse` and is translated into the
/// semantic variants by the input layer. Clicks resolve straight to semantic
/// variants through the interaction map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,

    FocusNext,
    FocusPrevious,
    Focus(Field),

    /// Rows to move; positive scrolls toward the end of the content.
    Scroll(ScrollTarget, i32),
    ScrollCodeColumns(i32),

    SubmitChat,
    Generate(CodeTarget),
    Run(Operation),

    ToggleTheme,
    DismissNotice,
    OpenNoticeLink,
    Quit,
}
