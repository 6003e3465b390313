pub mod chat;
pub mod code;
pub mod dispatch;
pub mod interaction;
pub mod messages;
pub mod operations;
pub mod state;

mod input;

use std::collections::VecDeque;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::backend::ApiClient;
use crate::theme::ThemeContext;

use self::chat::ChatPanel;
use self::code::CodePanel;
use self::dispatch::{Completion, Dispatcher};
use self::interaction::InteractionMap;
pub use self::messages::Message;
use self::operations::OperationsPanel;
pub use self::state::{Field, Notice, NoticeKind, ScrollTarget};

/// Whole client state. [`App::update`] is the only place it changes.
#[derive(Debug)]
pub struct App {
    should_quit: bool,
    theme: ThemeContext,
    focus: Field,
    pub chat: ChatPanel,
    pub code: CodePanel,
    pub operations: OperationsPanel,
    notices: VecDeque<Notice>,
    pub interaction_map: InteractionMap,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(theme: ThemeContext, client: ApiClient) -> Self {
        info!(base_url = client.base_url(), theme = theme.mode().as_str(), "starting");
        Self {
            should_quit: false,
            theme,
            focus: Field::default(),
            chat: ChatPanel::default(),
            code: CodePanel::default(),
            operations: OperationsPanel::default(),
            notices: VecDeque::new(),
            interaction_map: InteractionMap::default(),
            dispatcher: Dispatcher::new(client),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Front of the notice queue, the one currently on screen.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn queued_notices(&self) -> usize {
        self.notices.len()
    }

    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::ChatInput => &self.chat.input,
            Field::TechStack => &self.code.tech_stack,
            Field::CodeBuffer => self.code.code(),
            Field::RepoName => &self.operations.repo_name,
            Field::CodeDir => &self.operations.code_dir,
            Field::BoardId => &self.operations.board_id,
        }
    }

    /// Single-line inputs only; the code buffer edits through [`CodePanel`].
    pub(crate) fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::ChatInput => Some(&mut self.chat.input),
            Field::TechStack => Some(&mut self.code.tech_stack),
            Field::CodeBuffer => None,
            Field::RepoName => Some(&mut self.operations.repo_name),
            Field::CodeDir => Some(&mut self.operations.code_dir),
            Field::BoardId => Some(&mut self.operations.board_id),
        }
    }

    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key)?,
            Message::Mouse(mouse) => self.handle_mouse(mouse)?,
            Message::Resize(..) => self.interaction_map.clear(),
            Message::Tick => self.drain_completions(),
            Message::FocusNext => self.focus = self.focus.next(),
            Message::FocusPrevious => self.focus = self.focus.previous(),
            Message::Focus(field) => self.focus = field,
            Message::Scroll(target, rows) => match target {
                ScrollTarget::Chat => self.chat.scroll_by(rows),
                ScrollTarget::Code => self.code.scroll_by(rows),
                ScrollTarget::Workflow => self.operations.scroll_workflow_by(rows),
            },
            Message::ScrollCodeColumns(columns) => self.code.scroll_columns_by(columns),
            Message::SubmitChat => {
                if let Some(prompt) = self.chat.submit() {
                    self.dispatcher
                        .dispatch(dispatch::Request::GenerateCode { prompt });
                }
            }
            Message::Generate(target) => {
                let request = self.code.request(target);
                self.dispatcher.dispatch(request);
            }
            Message::Run(operation) => {
                let request = self.operations.request(operation);
                self.dispatcher.dispatch(request);
            }
            Message::ToggleTheme => {
                let mode = self.theme.toggle();
                debug!(theme = mode.as_str(), "theme toggled");
            }
            Message::DismissNotice => {
                self.notices.pop_front();
            }
            Message::OpenNoticeLink => self.open_notice_link(),
            Message::Quit => self.should_quit = true,
        }
        Ok(())
    }

    /// Applies every finished request, in arrival order.
    pub fn drain_completions(&mut self) {
        while let Some(completion) = self.dispatcher.try_recv() {
            self.apply_completion(completion);
        }
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Chat(result) => self.chat.finish(result),
            Completion::Code { target, result } => self.code.finish(target, result),
            Completion::Operation(outcome) => {
                if let Some(notice) = self.operations.finish(outcome) {
                    self.notices.push_back(notice);
                }
            }
        }
    }

    fn open_notice_link(&mut self) {
        let Some(link) = self
            .current_notice()
            .and_then(|notice| notice.link.clone())
        else {
            return;
        };

        if let Err(err) = open::that(&link) {
            warn!(%link, error = %err, "failed to open link");
        }
    }
}
