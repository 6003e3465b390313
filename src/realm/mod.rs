//! tui-realm wiring around [`App`].
//!
//! One root component owns the whole screen. It passes on only the keys and
//! mouse actions the client handles, as crossterm events, so [`App::update`]
//! sees the same input types in tests and in the terminal.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tuirealm::{
    Application, AttrValue, Attribute, Component, Event, EventListenerCfg, Frame, MockComponent,
    NoUserEvent, Props, State,
    command::{Cmd, CmdResult},
    event::{
        Key as RealmKey, KeyEvent as RealmKeyEvent, KeyModifiers as RealmKeyModifiers,
        MouseButton as RealmMouseButton, MouseEvent as RealmMouseEvent,
        MouseEventKind as RealmMouseEventKind,
    },
    ratatui::layout::Rect,
};

use crate::{
    app::{App, Message},
    ui,
};

#[cfg(test)]
pub(crate) mod tests;

/// How often completed background requests are picked up.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub type SharedApp = Arc<Mutex<App>>;

pub type RealmApplication = Application<RootId, Message, NoUserEvent>;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RootId {
    Root,
}

/// Application reading input from the real terminal.
pub fn init_application(app: SharedApp) -> Result<RealmApplication> {
    init_application_with(
        app,
        EventListenerCfg::default()
            .crossterm_input_listener(Duration::from_millis(20), 3)
            .poll_timeout(Duration::from_millis(10))
            .tick_interval(TICK_INTERVAL),
    )
}

pub fn init_application_with(
    app: SharedApp,
    listener: EventListenerCfg<NoUserEvent>,
) -> Result<RealmApplication> {
    let mut application: RealmApplication = Application::init(listener);

    application
        .mount(RootId::Root, Box::new(RootComponent::new(app)), Vec::new())
        .context("failed to mount tui-realm root component")?;

    application
        .active(&RootId::Root)
        .context("failed to activate tui-realm root component")?;

    Ok(application)
}

pub fn apply_message(shared_app: &SharedApp, message: Message) -> Result<()> {
    let mut app = lock_app(shared_app)?;
    app.update(message)
}

pub fn should_quit(shared_app: &SharedApp) -> Result<bool> {
    let app = lock_app(shared_app)?;
    Ok(app.should_quit())
}

fn lock_app(shared_app: &SharedApp) -> Result<MutexGuard<'_, App>> {
    shared_app
        .lock()
        .map_err(|_| anyhow!("failed to lock app state"))
}

/// Owns the whole screen and forwards input to [`App::update`].
struct RootComponent {
    props: Props,
    app: SharedApp,
}

impl RootComponent {
    fn new(app: SharedApp) -> Self {
        Self {
            props: Props::default(),
            app,
        }
    }
}

impl MockComponent for RootComponent {
    fn view(&mut self, frame: &mut Frame, _area: Rect) {
        if let Ok(mut app) = self.app.lock() {
            ui::render(frame, &mut app);
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Message, NoUserEvent> for RootComponent {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Message> {
        match ev {
            Event::Keyboard(key) => key_message(key),
            Event::Mouse(mouse) => mouse_message(mouse),
            Event::WindowResize(width, height) => Some(Message::Resize(width, height)),
            Event::Tick => Some(Message::Tick),
            _ => None,
        }
    }
}

/// Keys the client reacts to. Anything else never reaches the app.
fn key_message(key: RealmKeyEvent) -> Option<Message> {
    let code = match key.code {
        RealmKey::Char(ch) => KeyCode::Char(ch),
        RealmKey::Function(index) => KeyCode::F(index),
        RealmKey::Enter => KeyCode::Enter,
        RealmKey::Esc => KeyCode::Esc,
        RealmKey::Backspace => KeyCode::Backspace,
        RealmKey::Tab => KeyCode::Tab,
        RealmKey::BackTab => KeyCode::BackTab,
        RealmKey::Up => KeyCode::Up,
        RealmKey::Down => KeyCode::Down,
        RealmKey::Left => KeyCode::Left,
        RealmKey::Right => KeyCode::Right,
        RealmKey::PageUp => KeyCode::PageUp,
        RealmKey::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(Message::Key(KeyEvent::new(code, modifiers(key.modifiers))))
}

/// Left presses and wheel motion; moves, drags and releases are dropped.
fn mouse_message(mouse: RealmMouseEvent) -> Option<Message> {
    let kind = match mouse.kind {
        RealmMouseEventKind::Down(RealmMouseButton::Left) => {
            MouseEventKind::Down(MouseButton::Left)
        }
        RealmMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        RealmMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        RealmMouseEventKind::ScrollLeft => MouseEventKind::ScrollLeft,
        RealmMouseEventKind::ScrollRight => MouseEventKind::ScrollRight,
        _ => return None,
    };
    Some(Message::Mouse(MouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
        modifiers: modifiers(mouse.modifiers),
    }))
}

fn modifiers(realm: RealmKeyModifiers) -> KeyModifiers {
    [
        (RealmKeyModifiers::SHIFT, KeyModifiers::SHIFT),
        (RealmKeyModifiers::CONTROL, KeyModifiers::CONTROL),
        (RealmKeyModifiers::ALT, KeyModifiers::ALT),
    ]
    .into_iter()
    .filter(|(flag, _)| realm.contains(*flag))
    .fold(KeyModifiers::NONE, |acc, (_, flag)| acc | flag)
}
