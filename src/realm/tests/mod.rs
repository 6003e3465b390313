
use std::sync::{Arc, Mutex};

use crossterm::event::KeyCode;
use tuirealm::PollStrategy;

use super::*;
use crate::app::Field;
use crate::app::chat::GENERATE_CODE_ERROR;
use crate::backend::ApiClient;
use crate::backend::test_server::unreachable_base_url;
use crate::theme::{EphemeralThemeStore, ThemeContext};

use self::harness::{EventDriver, MockTerminal, assert_buffer_contains, left_click, send_keys};

struct Fixture {
    driver: EventDriver,
    shared: SharedApp,
    application: RealmApplication,
    terminal: MockTerminal,
}

impl Fixture {
    fn new() -> Self {
        let app = App::new(
            ThemeContext::load(Box::new(EphemeralThemeStore::default())),
            ApiClient::new(unreachable_base_url()),
        );
        let shared = Arc::new(Mutex::new(app));
        let driver = EventDriver::default();
        let application = init_application_with(Arc::clone(&shared), driver.listener_cfg())
            .expect("application should mount");
        Self {
            driver,
            shared,
            application,
            terminal: MockTerminal::new(160, 44),
        }
    }

    /// Polls queued events and feeds the resulting messages to the app.
    fn pump(&mut self) {
        let messages = self
            .application
            .tick(PollStrategy::UpTo(64))
            .expect("event tick should succeed");
        for message in messages {
            apply_message(&self.shared, message).expect("update should succeed");
        }
    }

    fn render(&mut self) {
        let application = &mut self.application;
        self.terminal.draw(|frame| {
            let area = frame.area();
            application.view(&RootId::Root, frame, area);
        });
    }

    fn app(&self) -> MutexGuard<'_, App> {
        lock_app(&self.shared).expect("app lock")
    }
}

#[test]
fn typed_prompt_round_trips_through_realm() {
    let mut fixture = Fixture::new();
    fixture.driver.send_text("Write a parser");
    send_keys(&fixture.driver, &[KeyCode::Enter]);
    fixture.pump();

    {
        let app = fixture.app();
        assert_eq!(app.chat.transcript().len(), 1);
        assert_eq!(app.in_flight(), 1);
    }

    fixture.driver.send_tick();
    fixture.pump();
    fixture.render();

    assert_buffer_contains(&fixture.terminal, "You: Write a parser");
    assert_buffer_contains(&fixture.terminal, &format!("AI: {GENERATE_CODE_ERROR}"));
    assert!(fixture.app().chat.input.is_empty());
}

#[test]
fn clicking_rendered_input_moves_focus() {
    let mut fixture = Fixture::new();
    fixture.render();

    let target = {
        let app = fixture.app();
        (0..44u16)
            .flat_map(|row| (0..160u16).map(move |col| (col, row)))
            .find(|&(col, row)| {
                app.interaction_map.resolve_message(col, row)
                    == Some(Message::Focus(Field::BoardId))
            })
            .expect("board id input should be clickable")
    };

    fixture.driver.send_left_click(target.0, target.1);
    fixture.pump();

    assert_eq!(fixture.app().focus(), Field::BoardId);
}

#[test]
fn theme_key_and_quit_flow_through_root_component() {
    let mut fixture = Fixture::new();
    send_keys(&fixture.driver, &[KeyCode::F(2)]);
    fixture.driver.send_resize(120, 30);
    fixture.pump();
    fixture.render();

    assert!(fixture.app().theme().is_dark());
    assert_buffer_contains(&fixture.terminal, "Switch to Light Mode");

    fixture.driver.send_key_event(crossterm::event::KeyEvent::new(
        KeyCode::Char('c'),
        crossterm::event::KeyModifiers::CONTROL,
    ));
    fixture.pump();
    assert!(should_quit(&fixture.shared).expect("quit flag"));
}

#[test]
fn clicks_behind_notice_are_ignored() {
    let mut fixture = Fixture::new();
    {
        let mut app = fixture.app();
        app.chat.input = "hi".to_string();
        app.apply_completion(crate::app::dispatch::Completion::Operation(
            crate::app::dispatch::OperationOutcome::PushCode(Err(
                crate::backend::ApiError::NoRuntime,
            )),
        ));
    }
    fixture.render();

    let send = {
        let app = fixture.app();
        (0..44u16)
            .flat_map(|row| (0..160u16).map(move |col| (col, row)))
            .find(|&(col, row)| {
                app.interaction_map.resolve_message(col, row) == Some(Message::SubmitChat)
            })
            .expect("send button should be outside the notice")
    };
    apply_message(&fixture.shared, Message::Mouse(left_click(send.0, send.1))).expect("click");

    let app = fixture.app();
    assert_eq!(app.in_flight(), 0);
    assert_eq!(app.chat.input, "hi");
    assert!(app.current_notice().is_some());
}

#[test]
fn only_handled_keys_reach_the_app() {
    let cases = [
        (RealmKey::Enter, KeyCode::Enter),
        (RealmKey::BackTab, KeyCode::BackTab),
        (RealmKey::PageDown, KeyCode::PageDown),
        (RealmKey::Right, KeyCode::Right),
        (RealmKey::Function(9), KeyCode::F(9)),
        (RealmKey::Char('z'), KeyCode::Char('z')),
    ];
    for (realm, expected) in cases {
        assert_eq!(
            key_message(RealmKeyEvent::new(realm, RealmKeyModifiers::NONE)),
            Some(Message::Key(KeyEvent::new(expected, KeyModifiers::NONE)))
        );
    }

    for unused in [RealmKey::Home, RealmKey::Insert, RealmKey::Delete] {
        assert_eq!(
            key_message(RealmKeyEvent::new(unused, RealmKeyModifiers::NONE)),
            None
        );
    }

    let chord = key_message(RealmKeyEvent::new(
        RealmKey::Char('q'),
        RealmKeyModifiers::SHIFT | RealmKeyModifiers::CONTROL,
    ));
    assert_eq!(
        chord,
        Some(Message::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::SHIFT | KeyModifiers::CONTROL,
        )))
    );
}

#[test]
fn wheel_directions_are_kept_and_other_mouse_motion_dropped() {
    let event = |kind| RealmMouseEvent {
        kind,
        column: 10,
        row: 20,
        modifiers: RealmKeyModifiers::NONE,
    };
    let kind_of = |message: Option<Message>| match message {
        Some(Message::Mouse(mouse)) => Some(mouse.kind),
        _ => None,
    };

    assert_eq!(
        kind_of(mouse_message(event(RealmMouseEventKind::Down(
            RealmMouseButton::Left
        )))),
        Some(MouseEventKind::Down(MouseButton::Left))
    );
    assert_eq!(
        kind_of(mouse_message(event(RealmMouseEventKind::ScrollLeft))),
        Some(MouseEventKind::ScrollLeft)
    );
    assert_eq!(
        kind_of(mouse_message(event(RealmMouseEventKind::ScrollRight))),
        Some(MouseEventKind::ScrollRight)
    );

    for dropped in [
        RealmMouseEventKind::Moved,
        RealmMouseEventKind::Up(RealmMouseButton::Left),
        RealmMouseEventKind::Down(RealmMouseButton::Right),
    ] {
        assert_eq!(mouse_message(event(dropped)), None);
    }
}
