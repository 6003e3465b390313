use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use tempfile::TempDir;

use ai_assistant::app::chat::{NO_CODE_GENERATED, Sender};
use ai_assistant::app::operations::Operation;
use ai_assistant::app::{App, Message, Notice};
use ai_assistant::backend::{ApiClient, resolve_base_url};
use ai_assistant::settings::{Settings, SettingsThemeStore};
use ai_assistant::theme::{EphemeralThemeStore, ThemeContext, ThemeMode, ThemeStore};

/// Serves one canned JSON response and reports the request path and body.
fn serve_once(status: &'static str, body: &'static str) -> Result<(String, mpsc::Receiver<(String, Value)>)> {
    serve(status, body, 1)
}

/// Serves `connections` requests in turn, all with the same response.
fn serve(
    status: &'static str,
    body: &'static str,
    connections: usize,
) -> Result<(String, mpsc::Receiver<(String, Value)>)> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind test server")?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for _ in 0..connections {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            answer(stream, status, body, &tx);
        }
    });

    Ok((base_url, rx))
}

fn answer(stream: TcpStream, status: &str, body: &str, tx: &mpsc::Sender<(String, Value)>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header == "\r\n" || header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut payload = vec![0u8; content_length];
    let _ = reader.read_exact(&mut payload);
    let request_body = serde_json::from_slice(&payload).unwrap_or(Value::Null);
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    let _ = tx.send((path, request_body));

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn app_for(base_url: String) -> App {
    App::new(
        ThemeContext::load(Box::new(EphemeralThemeStore::default())),
        ApiClient::new(base_url),
    )
}

/// Ticks the app until nothing is in flight, yielding to the runtime between ticks.
async fn settle(app: &mut App) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.in_flight() > 0 {
        if Instant::now() > deadline {
            bail!("requests still in flight after 5s");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.update(Message::Tick)?;
    }
    Ok(())
}

#[tokio::test]
async fn chat_prompt_reaches_backend_and_reply_is_appended() -> Result<()> {
    let (base_url, requests) = serve_once("200 OK", r#"{"generated_code":"print('hi')"}"#)?;
    let mut app = app_for(base_url);

    app.chat.input = "Write a hello world function".to_string();
    app.update(Message::SubmitChat)?;
    settle(&mut app).await?;

    let (path, body) = requests.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(path, "/generate_code");
    assert_eq!(body, json!({"prompt": "Write a hello world function"}));

    let turns = app.chat.transcript();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].sender, Sender::Assistant);
    assert_eq!(turns[1].text, "print('hi')");
    assert!(app.chat.input.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_generated_code_uses_fallback_turn() -> Result<()> {
    let (base_url, _requests) = serve_once("200 OK", r#"{"generated_code":""}"#)?;
    let mut app = app_for(base_url);

    app.chat.input = "anything".to_string();
    app.update(Message::SubmitChat)?;
    settle(&mut app).await?;

    let last = app.chat.transcript().last().context("assistant turn")?;
    assert_eq!(last.text, NO_CODE_GENERATED);
    Ok(())
}

#[tokio::test]
async fn fetched_tasks_raise_joined_notice() -> Result<()> {
    let (base_url, requests) = serve_once("200 OK", r#"{"tasks":["Task 1","Task 2"]}"#)?;
    let mut app = app_for(base_url);

    app.operations.board_id = "board-7".to_string();
    app.update(Message::Run(Operation::FetchTasks))?;
    settle(&mut app).await?;

    let (path, body) = requests.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(path, "/fetch_trello_tasks");
    assert_eq!(body["board_id"], "board-7");
    assert_eq!(
        app.current_notice(),
        Some(&Notice::info("Trello Tasks: Task 1, Task 2"))
    );
    Ok(())
}

#[tokio::test]
async fn workflow_result_is_kept_verbatim() -> Result<()> {
    let (base_url, requests) = serve_once(
        "200 OK",
        r#"{"requirements":"auth","code":{"front":"x"},"trello_tasks":[]}"#,
    )?;
    let mut app = app_for(base_url);

    app.update(Message::Run(Operation::RunWorkflow))?;
    settle(&mut app).await?;

    let (path, _) = requests.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(path, "/workflow");
    assert_eq!(
        app.operations.workflow_result(),
        Some(&json!({"requirements": "auth", "code": {"front": "x"}, "trello_tasks": []}))
    );
    assert!(app.current_notice().is_none());
    Ok(())
}

#[tokio::test]
async fn server_error_on_push_shows_fixed_message() -> Result<()> {
    let (base_url, _requests) = serve_once("500 Internal Server Error", r#"{"detail":"x"}"#)?;
    let mut app = app_for(base_url);

    app.update(Message::Run(Operation::PushCode))?;
    settle(&mut app).await?;

    assert_eq!(app.current_notice(), Some(&Notice::error("Error pushing code")));
    Ok(())
}

#[tokio::test]
async fn overlapping_chat_prompts_each_get_one_reply() -> Result<()> {
    let (base_url, requests) = serve("200 OK", r#"{"generated_code":"done"}"#, 2)?;
    let mut app = app_for(base_url);

    app.chat.input = "first".to_string();
    app.update(Message::SubmitChat)?;
    app.chat.input = "second".to_string();
    app.update(Message::SubmitChat)?;
    assert_eq!(app.in_flight(), 2);

    settle(&mut app).await?;

    let mut prompts = vec![
        requests.recv_timeout(Duration::from_secs(1))?.1["prompt"].clone(),
        requests.recv_timeout(Duration::from_secs(1))?.1["prompt"].clone(),
    ];
    prompts.sort_by_key(|prompt| prompt.to_string());
    assert_eq!(prompts, vec![json!("first"), json!("second")]);

    let turns = app.chat.transcript();
    assert_eq!(turns.len(), 4);
    let senders: Vec<Sender> = turns.iter().map(|turn| turn.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::User, Sender::Assistant, Sender::Assistant]
    );
    assert!(turns[2..].iter().all(|turn| turn.text == "done"));
    assert_eq!(app.in_flight(), 0);
    assert!(app.chat.input.is_empty());
    Ok(())
}

#[tokio::test]
async fn concurrent_operations_each_raise_one_notice() -> Result<()> {
    let (base_url, _requests) = serve("200 OK", r#"{"tasks":["T"],"message":"ok"}"#, 3)?;
    let mut app = app_for(base_url);

    app.update(Message::Run(Operation::FetchTasks))?;
    app.update(Message::Run(Operation::PushCode))?;
    app.update(Message::Run(Operation::RunTests))?;
    assert_eq!(app.in_flight(), 3);

    settle(&mut app).await?;
    assert_eq!(app.in_flight(), 0);
    assert_eq!(app.queued_notices(), 3);

    let mut texts = Vec::new();
    while let Some(notice) = app.current_notice() {
        texts.push(notice.text.clone());
        app.update(Message::DismissNotice)?;
    }
    texts.sort();
    assert_eq!(texts, vec!["Trello Tasks: T", "ok", "ok"]);
    Ok(())
}

#[test]
fn theme_choice_survives_restart() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("ai-assistant").join("settings.toml");

    let mut first = ThemeContext::load(Box::new(SettingsThemeStore::new(&path)));
    assert_eq!(first.mode(), ThemeMode::Light);
    assert_eq!(first.toggle(), ThemeMode::Dark);

    let second = ThemeContext::load(Box::new(SettingsThemeStore::new(&path)));
    assert!(second.is_dark());
    assert_eq!(Settings::load_from_path(&path).theme, "dark");
    Ok(())
}

#[test]
fn theme_override_does_not_touch_saved_preference() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("settings.toml");
    let store = SettingsThemeStore::new(&path);

    let context = ThemeContext::with_override(Box::new(store.clone()), ThemeMode::Dark);
    assert!(context.is_dark());
    assert_eq!(store.load(), None);
    Ok(())
}

#[test]
fn base_url_precedence_and_normalisation() {
    assert_eq!(
        resolve_base_url(Some("http://cli:1/"), Some("http://env:2"), Some("http://file:3")),
        "http://cli:1"
    );
    assert_eq!(
        resolve_base_url(Some("  "), Some("http://env:2"), None),
        "http://env:2"
    );
    assert_eq!(resolve_base_url(None, None, Some("http://file:3")), "http://file:3");
    assert_eq!(resolve_base_url(None, None, None), "http://127.0.0.1:8000");
}
