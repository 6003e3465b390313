use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::chat::Sender;
use crate::app::code::CodeTarget;
use crate::app::interaction::InteractionLayer;
use crate::app::operations::{Operation, pretty_workflow};
use crate::app::{App, Field, Message, NoticeKind, ScrollTarget};
use crate::theme::Palette;

const TITLE: &str = "AI Assistant App";
const SEND_LABEL: &str = "Send";
const INPUT_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    app.interaction_map.clear();
    let palette = app.theme().palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app, palette);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body[1]);

    render_chat(frame, body[0], app, palette);
    render_ide(frame, right[0], app, palette);
    render_operations(frame, right[1], app, palette);
    render_footer(frame, chunks[2], app, palette);

    if app.current_notice().is_some() {
        render_notice(frame, app, palette);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &mut App, palette: &Palette) {
    let header = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.secondary))
        .title(Span::styled(
            format!(" {TITLE} "),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left);
    let inner = header.inner(area);
    frame.render_widget(header, area);

    let label = app.theme().mode().toggle_label();
    let width = (label.len() as u16 + 4).min(inner.width);
    let button = Rect::new(
        inner.x + inner.width.saturating_sub(width),
        inner.y,
        width,
        inner.height.min(1),
    );
    frame.render_widget(
        Paragraph::new(format!("[ {label} ]"))
            .alignment(Alignment::Center)
            .style(button_style(palette)),
        button,
    );
    app.interaction_map
        .register_click(InteractionLayer::Base, button, Message::ToggleTheme);
}

fn render_chat(frame: &mut Frame<'_>, area: Rect, app: &mut App, palette: &Palette) {
    let inner = render_panel(frame, area, "Chat Assistant", palette);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
        .split(inner);

    let transcript = rows[0];
    let width = usize::from(transcript.width);
    let mut lines = Vec::new();
    for turn in app.chat.transcript() {
        let label_style = match turn.sender {
            Sender::User => Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
            Sender::Assistant => Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        };
        let prefix = format!("{}: ", turn.sender.label());
        let turn_rows = wrap_rows(&format!("{prefix}{}", turn.text), width);
        for (index, row) in turn_rows.into_iter().enumerate() {
            if index == 0 && row.starts_with(&prefix) {
                let rest = row[prefix.len()..].to_string();
                lines.push(Line::from(vec![
                    Span::styled(prefix.clone(), label_style),
                    Span::raw(rest),
                ]));
            } else {
                lines.push(Line::from(row));
            }
        }
    }

    // Rows are pre-wrapped, so the offset counts screen rows.
    let hidden = hidden_rows(lines.len(), transcript.height);
    let top = hidden - app.chat.clamp_scroll_back(hidden);
    frame.render_widget(Paragraph::new(lines).scroll((top, 0)), transcript);
    app.interaction_map
        .register_scroll(transcript, ScrollTarget::Chat);

    let input_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(10)])
        .split(rows[1]);
    render_input_field(frame, input_row[0], app, Field::ChatInput, palette);
    render_button(frame, input_row[1], app, SEND_LABEL, Message::SubmitChat, palette);
}

fn render_ide(frame: &mut Frame<'_>, area: Rect, app: &mut App, palette: &Palette) {
    let inner = render_panel(frame, area, "Integrated IDE", palette);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
        .split(inner);

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(button_width(CodeTarget::FrontEnd.button_label())),
            Constraint::Length(button_width(CodeTarget::BackEnd.button_label())),
        ])
        .split(rows[0]);
    render_input_field(frame, controls[0], app, Field::TechStack, palette);
    for (target, slot) in [CodeTarget::FrontEnd, CodeTarget::BackEnd]
        .into_iter()
        .zip([controls[1], controls[2]])
    {
        render_button(
            frame,
            slot,
            app,
            target.button_label(),
            Message::Generate(target),
            palette,
        );
    }

    let focused = app.focus() == Field::CodeBuffer;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused, palette))
        .title(" code ");
    frame.render_widget(
        Paragraph::new(app.code.code().to_string())
            .block(block)
            .scroll((app.code.scroll(), app.code.scroll_x())),
        rows[1],
    );
    app.interaction_map.register_click(
        InteractionLayer::Base,
        rows[1],
        Message::Focus(Field::CodeBuffer),
    );
    app.interaction_map
        .register_scroll(rows[1], ScrollTarget::Code);
}

fn render_operations(frame: &mut Frame<'_>, area: Rect, app: &mut App, palette: &Palette) {
    let inner = render_panel(frame, area, "Advanced Operations", palette);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner);

    let repo_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
            Constraint::Length(button_width(Operation::CreateRepo.button_label())),
            Constraint::Length(button_width(Operation::PushCode.button_label())),
        ])
        .split(rows[0]);
    render_input_field(frame, repo_row[0], app, Field::RepoName, palette);
    render_input_field(frame, repo_row[1], app, Field::CodeDir, palette);
    render_operation_button(frame, repo_row[2], app, Operation::CreateRepo, palette);
    render_operation_button(frame, repo_row[3], app, Operation::PushCode, palette);

    let board_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(button_width(Operation::FetchTasks.button_label())),
        ])
        .split(rows[1]);
    render_input_field(frame, board_row[0], app, Field::BoardId, palette);
    render_operation_button(frame, board_row[1], app, Operation::FetchTasks, palette);

    let action_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(button_width(Operation::RunTests.button_label())),
            Constraint::Length(button_width(Operation::RunWorkflow.button_label())),
            Constraint::Min(0),
        ])
        .split(rows[2]);
    render_operation_button(frame, action_row[0], app, Operation::RunTests, palette);
    render_operation_button(frame, action_row[1], app, Operation::RunWorkflow, palette);

    let Some(pretty) = app.operations.workflow_result().map(pretty_workflow) else {
        return;
    };
    let results = rows[3];
    let mut lines = vec![Line::from(Span::styled(
        "Workflow Results:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        wrap_rows(&pretty, usize::from(results.width))
            .into_iter()
            .map(Line::from),
    );
    let top = app
        .operations
        .clamp_workflow_scroll(hidden_rows(lines.len(), results.height));
    frame.render_widget(Paragraph::new(lines).scroll((top, 0)), results);
    app.interaction_map
        .register_scroll(results, ScrollTarget::Workflow);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App, palette: &Palette) {
    let pending = match app.in_flight() {
        0 => String::new(),
        n => format!("  {n} pending"),
    };
    let hints = format!(
        " Tab: focus  PgUp/PgDn: scroll  F2: theme  F3/F4: generate  F5-F9: operations  Ctrl+Q: quit  {}{pending} ",
        app.base_url()
    );
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(palette.secondary)),
        area,
    );
}

fn render_notice(frame: &mut Frame<'_>, app: &mut App, palette: &Palette) {
    let Some(notice) = app.current_notice().cloned() else {
        return;
    };
    let area = centered_rect(60, 30, frame.area());
    let title_style = match notice.kind {
        NoticeKind::Info => Style::default().fg(palette.primary),
        NoticeKind::Error => Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(palette.primary))
        .title(Span::styled(format!(" {} ", notice.title()), title_style))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(palette.background).fg(palette.text));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(notice.text.clone()).wrap(Wrap { trim: false }),
        rows[0],
    );

    let mut hint = String::from("[ OK ]");
    let ok_width = hint.len() as u16;
    if notice.link.is_some() {
        hint.push_str("  [ o: open link ]");
    }
    let hint_width = (hint.len() as u16).min(rows[1].width);
    let hint_x = rows[1].x + (rows[1].width.saturating_sub(hint_width)) / 2;
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(palette.secondary)),
        Rect::new(hint_x, rows[1].y, hint_width, 1),
    );

    app.interaction_map.register_click(
        InteractionLayer::Dialog,
        Rect::new(hint_x, rows[1].y, ok_width.min(hint_width), 1),
        Message::DismissNotice,
    );
    if notice.link.is_some() && hint_width > ok_width {
        app.interaction_map.register_click(
            InteractionLayer::Dialog,
            Rect::new(hint_x + ok_width, rows[1].y, hint_width - ok_width, 1),
            Message::OpenNoticeLink,
        );
    }
}

/// Draws a titled panel frame and returns its inner area.
fn render_panel(frame: &mut Frame<'_>, area: Rect, title: &str, palette: &Palette) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.secondary))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn render_input_field(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    field: Field,
    palette: &Palette,
) {
    let focused = app.focus() == field;
    let value = app.field_text(field);
    let paragraph = if value.is_empty() && !focused {
        Paragraph::new(field.placeholder()).style(Style::default().fg(palette.secondary))
    } else if focused {
        Paragraph::new(format!("{value}_"))
    } else {
        Paragraph::new(value.to_string())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused, palette));
    frame.render_widget(paragraph.block(block), area);
    app.interaction_map
        .register_click(InteractionLayer::Base, area, Message::Focus(field));
}

fn render_operation_button(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    operation: Operation,
    palette: &Palette,
) {
    render_button(
        frame,
        area,
        app,
        operation.button_label(),
        Message::Run(operation),
        palette,
    );
}

fn render_button(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    label: &str,
    message: Message,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.button_background))
        .style(button_style(palette));
    frame.render_widget(
        Paragraph::new(label.to_string())
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
    app.interaction_map
        .register_click(InteractionLayer::Base, area, message);
}

fn button_style(palette: &Palette) -> Style {
    Style::default()
        .bg(palette.button_background)
        .fg(palette.button_text)
}

fn border_style(focused: bool, palette: &Palette) -> Style {
    if focused {
        Style::default().fg(palette.primary)
    } else {
        Style::default().fg(palette.secondary)
    }
}

/// Splits `text` into rows of at most `width` characters. Blank lines keep
/// their row.
fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
        } else {
            rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
        }
    }
    rows
}

fn hidden_rows(rows: usize, height: u16) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_sub(height)
}

fn button_width(label: &str) -> u16 {
    label.len() as u16 + 4
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
