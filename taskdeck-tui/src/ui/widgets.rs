use crate::time_utils::{due_date_in, format_date};
use crate::types::{Priority, Task, TaskStatus};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use time::{Date, UtcOffset};

fn focused_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Flatten a line into one span with focus styling: white background with
/// black text.
fn focus(spans: Vec<Span<'_>>) -> Line<'static> {
    Line::from(vec![Span::styled(
        spans.iter().map(|s| s.content.as_ref()).collect::<String>(),
        focused_style(),
    )])
}

pub fn status_glyph(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "[ ]",
        TaskStatus::InProgress => "[~]",
        TaskStatus::Done => "[x]",
    }
}

pub fn priority_span(priority: Priority) -> Span<'static> {
    match priority {
        Priority::High => Span::styled("!!", Style::default().fg(Color::Red)),
        Priority::Medium => Span::styled("! ", Style::default().fg(Color::Yellow)),
        Priority::Low => Span::styled("· ", Style::default().fg(Color::DarkGray)),
    }
}

/// Due date label and color relative to today.
pub fn due_label(task: &Task, today: Date, offset: UtcOffset) -> Option<(String, Color)> {
    let due = due_date_in(task.due_date?, offset);
    let days = (due - today).whole_days();
    let color = if task.is_done() {
        Color::DarkGray
    } else if days < 0 {
        Color::Red
    } else if days == 0 {
        Color::Yellow
    } else {
        Color::Green
    };
    let label = match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        _ => format_date(due),
    };
    Some((label, color))
}

pub fn build_header_row(title: &str, item_count: usize, expanded: bool, is_focused: bool) -> Line<'static> {
    let arrow = if expanded { "▾" } else { "▸" };
    let spans = vec![
        Span::styled(
            format!("{} {}", arrow, title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", item_count),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if is_focused {
        return focus(spans);
    }
    Line::from(spans)
}

pub fn build_task_row(
    task: &Task,
    parent_title: Option<&str>,
    is_focused: bool,
    today: Date,
    offset: UtcOffset,
) -> Line<'static> {
    let done = task.is_done();
    let title_style = if done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if task.status == TaskStatus::InProgress {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::raw("  "),
        Span::styled(
            format!("{} ", status_glyph(task.status)),
            Style::default().fg(if done { Color::Green } else { Color::Gray }),
        ),
        priority_span(task.priority),
        Span::raw(" "),
    ];
    if task.parent_id.is_some() {
        spans.push(Span::styled("↳ ", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(task.title.clone(), title_style));
    if let Some(parent) = parent_title {
        spans.push(Span::styled(
            format!("  ({})", parent),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some((label, color)) = due_label(task, today, offset) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(label, Style::default().fg(color)));
    }

    if is_focused {
        return focus(spans);
    }
    Line::from(spans)
}
