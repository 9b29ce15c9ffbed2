use super::widgets::{due_label, priority_span, status_glyph};
use super::*;
use crate::app::CursorState;
use crate::time_utils::format_date;

/// Rows `lines` take up once wrapped to `width`.
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

pub fn render_detail_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Details ", Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);

    let Some(task) = app.current_task() else {
        let hint = match app.cursor_state() {
            _ if app.tasks.is_empty() => "No tasks yet. Press a to add one.",
            CursorState::OnHeader => "Enter folds this section. Select a task to see its details.",
            CursorState::Empty | CursorState::OnTask => "Select a task to see its details.",
        };
        app.set_detail_scroll_limit(0);
        let empty = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let white = Style::default().fg(Color::White);
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            task.title.clone(),
            white.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status:   ", label),
            Span::styled(format!("{} {}", status_glyph(task.status), task.status), white),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", label),
            priority_span(task.priority),
            Span::styled(format!(" {}", task.priority), white),
        ]),
    ];

    let today = app.now().date();
    let due = match due_label(task, today, app.local_offset) {
        Some((text, color)) => Span::styled(text, Style::default().fg(color)),
        None => Span::styled("none", muted),
    };
    lines.push(Line::from(vec![Span::styled("Due:      ", label), due]));

    if let Some(parent) = task.parent_id.and_then(|id| app.task_by_id(id)) {
        lines.push(Line::from(vec![
            Span::styled("Project:  ", label),
            Span::styled(parent.title.clone(), Style::default().fg(Color::Cyan)),
        ]));
    }
    let subtasks = app.subtask_count(task.id);
    if subtasks > 0 {
        lines.push(Line::from(vec![
            Span::styled("Subtasks: ", label),
            Span::styled(subtasks.to_string(), white),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Created:  ", label),
        Span::styled(
            format_date(task.created_at.to_offset(app.local_offset).date()),
            muted,
        ),
    ]));

    lines.push(Line::from(""));
    match task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => {
            lines.extend(
                description
                    .lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), white))),
            );
        }
        None => lines.push(Line::from(Span::styled("No description", muted))),
    }

    let content_height = wrapped_height(&lines, inner.width);
    let limit = content_height.saturating_sub(usize::from(inner.height));
    app.set_detail_scroll_limit(u16::try_from(limit).unwrap_or(u16::MAX));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}
