use super::utils::centered_rect;
use super::widgets::priority_span;
use super::*;
use crate::app::{FormField, TextInput};
use crate::types::Priority;

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Input value with a block cursor when focused.
fn input_spans(input: &TextInput, focused: bool, placeholder: &str) -> Vec<Span<'static>> {
    if !focused {
        if input.is_empty() {
            return vec![Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )];
        }
        return vec![Span::styled(
            input.value.clone(),
            Style::default().fg(Color::White),
        )];
    }
    let (before, after) = input.split_at_cursor();
    let bold = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    vec![
        Span::styled(before.to_string(), bold),
        Span::styled("█", Style::default().fg(Color::Yellow)),
        Span::styled(after.to_string(), bold),
    ]
}

pub fn render_task_form(frame: &mut Frame, app: &mut App, body: Rect) {
    // The view the form was opened from stays visible underneath
    super::task_list::render_browse_view(frame, app, body);

    let Some(form) = &app.form else {
        return;
    };

    let area = centered_rect(64, 15, frame.area());
    frame.render_widget(Clear, area);

    let focus = form.focused;
    let mut lines = vec![
        Line::from(""),
        Line::from(
            [
                vec![Span::styled("Title:       ", field_style(focus == FormField::Title))],
                input_spans(&form.title, focus == FormField::Title, "(required)"),
            ]
            .concat(),
        ),
        Line::from(
            [
                vec![Span::styled(
                    "Description: ",
                    field_style(focus == FormField::Description),
                )],
                input_spans(&form.description, focus == FormField::Description, ""),
            ]
            .concat(),
        ),
        Line::from(
            [
                vec![Span::styled(
                    "Due date:    ",
                    field_style(focus == FormField::DueDate),
                )],
                input_spans(&form.due_date, focus == FormField::DueDate, "YYYY-MM-DD"),
            ]
            .concat(),
        ),
    ];

    let mut priority_line = vec![Span::styled(
        "Priority:    ",
        field_style(focus == FormField::Priority),
    )];
    for priority in [Priority::Low, Priority::Medium, Priority::High] {
        let selected = priority == form.priority;
        priority_line.push(priority_span(priority));
        let style = if selected && focus == FormField::Priority {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        priority_line.push(Span::styled(priority.to_string(), style));
        priority_line.push(Span::raw("   "));
    }
    lines.push(Line::from(priority_line));
    lines.push(Line::from(""));

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if form.submitting {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Next field  "),
        Span::styled("←→", Style::default().fg(Color::Yellow)),
        Span::raw(": Move / priority  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Save  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                form.heading(),
                Style::default().fg(Color::Yellow),
            ))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(paragraph, area);
}
