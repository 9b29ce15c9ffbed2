use super::utils::centered_rect;
use super::*;

pub fn render_delete_confirm_dialog(frame: &mut Frame, app: &mut App, body: Rect) {
    // Extract owned values before borrowing `app` mutably for background render
    let (title, detail) = match &app.delete_context {
        Some(ctx) => {
            let detail = match ctx.subtask_count {
                0 => "This cannot be undone".to_string(),
                1 => "Its subtask is deleted too".to_string(),
                n => format!("Its {} subtasks are deleted too", n),
            };
            (ctx.display_title.clone(), detail)
        }
        None => (String::new(), String::new()),
    };

    // The originating view stays visible underneath
    super::task_list::render_browse_view(frame, app, body);

    let area = centered_rect(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(Color::White))),
        Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Delete Task? ")
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
