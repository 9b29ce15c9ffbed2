use crate::app::{App, BrowseView, StatusLevel, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};

mod delete_dialog;
mod detail_panel;
mod task_form;
mod task_list;
pub(super) mod utils;
pub(super) mod widgets;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // View
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_title_bar(frame, app, root[0]);

    let body = root[1];
    match app.current_view {
        View::List | View::Timeline => task_list::render_browse_view(frame, app, body),
        View::TaskForm => task_form::render_task_form(frame, app, body),
        View::ConfirmDelete => delete_dialog::render_delete_confirm_dialog(frame, app, body),
    }

    render_status_line(frame, app, root[2]);
    render_controls(frame, app, root[3]);
}

fn render_title_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    const LABEL: &str = " Taskdeck";
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2 + LABEL.len() as u16),
            Constraint::Min(0),
        ])
        .split(area);

    // Throbber spins while actions are in flight
    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading() {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::Yellow))),
        label_area,
    );

    let tab = |name: &'static str, active: bool| {
        if active {
            Span::styled(
                name,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(name, Style::default().fg(Color::DarkGray))
        }
    };
    let mut spans = vec![
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        tab(" List ", app.browse == BrowseView::List),
        Span::raw(" "),
        tab(" Timeline ", app.browse == BrowseView::Timeline),
    ];
    if app.filter_focused || !app.filter_input.is_empty() {
        let (before, after) = app.filter_input.split_at_cursor();
        spans.push(Span::styled("  / ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            before.to_string(),
            Style::default().fg(Color::White),
        ));
        if app.filter_focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        spans.push(Span::styled(
            after.to_string(),
            Style::default().fg(Color::White),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[1]);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some(message) => {
            let color = match message.level {
                StatusLevel::Info => Color::Green,
                StatusLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", message.text),
                Style::default().fg(color),
            ))
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let controls_text = match app.current_view {
        View::TaskForm => vec![
            key("Tab"),
            Span::raw(": Next field  "),
            key("Enter"),
            Span::raw(": Save  "),
            key("Esc"),
            Span::raw(": Cancel"),
        ],
        View::ConfirmDelete => vec![
            key("y"),
            Span::raw(": Delete  "),
            key("n / Esc"),
            Span::raw(": Keep"),
        ],
        View::List | View::Timeline if app.filter_focused => vec![
            key("Enter"),
            Span::raw(": Keep filter  "),
            key("Esc"),
            Span::raw(": Clear filter"),
        ],
        View::List | View::Timeline => vec![
            key("↑↓"),
            Span::raw(": Navigate  "),
            key("Enter"),
            Span::raw(": Fold / Edit  "),
            key("x"),
            Span::raw(": Done  "),
            key("s"),
            Span::raw(": Start  "),
            key("z/1-3"),
            Span::raw(": Fold / Section  "),
            key("a/A"),
            Span::raw(": Add / Subtask  "),
            key("d"),
            Span::raw(": Delete  "),
            key("/"),
            Span::raw(": Filter  "),
            key("Tab"),
            Span::raw(": Switch view  "),
            key("q"),
            Span::raw(": Quit"),
        ],
    };

    let controls = Paragraph::new(Line::from(controls_text))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " Controls ",
                    Style::default().fg(Color::DarkGray),
                ))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(controls, area);
}
