use super::widgets::{build_header_row, build_task_row};
use super::*;
use crate::app::{BrowseView, Navigator, Row, SectionKind};
use crate::types::Task;
use time::{Date, UtcOffset};

/// List or timeline on the left, details of the selected task on the right.
pub fn render_browse_view(frame: &mut Frame, app: &mut App, body: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(body);

    let today = app.now().date();
    let offset = app.local_offset;
    let filtered = !app.filter_input.is_empty();
    match app.browse {
        BrowseView::List => render_sections(
            frame,
            &mut app.list,
            &app.tasks,
            columns[0],
            " Tasks ",
            filtered,
            today,
            offset,
        ),
        BrowseView::Timeline => render_sections(
            frame,
            &mut app.timeline,
            &app.tasks,
            columns[0],
            " Timeline ",
            filtered,
            today,
            offset,
        ),
    }

    super::detail_panel::render_detail_panel(frame, app, columns[1]);
}

#[allow(clippy::too_many_arguments)]
fn render_sections<K: SectionKind>(
    frame: &mut Frame,
    nav: &mut Navigator<K>,
    tasks: &[Task],
    area: Rect,
    title: &str,
    filtered: bool,
    today: Date,
    offset: UtcOffset,
) {
    let task_count = nav.registry().task_count();
    let title = if filtered {
        format!("{}({} matching) ", title, task_count)
    } else {
        format!("{}({}) ", title, task_count)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // Report the viewport before reading the offset so scrolling is settled
    let max_rows = inner_area.height as usize;
    nav.set_viewport_height(max_rows);
    let scroll_offset = nav.offset();
    let total_rows = nav.visible_row_count();
    let focused_row = nav.visual_index();

    let content_width = if total_rows > max_rows {
        inner_area.width.saturating_sub(1)
    } else {
        inner_area.width
    };

    let rows = nav.visible_rows(tasks, scroll_offset, max_rows);
    for (i, row) in rows.iter().enumerate() {
        let is_focused = scroll_offset + i == focused_row;
        let line = match row {
            Row::Header {
                title,
                item_count,
                expanded,
                ..
            } => build_header_row(title, *item_count, *expanded, is_focused),
            Row::Task { task, .. } => {
                let parent_title = task
                    .parent_id
                    .and_then(|id| tasks.iter().find(|t| t.id == id))
                    .map(|parent| parent.title.as_str());
                build_task_row(task, parent_title, is_focused, today, offset)
            }
        };
        let row_rect = Rect::new(inner_area.x, inner_area.y + i as u16, content_width, 1);
        frame.render_widget(Paragraph::new(line), row_rect);
    }

    if total_rows > max_rows {
        let mut scrollbar_state = ScrollbarState::new(total_rows)
            .position(scroll_offset)
            .viewport_content_length(max_rows);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(Color::DarkGray)),
            inner_area,
            &mut scrollbar_state,
        );
    }
}
