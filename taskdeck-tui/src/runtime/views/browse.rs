use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::ActionTx;
use super::enqueue_action;

/// Keys for the list and timeline views.
pub(super) fn handle_browse_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.filter_focused {
        handle_filter_key(key, app);
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if !app.filter_input.is_empty() {
                app.filter_input_clear();
            }
        }

        // Navigation
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::PageDown => app.page(1),
        KeyCode::PageUp => app.page(-1),
        KeyCode::Char('d') if ctrl => app.page(1),
        KeyCode::Char('u') if ctrl => app.page(-1),
        KeyCode::Home | KeyCode::Char('g') => app.jump_top(),
        KeyCode::End | KeyCode::Char('G') => app.jump_bottom(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_browse_view(),
        KeyCode::Char('J') => app.scroll_detail(true),
        KeyCode::Char('K') => app.scroll_detail(false),

        // Enter/Space fold a section on headers; Enter edits a task
        KeyCode::Enter | KeyCode::Char(' ') if app.is_on_header() => {
            app.toggle_section();
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            app.open_edit_form();
        }
        KeyCode::Char('z') => app.fold_current_section(),
        KeyCode::Char(c @ '1'..='3') => app.jump_to_section(c as usize - '1' as usize),

        // Mutations
        KeyCode::Char('x') | KeyCode::Char(' ') => {
            enqueue_action(action_tx, app.toggle_current_task_status());
        }
        KeyCode::Char('s') => {
            enqueue_action(action_tx, app.start_current_task());
        }
        KeyCode::Char('a') => app.open_create_form(),
        KeyCode::Char('A') => {
            app.open_subtask_form();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            enqueue_action(action_tx, app.delete_current_task());
        }
        KeyCode::Char('r') => {
            enqueue_action(action_tx, Some(app.refresh()));
        }
        KeyCode::Char('/') => app.begin_filter(),
        _ => {}
    }
}

fn handle_filter_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.filter_input_clear();
            app.end_filter();
        }
        KeyCode::Enter | KeyCode::Down | KeyCode::Up => {
            app.end_filter();
        }
        KeyCode::Backspace => app.filter_input_backspace(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter_input_clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter_input_char(c);
        }
        _ => {}
    }
}
