use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::ActionTx;
use super::enqueue_action;

pub(super) fn handle_task_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    if key.code == KeyCode::Enter
        || (key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        enqueue_action(action_tx, app.submit_form());
        return;
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Left => form.move_cursor(true),
        KeyCode::Right => form.move_cursor(false),
        KeyCode::Home => {
            if let Some(input) = form.focused_input() {
                input.home();
            }
        }
        KeyCode::End => {
            if let Some(input) = form.focused_input() {
                input.end();
            }
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {}
    }
}
