use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::ActionTx;
use super::enqueue_action;

pub(super) fn handle_confirm_delete_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            enqueue_action(action_tx, app.accept_delete());
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_delete();
        }
        _ => {}
    }
}
