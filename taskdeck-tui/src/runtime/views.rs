use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{enqueue, Action, ActionTx};

mod browse;
mod confirm_delete;
mod task_form;

fn enqueue_action(action_tx: &ActionTx, action: Option<Action>) {
    if let Some(action) = action {
        enqueue(action_tx, action);
    }
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    match app.current_view {
        View::List | View::Timeline => browse::handle_browse_key(key, app, action_tx),
        View::TaskForm => task_form::handle_task_form_key(key, app, action_tx),
        View::ConfirmDelete => confirm_delete::handle_confirm_delete_key(key, app, action_tx),
    }
}
