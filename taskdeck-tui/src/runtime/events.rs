use crate::app::App;
use crossterm::event::KeyEvent;
use std::time::Instant;

use super::action_queue::{enqueue, ActionResult, ActionTx};
use super::actions::apply_result;
use super::views::handle_view_key;

/// Everything the event loop feeds into the app.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
    Completed(ActionResult),
}

/// Apply one event. All app state changes happen here, one event at a time.
pub(crate) fn handle_event(app: &mut App, event: AppEvent, action_tx: &ActionTx) {
    match event {
        AppEvent::Key(key) => handle_view_key(key, app, action_tx),
        AppEvent::Tick => app.on_tick(Instant::now()),
        AppEvent::Resize(width, height) => {
            // The next draw reports the new viewport height.
            tracing::debug!(width, height, "terminal resized");
        }
        AppEvent::Completed(result) => {
            app.in_flight = app.in_flight.saturating_sub(1);
            if let Some(follow_up) = apply_result(app, result) {
                enqueue(action_tx, follow_up);
            }
        }
    }
}
