use crate::api::TaskService;
use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::action_queue::{channel, enqueue, result_channel, Action};
use super::actions::spawn_action;
use super::events::{handle_event, AppEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const TICK_RATE: Duration = Duration::from_millis(250);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    service: Arc<dyn TaskService>,
    refresh_interval: Duration,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let (result_tx, mut result_rx) = result_channel();

    let mut last_tick = Instant::now();
    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_event(app, AppEvent::Key(key), &action_tx);
                }
                Event::Resize(width, height) => {
                    handle_event(app, AppEvent::Resize(width, height), &action_tx);
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            handle_event(app, AppEvent::Tick, &action_tx);
            last_tick = Instant::now();
        }

        // Background refresh, paused while a form is open
        if last_refresh.elapsed() >= refresh_interval && !app.is_in_form() {
            enqueue(&action_tx, Action::Refresh);
            last_refresh = Instant::now();
        }

        while let Ok(action) = action_rx.try_recv() {
            if action == Action::Refresh {
                last_refresh = Instant::now();
            }
            app.in_flight += 1;
            spawn_action(action, Arc::clone(&service), app.user_id, result_tx.clone());
        }

        while let Ok(result) = result_rx.try_recv() {
            handle_event(app, AppEvent::Completed(result), &action_tx);
        }

        if !app.running {
            break;
        }
    }

    tracing::info!(in_flight = app.in_flight, "event loop finished");
    Ok(())
}
