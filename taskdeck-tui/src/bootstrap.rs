use crate::api::TaskService;
use crate::app::App;

/// Load the first snapshot before the terminal is taken over. A failure is
/// shown in the status line; the periodic refresh retries.
pub async fn initialize_app_state(app: &mut App, service: &dyn TaskService) {
    let result = service.list(app.user_id).await;
    match &result {
        Ok(tasks) => tracing::info!(count = tasks.len(), "loaded tasks"),
        Err(e) => tracing::warn!("could not load tasks: {e:#}"),
    }
    app.apply_refresh(result);
}
