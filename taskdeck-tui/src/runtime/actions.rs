use crate::api::TaskService;
use crate::app::App;
use crate::types::UserId;
use std::sync::Arc;

use super::action_queue::{Action, ActionResult, ResultTx};

/// Call the task service for one action and package the outcome.
pub(super) async fn run_action(
    action: Action,
    service: &dyn TaskService,
    user_id: UserId,
) -> ActionResult {
    match action {
        Action::Refresh => ActionResult::Refreshed(service.list(user_id).await),
        Action::ChangeStatus {
            task_id,
            status,
            previous,
        } => ActionResult::StatusChanged {
            task_id,
            previous,
            result: service.change_status(task_id, status).await,
        },
        Action::Create(new_task) => ActionResult::Created(service.create(user_id, &new_task).await),
        Action::Update { task_id, update } => ActionResult::Updated {
            task_id,
            result: service.update(task_id, &update).await,
        },
        Action::Delete { task_id } => ActionResult::Deleted {
            task_id,
            result: service.delete(task_id).await,
        },
    }
}

/// Run an action on the tokio runtime. The result is sent back to the event
/// loop; nothing waits for it here.
pub(super) fn spawn_action(
    action: Action,
    service: Arc<dyn TaskService>,
    user_id: UserId,
    result_tx: ResultTx,
) {
    let name = action.name();
    tokio::spawn(async move {
        let result = run_action(action, service.as_ref(), user_id).await;
        if let Some(e) = result.error() {
            tracing::warn!(action = name, "action failed: {e:#}");
        } else {
            tracing::debug!(action = name, "action completed");
        }
        // The loop is gone when the receiver is dropped; nothing left to update.
        let _ = result_tx.send(result);
    });
}

/// Fold an action result into the app. Returns a follow-up action, if any.
pub(super) fn apply_result(app: &mut App, result: ActionResult) -> Option<Action> {
    match result {
        ActionResult::Refreshed(result) => app.apply_refresh(result),
        ActionResult::StatusChanged {
            task_id,
            previous,
            result,
        } => app.apply_status_changed(task_id, previous, result),
        ActionResult::Created(result) => app.apply_created(result),
        ActionResult::Updated { task_id, result } => app.apply_updated(task_id, result),
        ActionResult::Deleted { task_id, result } => app.apply_deleted(task_id, result),
    }
}
