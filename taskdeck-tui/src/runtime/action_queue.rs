use crate::types::{NewTask, Task, TaskId, TaskStatus, TaskUpdate};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Deferred work against the task service. Each variant carries what is
/// needed to reconcile local state once the result comes back.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Refresh,
    ChangeStatus {
        task_id: TaskId,
        status: TaskStatus,
        previous: TaskStatus,
    },
    Create(NewTask),
    Update {
        task_id: TaskId,
        update: TaskUpdate,
    },
    Delete {
        task_id: TaskId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Refresh => "refresh",
            Action::ChangeStatus { .. } => "change_status",
            Action::Create(_) => "create",
            Action::Update { .. } => "update",
            Action::Delete { .. } => "delete",
        }
    }
}

/// Outcome of an [`Action`], delivered back to the event loop.
#[derive(Debug)]
pub enum ActionResult {
    Refreshed(anyhow::Result<Vec<Task>>),
    StatusChanged {
        task_id: TaskId,
        previous: TaskStatus,
        result: anyhow::Result<Task>,
    },
    Created(anyhow::Result<Task>),
    Updated {
        task_id: TaskId,
        result: anyhow::Result<Task>,
    },
    Deleted {
        task_id: TaskId,
        result: anyhow::Result<()>,
    },
}

impl ActionResult {
    /// The service error, when the call failed.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            ActionResult::Refreshed(result) => result.as_ref().err(),
            ActionResult::StatusChanged { result, .. }
            | ActionResult::Created(result)
            | ActionResult::Updated { result, .. } => result.as_ref().err(),
            ActionResult::Deleted { result, .. } => result.as_ref().err(),
        }
    }
}

pub(crate) type ActionTx = UnboundedSender<Action>;
pub(crate) type ActionRx = UnboundedReceiver<Action>;
pub(crate) type ResultTx = UnboundedSender<ActionResult>;
pub(crate) type ResultRx = UnboundedReceiver<ActionResult>;

pub(crate) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}

pub(crate) fn result_channel() -> (ResultTx, ResultRx) {
    mpsc::unbounded_channel()
}

pub(crate) fn enqueue(action_tx: &ActionTx, action: Action) {
    tracing::debug!(action = action.name(), "queued action");
    let _ = action_tx.send(action);
}
