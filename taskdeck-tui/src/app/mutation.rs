//! Optimistic edits of the task snapshot and reconciliation of their results.
//!
//! Every mutating entry point returns the deferred [`Action`] to run against
//! the task service. `apply_*` handlers fold the results back in and may ask
//! for a follow-up action, usually a refresh when the service disagreed.

use super::classify::{list_section, timeline_section};
use super::form::{FormSubmission, ValidationError};
use super::navigator::{Anchor, Navigator};
use super::sections::SectionKind;
use super::state::{BrowseView, View};
use super::App;
use crate::runtime::action_queue::Action;
use crate::types::{NewTask, Task, TaskId, TaskStatus};

/// Where the cursor goes when the selected task is about to leave its section:
/// the next task of that section, else the previous one, else its header.
/// Tasks that stay in their section keep the cursor.
fn continuity_anchor<K: SectionKind>(
    nav: &Navigator<K>,
    tasks: &[Task],
    moved_to: Option<K>,
) -> Anchor<K> {
    let (Some(kind), Some(slot)) = (nav.current_section().map(|s| s.kind), nav.current_slot())
    else {
        return nav.anchor(tasks);
    };
    if moved_to == Some(kind) {
        return nav.anchor(tasks);
    }
    let slots = nav.section_slots(kind);
    let successor = slots.iter().position(|s| *s == slot).and_then(|position| {
        slots
            .get(position + 1)
            .or_else(|| position.checked_sub(1).and_then(|prev| slots.get(prev)))
    });
    match successor.and_then(|s| tasks.get(*s)) {
        Some(task) => Anchor::Task {
            id: task.id,
            task_index: nav.cursor().task_index,
        },
        None => Anchor::Header(kind),
    }
}

impl App {
    fn current_slot(&self) -> Option<usize> {
        match self.browse {
            BrowseView::List => self.list.current_slot(),
            BrowseView::Timeline => self.timeline.current_slot(),
        }
    }

    /// Mark the selected task done, or back to todo when it already is.
    pub fn toggle_current_task_status(&mut self) -> Option<Action> {
        self.change_current_status(TaskStatus::toggled)
    }

    /// Start working on the selected task, or put an in-progress task back.
    pub fn start_current_task(&mut self) -> Option<Action> {
        self.change_current_status(|status| match status {
            TaskStatus::InProgress => TaskStatus::Todo,
            TaskStatus::Todo | TaskStatus::Done => TaskStatus::InProgress,
        })
    }

    fn change_current_status(
        &mut self,
        next: impl FnOnce(TaskStatus) -> TaskStatus,
    ) -> Option<Action> {
        let slot = self.current_slot()?;
        let task = self.tasks.get_mut(slot)?;
        let previous = task.status;
        let status = next(previous);
        if status == previous {
            return None;
        }
        task.set_status(status);
        let task_id = task.id;

        let now = self.now();
        let (list_anchor, timeline_anchor) = {
            let task = &self.tasks[slot];
            match self.browse {
                BrowseView::List => (
                    continuity_anchor(&self.list, &self.tasks, Some(list_section(task))),
                    self.timeline.anchor(&self.tasks),
                ),
                BrowseView::Timeline => (
                    self.list.anchor(&self.tasks),
                    continuity_anchor(&self.timeline, &self.tasks, timeline_section(task, now)),
                ),
            }
        };
        self.rebuild_views(list_anchor, timeline_anchor);
        self.detail_scroll = 0;

        tracing::debug!(
            task_id,
            previous = previous.as_str(),
            status = status.as_str(),
            "optimistic status change"
        );
        Some(Action::ChangeStatus {
            task_id,
            status,
            previous,
        })
    }

    /// Delete the selected task, asking first when confirmation is enabled.
    pub fn delete_current_task(&mut self) -> Option<Action> {
        if self.confirm_delete {
            self.enter_delete_confirm();
            return None;
        }
        self.current_task().map(|task| Action::Delete { task_id: task.id })
    }

    /// Accept the delete dialog.
    pub fn accept_delete(&mut self) -> Option<Action> {
        let ctx = self.delete_context.take()?;
        self.navigate_to(ctx.origin.into());
        Some(Action::Delete {
            task_id: ctx.task_id,
        })
    }

    pub fn refresh(&self) -> Action {
        Action::Refresh
    }

    /// Build a create action. The title is checked here as well as in the
    /// form so no caller can send an untitled task.
    pub fn create_task(&mut self, new_task: NewTask) -> Result<Action, ValidationError> {
        if new_task.title.trim().is_empty() {
            self.set_error(ValidationError::EmptyTitle.to_string());
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Action::Create(new_task))
    }

    /// Validate the open form and turn it into an action. Validation errors
    /// stay local: they are shown in the form and the status bar.
    pub fn submit_form(&mut self) -> Option<Action> {
        let offset = self.local_offset;
        let form = self.form.as_mut()?;
        if form.submitting {
            return None;
        }
        let submission = match form.validate(offset) {
            Ok(submission) => submission,
            Err(e) => {
                form.error = Some(e.to_string());
                self.set_error(e.to_string());
                return None;
            }
        };
        form.submitting = true;
        match submission {
            FormSubmission::Create(new_task) => self.create_task(new_task).ok(),
            FormSubmission::Update { task_id, update } => Some(Action::Update { task_id, update }),
        }
    }

    /// Replace the task with the server's copy, keeping the cursor where it is.
    fn merge_task(&mut self, task: Task) -> bool {
        let selected = self.selected_id();
        let (list_anchor, timeline_anchor) = self.anchors();
        let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            return false;
        };
        *existing = task;
        self.rebuild_views(list_anchor, timeline_anchor);
        self.reset_scroll_if_moved(selected);
        true
    }

    /// Swap in a fresh snapshot. The selected task is kept by id; when it is
    /// gone the cursor keeps its index, clamped to the new list.
    pub fn apply_refresh(&mut self, result: anyhow::Result<Vec<Task>>) -> Option<Action> {
        let tasks = match result {
            Ok(tasks) => tasks,
            Err(e) => {
                self.set_error(format!("Failed to load tasks: {e}"));
                return None;
            }
        };
        let selected = self.selected_id();
        let (list_anchor, timeline_anchor) = self.anchors();
        self.tasks = tasks;
        self.rebuild_views(list_anchor, timeline_anchor);
        if let Some(id) = self.pending_focus.take() {
            self.focus_task(id);
        }
        self.reset_scroll_if_moved(selected);
        None
    }

    fn focus_task(&mut self, id: TaskId) {
        let Some(slot) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };
        match self.browse {
            BrowseView::List => self.list.select_slot(slot),
            BrowseView::Timeline => self.timeline.select_slot(slot),
        };
    }

    pub fn apply_status_changed(
        &mut self,
        task_id: TaskId,
        previous: TaskStatus,
        result: anyhow::Result<Task>,
    ) -> Option<Action> {
        match result {
            Ok(task) => {
                self.merge_task(task);
                None
            }
            Err(e) => {
                tracing::warn!(
                    task_id,
                    previous = previous.as_str(),
                    "status change failed: {e:#}"
                );
                self.set_error(format!("Failed to update task: {e}"));
                Some(Action::Refresh)
            }
        }
    }

    pub fn apply_created(&mut self, result: anyhow::Result<Task>) -> Option<Action> {
        match result {
            Ok(task) => {
                self.set_status(format!("Created \"{}\"", task.title));
                self.pending_focus = Some(task.id);
                // A form opened after the submitted one was dismissed stays open
                if self.form.as_ref().is_some_and(|f| f.submitting) {
                    self.form = None;
                    self.navigate_to(View::List);
                }
                Some(Action::Refresh)
            }
            Err(e) => {
                self.fail_form(format!("Failed to create task: {e}"));
                None
            }
        }
    }

    pub fn apply_updated(&mut self, task_id: TaskId, result: anyhow::Result<Task>) -> Option<Action> {
        match result {
            Ok(task) => {
                self.set_status(format!("Saved \"{}\"", task.title));
                self.merge_task(task);
                if self.form.as_ref().is_some_and(|f| f.submitting) {
                    self.close_form();
                }
                None
            }
            Err(e) => {
                tracing::warn!(task_id, "update failed: {e:#}");
                self.fail_form(format!("Failed to save task: {e}"));
                Some(Action::Refresh)
            }
        }
    }

    pub fn apply_deleted(&mut self, task_id: TaskId, result: anyhow::Result<()>) -> Option<Action> {
        match result {
            Ok(()) => self.set_status("Task deleted".to_string()),
            Err(e) => {
                tracing::warn!(task_id, "delete failed: {e:#}");
                self.set_error(format!("Failed to delete task: {e}"));
            }
        }
        Some(Action::Refresh)
    }

    fn fail_form(&mut self, message: String) {
        if let Some(form) = self.form.as_mut().filter(|f| f.submitting) {
            form.submitting = false;
            form.error = Some(message.clone());
        }
        self.set_error(message);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::classify::tests::{due, task};
    use crate::app::tests::app_with;
    use crate::app::{ListSection, StatusLevel, TextInput, TimelineSection, View};
    use crate::runtime::action_queue::Action;
    use crate::types::{Task, TaskStatus};
    use time::OffsetDateTime;

    fn todo(ids: &[i64]) -> Vec<Task> {
        ids.iter().map(|id| task(*id, TaskStatus::Todo, None)).collect()
    }

    fn selected_id(app: &crate::app::App) -> Option<i64> {
        app.current_task().map(|t| t.id)
    }

    #[test]
    fn toggling_first_task_selects_next() {
        let mut app = app_with(todo(&[1, 2, 3]));
        assert_eq!(selected_id(&app), Some(1));

        let action = app.toggle_current_task_status();
        assert_eq!(
            action,
            Some(Action::ChangeStatus {
                task_id: 1,
                status: TaskStatus::Done,
                previous: TaskStatus::Todo,
            })
        );
        assert_eq!(selected_id(&app), Some(2));
        assert_eq!(app.visual_index(), 1);
        assert!(app.tasks[0].completed);
    }

    #[test]
    fn toggling_last_task_selects_previous() {
        let mut app = app_with(todo(&[1, 2, 3]));
        app.move_cursor(2);
        assert_eq!(selected_id(&app), Some(3));

        app.toggle_current_task_status();
        assert_eq!(selected_id(&app), Some(2));
    }

    #[test]
    fn toggling_sole_task_lands_on_its_header() {
        let mut app = app_with(todo(&[1]));
        app.toggle_current_task_status();
        assert!(app.is_on_header());
        assert_eq!(
            app.list.current_section().map(|s| s.kind),
            Some(ListSection::Todo)
        );
        assert_eq!(app.visual_index(), 0);
    }

    #[test]
    fn toggling_completed_task_reopens_it() {
        let mut app = app_with(vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Done, None),
            task(3, TaskStatus::Done, None),
        ]);
        app.jump_bottom();
        app.move_cursor(-1);
        assert_eq!(selected_id(&app), Some(2));

        app.toggle_current_task_status();
        assert_eq!(app.tasks[1].status, TaskStatus::Todo);
        assert_eq!(selected_id(&app), Some(3));
    }

    #[test]
    fn toggle_on_header_is_a_noop() {
        let mut app = app_with(todo(&[1, 2]));
        app.jump_top();
        assert_eq!(app.toggle_current_task_status(), None);
        assert_eq!(app.tasks[0].status, TaskStatus::Todo);
    }

    #[test]
    fn toggling_in_timeline_follows_the_timeline_section() {
        let now = OffsetDateTime::now_utc();
        let tomorrow = now + time::Duration::days(1);
        let mut app = app_with(vec![
            due(task(1, TaskStatus::Todo, None), tomorrow),
            due(task(2, TaskStatus::Todo, None), now - time::Duration::days(3)),
            due(task(3, TaskStatus::Todo, None), tomorrow),
        ]);
        app.toggle_browse_view();
        // Rows: Overdue, 2, Today, Upcoming, 1, 3
        assert_eq!(selected_id(&app), Some(2));

        app.toggle_current_task_status();
        assert!(app.is_on_header());
        assert_eq!(
            app.timeline.current_section().map(|s| s.kind),
            Some(TimelineSection::Overdue)
        );

        app.jump_bottom();
        app.move_cursor(-1);
        assert_eq!(selected_id(&app), Some(1));
        app.toggle_current_task_status();
        assert_eq!(selected_id(&app), Some(3));
    }

    #[test]
    fn setting_in_progress_keeps_cursor_on_task() {
        let mut app = app_with(todo(&[1, 2]));
        let action = app.start_current_task();
        assert!(matches!(
            action,
            Some(Action::ChangeStatus { status: TaskStatus::InProgress, .. })
        ));
        assert_eq!(selected_id(&app), Some(1));
        assert!(!app.tasks[0].completed);
    }

    #[test]
    fn server_record_merges_without_moving_cursor() {
        let mut app = app_with(todo(&[1, 2, 3]));
        app.move_cursor(1);
        let mut server = task(3, TaskStatus::Todo, None);
        server.title = "Renamed".to_string();

        let follow_up = app.apply_status_changed(3, TaskStatus::Todo, Ok(server));
        assert_eq!(follow_up, None);
        assert_eq!(app.tasks[2].title, "Renamed");
        assert_eq!(selected_id(&app), Some(2));
    }

    #[test]
    fn failed_status_change_requests_refresh() {
        let mut app = app_with(todo(&[1]));
        app.toggle_current_task_status();
        let follow_up =
            app.apply_status_changed(1, TaskStatus::Todo, Err(anyhow::anyhow!("timeout")));
        assert_eq!(follow_up, Some(Action::Refresh));
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("timeout"));
    }

    #[test]
    fn refresh_clamps_cursor_to_shorter_list() {
        let mut app = app_with(todo(&[1, 2, 3]));
        app.move_cursor(2);
        assert_eq!(selected_id(&app), Some(3));

        app.apply_refresh(Ok(todo(&[7])));
        assert_eq!(selected_id(&app), Some(7));

        app.apply_refresh(Ok(Vec::new()));
        assert_eq!(selected_id(&app), None);
        assert_eq!(app.visual_index(), 0);
    }

    #[test]
    fn refresh_onto_another_task_resets_detail_scroll() {
        let mut app = app_with(todo(&[1, 2]));
        app.scroll_detail(true);
        app.scroll_detail(true);

        app.apply_refresh(Ok(todo(&[1, 2, 3])));
        assert_eq!(selected_id(&app), Some(1));
        assert_eq!(app.detail_scroll, 2);

        app.apply_refresh(Ok(todo(&[2])));
        assert_eq!(selected_id(&app), Some(2));
        assert_eq!(app.detail_scroll, 0);
    }

    #[test]
    fn refresh_keeps_selected_task_by_id() {
        let mut app = app_with(todo(&[1, 2, 3]));
        app.move_cursor(1);
        app.apply_refresh(Ok(todo(&[0, 3, 2, 1])));
        assert_eq!(selected_id(&app), Some(2));
    }

    #[test]
    fn failed_refresh_keeps_snapshot() {
        let mut app = app_with(todo(&[1, 2]));
        app.apply_refresh(Err(anyhow::anyhow!("offline")));
        assert_eq!(app.tasks.len(), 2);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut app = app_with(todo(&[1, 2]));
        assert_eq!(app.delete_current_task(), None);
        assert_eq!(app.current_view, View::ConfirmDelete);

        assert_eq!(app.accept_delete(), Some(Action::Delete { task_id: 1 }));
        assert_eq!(app.current_view, View::List);
        // No local removal until the refresh lands.
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.apply_deleted(1, Ok(())), Some(Action::Refresh));
    }

    #[test]
    fn delete_without_confirmation() {
        let mut app = app_with(todo(&[1, 2]));
        app.confirm_delete = false;
        assert_eq!(app.delete_current_task(), Some(Action::Delete { task_id: 1 }));
        assert_eq!(app.current_view, View::List);
    }

    #[test]
    fn empty_title_never_becomes_an_action() {
        let mut app = app_with(Vec::new());
        app.open_create_form();
        assert_eq!(app.submit_form(), None);
        assert!(app.form.as_ref().and_then(|f| f.error.as_ref()).is_some());
        assert_eq!(
            app.status_message.as_ref().map(|s| s.level),
            Some(StatusLevel::Error)
        );
    }

    #[test]
    fn created_task_is_focused_after_refresh() {
        let mut app = app_with(todo(&[1, 2]));
        app.open_create_form();
        if let Some(form) = app.form.as_mut() {
            form.title = TextInput::from_str("Write tests");
        }
        let action = app.submit_form();
        assert!(matches!(action, Some(Action::Create(ref t)) if t.title == "Write tests"));
        // A second Enter while in flight does nothing.
        assert_eq!(app.submit_form(), None);

        let mut created = task(9, TaskStatus::Todo, None);
        created.title = "Write tests".to_string();
        assert_eq!(app.apply_created(Ok(created.clone())), Some(Action::Refresh));
        assert!(app.form.is_none());
        assert_eq!(app.current_view, View::List);

        let mut tasks = todo(&[1, 2]);
        tasks.push(created);
        app.apply_refresh(Ok(tasks));
        assert_eq!(selected_id(&app), Some(9));
    }

    #[test]
    fn failed_create_keeps_form_open() {
        let mut app = app_with(Vec::new());
        app.open_create_form();
        if let Some(form) = app.form.as_mut() {
            form.title = TextInput::from_str("x");
        }
        app.submit_form();
        assert_eq!(app.apply_created(Err(anyhow::anyhow!("boom"))), None);
        let form = app.form.as_ref().unwrap();
        assert!(!form.submitting);
        assert!(form.error.as_deref().unwrap().contains("boom"));
        assert_eq!(app.current_view, View::TaskForm);
    }

    #[test]
    fn late_create_result_leaves_a_newer_form_alone() {
        let mut app = app_with(todo(&[1]));
        app.open_create_form();
        if let Some(form) = app.form.as_mut() {
            form.title = TextInput::from_str("first");
        }
        assert!(app.submit_form().is_some());
        app.close_form();
        app.open_create_form();

        let mut created = task(5, TaskStatus::Todo, None);
        created.title = "first".to_string();
        assert_eq!(app.apply_created(Ok(created)), Some(Action::Refresh));
        assert_eq!(app.current_view, View::TaskForm);
        assert_eq!(app.pending_focus, Some(5));

        assert_eq!(app.apply_created(Err(anyhow::anyhow!("boom"))), None);
        let form = app.form.as_ref().unwrap();
        assert!(form.error.is_none());
        assert_eq!(app.status_message.as_ref().unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn update_merges_and_closes_form() {
        let mut app = app_with(todo(&[1, 2]));
        app.open_edit_form();
        if let Some(form) = app.form.as_mut() {
            form.title = TextInput::from_str("Edited");
        }
        let action = app.submit_form();
        assert!(matches!(action, Some(Action::Update { task_id: 1, .. })));

        let mut server = task(1, TaskStatus::Todo, None);
        server.title = "Edited".to_string();
        assert_eq!(app.apply_updated(1, Ok(server)), None);
        assert!(app.form.is_none());
        assert_eq!(app.tasks[0].title, "Edited");
        assert_eq!(selected_id(&app), Some(1));
    }
}
