use crate::config::TaskdeckConfig;
use crate::time_utils::now_in;
use crate::types::{Task, TaskId, UserId};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::{Duration, Instant};
use time::{Date, OffsetDateTime, UtcOffset};

pub mod classify;
mod cursor;
mod form;
mod mutation;
mod navigator;
mod sections;
mod state;

pub use classify::{ListSection, TimelineSection};
pub use cursor::CursorState;
pub use form::{FormField, TaskForm};
pub use navigator::{Anchor, Navigator, Row};
pub use sections::SectionKind;
pub use state::{BrowseView, DeleteContext, StatusLevel, StatusMessage, TextInput, View};

pub struct App {
    pub running: bool,
    pub user_id: UserId,
    pub status_message: Option<StatusMessage>,
    pub current_view: View,
    /// Sectioned view the user is browsing; forms and dialogs return to it.
    pub browse: BrowseView,

    /// Local snapshot of the service's tasks, edited optimistically.
    pub tasks: Vec<Task>,
    pub list: Navigator<ListSection>,
    pub timeline: Navigator<TimelineSection>,

    // Filter applied before categorization
    pub filter_input: TextInput,
    pub filter_focused: bool,

    // Detail pane scroll, reset whenever the selected row changes
    pub detail_scroll: u16,
    // Furthest the detail pane can scroll, reported by the renderer
    pub detail_scroll_limit: Option<u16>,

    pub form: Option<TaskForm>,
    pub delete_context: Option<DeleteContext>,

    // Task to select once the next refresh lands (e.g. a freshly created task)
    pub pending_focus: Option<TaskId>,

    // In-flight deferred actions, drives the loading indicator
    pub in_flight: usize,
    pub throbber_state: throbber_widgets_tui::ThrobberState,

    pub local_offset: UtcOffset,
    // Calendar day the timeline was last bucketed for
    pub timeline_date: Option<Date>,

    // Config values used at runtime
    pub status_ttl: Duration,
    pub page_size: usize,
    pub confirm_delete: bool,
}

impl App {
    /// `local_offset` has to be read before the async runtime starts its
    /// worker threads; the lookup fails once the process is multi-threaded.
    pub fn new(user_id: UserId, cfg: &TaskdeckConfig, local_offset: UtcOffset) -> Self {
        Self {
            running: true,
            user_id,
            status_message: None,
            current_view: View::List,
            browse: BrowseView::List,
            tasks: Vec::new(),
            list: Navigator::new(),
            timeline: Navigator::new(),
            filter_input: TextInput::new(),
            filter_focused: false,
            detail_scroll: 0,
            detail_scroll_limit: None,
            form: None,
            delete_context: None,
            pending_focus: None,
            in_flight: 0,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            local_offset,
            timeline_date: None,
            status_ttl: cfg.status_ttl(),
            page_size: cfg.page_size,
            confirm_delete: cfg.confirm_delete,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(StatusMessage::new(message, StatusLevel::Info, self.status_ttl));
    }

    pub fn set_error(&mut self, message: String) {
        self.status_message = Some(StatusMessage::new(message, StatusLevel::Error, self.status_ttl));
    }

    /// Drop the status message once its TTL has passed.
    pub fn expire_status(&mut self, now: Instant) {
        if self
            .status_message
            .as_ref()
            .is_some_and(|message| message.is_expired(now))
        {
            self.status_message = None;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn now(&self) -> OffsetDateTime {
        now_in(self.local_offset)
    }

    /// Navigate to a different view
    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        match view {
            View::List => self.browse = BrowseView::List,
            View::Timeline => self.browse = BrowseView::Timeline,
            View::TaskForm | View::ConfirmDelete => {}
        }
    }

    /// Switch between the list and timeline views.
    pub fn toggle_browse_view(&mut self) {
        let next = match self.browse {
            BrowseView::List => View::Timeline,
            BrowseView::Timeline => View::List,
        };
        self.navigate_to(next);
        self.detail_scroll = 0;
    }

    pub fn is_in_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn current_task(&self) -> Option<&Task> {
        match self.browse {
            BrowseView::List => self.list.current_task(&self.tasks),
            BrowseView::Timeline => self.timeline.current_task(&self.tasks),
        }
    }

    pub fn task_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn subtask_count(&self, id: TaskId) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.parent_id == Some(id))
            .count()
    }

    /// Snapshot slots that pass the filter, in snapshot order.
    pub fn filtered_slots(&self) -> Vec<usize> {
        let query = self.filter_input.value.trim();
        if query.is_empty() {
            return (0..self.tasks.len()).collect();
        }
        let matcher = SkimMatcherV2::default();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| matcher.fuzzy_match(&task.title, query).is_some())
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn anchors(&self) -> (Anchor<ListSection>, Anchor<TimelineSection>) {
        (self.list.anchor(&self.tasks), self.timeline.anchor(&self.tasks))
    }

    /// Re-categorize the snapshot and rebuild both views, restoring each
    /// cursor to its anchor.
    pub fn rebuild_views(
        &mut self,
        list_anchor: Anchor<ListSection>,
        timeline_anchor: Anchor<TimelineSection>,
    ) {
        let slots = self.filtered_slots();
        let now = self.now();
        let list_buckets = classify::list_buckets(&self.tasks, slots.iter().copied());
        let timeline_buckets = classify::timeline_buckets(&self.tasks, slots, now);
        self.list.rebuild(&list_buckets, &self.tasks, list_anchor);
        self.timeline
            .rebuild(&timeline_buckets, &self.tasks, timeline_anchor);
        self.timeline_date = Some(now.date());
    }

    /// Rebuild both views keeping the cursors where they are.
    pub fn rebuild_in_place(&mut self) {
        let selected = self.selected_id();
        let (list_anchor, timeline_anchor) = self.anchors();
        self.rebuild_views(list_anchor, timeline_anchor);
        self.reset_scroll_if_moved(selected);
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.current_task().map(|task| task.id)
    }

    /// Reset the detail scroll when a rebuild left a different task selected.
    fn reset_scroll_if_moved(&mut self, before: Option<TaskId>) {
        if self.selected_id() != before {
            self.detail_scroll = 0;
        }
    }

    /// Re-bucket the timeline when the calendar day has rolled over.
    pub fn on_tick(&mut self, now: Instant) {
        self.expire_status(now);
        if self.is_loading() {
            self.throbber_state.calc_next();
        }
        let today = self.now().date();
        if self.timeline_date.is_some_and(|date| date != today) {
            tracing::info!("date changed, rebuilding timeline");
            self.rebuild_in_place();
        }
    }

    // --- Navigation on the active sectioned view ---

    fn with_navigator(&mut self, f: impl FnOnce(&mut dyn NavigatorOps) -> bool) {
        let changed = match self.browse {
            BrowseView::List => f(&mut self.list as &mut dyn NavigatorOps),
            BrowseView::Timeline => f(&mut self.timeline as &mut dyn NavigatorOps),
        };
        if changed {
            self.detail_scroll = 0;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.with_navigator(|nav| nav.move_by(delta));
    }

    pub fn page(&mut self, direction: isize) {
        let page_size = self.page_size;
        self.with_navigator(|nav| nav.page(direction, page_size));
    }

    pub fn jump_top(&mut self) {
        self.with_navigator(|nav| nav.jump_to_top());
    }

    pub fn jump_bottom(&mut self) {
        self.with_navigator(|nav| nav.jump_to_bottom());
    }

    /// Collapse or expand the section under the cursor. Only acts on headers.
    pub fn toggle_section(&mut self) -> bool {
        match self.browse {
            BrowseView::List => self.list.toggle_current_section(),
            BrowseView::Timeline => self.timeline.toggle_current_section(),
        }
    }

    /// Collapse or expand the section the cursor is in, from a task row too.
    /// A task hidden by the collapse hands the cursor to its header.
    pub fn fold_current_section(&mut self) {
        let selected = self.selected_id();
        match self.browse {
            BrowseView::List => {
                if let Some(kind) = self.list.current_section().map(|s| s.kind) {
                    self.list.toggle_section(kind);
                }
            }
            BrowseView::Timeline => {
                if let Some(kind) = self.timeline.current_section().map(|s| s.kind) {
                    self.timeline.toggle_section(kind);
                }
            }
        }
        self.reset_scroll_if_moved(selected);
    }

    /// Put the cursor on the header of the n-th section (0-based).
    pub fn jump_to_section(&mut self, index: usize) {
        self.with_navigator(|nav| nav.select_header_at(index));
    }

    pub fn cursor_state(&self) -> CursorState {
        match self.browse {
            BrowseView::List => self.list.state(),
            BrowseView::Timeline => self.timeline.state(),
        }
    }

    pub fn is_on_header(&self) -> bool {
        match self.browse {
            BrowseView::List => self.list.is_on_header(),
            BrowseView::Timeline => self.timeline.is_on_header(),
        }
    }

    #[cfg(test)]
    pub fn visual_index(&self) -> usize {
        match self.browse {
            BrowseView::List => self.list.visual_index(),
            BrowseView::Timeline => self.timeline.visual_index(),
        }
    }

    pub fn scroll_detail(&mut self, down: bool) {
        self.detail_scroll = if down {
            let next = self.detail_scroll.saturating_add(1);
            self.detail_scroll_limit.map_or(next, |limit| next.min(limit))
        } else {
            self.detail_scroll.saturating_sub(1)
        };
    }

    /// Record how far the detail pane content can scroll and pull the
    /// current scroll back inside it.
    pub fn set_detail_scroll_limit(&mut self, limit: u16) {
        self.detail_scroll_limit = Some(limit);
        self.detail_scroll = self.detail_scroll.min(limit);
    }

    // --- Filter ---

    pub fn begin_filter(&mut self) {
        self.filter_focused = true;
    }

    pub fn end_filter(&mut self) {
        self.filter_focused = false;
    }

    pub fn filter_input_char(&mut self, c: char) {
        self.filter_input.insert(c);
        self.apply_filter();
    }

    pub fn filter_input_backspace(&mut self) {
        self.filter_input.backspace();
        self.apply_filter();
    }

    pub fn filter_input_clear(&mut self) {
        self.filter_input.clear();
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.rebuild_in_place();
        self.detail_scroll = 0;
    }

    // --- Delete confirmation ---

    /// Open the delete dialog for the selected task.
    pub fn enter_delete_confirm(&mut self) -> bool {
        let Some(task) = self.current_task() else {
            return false;
        };
        let ctx = DeleteContext {
            task_id: task.id,
            display_title: task.title.clone(),
            subtask_count: self.subtask_count(task.id),
            origin: self.browse,
        };
        self.delete_context = Some(ctx);
        self.navigate_to(View::ConfirmDelete);
        true
    }

    pub fn cancel_delete(&mut self) {
        if let Some(ctx) = self.delete_context.take() {
            self.navigate_to(ctx.origin.into());
        } else {
            self.navigate_to(self.browse.into());
        }
    }

    // --- Forms ---

    pub fn open_create_form(&mut self) {
        self.form = Some(TaskForm::create(None, self.browse));
        self.navigate_to(View::TaskForm);
    }

    /// New subtask under the selected task. Subtasks of subtasks attach to the
    /// top-level parent so the hierarchy stays one level deep.
    pub fn open_subtask_form(&mut self) -> bool {
        let Some(task) = self.current_task() else {
            return false;
        };
        let parent_id = task.parent_id.unwrap_or(task.id);
        self.form = Some(TaskForm::create(Some(parent_id), self.browse));
        self.navigate_to(View::TaskForm);
        true
    }

    pub fn open_edit_form(&mut self) -> bool {
        let Some(task) = self.current_task() else {
            return false;
        };
        self.form = Some(TaskForm::edit(task, self.browse, self.local_offset));
        self.navigate_to(View::TaskForm);
        true
    }

    pub fn close_form(&mut self) {
        if let Some(form) = self.form.take() {
            self.navigate_to(form.origin.into());
        }
    }
}

/// Navigation operations shared by both sectioned views.
trait NavigatorOps {
    fn move_by(&mut self, delta: isize) -> bool;
    fn select_header_at(&mut self, index: usize) -> bool;
    fn page(&mut self, direction: isize, page_size: usize) -> bool;
    fn jump_to_top(&mut self) -> bool;
    fn jump_to_bottom(&mut self) -> bool;
}

impl<K: SectionKind> NavigatorOps for Navigator<K> {
    fn move_by(&mut self, delta: isize) -> bool {
        Navigator::move_by(self, delta)
    }

    fn select_header_at(&mut self, index: usize) -> bool {
        match K::ORDER.get(index) {
            Some(kind) => Navigator::select_header(self, *kind),
            None => false,
        }
    }

    fn page(&mut self, direction: isize, page_size: usize) -> bool {
        Navigator::page(self, direction, page_size)
    }

    fn jump_to_top(&mut self) -> bool {
        Navigator::jump_to_top(self)
    }

    fn jump_to_bottom(&mut self) -> bool {
        Navigator::jump_to_bottom(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::classify::tests::{due, task};
    use crate::types::TaskStatus;

    pub(crate) fn app_with(tasks: Vec<Task>) -> App {
        let mut app = App::new(1, &TaskdeckConfig::default(), UtcOffset::UTC);
        app.tasks = tasks;
        app.rebuild_views(Anchor::Start, Anchor::Start);
        app
    }

    #[test]
    fn moving_resets_detail_scroll() {
        let mut app = app_with(vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Todo, None),
        ]);
        app.scroll_detail(true);
        app.scroll_detail(true);
        assert_eq!(app.detail_scroll, 2);

        app.move_cursor(1);
        assert_eq!(app.detail_scroll, 0);
        assert_eq!(app.current_task().map(|t| t.id), Some(2));
    }

    #[test]
    fn blocked_move_keeps_detail_scroll() {
        let mut app = app_with(vec![task(1, TaskStatus::Todo, None)]);
        app.jump_top();
        app.scroll_detail(true);
        app.move_cursor(-1);
        assert_eq!(app.detail_scroll, 1);
    }

    #[test]
    fn detail_scroll_stops_at_reported_limit() {
        let mut app = app_with(vec![task(1, TaskStatus::Todo, None)]);
        app.scroll_detail(true);
        app.scroll_detail(true);
        app.set_detail_scroll_limit(1);
        assert_eq!(app.detail_scroll, 1);

        app.scroll_detail(true);
        app.scroll_detail(true);
        assert_eq!(app.detail_scroll, 1);
        app.scroll_detail(false);
        assert_eq!(app.detail_scroll, 0);
    }

    #[test]
    fn new_app_keeps_the_given_offset() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let app = App::new(1, &TaskdeckConfig::default(), offset);
        assert_eq!(app.local_offset, offset);
        assert_eq!(app.now().offset(), offset);
    }

    #[test]
    fn folding_from_a_task_row_moves_to_the_header() {
        let mut app = app_with(vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Todo, None),
        ]);
        app.move_cursor(1);
        app.scroll_detail(true);
        assert_eq!(app.current_task().map(|t| t.id), Some(2));

        app.fold_current_section();
        assert!(app.is_on_header());
        assert_eq!(app.cursor_state(), CursorState::OnHeader);
        assert_eq!(app.detail_scroll, 0);

        app.fold_current_section();
        assert_eq!(app.visual_index(), 0);
        assert_eq!(app.list.visible_row_count(), 5);
    }

    #[test]
    fn jumping_to_a_section_selects_its_header() {
        let mut app = app_with(vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Done, None),
        ]);
        app.jump_to_section(2);
        assert!(app.is_on_header());
        assert_eq!(
            app.list.current_section().map(|s| s.kind),
            Some(ListSection::Completed)
        );

        let before = app.visual_index();
        app.jump_to_section(7);
        assert_eq!(app.visual_index(), before);
    }

    #[test]
    fn filter_with_no_match_leaves_an_empty_selection() {
        let mut app = app_with(vec![task(1, TaskStatus::Todo, None)]);
        for c in "zzz".chars() {
            app.filter_input_char(c);
        }
        assert_eq!(app.current_task().map(|t| t.id), None);
        assert_eq!(app.cursor_state(), CursorState::OnHeader);
    }

    #[test]
    fn filter_narrows_both_views() {
        let mut tasks = vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Todo, None),
        ];
        tasks[0].title = "Buy milk".to_string();
        tasks[1].title = "Write report".to_string();
        let mut app = app_with(tasks);

        for c in "rep".chars() {
            app.filter_input_char(c);
        }
        assert_eq!(app.list.registry().task_count(), 1);
        assert_eq!(app.current_task().map(|t| t.id), Some(2));

        app.filter_input_clear();
        assert_eq!(app.list.registry().task_count(), 2);
    }

    #[test]
    fn views_share_the_snapshot() {
        let now = OffsetDateTime::now_utc();
        let mut app = app_with(vec![
            due(task(1, TaskStatus::Todo, None), now + time::Duration::days(3)),
            task(2, TaskStatus::Todo, None),
        ]);
        app.toggle_browse_view();
        assert_eq!(app.current_view, View::Timeline);
        assert_eq!(app.timeline.registry().task_count(), 1);
        assert_eq!(app.current_task().map(|t| t.id), Some(1));
    }

    #[test]
    fn status_expires_on_tick() {
        let mut app = app_with(Vec::new());
        app.status_ttl = Duration::ZERO;
        app.set_status("Saved".to_string());
        app.on_tick(Instant::now());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn subtask_form_attaches_to_top_level_parent() {
        let mut app = app_with(vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Todo, Some(1)),
        ]);
        app.list.toggle_section(ListSection::Projects);
        app.jump_bottom();
        app.move_cursor(-1);
        assert_eq!(app.current_task().map(|t| t.id), Some(2));

        assert!(app.open_subtask_form());
        assert_eq!(
            app.form.as_ref().map(|f| f.mode),
            Some(form::FormMode::Create { parent_id: Some(1) })
        );
        assert_eq!(app.current_view, View::TaskForm);

        app.close_form();
        assert_eq!(app.current_view, View::List);
    }
}
