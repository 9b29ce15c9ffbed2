use super::classify::Buckets;
use super::cursor::{Cursor, CursorState};
use super::sections::{Section, SectionKind, SectionRegistry};
use crate::types::{Task, TaskId};

/// One rendered row of a sectioned list.
#[derive(Debug, Clone, PartialEq)]
pub enum Row<'a, K> {
    Header {
        kind: K,
        title: &'static str,
        item_count: usize,
        expanded: bool,
    },
    Task {
        task_index: usize,
        task: &'a Task,
    },
}

/// What the cursor should return to after the listing is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<K> {
    /// Nothing selected yet; the first task wins.
    Start,
    Header(K),
    /// Follow the task by id, falling back to the old index when it is gone.
    Task { id: TaskId, task_index: usize },
}

/// Cursor, viewport and sections of one sectioned view.
///
/// The listing maps task indices to snapshot slots; it is replaced together
/// with the registry on every rebuild.
#[derive(Debug, Clone)]
pub struct Navigator<K: SectionKind> {
    registry: SectionRegistry<K>,
    listing: Vec<usize>,
    cursor: Cursor,
    offset: usize,
    viewport_height: usize,
}

impl<K: SectionKind> Default for Navigator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SectionKind> Navigator<K> {
    pub fn new() -> Self {
        Self {
            registry: SectionRegistry::new(),
            listing: Vec::new(),
            cursor: Cursor::default(),
            offset: 0,
            viewport_height: 0,
        }
    }

    pub fn registry(&self) -> &SectionRegistry<K> {
        &self.registry
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state(&self.registry)
    }

    pub fn visual_index(&self) -> usize {
        self.cursor.visual_index
    }

    pub fn is_on_header(&self) -> bool {
        self.cursor.on_header
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible_row_count(&self) -> usize {
        self.registry.visible_row_count()
    }

    /// Snapshot slot of the selected task.
    pub fn current_slot(&self) -> Option<usize> {
        self.cursor
            .selected_task()
            .and_then(|task_index| self.listing.get(task_index).copied())
    }

    pub fn current_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        self.current_slot().and_then(|slot| tasks.get(slot))
    }

    /// Section the cursor is in, whether on its header or one of its tasks.
    pub fn current_section(&self) -> Option<&Section<K>> {
        self.registry.section_containing(self.cursor.visual_index)
    }

    /// Snapshot slots of one section in display order.
    pub fn section_slots(&self, kind: K) -> &[usize] {
        match self.registry.section(kind) {
            Some(section) => self
                .listing
                .get(section.start_index..section.start_index + section.item_count)
                .unwrap_or(&[]),
            None => &[],
        }
    }

    /// Capture where the cursor is so it can be restored after the snapshot
    /// changes.
    pub fn anchor(&self, tasks: &[Task]) -> Anchor<K> {
        if self.registry.is_empty() {
            return Anchor::Start;
        }
        if self.cursor.on_header {
            return match self.registry.section_at(self.cursor.visual_index) {
                Some(section) => Anchor::Header(section.kind),
                None => Anchor::Start,
            };
        }
        match self.current_task(tasks) {
            Some(task) => Anchor::Task {
                id: task.id,
                task_index: self.cursor.task_index,
            },
            None => Anchor::Start,
        }
    }

    /// Replace the listing and sections, then put the cursor back on the
    /// anchor. Expanded state survives the rebuild.
    pub fn rebuild(&mut self, buckets: &Buckets<K>, tasks: &[Task], anchor: Anchor<K>) {
        self.registry.rebuild(&buckets.lengths());
        self.listing = buckets.listing();
        self.cursor = match anchor {
            Anchor::Start => Cursor::at_task(&self.registry, 0),
            Anchor::Header(kind) => self.cursor.at_header(&self.registry, kind),
            Anchor::Task { id, task_index } => {
                let task_index = self
                    .listing
                    .iter()
                    .position(|slot| tasks.get(*slot).is_some_and(|t| t.id == id))
                    .unwrap_or(task_index);
                Cursor::at_task(&self.registry, task_index)
            }
        };
        tracing::debug!(
            rows = self.registry.visible_row_count(),
            tasks = self.listing.len(),
            visual_index = self.cursor.visual_index,
            "rebuilt sections"
        );
        self.ensure_visible();
    }

    /// Move the cursor onto the task stored in a snapshot slot.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        let Some(task_index) = self.listing.iter().position(|s| *s == slot) else {
            return false;
        };
        self.set_cursor(Cursor::at_task(&self.registry, task_index))
    }

    pub fn select_header(&mut self, kind: K) -> bool {
        let cursor = self.cursor.at_header(&self.registry, kind);
        self.set_cursor(cursor)
    }

    /// Move by `delta` rows, clamped to the list. Returns whether the selected
    /// row changed.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let rows = self.registry.visible_row_count();
        if rows == 0 {
            return false;
        }
        let target = self
            .cursor
            .visual_index
            .saturating_add_signed(delta)
            .min(rows - 1);
        let cursor = self.cursor.at_visual(&self.registry, target);
        self.set_cursor(cursor)
    }

    pub fn page(&mut self, direction: isize, page_size: usize) -> bool {
        let page_size = isize::try_from(page_size.max(1)).unwrap_or(isize::MAX);
        self.move_by(direction.signum().saturating_mul(page_size))
    }

    pub fn jump_to_top(&mut self) -> bool {
        if self.registry.visible_row_count() == 0 {
            return false;
        }
        let cursor = self.cursor.at_visual(&self.registry, 0);
        self.set_cursor(cursor)
    }

    pub fn jump_to_bottom(&mut self) -> bool {
        let rows = self.registry.visible_row_count();
        if rows == 0 {
            return false;
        }
        let cursor = self.cursor.at_visual(&self.registry, rows - 1);
        self.set_cursor(cursor)
    }

    /// Collapse or expand the section whose header is selected. The cursor
    /// stays on that header. Returns false when not on a header.
    pub fn toggle_current_section(&mut self) -> bool {
        if !self.cursor.on_header {
            return false;
        }
        let Some(kind) = self
            .registry
            .section_at(self.cursor.visual_index)
            .map(|s| s.kind)
        else {
            return false;
        };
        self.registry.toggle(kind);
        self.cursor = self.cursor.at_header(&self.registry, kind);
        self.ensure_visible();
        true
    }

    /// Collapse or expand any section, keeping the cursor on its task when
    /// that task is still visible, otherwise on the task's section header.
    pub fn toggle_section(&mut self, kind: K) {
        let header = self
            .cursor
            .on_header
            .then(|| self.registry.section_at(self.cursor.visual_index))
            .flatten()
            .map(|s| s.kind);
        self.registry.toggle(kind);
        self.cursor = match header {
            Some(header) => self.cursor.at_header(&self.registry, header),
            None if self.listing.is_empty() => self.cursor.at_visual(&self.registry, 0),
            None => Cursor::at_task(&self.registry, self.cursor.task_index),
        };
        self.ensure_visible();
    }

    /// Record the height the renderer has available for rows.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.ensure_visible();
    }

    /// Scroll the least amount needed to keep the cursor on screen.
    fn ensure_visible(&mut self) {
        let height = self.viewport_height;
        if height == 0 {
            return;
        }
        let visual = self.cursor.visual_index;
        if visual < self.offset {
            self.offset = visual;
        } else if visual >= self.offset + height {
            self.offset = visual + 1 - height;
        }
        let rows = self.registry.visible_row_count();
        if rows <= height {
            self.offset = 0;
        } else if self.offset > rows - height {
            self.offset = rows - height;
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) -> bool {
        let changed = cursor.visual_index != self.cursor.visual_index
            || cursor.on_header != self.cursor.on_header;
        self.cursor = cursor;
        self.ensure_visible();
        changed
    }

    /// Rows in `[offset, offset + height)` of the flattened list.
    pub fn visible_rows<'a>(&self, tasks: &'a [Task], offset: usize, height: usize) -> Vec<Row<'a, K>> {
        let mut rows = Vec::with_capacity(height.min(self.registry.visible_row_count()));
        let mut position = 0;
        let end = offset.saturating_add(height);
        for section in self.registry.sections() {
            if position >= end {
                break;
            }
            if position >= offset {
                rows.push(Row::Header {
                    kind: section.kind,
                    title: section.title,
                    item_count: section.item_count,
                    expanded: section.expanded,
                });
            }
            position += 1;
            if !section.expanded {
                continue;
            }
            for task_index in section.start_index..section.start_index + section.item_count {
                if position >= end {
                    break;
                }
                if position >= offset {
                    let task = self
                        .listing
                        .get(task_index)
                        .and_then(|slot| tasks.get(*slot));
                    if let Some(task) = task {
                        rows.push(Row::Task { task_index, task });
                    }
                }
                position += 1;
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::classify::tests::task;
    use crate::app::classify::{list_buckets, ListSection};
    use crate::types::TaskStatus;

    fn todo_tasks(count: i64) -> Vec<Task> {
        (1..=count).map(|id| task(id, TaskStatus::Todo, None)).collect()
    }

    fn navigator(tasks: &[Task]) -> Navigator<ListSection> {
        let mut nav = Navigator::new();
        nav.rebuild(&list_buckets(tasks, 0..tasks.len()), tasks, Anchor::Start);
        nav
    }

    #[test]
    fn starts_on_first_task() {
        let tasks = todo_tasks(3);
        let nav = navigator(&tasks);
        assert_eq!(nav.visual_index(), 1);
        assert_eq!(nav.current_task(&tasks).map(|t| t.id), Some(1));
    }

    #[test]
    fn movement_is_clamped_at_both_ends() {
        let tasks = todo_tasks(2);
        let mut nav = navigator(&tasks);
        assert!(nav.jump_to_top());
        assert!(!nav.move_by(-1));
        assert_eq!(nav.visual_index(), 0);

        assert!(nav.jump_to_bottom());
        let last = nav.visual_index();
        assert_eq!(last, nav.visible_row_count() - 1);
        assert!(!nav.move_by(1));
        assert_eq!(nav.visual_index(), last);
    }

    #[test]
    fn moving_onto_header_clears_selection() {
        let tasks = todo_tasks(2);
        let mut nav = navigator(&tasks);
        nav.move_by(-1);
        assert!(nav.is_on_header());
        assert_eq!(nav.state(), CursorState::OnHeader);
        assert_eq!(nav.current_task(&tasks), None);
    }

    #[test]
    fn page_moves_by_page_size_and_clamps() {
        let tasks = todo_tasks(20);
        let mut nav = navigator(&tasks);
        nav.page(1, 5);
        assert_eq!(nav.visual_index(), 6);
        nav.page(1, 50);
        assert_eq!(nav.visual_index(), nav.visible_row_count() - 1);
        nav.page(-1, 50);
        assert_eq!(nav.visual_index(), 0);
    }

    #[test]
    fn toggling_current_section_keeps_cursor_on_header() {
        let tasks = todo_tasks(3);
        let mut nav = navigator(&tasks);
        assert!(!nav.toggle_current_section());

        nav.jump_to_top();
        assert!(nav.toggle_current_section());
        assert!(nav.is_on_header());
        assert_eq!(nav.visual_index(), 0);
        assert_eq!(nav.visible_row_count(), 3);
        assert!(nav.toggle_current_section());
        assert_eq!(nav.visible_row_count(), 6);
    }

    #[test]
    fn collapsing_another_section_keeps_task_index() {
        let mut tasks = todo_tasks(2);
        tasks.push(task(3, TaskStatus::Done, None));
        let mut nav = navigator(&tasks);
        nav.jump_to_bottom();
        assert_eq!(nav.current_task(&tasks).map(|t| t.id), Some(3));

        nav.toggle_section(ListSection::Completed);
        assert!(nav.is_on_header());
        assert_eq!(nav.cursor().task_index, 2);

        // Re-expanding leaves the cursor on the header it fell back to.
        nav.toggle_section(ListSection::Completed);
        assert!(nav.is_on_header());
        assert_eq!(nav.cursor().task_index, 2);
        nav.move_by(1);
        assert_eq!(nav.current_task(&tasks).map(|t| t.id), Some(3));
    }

    #[test]
    fn moving_with_no_rows_is_a_noop() {
        let mut nav: Navigator<ListSection> = Navigator::new();
        assert!(!nav.move_by(1));
        assert!(!nav.jump_to_bottom());
        assert_eq!(nav.state(), CursorState::Empty);
    }

    #[test]
    fn viewport_scrolls_one_sided() {
        let tasks = todo_tasks(20);
        let mut nav = navigator(&tasks);
        nav.set_viewport_height(5);
        for _ in 0..5 {
            nav.move_by(1);
        }
        // Cursor on row 6; the window just reaches it.
        assert_eq!(nav.visual_index(), 6);
        assert_eq!(nav.offset(), 2);

        nav.move_by(-1);
        nav.move_by(-1);
        assert_eq!(nav.offset(), 2);
        nav.move_by(-1);
        assert_eq!(nav.visual_index(), 3);
        assert_eq!(nav.offset(), 2);
        nav.move_by(-1);
        assert_eq!(nav.offset(), 2);
        nav.move_by(-1);
        assert_eq!(nav.visual_index(), 1);
        assert_eq!(nav.offset(), 1);
    }

    #[test]
    fn rebuild_follows_task_by_id() {
        let tasks = todo_tasks(3);
        let mut nav = navigator(&tasks);
        nav.move_by(1);
        let anchor = nav.anchor(&tasks);
        assert_eq!(anchor, Anchor::Task { id: 2, task_index: 1 });

        let reordered = vec![tasks[2].clone(), tasks[0].clone(), tasks[1].clone()];
        nav.rebuild(&list_buckets(&reordered, 0..3), &reordered, anchor);
        assert_eq!(nav.current_task(&reordered).map(|t| t.id), Some(2));
        assert_eq!(nav.visual_index(), 3);
    }

    #[test]
    fn rebuild_keeps_header_anchor() {
        let tasks = todo_tasks(3);
        let mut nav = navigator(&tasks);
        nav.select_header(ListSection::Completed);
        let anchor = nav.anchor(&tasks);
        assert_eq!(anchor, Anchor::Header(ListSection::Completed));

        let fewer = todo_tasks(1);
        nav.rebuild(&list_buckets(&fewer, 0..1), &fewer, anchor);
        assert!(nav.is_on_header());
        assert_eq!(
            nav.current_section().map(|s| s.kind),
            Some(ListSection::Completed)
        );
    }

    #[test]
    fn visible_rows_slice_the_flattened_list() {
        let mut tasks = todo_tasks(2);
        tasks.push(task(3, TaskStatus::Done, None));
        let nav = navigator(&tasks);
        // Rows: Todo, 1, 2, Projects, Completed, 3
        let rows = nav.visible_rows(&tasks, 2, 3);
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[0], Row::Task { task, .. } if task.id == 2));
        assert!(matches!(rows[1], Row::Header { kind: ListSection::Projects, item_count: 0, .. }));
        assert!(matches!(rows[2], Row::Header { kind: ListSection::Completed, .. }));

        let all = nav.visible_rows(&tasks, 0, usize::MAX);
        assert_eq!(all.len(), nav.visible_row_count());
        assert_eq!(all.iter().filter(|r| matches!(r, Row::Header { .. })).count(), 3);
    }
}
