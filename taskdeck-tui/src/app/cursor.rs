use super::sections::{SectionKind, SectionRegistry};

/// Selected row of a sectioned list.
///
/// `task_index` is kept while the cursor sits on a header so collapsing and
/// re-expanding a section can return to the same task. When `on_header` is
/// false, `task_index` is valid and maps to `visual_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub visual_index: usize,
    pub task_index: usize,
    pub on_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Empty,
    OnHeader,
    OnTask,
}

impl Cursor {
    /// Place the cursor on a visual row, clamped to the rows that exist.
    pub fn at_visual<K: SectionKind>(self, registry: &SectionRegistry<K>, visual_index: usize) -> Self {
        let rows = registry.visible_row_count();
        if rows == 0 {
            return Self {
                visual_index: 0,
                task_index: 0,
                on_header: true,
            };
        }
        let visual_index = visual_index.min(rows - 1);
        match registry.task_index_of(visual_index) {
            Some(task_index) => Self {
                visual_index,
                task_index,
                on_header: false,
            },
            None => Self {
                visual_index,
                task_index: self.task_index,
                on_header: true,
            },
        }
    }

    /// Place the cursor on a task. Tasks inside collapsed sections land on the
    /// section header; indices past the end are clamped to the last task.
    pub fn at_task<K: SectionKind>(registry: &SectionRegistry<K>, task_index: usize) -> Self {
        let task_count = registry.task_count();
        if task_count == 0 {
            return Self::default().at_visual(registry, 0);
        }
        let task_index = task_index.min(task_count - 1);
        let visual_index = registry.visual_index_of(task_index).unwrap_or(0);
        Self {
            visual_index,
            task_index,
            on_header: registry.is_header(visual_index),
        }
    }

    pub fn at_header<K: SectionKind>(self, registry: &SectionRegistry<K>, kind: K) -> Self {
        match registry.header_position(kind) {
            Some(visual_index) => Self {
                visual_index,
                task_index: self.task_index,
                on_header: true,
            },
            None => self.at_visual(registry, 0),
        }
    }

    pub fn state<K: SectionKind>(&self, registry: &SectionRegistry<K>) -> CursorState {
        if registry.visible_row_count() == 0 {
            CursorState::Empty
        } else if self.on_header {
            CursorState::OnHeader
        } else {
            CursorState::OnTask
        }
    }

    /// Selected task index, `None` on headers.
    pub fn selected_task(&self) -> Option<usize> {
        (!self.on_header).then_some(self.task_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::classify::ListSection;

    fn registry() -> SectionRegistry<ListSection> {
        let mut registry = SectionRegistry::new();
        // Rows: Todo, t0, t1, Projects (collapsed), Completed, t3
        registry.rebuild(&[
            (ListSection::Todo, 2),
            (ListSection::Projects, 1),
            (ListSection::Completed, 1),
        ]);
        registry
    }

    #[test]
    fn header_rows_keep_previous_task_index() {
        let registry = registry();
        let cursor = Cursor::at_task(&registry, 1);
        assert_eq!(cursor.visual_index, 2);

        let on_header = cursor.at_visual(&registry, 0);
        assert!(on_header.on_header);
        assert_eq!(on_header.task_index, 1);
        assert_eq!(on_header.selected_task(), None);
    }

    #[test]
    fn task_in_collapsed_section_lands_on_header() {
        let registry = registry();
        let cursor = Cursor::at_task(&registry, 2);
        assert_eq!(cursor.visual_index, 3);
        assert!(cursor.on_header);
        assert_eq!(cursor.task_index, 2);
    }

    #[test]
    fn visual_positions_are_clamped() {
        let registry = registry();
        let cursor = Cursor::default().at_visual(&registry, 42);
        assert_eq!(cursor.visual_index, 5);
        assert_eq!(cursor.selected_task(), Some(3));
    }

    #[test]
    fn empty_registry_reports_empty_state() {
        let registry: SectionRegistry<ListSection> = SectionRegistry::new();
        let cursor = Cursor::at_task(&registry, 3);
        assert_eq!(cursor.state(&registry), CursorState::Empty);
        assert_eq!(cursor.visual_index, 0);
    }

    #[test]
    fn no_tasks_falls_back_to_first_header() {
        let mut registry: SectionRegistry<ListSection> = SectionRegistry::new();
        registry.rebuild(&[]);
        let cursor = Cursor::at_task(&registry, 7);
        assert_eq!(cursor.state(&registry), CursorState::OnHeader);
        assert_eq!(cursor.visual_index, 0);
    }
}
