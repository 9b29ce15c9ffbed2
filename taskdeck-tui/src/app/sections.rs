use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A kind of collapsible section. Each view has a closed set of kinds shown
/// in a fixed order.
pub trait SectionKind: Copy + Eq + Hash + Debug + 'static {
    /// Canonical display order of the sections.
    const ORDER: &'static [Self];

    fn title(self) -> &'static str;

    fn expanded_by_default(self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section<K> {
    pub kind: K,
    pub title: &'static str,
    pub item_count: usize,
    /// Position of the section's first task in the ordered listing.
    pub start_index: usize,
    pub expanded: bool,
}

impl<K> Section<K> {
    /// Rows taken by this section, header included.
    fn row_count(&self) -> usize {
        1 + if self.expanded { self.item_count } else { 0 }
    }

    fn contains_task(&self, task_index: usize) -> bool {
        task_index >= self.start_index && task_index < self.start_index + self.item_count
    }
}

/// Ordered, collapsible sections over a categorized task listing.
///
/// Sections are rebuilt wholesale whenever the listing changes. The expanded
/// flag is remembered per kind for the lifetime of the registry so a rebuild
/// never re-opens a section the user collapsed.
#[derive(Debug, Clone)]
pub struct SectionRegistry<K: SectionKind> {
    sections: Vec<Section<K>>,
    expanded: HashMap<K, bool>,
}

impl<K: SectionKind> Default for SectionRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SectionKind> SectionRegistry<K> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            expanded: K::ORDER
                .iter()
                .map(|kind| (*kind, kind.expanded_by_default()))
                .collect(),
        }
    }

    /// Replace all sections. `lengths` gives each kind's bucket length; kinds
    /// missing from it get an empty section. Sections are always laid out in
    /// `K::ORDER` regardless of the order of `lengths`.
    pub fn rebuild(&mut self, lengths: &[(K, usize)]) {
        self.sections.clear();
        let mut start_index = 0;
        for kind in K::ORDER {
            let item_count = lengths
                .iter()
                .find(|(k, _)| k == kind)
                .map(|(_, len)| *len)
                .unwrap_or(0);
            self.sections.push(Section {
                kind: *kind,
                title: kind.title(),
                item_count,
                start_index,
                expanded: self.is_expanded(*kind),
            });
            start_index += item_count;
        }
    }

    pub fn sections(&self) -> &[Section<K>] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, kind: K) -> Option<&Section<K>> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn is_expanded(&self, kind: K) -> bool {
        self.expanded
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.expanded_by_default())
    }

    /// Flip a section open or closed and remember the choice across rebuilds.
    pub fn toggle(&mut self, kind: K) {
        let expanded = !self.is_expanded(kind);
        self.expanded.insert(kind, expanded);
        if let Some(section) = self.sections.iter_mut().find(|s| s.kind == kind) {
            section.expanded = expanded;
        }
    }

    /// Number of tasks across all sections, collapsed or not.
    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.item_count).sum()
    }

    pub fn visible_row_count(&self) -> usize {
        self.sections.iter().map(Section::row_count).sum()
    }

    /// The section whose header sits exactly at `visual_index`.
    pub fn section_at(&self, visual_index: usize) -> Option<&Section<K>> {
        let mut position = 0;
        for section in &self.sections {
            if position == visual_index {
                return Some(section);
            }
            position += section.row_count();
            if position > visual_index {
                return None;
            }
        }
        None
    }

    pub fn is_header(&self, visual_index: usize) -> bool {
        self.section_at(visual_index).is_some()
    }

    /// Visual index of a section's header row.
    pub fn header_position(&self, kind: K) -> Option<usize> {
        let mut position = 0;
        for section in &self.sections {
            if section.kind == kind {
                return Some(position);
            }
            position += section.row_count();
        }
        None
    }

    /// The section a visual row belongs to, header or item.
    pub fn section_containing(&self, visual_index: usize) -> Option<&Section<K>> {
        let visual_index = self.clamp_visual(visual_index)?;
        let mut position = 0;
        for section in &self.sections {
            position += section.row_count();
            if visual_index < position {
                return Some(section);
            }
        }
        None
    }

    /// Translate a visual row into a task index. `None` on header rows and
    /// when there are no rows at all. Out-of-range input is clamped to the
    /// last row.
    pub fn task_index_of(&self, visual_index: usize) -> Option<usize> {
        let visual_index = self.clamp_visual(visual_index)?;
        let mut header_position = 0;
        for section in &self.sections {
            let next = header_position + section.row_count();
            if visual_index < next {
                if visual_index == header_position {
                    return None;
                }
                return Some(section.start_index + (visual_index - (header_position + 1)));
            }
            header_position = next;
        }
        None
    }

    /// Translate a task index into its visual row. A task inside a collapsed
    /// section resolves to that section's header. Indices past the last task
    /// are clamped to it.
    pub fn visual_index_of(&self, task_index: usize) -> Option<usize> {
        let task_count = self.task_count();
        if task_count == 0 {
            return None;
        }
        let task_index = task_index.min(task_count - 1);
        let mut header_position = 0;
        for section in &self.sections {
            if section.contains_task(task_index) {
                return Some(if section.expanded {
                    header_position + 1 + (task_index - section.start_index)
                } else {
                    header_position
                });
            }
            header_position += section.row_count();
        }
        None
    }

    fn clamp_visual(&self, visual_index: usize) -> Option<usize> {
        let rows = self.visible_row_count();
        if rows == 0 {
            None
        } else {
            Some(visual_index.min(rows - 1))
        }
    }
}
