//! Partitioning of the task snapshot into the buckets shown by each view.
//!
//! Buckets hold snapshot slots (indices into `App::tasks`) and keep snapshot
//! order, so the same snapshot always yields the same listing.

use super::sections::SectionKind;
use crate::types::Task;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSection {
    Todo,
    Projects,
    Completed,
}

impl SectionKind for ListSection {
    const ORDER: &'static [Self] = &[
        ListSection::Todo,
        ListSection::Projects,
        ListSection::Completed,
    ];

    fn title(self) -> &'static str {
        match self {
            ListSection::Todo => "Todo",
            ListSection::Projects => "Projects",
            ListSection::Completed => "Completed",
        }
    }

    fn expanded_by_default(self) -> bool {
        !matches!(self, ListSection::Projects)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineSection {
    Overdue,
    Today,
    Upcoming,
}

impl SectionKind for TimelineSection {
    const ORDER: &'static [Self] = &[
        TimelineSection::Overdue,
        TimelineSection::Today,
        TimelineSection::Upcoming,
    ];

    fn title(self) -> &'static str {
        match self {
            TimelineSection::Overdue => "Overdue",
            TimelineSection::Today => "Today",
            TimelineSection::Upcoming => "Upcoming",
        }
    }

    fn expanded_by_default(self) -> bool {
        true
    }
}

/// Snapshot slots grouped per section kind, in the kind's canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets<K> {
    groups: Vec<(K, Vec<usize>)>,
}

impl<K: SectionKind> Buckets<K> {
    fn collect(slots: impl IntoIterator<Item = usize>, classify: impl Fn(usize) -> Option<K>) -> Self {
        let mut groups: Vec<(K, Vec<usize>)> =
            K::ORDER.iter().map(|kind| (*kind, Vec::new())).collect();
        for slot in slots {
            let Some(kind) = classify(slot) else {
                continue;
            };
            if let Some((_, bucket)) = groups.iter_mut().find(|(k, _)| *k == kind) {
                bucket.push(slot);
            }
        }
        Self { groups }
    }

    #[cfg(test)]
    pub fn get(&self, kind: K) -> &[usize] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, slots)| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn lengths(&self) -> Vec<(K, usize)> {
        self.groups
            .iter()
            .map(|(kind, slots)| (*kind, slots.len()))
            .collect()
    }

    /// All buckets concatenated; position in this vector is the task index.
    pub fn listing(&self) -> Vec<usize> {
        self.groups
            .iter()
            .flat_map(|(_, slots)| slots.iter().copied())
            .collect()
    }
}

pub fn list_section(task: &Task) -> ListSection {
    if task.is_done() {
        ListSection::Completed
    } else if task.parent_id.is_some() {
        ListSection::Projects
    } else {
        ListSection::Todo
    }
}

/// Timeline placement of a task relative to `today`. Tasks without a due date
/// and completed tasks have no place on the timeline. The due date is moved to
/// the offset of `now` before its calendar date is compared.
pub fn timeline_section(task: &Task, now: OffsetDateTime) -> Option<TimelineSection> {
    if task.is_done() {
        return None;
    }
    let due = task.due_date?.to_offset(now.offset()).date();
    Some(compare_dates(due, now.date()))
}

fn compare_dates(due: Date, today: Date) -> TimelineSection {
    match due.cmp(&today) {
        std::cmp::Ordering::Less => TimelineSection::Overdue,
        std::cmp::Ordering::Equal => TimelineSection::Today,
        std::cmp::Ordering::Greater => TimelineSection::Upcoming,
    }
}

pub fn list_buckets(tasks: &[Task], slots: impl IntoIterator<Item = usize>) -> Buckets<ListSection> {
    Buckets::collect(slots, |slot| tasks.get(slot).map(list_section))
}

pub fn timeline_buckets(
    tasks: &[Task],
    slots: impl IntoIterator<Item = usize>,
    now: OffsetDateTime,
) -> Buckets<TimelineSection> {
    Buckets::collect(slots, |slot| {
        tasks.get(slot).and_then(|task| timeline_section(task, now))
    })
}
