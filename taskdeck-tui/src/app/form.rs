use super::state::{BrowseView, TextInput};
use crate::time_utils::{due_date_in, format_date, parse_due_date};
use crate::types::{NewTask, Priority, Task, TaskId, TaskUpdate};
use time::UtcOffset;

/// Problems caught before anything is sent to the task service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
    Priority,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Title => FormField::Priority,
            FormField::Description => FormField::Title,
            FormField::DueDate => FormField::Description,
            FormField::Priority => FormField::DueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create { parent_id: Option<TaskId> },
    Edit { task_id: TaskId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Create(NewTask),
    Update { task_id: TaskId, update: TaskUpdate },
}

/// Create/edit form state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub origin: BrowseView,
    pub title: TextInput,
    pub description: TextInput,
    pub due_date: TextInput,
    pub priority: Priority,
    pub focused: FormField,
    pub error: Option<String>,
    /// Set while the submitted request is in flight.
    pub submitting: bool,
}

impl TaskForm {
    pub fn create(parent_id: Option<TaskId>, origin: BrowseView) -> Self {
        Self {
            mode: FormMode::Create { parent_id },
            origin,
            title: TextInput::new(),
            description: TextInput::new(),
            due_date: TextInput::new(),
            priority: Priority::default(),
            focused: FormField::Title,
            error: None,
            submitting: false,
        }
    }

    pub fn edit(task: &Task, origin: BrowseView, offset: UtcOffset) -> Self {
        let due = task
            .due_date
            .map(|due| format_date(due_date_in(due, offset)))
            .unwrap_or_default();
        Self {
            mode: FormMode::Edit { task_id: task.id },
            origin,
            title: TextInput::from_str(&task.title),
            description: TextInput::from_str(task.description.as_deref().unwrap_or("")),
            due_date: TextInput::from_str(&due),
            priority: task.priority,
            focused: FormField::Title,
            error: None,
            submitting: false,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create { parent_id: None } => " New Task ",
            FormMode::Create { parent_id: Some(_) } => " New Subtask ",
            FormMode::Edit { .. } => " Edit Task ",
        }
    }

    /// Input backing the focused field; `None` for the priority selector.
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn previous_field(&mut self) {
        self.focused = self.focused.previous();
    }

    pub fn input_char(&mut self, c: char) {
        self.error = None;
        if self.focused == FormField::Priority {
            match c {
                'l' | 'L' => self.priority = Priority::Low,
                'm' | 'M' => self.priority = Priority::Medium,
                'h' | 'H' => self.priority = Priority::High,
                ' ' => self.priority = self.priority.next(),
                _ => {}
            }
        } else if let Some(input) = self.focused_input() {
            input.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        if let Some(input) = self.focused_input() {
            input.backspace();
        }
    }

    pub fn move_cursor(&mut self, left: bool) {
        if self.focused == FormField::Priority {
            self.priority = if left {
                self.priority.previous()
            } else {
                self.priority.next()
            };
        } else if let Some(input) = self.focused_input() {
            if left {
                input.move_left();
            } else {
                input.move_right();
            }
        }
    }

    /// Check the fields and build the request they describe.
    pub fn validate(&self, offset: UtcOffset) -> Result<FormSubmission, ValidationError> {
        let title = self.title.value.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let due_input = self.due_date.value.trim();
        let due_date = if due_input.is_empty() {
            None
        } else {
            Some(
                parse_due_date(due_input, offset)
                    .ok_or_else(|| ValidationError::InvalidDueDate(due_input.to_string()))?,
            )
        };
        let description = self.description.value.trim().to_string();

        Ok(match self.mode {
            FormMode::Create { parent_id } => FormSubmission::Create(NewTask {
                parent_id,
                title: title.to_string(),
                description,
                due_date,
                priority: self.priority,
            }),
            FormMode::Edit { task_id } => FormSubmission::Update {
                task_id,
                update: TaskUpdate {
                    title: title.to_string(),
                    description,
                    due_date,
                    priority: self.priority,
                },
            },
        })
    }
}
