//! Task creation form for the terminal user interface.
//!
//! This module provides the `TaskForm` structure: field ordering, focus
//! movement, the responsible multi-select and validation of the four
//! required fields before a task is submitted.

use chrono::NaiveDate;

use crate::dates::parse_due_input;
use crate::task::NewTask;
use crate::tui::input::InputField;

/// Field order in the creation form.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const RESPONSIBLES_FIELD: usize = 2;
pub const DATE_FIELD: usize = 3;
pub const FIELD_COUNT: usize = 4;

/// Per-field validation messages shown under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub responsibles: Option<String>,
    pub date: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.responsibles.is_none()
            && self.date.is_none()
    }
}

/// Form state for creating a task.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub date: InputField,
    pub responsible_options: Vec<String>,
    pub responsible_cursor: usize,
    pub chosen: Vec<bool>,
    pub current_field: usize,
    pub errors: FormErrors,
}

impl TaskForm {
    /// Create an empty form offering the given responsible names.
    pub fn new(responsible_options: Vec<String>) -> Self {
        let chosen = vec![false; responsible_options.len()];
        let mut form = Self {
            title: InputField::new(),
            description: InputField::new(),
            date: InputField::new(),
            responsible_options,
            responsible_cursor: 0,
            chosen,
            current_field: TITLE_FIELD,
            errors: FormErrors::default(),
        };
        form.update_active_field();
        form
    }

    /// Clear every field and message.
    pub fn reset(&mut self) {
        let options = std::mem::take(&mut self.responsible_options);
        *self = Self::new(options);
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.date.active = self.current_field == DATE_FIELD;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            DATE_FIELD => Some(&mut self.date),
            _ => None,
        }
    }

    /// Type a character. On the responsible selector a space toggles the highlighted name.
    pub fn handle_char(&mut self, c: char) {
        if self.current_field == RESPONSIBLES_FIELD {
            if c == ' ' {
                self.toggle_responsible();
            }
            return;
        }
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Move the text cursor, or cycle the responsible selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == RESPONSIBLES_FIELD {
            let len = self.responsible_options.len();
            if len == 0 {
                return;
            }
            self.responsible_cursor = if right {
                (self.responsible_cursor + 1) % len
            } else if self.responsible_cursor == 0 {
                len - 1
            } else {
                self.responsible_cursor - 1
            };
            return;
        }
        if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    pub fn toggle_responsible(&mut self) {
        if let Some(flag) = self.chosen.get_mut(self.responsible_cursor) {
            *flag = !*flag;
        }
    }

    /// Names currently ticked, in option order.
    pub fn selected_responsibles(&self) -> Vec<String> {
        self.responsible_options
            .iter()
            .zip(&self.chosen)
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Check every required field. Fills `errors` and returns the task fields when valid.
    pub fn validate(&mut self, today: NaiveDate) -> Option<NewTask> {
        let title = self.title.value.trim();
        let description = self.description.value.trim();
        let responsibles = self.selected_responsibles();
        let date = parse_due_input(&self.date.value, today);

        self.errors = FormErrors {
            title: title.is_empty().then(|| "O título é obrigatório".to_string()),
            description: description
                .is_empty()
                .then(|| "A descrição é obrigatória".to_string()),
            responsibles: responsibles
                .is_empty()
                .then(|| "O responsável é obrigatório".to_string()),
            date: match (&date, self.date.value.trim().is_empty()) {
                (_, true) => Some("A data limite é obrigatória".to_string()),
                (Err(_), false) => Some("Data inválida".to_string()),
                (Ok(_), false) => None,
            },
        };

        if !self.errors.is_empty() {
            return None;
        }
        Some(NewTask {
            title: title.to_string(),
            description: description.to_string(),
            responsibles,
            date: date.ok()?,
        })
    }
}
