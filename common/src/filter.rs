// Task list filtering. The workforce API accepts the six filter parameters
// on its list endpoint but returns the unfiltered collection, so filtering
// runs here after fetch. Field names stay aligned with the API's parameters
// in case it starts honoring them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::FieldError;
use crate::models::{parse_date_time, Task, TaskStatus};
use crate::roster::RosterIndex;
use crate::validation::DATE_TIME_MESSAGE;

/// Raw filter fields as they arrive from the query string. Kept verbatim so
/// the form re-renders with whatever the user typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskFilterForm {
    #[serde(default)]
    pub date_start: String,
    #[serde(default)]
    pub date_end: String,
    #[serde(default)]
    pub workshop: String,
    #[serde(default)]
    pub foreman_name: String,
    #[serde(default)]
    pub technician_name: String,
    #[serde(default)]
    pub status: String,
}

impl TaskFilterForm {
    /// Trim every field, drop empties, and parse the date bounds. A
    /// non-empty date outside the fixed format is a field error; there is
    /// deliberately no start/end ordering check on this form. A status
    /// outside the known labels can only arrive from a hand-edited query
    /// string and is treated as unset, like the API treats it.
    pub fn normalize(&self) -> Result<TaskFilter, Vec<FieldError>> {
        let mut errors = Vec::new();

        let date_start = match non_empty(&self.date_start) {
            Some(raw) => match parse_date_time(raw) {
                Some(parsed) => Some(parsed),
                None => {
                    errors.push(FieldError::new("date_start", DATE_TIME_MESSAGE));
                    None
                }
            },
            None => None,
        };
        let date_end = match non_empty(&self.date_end) {
            Some(raw) => match parse_date_time(raw) {
                Some(parsed) => Some(parsed),
                None => {
                    errors.push(FieldError::new("date_end", DATE_TIME_MESSAGE));
                    None
                }
            },
            None => None,
        };

        let status = non_empty(&self.status).and_then(|raw| raw.parse::<TaskStatus>().ok());

        if errors.is_empty() {
            Ok(TaskFilter {
                date_start,
                date_end,
                workshop: non_empty(&self.workshop).map(str::to_string),
                foreman_name: non_empty(&self.foreman_name).map(str::to_string),
                technician_name: non_empty(&self.technician_name).map(str::to_string),
                status,
            })
        } else {
            Err(errors)
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalized filter criteria; unset fields match everything and set fields
/// compose conjunctively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub date_start: Option<NaiveDateTime>,
    pub date_end: Option<NaiveDateTime>,
    pub workshop: Option<String>,
    pub foreman_name: Option<String>,
    pub technician_name: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        *self == TaskFilter::default()
    }

    /// Whether one task satisfies every set criterion. Name criteria resolve
    /// through the roster; a task whose id has no roster entry never matches
    /// a set name criterion, and a task whose own time string does not parse
    /// never matches a set date bound.
    pub fn matches(&self, task: &Task, roster: &RosterIndex) -> bool {
        if let Some(bound) = self.date_start {
            match task.start_at() {
                Some(start) if start >= bound => {}
                _ => return false,
            }
        }
        if let Some(bound) = self.date_end {
            match task.end_at() {
                Some(end) if end <= bound => {}
                _ => return false,
            }
        }
        if let Some(workshop) = &self.workshop {
            if !contains_ci(&task.workshop, workshop) {
                return false;
            }
        }
        if let Some(name) = &self.foreman_name {
            match roster.foreman_name(task.foreman_id) {
                Some(full_name) if contains_ci(full_name, name) => {}
                _ => return false,
            }
        }
        if let Some(name) = &self.technician_name {
            match roster.technician_name(task.technician_id) {
                Some(full_name) if contains_ci(full_name, name) => {}
                _ => return false,
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, tasks: &'a [Task], roster: &RosterIndex) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task, roster))
            .collect()
    }
}
