use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wire format for task and filter timestamps, e.g. "07.03.2025 14:30"
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Parse a wire timestamp; returns None for anything outside the fixed format
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT).ok()
}

/// Format a timestamp in the wire format
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

// ============================================================================
// People Models
// ============================================================================

/// Gender labels used by the workforce API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "М")]
    Male,
    #[serde(rename = "Ж")]
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "М"),
            Gender::Female => write!(f, "Ж"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "М" => Ok(Gender::Male),
            "Ж" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender label: {}", s)),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

/// Foreman supervises a workshop and assigns tasks to technicians
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Foreman {
    pub foreman_id: i64,
    pub full_name: String,
    pub gender: Gender,
    pub workshop: String,
    pub phone_number: String,
}

/// ForemanCreate is the request body for registering a foreman
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForemanCreate {
    pub full_name: String,
    pub gender: Gender,
    pub workshop: String,
    pub phone_number: String,
}

/// ForemanUpdate is the request body for editing a foreman; gender is
/// immutable after creation and therefore absent here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForemanUpdate {
    pub full_name: String,
    pub workshop: String,
    pub phone_number: String,
}

/// Technician is a worker who receives tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technician {
    pub technician_id: i64,
    pub specialization: String,
    pub full_name: String,
    pub gender: Gender,
    pub phone_number: String,
}

/// TechnicianCreate is the request body for registering a technician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianCreate {
    pub specialization: String,
    pub full_name: String,
    pub gender: Gender,
    pub phone_number: String,
}

/// TechnicianUpdate is the request body for editing a technician; gender is
/// immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianUpdate {
    pub specialization: String,
    pub full_name: String,
    pub phone_number: String,
}

// ============================================================================
// Task Models
// ============================================================================

/// TaskStatus carries the exact wire labels used by the workforce API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "Не выполнено")]
    NotDone,
    #[serde(rename = "Выполнено")]
    Done,
    #[serde(rename = "Отменено")]
    Cancelled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::NotDone => write!(f, "Не выполнено"),
            TaskStatus::Done => write!(f, "Выполнено"),
            TaskStatus::Cancelled => write!(f, "Отменено"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Не выполнено" => Ok(TaskStatus::NotDone),
            "Выполнено" => Ok(TaskStatus::Done),
            "Отменено" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl TaskStatus {
    /// Done and Cancelled admit no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::NotDone)
    }

    /// Field edits (time window, description) are allowed only while pending
    pub fn allows_edit(&self) -> bool {
        matches!(self, TaskStatus::NotDone)
    }

    /// Whether a status change is legal for the given viewer role.
    /// Completion is open to any viewer; cancellation is reserved for the
    /// foreman view. Terminal statuses reject everything.
    pub fn can_transition(&self, target: TaskStatus, role: Role) -> bool {
        match (self, target) {
            (TaskStatus::NotDone, TaskStatus::Done) => true,
            (TaskStatus::NotDone, TaskStatus::Cancelled) => role.can_cancel(),
            _ => false,
        }
    }
}

/// Role selects between the two view modes of the interface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Foreman,
    Technician,
}

impl Role {
    /// Only the foreman view may cancel tasks
    pub fn can_cancel(&self) -> bool {
        matches!(self, Role::Foreman)
    }

    /// Only the foreman view may edit task fields or create entities
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Foreman)
    }

    /// The technician identity column is shown only in the foreman view
    pub fn shows_technician_column(&self) -> bool {
        matches!(self, Role::Foreman)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Foreman => write!(f, "foreman"),
            Role::Technician => write!(f, "technician"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foreman" => Ok(Role::Foreman),
            "technician" => Ok(Role::Technician),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Task is a time-boxed unit of work linking one foreman and one technician
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub task_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub workshop: String,
    pub foreman_id: i64,
    pub technician_id: i64,
    pub task_description: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn start_at(&self) -> Option<NaiveDateTime> {
        parse_date_time(&self.start_time)
    }

    pub fn end_at(&self) -> Option<NaiveDateTime> {
        parse_date_time(&self.end_time)
    }

    /// A pending task whose end time has passed is flagged in the table.
    /// Unparseable time strings never flag.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == TaskStatus::NotDone
            && self.end_at().map(|end| end < now).unwrap_or(false)
    }

    /// Table cell form of the description: first 20 characters plus an
    /// ellipsis when longer
    pub fn short_description(&self) -> String {
        let chars: Vec<char> = self.task_description.chars().collect();
        if chars.len() > 20 {
            let mut short: String = chars[..20].iter().collect();
            short.push_str("...");
            short
        } else {
            self.task_description.clone()
        }
    }
}

/// TaskCreate is the request body for assigning a task. The `workshop` field
/// carries the chosen foreman's id; the API resolves it to that foreman's
/// workshop label before storing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub start_time: String,
    pub end_time: String,
    pub workshop: i64,
    pub foreman_id: i64,
    pub technician_id: i64,
    pub task_description: String,
}

/// TaskUpdate edits the time window and description of a pending task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub start_time: String,
    pub end_time: String,
    pub task_description: String,
}

/// TaskStatusUpdate is the status-only transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub task_id: i64,
    pub status: TaskStatus,
}
