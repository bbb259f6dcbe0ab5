use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Represents the status of a task, i.e. the board column it sits in.
/// Corresponds to the `task_status` SQL enum. Unknown values are rejected
/// at deserialization, so the update path cannot write an out-of-range status.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    /// Column heading shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task. Only this user may
    /// mutate or delete it.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new `Task` instance from `TaskInput` and the creator's `user_id`.
    /// Sets `created_at` and `updated_at` to the current time, and `id` to a new UUID.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reference to a user in a reassignment payload: `{"assignee": {"id": ...}}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct AssigneeRef {
    pub id: Uuid,
}

/// Deserializes a field that was present in the JSON body, wrapping it in
/// `Some`. Combined with `#[serde(default)]` this distinguishes an absent
/// field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A partial update for `PUT /api/tasks/{id}`.
///
/// Presence is explicit by construction: for nullable columns the outer
/// `Option` records whether the field appeared in the request at all, and the
/// inner `Option` carries the new value: `null` clears the column, an absent
/// field leaves it untouched. `title` and `status` are non-nullable, and
/// `assignee` reassigns the task to a different owning user.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Option<TaskPriority>>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AssigneeRef>,
}

impl TaskPatch {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
    }

    /// Applies the same length constraints as `TaskInput`. Hand-rolled because
    /// the `validator` derive cannot see through the double-`Option` wrappers.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.is_empty() || title.len() > 200 {
                return Err(AppError::ValidationError(
                    "title must be between 1 and 200 characters".into(),
                ));
            }
        }
        if let Some(Some(description)) = &self.description {
            if description.len() > 1000 {
                return Err(AppError::ValidationError(
                    "description must be at most 1000 characters".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Represents query parameters for filtering tasks when listing them.
/// Listing is already scoped to the authenticated owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by board column.
    pub status: Option<TaskStatus>,
    /// Search term matched against title and description (case-insensitive).
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_creation() {
        let input = TaskInput {
            title: "Write spec".to_string(),
            description: Some("First draft".to_string()),
            status: TaskStatus::Todo,
            priority: Some(TaskPriority::High),
            due_date: Some(Utc::now()),
        };

        let owner = Uuid::new_v4();
        let task = Task::new(input, owner);
        assert_eq!(task.title, "Write spec");
        assert_eq!(task.user_id, owner);
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn test_task_input_validation() {
        let invalid_empty_title = TaskInput {
            title: "".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: None,
            due_date: None,
        };
        assert!(Validate::validate(&invalid_empty_title).is_err());

        let invalid_long_title = TaskInput {
            title: "a".repeat(201),
            description: None,
            status: TaskStatus::InProgress,
            priority: None,
            due_date: None,
        };
        assert!(Validate::validate(&invalid_long_title).is_err());

        let invalid_long_description = TaskInput {
            title: "Valid title".to_string(),
            description: Some("b".repeat(1001)),
            status: TaskStatus::Todo,
            priority: None,
            due_date: None,
        };
        assert!(Validate::validate(&invalid_long_description).is_err());

        let valid = TaskInput {
            title: "Valid title".to_string(),
            description: Some("Short description".to_string()),
            status: TaskStatus::Done,
            priority: Some(TaskPriority::Low),
            due_date: None,
        };
        assert!(Validate::validate(&valid).is_ok());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"TODO\"").unwrap(),
            TaskStatus::Todo
        );
        // Strict enumeration: out-of-range statuses are rejected at the boundary.
        assert!(serde_json::from_str::<TaskStatus>("\"ARCHIVED\"").is_err());
    }

    #[test]
    fn test_patch_absent_vs_null() {
        // Absent field: untouched.
        let patch: TaskPatch = serde_json::from_str(r#"{"status":"DONE"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Done));
        assert_eq!(patch.description, None);
        assert_eq!(patch.due_date, None);
        assert!(!patch.is_empty());

        // Explicit null: clear the column.
        let patch: TaskPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(patch.description, Some(None));

        // Supplied value.
        let patch: TaskPatch =
            serde_json::from_str(r#"{"description":"new text","dueDate":null}"#).unwrap();
        assert_eq!(patch.description, Some(Some("new text".to_string())));
        assert_eq!(patch.due_date, Some(None));

        let empty: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_patch_validation() {
        let bad_title = TaskPatch {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(bad_title.validate().is_err());

        let bad_description = TaskPatch {
            description: Some(Some("c".repeat(1001))),
            ..Default::default()
        };
        assert!(bad_description.validate().is_err());

        let ok = TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_patch_assignee() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"assignee":{{"id":"{}"}}}}"#, id);
        let patch: TaskPatch = serde_json::from_str(&body).unwrap();
        assert_eq!(patch.assignee.map(|a| a.id), Some(id));
    }
}
