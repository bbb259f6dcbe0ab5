//! Board client state, kept free of any UI framework types.
//!
//! The board renders three status columns and turns a drag-and-drop gesture
//! into a status-only partial update. Both are modeled here as pure functions
//! so the mapping can be tested without a client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Task, TaskPatch, TaskStatus};

/// The fixed column order of the board.
pub const BOARD_COLUMNS: [TaskStatus; 3] =
    [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

/// One rendered column: a status, its heading, and the tasks that sit in it.
#[derive(Debug, Serialize)]
pub struct Column {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// Groups tasks into the three board columns, preserving the incoming order
/// within each column.
pub fn columns(tasks: Vec<Task>) -> Vec<Column> {
    let mut columns: Vec<Column> = BOARD_COLUMNS
        .iter()
        .map(|&status| Column {
            status,
            title: status.label(),
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
            column.tasks.push(task);
        }
    }

    columns
}

/// A completed drag-and-drop gesture: which task was dragged, which column it
/// came from, and which column it was dropped on (if any).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DropEvent {
    pub task_id: Uuid,
    pub source: TaskStatus,
    pub destination: Option<TaskStatus>,
}

/// Maps a drop event to the partial update it should issue.
///
/// Returns `None` when the drop landed outside any column or back in the
/// source column; otherwise a patch carrying only the new status, relying on
/// the mutator's partial-update semantics to leave every other field alone.
pub fn status_change(event: &DropEvent) -> Option<TaskPatch> {
    let destination = event.destination?;
    if destination == event.source {
        return None;
    }
    Some(TaskPatch {
        status: Some(destination),
        ..Default::default()
    })
}
