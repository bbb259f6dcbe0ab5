pub mod task;
pub mod user;

pub use task::{AssigneeRef, Task, TaskInput, TaskPatch, TaskPriority, TaskQuery, TaskStatus};
pub use user::{ProfileUpdate, SignupRequest, User, UserResponse};
