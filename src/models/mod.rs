pub mod api;
pub mod task;
pub mod user;

pub use api::{MessageResponse, TaskListResponse, TaskResponse};
pub use task::{NewTask, Task, TaskChanges, TaskQuery, TaskStatus};
pub use user::User;
