//! Persistence operations. Functions take the pool explicitly and return
//! `AppError`, so route handlers stay thin.

pub mod tasks;
pub mod users;
