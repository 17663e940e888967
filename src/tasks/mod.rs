// src/tasks/mod.rs
pub mod dispatch_task;

pub use dispatch_task::{AppContext, dispatch_once, dispatch_task};
