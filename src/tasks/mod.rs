//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: drops entries older than the longest duration class

mod sweep;

pub use sweep::spawn_sweep_task;
