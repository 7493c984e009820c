//! Background Tasks Module
//!
//! Periodic maintenance for the in-memory pool.

mod purge;

pub use purge::spawn_purge_task;
