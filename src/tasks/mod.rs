//! Background Tasks Module
//!
//! Contains background tasks that run during server operation.
//!
//! # Tasks
//! - Expiry sweeper: removes entries nobody read after their deadline

mod sweeper;

pub use sweeper::ScheduledSweep;
pub(crate) use sweeper::spawn_expiry_sweeper;
