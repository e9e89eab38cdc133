//! The ingestion pipeline: bounded queues (C4, C5), the worker pool (C6),
//! and the supervisor that owns their lifecycle (C7).

pub mod queue;
pub mod supervisor;
pub mod worker;

pub use supervisor::Supervisor;
