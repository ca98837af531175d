//! Background Tasks Module
//!
//! Contains background tasks that maintain caches while callers use them.
//!
//! # Tasks
//! - TTL Sweep: Reclaims expired TTL cache entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, spawn_sweeper_from_config, SweeperHandle};
