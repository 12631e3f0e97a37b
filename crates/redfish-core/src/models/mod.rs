//! Management-service resource models
//!
//! Wire types mirror the JSON bodies returned by the service (PascalCase
//! field names, tolerant of missing fields). Record types are the uniform
//! views the client hands back to callers.

pub mod event_log;
pub mod health;
pub mod inventory;
pub mod odata;
pub mod resources;
pub mod task;

pub use event_log::*;
pub use health::*;
pub use inventory::*;
pub use odata::*;
pub use resources::*;
pub use task::*;
