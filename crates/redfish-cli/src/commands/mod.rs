//! Command implementations for redfishctl

pub mod attributes;
pub mod export;
pub mod health;
pub mod info;
pub mod inventory;
pub mod jobs;
pub mod logs;
pub mod power;

pub use attributes::{attributes, set};
pub use export::export;
pub use health::{health, HealthKind};
pub use info::{info, login};
pub use inventory::{boot, drives, firmware, nics, users};
pub use jobs::jobs;
pub use logs::logs;
pub use power::{power, reset_manager, PowerAction};
