//! redfish-core - Resource models and schema selection for Redfish clients
//!
//! This crate holds the pieces of a Redfish client that do not talk to the
//! network: the typed shapes of management-service resources, the uniform
//! health/inventory records they are folded into, and the firmware-version
//! rules used to pick between incompatible response layouts.

pub mod error;
pub mod models;
pub mod version;

pub use error::{VersionError, VersionResult};
pub use models::*;
pub use version::{
    select_schema, Comparator, FirmwareVersion, SchemaRule, SchemaRules, VersionConstraint,
};
